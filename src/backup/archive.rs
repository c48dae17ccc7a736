//! Archive handling for export, import and local backup
//!
//! - **Packing**: [`pack_dir`] - gzipped tar of a directory plus extra entries
//! - **Unpacking**: [`unpack`] - extract a gzipped tar into a directory
//! - **Sniffing**: [`is_gzip`] - tell an archive from a plain settings file
//! - **Hashing**: [`calculate_file_hash`] - SHA-256 for manifest integrity
//!
//! # Export Format
//!
//! ```text
//! export_settings_config.tpc (tar + gzip)
//! ├── .devconf-manifest.json   # optional, absent in legacy exports
//! ├── settings_config.ini
//! └── ...                      # everything else in the config folder
//! ```

use crate::error::{Error, Result};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::debug;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tar::{Archive, Builder, Header};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

fn archive_err(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Archive(format!("{context}: {e}"))
}

/// Pack `source_dir` into a gzipped tar at `output_path`
///
/// `extra` entries are written first, at the archive root. A file equal to
/// `output_path` inside `source_dir` is skipped. Returns the number of files
/// archived from `source_dir`.
pub fn pack_dir(source_dir: &Path, output_path: &Path, extra: &[(&str, &[u8])]) -> Result<u32> {
    let file = File::create(output_path).map_err(|e| Error::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;

    let mut builder = Builder::new(GzEncoder::new(file, Compression::default()));

    for (name, data) in extra {
        let mut header = Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o600);
        header.set_mtime(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        );
        builder
            .append_data(&mut header, name, *data)
            .map_err(|e| archive_err(name, e))?;
    }

    let count = add_directory(&mut builder, source_dir, source_dir, output_path)?;

    builder
        .into_inner()
        .map_err(|e| archive_err("finish tar", e))?
        .finish()
        .map_err(|e| archive_err("finish gzip", e))?;

    debug!("packed {count} files from {} into {}", source_dir.display(), output_path.display());
    Ok(count)
}

/// Recursively add a directory to a tar archive
fn add_directory<W: std::io::Write>(
    builder: &mut Builder<W>,
    base_dir: &Path,
    current_dir: &Path,
    skip: &Path,
) -> Result<u32> {
    let mut count = 0;
    let read_dir = std::fs::read_dir(current_dir).map_err(|e| Error::FileRead {
        path: current_dir.to_path_buf(),
        source: e,
    })?;

    for entry in read_dir {
        let entry = entry.map_err(|e| Error::FileRead {
            path: current_dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if path == skip {
            continue;
        }
        let relative_path = path
            .strip_prefix(base_dir)
            .map_err(|e| archive_err("relative path", e))?;

        if path.is_dir() {
            builder
                .append_dir(relative_path, &path)
                .map_err(|e| archive_err(&relative_path.to_string_lossy(), e))?;
            count += add_directory(builder, base_dir, &path, skip)?;
        } else {
            let mut file = File::open(&path).map_err(|e| Error::FileRead {
                path: path.clone(),
                source: e,
            })?;
            builder
                .append_file(relative_path, &mut file)
                .map_err(|e| archive_err(&relative_path.to_string_lossy(), e))?;
            count += 1;
        }
    }

    Ok(count)
}

/// Number of regular files under `dir`, excluding `skip`
pub fn count_files(dir: &Path, skip: &Path) -> Result<u32> {
    let mut count = 0;
    let read_dir = std::fs::read_dir(dir).map_err(|e| Error::FileRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in read_dir.flatten() {
        let path = entry.path();
        if path == skip {
            continue;
        }
        if path.is_dir() {
            count += count_files(&path, skip)?;
        } else {
            count += 1;
        }
    }
    Ok(count)
}

/// Extract a gzipped tar into `output_dir`
///
/// Entries that would land outside `output_dir` are rejected.
pub fn unpack(archive_path: &Path, output_dir: &Path) -> Result<()> {
    let file = File::open(archive_path).map_err(|e| Error::FileRead {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let mut archive = Archive::new(GzDecoder::new(file));
    let entries = archive.entries().map_err(|e| archive_err("read entries", e))?;

    for entry in entries {
        let mut entry = entry.map_err(|e| archive_err("read entry", e))?;
        let unpacked = entry
            .unpack_in(output_dir)
            .map_err(|e| archive_err("unpack entry", e))?;
        if !unpacked {
            let name = entry
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            return Err(Error::Archive(format!("entry '{name}' escapes the extraction dir")));
        }
    }

    Ok(())
}

/// Whether the file starts with the gzip magic bytes
pub fn is_gzip(path: &Path) -> Result<bool> {
    let mut file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut magic = [0u8; 2];
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(magic == GZIP_MAGIC),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Calculate SHA-256 hash of a file
pub fn calculate_file_hash(path: &Path) -> Result<(String, u64)> {
    let mut file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    let mut total_size = 0u64;

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        total_size += bytes_read as u64;
        hasher.update(&buffer[..bytes_read]);
    }

    let hash = format!("{:x}", hasher.finalize());
    Ok((hash, total_size))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pack_and_unpack() {
        let temp = tempdir().unwrap();
        let src_dir = temp.path().join("settings");
        let archive_path = temp.path().join("export.tpc");
        let extract_dir = temp.path().join("extracted");

        std::fs::create_dir_all(src_dir.join("themes")).unwrap();
        std::fs::write(src_dir.join("settings_config.ini"), "[core]\napp_mode=general\n").unwrap();
        std::fs::write(src_dir.join("themes/dark.ini"), "[ui]\n").unwrap();

        let count = pack_dir(&src_dir, &archive_path, &[("manifest.json", &b"{}"[..])]).unwrap();
        assert_eq!(count, 2);
        assert_eq!(count_files(&src_dir, &archive_path).unwrap(), 2);
        assert!(is_gzip(&archive_path).unwrap());

        std::fs::create_dir_all(&extract_dir).unwrap();
        unpack(&archive_path, &extract_dir).unwrap();

        assert_eq!(
            std::fs::read_to_string(extract_dir.join("settings_config.ini")).unwrap(),
            "[core]\napp_mode=general\n"
        );
        assert_eq!(std::fs::read_to_string(extract_dir.join("themes/dark.ini")).unwrap(), "[ui]\n");
        assert_eq!(std::fs::read_to_string(extract_dir.join("manifest.json")).unwrap(), "{}");
    }

    #[test]
    fn test_pack_skips_output_inside_source() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a.ini"), "x").unwrap();
        let archive_path = temp.path().join("self.tpc");

        let count = pack_dir(temp.path(), &archive_path, &[]).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unpack_rejects_garbage() {
        let temp = tempdir().unwrap();
        let bogus = temp.path().join("bogus.tpc");
        std::fs::write(&bogus, "definitely not a tarball").unwrap();

        assert!(!is_gzip(&bogus).unwrap());
        assert!(matches!(unpack(&bogus, temp.path()), Err(Error::Archive(_))));
    }

    #[test]
    fn test_is_gzip_short_file() {
        let temp = tempdir().unwrap();
        let short = temp.path().join("short");
        std::fs::write(&short, [0x1f]).unwrap();
        assert!(!is_gzip(&short).unwrap());
    }

    #[test]
    fn test_calculate_file_hash() {
        let temp = tempdir().unwrap();
        let file_path = temp.path().join("test.txt");
        std::fs::write(&file_path, "test content").unwrap();

        let (hash, size) = calculate_file_hash(&file_path).unwrap();

        assert_eq!(hash.len(), 64);
        assert_eq!(size, 12);
    }
}
