//! Archive codec
//!
//! Streams a directory tree into a gzip-compressed POSIX tar and back.
//! Entry names are paths relative to the source directory; only regular
//! files are written (directory structure is implied by path components)
//! and only regular files and directories are accepted on read.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Archive, Builder, EntryType};

use crate::error::{Error, Result};

/// gzip magic number, the first two bytes of any member
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compress `source_dir` into a tar.gz at `output`.
///
/// Walks the tree recursively and appends every regular file under its
/// path relative to `source_dir`. The output file itself is skipped when
/// it lives inside the tree being compressed, which is the normal case
/// for generated backup archives.
pub fn compress(source_dir: &Path, output: &Path) -> Result<()> {
    tracing::info!(source = %source_dir.display(), output = %output.display(), "compressing directory");

    let output_abs = absolute(output)?;
    let out_file = File::create(&output_abs).map_err(|source| Error::Archive {
        path: output_abs.clone(),
        source,
    })?;

    let encoder = GzEncoder::new(out_file, Compression::default());
    let mut builder = Builder::new(encoder);

    append_dir(&mut builder, source_dir, source_dir, &output_abs)?;

    // finish() flushes the tar trailer and then the gzip stream
    let encoder = builder.into_inner().map_err(|source| Error::Archive {
        path: output_abs.clone(),
        source,
    })?;
    encoder.finish().map_err(|source| Error::Archive {
        path: output_abs,
        source,
    })?;

    Ok(())
}

fn append_dir(
    builder: &mut Builder<GzEncoder<File>>,
    root: &Path,
    current: &Path,
    output_abs: &Path,
) -> Result<()> {
    let entries = fs::read_dir(current).map_err(|source| Error::Traversal {
        path: current.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| Error::Traversal {
            path: current.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            append_dir(builder, root, &path, output_abs)?;
            continue;
        }

        // Never include the archive we are writing
        if absolute(&path)? == *output_abs {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        builder
            .append_path_with_name(&path, &relative)
            .map_err(|source| Error::Archive { path, source })?;
    }

    Ok(())
}

/// Unpack a tar.gz at `archive` into `dest_dir`.
///
/// Entries are processed strictly in archive order. Directory entries are
/// recreated with mode 0755; regular files are created and streamed to
/// disk. Anything else (symlinks, devices) fails the whole restore with
/// [`Error::UnsupportedEntry`].
pub fn decompress(archive: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|source| Error::Archive {
        path: archive.to_path_buf(),
        source,
    })?;

    let mut reader = Archive::new(GzDecoder::new(file));
    let entries = reader.entries().map_err(|source| Error::Archive {
        path: archive.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let mut entry = entry.map_err(|source| Error::Archive {
            path: archive.to_path_buf(),
            source,
        })?;

        let name = entry
            .path()
            .map_err(|source| Error::Archive {
                path: archive.to_path_buf(),
                source,
            })?
            .into_owned();
        let target = dest_dir.join(&name);

        match entry.header().entry_type() {
            EntryType::Directory => {
                create_dir_0755(&target)?;
            }
            EntryType::Regular => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|source| Error::Archive {
                        path: target.clone(),
                        source,
                    })?;
                }
                let mut out = File::create(&target).map_err(|source| Error::Archive {
                    path: target.clone(),
                    source,
                })?;
                io::copy(&mut entry, &mut out).map_err(|source| Error::Archive {
                    path: target,
                    source,
                })?;
            }
            other => {
                return Err(Error::UnsupportedEntry(format!(
                    "{other:?} entry '{}'",
                    name.display()
                )));
            }
        }
    }

    Ok(())
}

/// Sniff whether `path` looks like a gzip stream.
///
/// Reads up to 512 bytes and checks the two magic bytes. Returns `false`
/// rather than an error when the file cannot be opened or read: this
/// check gates an optional best-effort decompression step, so "unknown"
/// means "not an archive".
pub fn is_archive(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };

    let mut buf = [0u8; 512];
    let Ok(n) = file.read(&mut buf) else {
        return false;
    };

    n >= 2 && buf[..2] == GZIP_MAGIC
}

/// File name for a generated archive: `<base>.tar.gz`, or
/// `<base>-<timestamp>.tar.gz` with the timestamp in local time when
/// requested. The archive is placed inside the source directory.
pub fn archive_output_path(source_dir: &Path, timestamp: bool) -> PathBuf {
    let base = source_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string());

    let name = if timestamp {
        let now = jiff::Zoned::now();
        format!("{base}-{}.tar.gz", now.strftime("%Y-%m-%d_%H-%M-%S"))
    } else {
        format!("{base}.tar.gz")
    };

    source_dir.join(name)
}

fn create_dir_0755(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::Archive {
        path: path.to_path_buf(),
        source,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| {
            Error::Archive {
                path: path.to_path_buf(),
                source,
            }
        })?;
    }

    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir()?;
        Ok(cwd.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn fixture_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"alpha").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("b.txt"), b"beta").unwrap();
        dir
    }

    /// Map of relative path -> content for every regular file under root
    fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
        let mut out = BTreeMap::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    let rel = path.strip_prefix(root).unwrap();
                    let key = rel.to_string_lossy().replace('\\', "/");
                    out.insert(key, fs::read(&path).unwrap());
                }
            }
        }
        out
    }

    #[test]
    fn test_round_trip_preserves_paths_and_content() {
        let source = fixture_tree();
        let archive_dir = TempDir::new().unwrap();
        let archive = archive_dir.path().join("data.tar.gz");

        compress(source.path(), &archive).unwrap();

        let restored = TempDir::new().unwrap();
        decompress(&archive, restored.path()).unwrap();

        assert_eq!(snapshot(source.path()), snapshot(restored.path()));
    }

    #[test]
    fn test_compress_skips_output_inside_source() {
        let source = fixture_tree();
        let archive = source.path().join("data.tar.gz");

        compress(source.path(), &archive).unwrap();

        let restored = TempDir::new().unwrap();
        decompress(&archive, restored.path()).unwrap();

        // The archive must not contain itself
        assert!(!restored.path().join("data.tar.gz").exists());
        assert!(restored.path().join("a.txt").exists());
        assert!(restored.path().join("sub").join("b.txt").exists());
    }

    #[test]
    fn test_is_archive_detects_compress_output() {
        let source = fixture_tree();
        let archive_dir = TempDir::new().unwrap();
        let archive = archive_dir.path().join("data.tar.gz");
        compress(source.path(), &archive).unwrap();

        assert!(is_archive(&archive));
    }

    #[test]
    fn test_is_archive_rejects_plain_file_and_missing_path() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain.txt");
        fs::write(&plain, b"just text").unwrap();

        assert!(!is_archive(&plain));
        assert!(!is_archive(&dir.path().join("does-not-exist")));
    }

    #[test]
    fn test_is_archive_short_file() {
        let dir = TempDir::new().unwrap();
        let tiny = dir.path().join("tiny");
        fs::write(&tiny, [0x1f]).unwrap();
        assert!(!is_archive(&tiny));
    }

    #[test]
    fn test_archive_output_path_plain() {
        let path = archive_output_path(Path::new("/var/data"), false);
        assert_eq!(path, Path::new("/var/data/data.tar.gz"));
    }

    #[test]
    fn test_archive_output_path_timestamped() {
        let path = archive_output_path(Path::new("/var/data"), true);
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("data-"));
        assert!(name.ends_with(".tar.gz"));
        // data-YYYY-MM-DD_HH-MM-SS.tar.gz
        assert_eq!(name.len(), "data-2025-01-01_00-00-00.tar.gz".len());
    }

    #[test]
    fn test_decompress_rejects_symlink_entries() {
        #[cfg(unix)]
        {
            let dir = TempDir::new().unwrap();
            let archive = dir.path().join("bad.tar.gz");

            // Build an archive containing a symlink by hand
            let encoder = GzEncoder::new(File::create(&archive).unwrap(), Compression::default());
            let mut builder = Builder::new(encoder);
            let mut header = tar::Header::new_gnu();
            header.set_entry_type(EntryType::Symlink);
            header.set_size(0);
            header.set_cksum();
            builder
                .append_link(&mut header, "link", "target")
                .unwrap();
            builder.into_inner().unwrap().finish().unwrap();

            let dest = TempDir::new().unwrap();
            let err = decompress(&archive, dest.path()).unwrap_err();
            assert!(matches!(err, Error::UnsupportedEntry(_)));
        }
    }
}
