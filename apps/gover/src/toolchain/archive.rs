//! Archive extraction.
//!
//! Go release archives wrap the toolchain in a single `go/` folder. That
//! folder is stripped, so `versions/<version>/` itself holds `bin/` and
//! `pkg/`.

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use std::path::{Component, Path, PathBuf};
use tar::Archive;

/// Extracts a tar.gz archive to the destination directory.
///
/// Creates the destination directory if it does not exist. If all entries
/// share a common root folder it is stripped (`go/bin/go` becomes `bin/go`).
/// Entries with absolute paths or `..` components abort the extraction;
/// entries written before the failure are left in place.
///
/// # Errors
///
/// Returns an error if:
/// - The archive cannot be opened or is not a valid tar.gz file
/// - An entry would escape the destination directory
/// - Directory or file creation fails
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dest_dir)
        .with_context(|| format!("Failed to create directory: {}", dest_dir.display()))?;

    let strip_prefix = find_common_root_folder_tar(archive_path)?;

    let file = std::fs::File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    for entry in archive
        .entries()
        .with_context(|| format!("Failed to read tar entries: {}", archive_path.display()))?
    {
        let mut entry = entry
            .with_context(|| format!("Failed to read tar entry: {}", archive_path.display()))?;

        let entry_path = entry
            .path()
            .with_context(|| "Failed to get entry path")?
            .into_owned();

        if entry_path.is_absolute()
            || entry_path
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            bail!(
                "Refusing to extract path with parent directory or absolute reference: {}",
                entry_path.display()
            );
        }

        let relative_path = match &strip_prefix {
            Some(prefix) => match entry_path.strip_prefix(prefix) {
                Ok(p) if p.as_os_str().is_empty() => continue,
                Ok(p) => p.to_path_buf(),
                Err(_) => entry_path.clone(),
            },
            None => entry_path.clone(),
        };

        let output_path = dest_dir.join(&relative_path);

        if entry.header().entry_type().is_dir() {
            std::fs::create_dir_all(&output_path).with_context(|| {
                format!("Failed to create directory: {}", output_path.display())
            })?;
        } else {
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }

            entry
                .unpack(&output_path)
                .with_context(|| format!("Failed to extract: {}", output_path.display()))?;
        }
    }

    Ok(())
}

/// Finds a common root folder shared by all entries.
///
/// Returns `Some(prefix)` only when every entry starts with the same
/// component and at least one entry is nested below it, so a flat archive
/// holding a single file is not mistaken for a wrapped one.
fn find_common_root_folder_tar(archive_path: &Path) -> Result<Option<PathBuf>> {
    let file = std::fs::File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let mut common_root: Option<PathBuf> = None;
    let mut has_nested_entries = false;

    for entry in archive
        .entries()
        .with_context(|| format!("Failed to read tar entries: {}", archive_path.display()))?
    {
        let entry = entry
            .with_context(|| format!("Failed to read tar entry: {}", archive_path.display()))?;
        let path = entry.path().with_context(|| "Failed to get entry path")?;

        if path.components().count() > 1 {
            has_nested_entries = true;
        }

        let Some(first_component) = path.components().next() else {
            continue;
        };
        let root = PathBuf::from(first_component.as_os_str());

        match &common_root {
            None => common_root = Some(root),
            Some(existing) if existing != &root => return Ok(None),
            Some(_) => {}
        }
    }

    Ok(common_root.filter(|_| has_nested_entries))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_fs::TempDir;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use tar::Builder;

    /// Writes a tar.gz holding `entries` as regular files.
    pub(crate) fn write_tar_gz(archive_path: &Path, entries: &[(&str, &[u8])]) {
        let file = std::fs::File::create(archive_path).unwrap();
        let mut builder = Builder::new(GzEncoder::new(file, Compression::default()));

        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap();
    }

    /// Writes a tar.gz shaped like a Go release for `linux/amd64`.
    pub(crate) fn write_go_release(archive_path: &Path) {
        write_tar_gz(
            archive_path,
            &[
                ("go/VERSION", b"go1.21.4\n"),
                ("go/bin/go", b"#!/bin/sh\n"),
                ("go/bin/gofmt", b"#!/bin/sh\n"),
                ("go/pkg/tool/linux_amd64/compile", b"\x7fELF"),
                ("go/src/fmt/print.go", b"package fmt\n"),
            ],
        );
    }

    #[test]
    fn strips_go_root_folder() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("go1.21.4.linux-amd64.tar.gz");
        let dest = temp.path().join("go1.21.4");
        write_go_release(&archive);

        extract_tar_gz(&archive, &dest).unwrap();

        assert!(dest.join("bin").join("go").is_file());
        assert!(dest.join("pkg").join("tool").join("linux_amd64").join("compile").is_file());
        assert!(!dest.join("go").exists());
        assert_eq!(std::fs::read_to_string(dest.join("VERSION")).unwrap(), "go1.21.4\n");
    }

    #[test]
    fn preserves_structure_without_common_root() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("flat.tar.gz");
        let dest = temp.path().join("out");
        write_tar_gz(&archive, &[("bin/go", b"x"), ("pkg/readme", b"y")]);

        extract_tar_gz(&archive, &dest).unwrap();

        assert!(dest.join("bin").join("go").is_file());
        assert!(dest.join("pkg").join("readme").is_file());
    }

    #[test]
    fn single_flat_file_is_not_stripped() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("one.tar.gz");
        let dest = temp.path().join("out");
        write_tar_gz(&archive, &[("VERSION", b"go1.21.4")]);

        extract_tar_gz(&archive, &dest).unwrap();

        assert!(dest.join("VERSION").is_file());
    }

    #[test]
    fn rejects_parent_directory_entries() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.tar.gz");
        let dest = temp.path().join("out");

        let file = std::fs::File::create(&archive).unwrap();
        let mut builder = Builder::new(GzEncoder::new(file, Compression::default()));
        let mut header = tar::Header::new_gnu();
        let name = b"go/../../escaped";
        header.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
        header.set_size(1);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, b"x".as_slice()).unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        let err = extract_tar_gz(&archive, &dest).unwrap_err();

        assert!(err.to_string().contains("Refusing to extract"));
        assert!(!temp.path().join("escaped").exists());
    }

    #[test]
    fn corrupt_archive_fails() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.tar.gz");
        std::fs::write(&archive, b"not a gzip stream").unwrap();

        assert!(extract_tar_gz(&archive, &temp.path().join("out")).is_err());
    }
}
