//! Source archive extraction
//!
//! Native extraction of tar (plain, gz, xz, bz2, zst) and zip archives, plus
//! the unpack flow that stages a source tree: wipe the destination, extract,
//! then drop the archive's single top-level wrapper directory.
//!
//! ## Example
//!
//! ```ignore
//! unpack_source(Path::new("sqlcipher-3.4.1.tar.gz"), Path::new("build/android-x86/src"))?;
//! // build/android-x86/src/{configure,src,...}
//! ```

use crate::core::output;
use crate::error::{Error, Result};
use crate::helpers::fs_utils::{make_dirs, unhoist_directory};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

/// Archive container formats we can extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar,
    TarGz,
    TarXz,
    TarBz2,
    TarZst,
    Zip,
}

impl ArchiveFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::TarXz => "tar.xz",
            Self::TarBz2 => "tar.bz2",
            Self::TarZst => "tar.zst",
            Self::Zip => "zip",
        }
    }
}

// ============================================================================
// Format detection
// ============================================================================

/// Detect archive format from filename extension
fn detect_format(archive: &Path) -> Option<ArchiveFormat> {
    let path = archive.to_string_lossy().to_lowercase();
    if path.ends_with(".tar.gz") || path.ends_with(".tgz") {
        Some(ArchiveFormat::TarGz)
    } else if path.ends_with(".tar.xz") || path.ends_with(".txz") {
        Some(ArchiveFormat::TarXz)
    } else if path.ends_with(".tar.bz2") || path.ends_with(".tbz2") {
        Some(ArchiveFormat::TarBz2)
    } else if path.ends_with(".tar.zst") || path.ends_with(".tzst") {
        Some(ArchiveFormat::TarZst)
    } else if path.ends_with(".zip") {
        Some(ArchiveFormat::Zip)
    } else if path.ends_with(".tar") {
        Some(ArchiveFormat::Tar)
    } else {
        None
    }
}

/// Detect archive format from the leading magic bytes.
fn sniff_format(header: &[u8]) -> ArchiveFormat {
    if header.starts_with(&[0x1f, 0x8b]) {
        ArchiveFormat::TarGz
    } else if header.starts_with(&[0xfd, b'7', b'z', b'X', b'Z', 0x00]) {
        ArchiveFormat::TarXz
    } else if header.starts_with(b"BZh") {
        ArchiveFormat::TarBz2
    } else if header.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
        ArchiveFormat::TarZst
    } else if header.starts_with(b"PK\x03\x04") {
        ArchiveFormat::Zip
    } else {
        ArchiveFormat::Tar
    }
}

fn read_header(archive: &Path) -> Result<Vec<u8>> {
    let mut header = Vec::with_capacity(8);
    File::open(archive)?.take(8).read_to_end(&mut header)?;
    Ok(header)
}

/// Extension first, then content.
pub fn archive_format(archive: &Path) -> Result<ArchiveFormat> {
    match detect_format(archive) {
        Some(format) => Ok(format),
        None => Ok(sniff_format(&read_header(archive)?)),
    }
}

// ============================================================================
// Native archive extraction
// ============================================================================

fn normalize_lexical(path: &Path) -> PathBuf {
    // Lexically normalize a path (no filesystem access). This is used to
    // validate link targets without following symlinks.
    let mut out = PathBuf::new();
    let mut has_root = false;

    for c in path.components() {
        match c {
            Component::Prefix(p) => {
                out.clear();
                out.push(p.as_os_str());
                has_root = true;
            }
            Component::RootDir => {
                out.push(Component::RootDir.as_os_str());
                has_root = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = out
                    .components()
                    .next_back()
                    .is_some_and(|last| matches!(last, Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !has_root {
                    out.push("..");
                }
            }
            Component::Normal(seg) => out.push(seg),
        }
    }

    out
}

fn ensure_no_symlink_components(dest: &Path, full_path: &Path) -> Result<()> {
    let rel = full_path.strip_prefix(dest).map_err(|_| {
        Error::UnsafeArchiveEntry(format!("path outside destination: {}", full_path.display()))
    })?;

    // Writing through an existing symlink could escape `dest`.
    let mut cur = dest.to_path_buf();
    for comp in rel.components() {
        cur.push(comp);
        if let Ok(md) = std::fs::symlink_metadata(&cur)
            && md.file_type().is_symlink()
        {
            return Err(Error::UnsafeArchiveEntry(format!(
                "symlink in path component: {}",
                cur.display()
            )));
        }
    }

    Ok(())
}

fn ensure_link_target_within_dest(dest: &Path, link_parent: &Path, link_name: &Path) -> Result<()> {
    if link_name.is_absolute()
        || link_name
            .components()
            .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
    {
        return Err(Error::UnsafeArchiveEntry(format!(
            "absolute link target: {}",
            link_name.display()
        )));
    }

    let candidate = normalize_lexical(&link_parent.join(link_name));
    let norm_dest = normalize_lexical(dest);
    if candidate.strip_prefix(&norm_dest).is_err() {
        return Err(Error::UnsafeArchiveEntry(format!(
            "link target escapes destination: {} -> {}",
            link_parent.display(),
            link_name.display()
        )));
    }

    Ok(())
}

fn tar_error(what: &str, e: std::io::Error) -> Error {
    Error::Archive(format!("tar {}: {}", what, e))
}

/// Extract a tar stream with path and link checks on every entry.
fn extract_tar<R: Read>(reader: R, dest: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);

    for entry in archive.entries().map_err(|e| tar_error("read error", e))? {
        let mut entry = entry.map_err(|e| tar_error("entry error", e))?;
        let path = entry
            .path()
            .map_err(|e| tar_error("path error", e))?
            .into_owned();

        if path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
            return Err(Error::UnsafeArchiveEntry(path.display().to_string()));
        }

        // Some archives contain a "." entry.
        if path.as_os_str().is_empty() || path == Path::new(".") {
            continue;
        }

        let full_path = dest.join(&path);
        ensure_no_symlink_components(dest, &full_path)?;

        let entry_type = entry.header().entry_type();
        let link_name = if entry_type == tar::EntryType::Symlink || entry_type == tar::EntryType::Link
        {
            let link_name = entry
                .link_name()
                .map_err(|e| tar_error("link_name error", e))?
                .ok_or_else(|| {
                    Error::UnsafeArchiveEntry(format!("link without target: {}", path.display()))
                })?
                .into_owned();
            Some(link_name)
        } else {
            None
        };

        if let Some(parent) = full_path.parent() {
            if parent.starts_with(dest) {
                ensure_no_symlink_components(dest, parent)?;
            }
            std::fs::create_dir_all(parent)?;
        }

        if let Some(link_name) = link_name {
            if entry_type == tar::EntryType::Link {
                // Hard link targets name an earlier entry, relative to the archive root.
                ensure_link_target_within_dest(dest, dest, &link_name)?;
                let target = dest.join(&link_name);
                ensure_no_symlink_components(dest, &target)?;
                if std::fs::symlink_metadata(&full_path).is_ok_and(|md| !md.is_dir()) {
                    std::fs::remove_file(&full_path)?;
                }
                std::fs::hard_link(&target, &full_path).map_err(|e| {
                    Error::Archive(format!(
                        "hard link error for {} -> {}: {}",
                        path.display(),
                        link_name.display(),
                        e
                    ))
                })?;
                continue;
            }
            ensure_link_target_within_dest(dest, full_path.parent().unwrap_or(dest), &link_name)?;
        }

        entry
            .unpack(&full_path)
            .map_err(|e| Error::Archive(format!("unpack error for {}: {}", path.display(), e)))?;
    }

    Ok(())
}

fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| Error::Archive(format!("zip read error: {}", e)))?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| Error::Archive(format!("zip entry error: {}", e)))?;

        let Some(enclosed) = file.enclosed_name() else {
            return Err(Error::UnsafeArchiveEntry(file.name().to_string()));
        };
        let outpath = dest.join(enclosed);

        if file.is_dir() {
            std::fs::create_dir_all(&outpath)?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath)?;
        std::io::copy(&mut file, &mut outfile)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
            }
        }
    }

    Ok(())
}

fn open_reader(archive_path: &Path) -> Result<BufReader<File>> {
    Ok(BufReader::new(File::open(archive_path)?))
}

fn extract_format(archive_path: &Path, dest: &Path, format: ArchiveFormat) -> Result<()> {
    match format {
        ArchiveFormat::Tar => extract_tar(open_reader(archive_path)?, dest),
        ArchiveFormat::TarGz => {
            extract_tar(flate2::read::GzDecoder::new(open_reader(archive_path)?), dest)
        }
        ArchiveFormat::TarXz => {
            extract_tar(xz2::read::XzDecoder::new(open_reader(archive_path)?), dest)
        }
        ArchiveFormat::TarBz2 => {
            extract_tar(bzip2::read::BzDecoder::new(open_reader(archive_path)?), dest)
        }
        ArchiveFormat::TarZst => {
            let decoder = zstd::stream::read::Decoder::new(open_reader(archive_path)?)
                .map_err(|e| Error::Archive(format!("zstd init error: {}", e)))?;
            extract_tar(decoder, dest)
        }
        ArchiveFormat::Zip => extract_zip(archive_path, dest),
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Extract an archive into `dest`, creating it if needed.
pub fn extract(archive: &Path, dest: &Path) -> Result<()> {
    let format = archive_format(archive)?;
    make_dirs(dest)?;

    let filename = archive
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "archive".to_string());

    let pb = output::spinner(&format!("extracting {}", filename));
    let result = extract_format(archive, dest, format);
    pb.finish_and_clear();

    result?;
    output::detail(&format!(
        "extracted {} ({}) to {}",
        filename,
        format.name(),
        dest.display()
    ));
    Ok(())
}

/// Stage a source tree: replace `output_path` with the archive's content,
/// minus any single top-level wrapper directory.
///
/// Anything already at `output_path` is deleted first.
pub fn unpack_source(src_path: &Path, output_path: &Path) -> Result<()> {
    if output_path.exists() {
        std::fs::remove_dir_all(output_path)?;
    }

    make_dirs(output_path)?;
    extract(src_path, output_path)?;

    if unhoist_directory(output_path)? {
        output::detail(&format!("flattened wrapper directory in {}", output_path.display()));
    }
    Ok(())
}
