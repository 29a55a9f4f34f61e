//! Extraction and repackaging of `.twbx` / `.tdsx` archives.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{PackageError, Result};
use crate::kind::{InputKind, classify};

/// An archive extracted next to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedPackage {
    /// Absolute path of the source archive.
    pub archive: PathBuf,
    /// Sibling directory named after the archive's stem.
    pub extract_dir: PathBuf,
    /// The descriptor inside `extract_dir`.
    pub descriptor: PathBuf,
}

impl UnpackedPackage {
    /// Archive extension without the dot, as given (`twbx`, `tdsx`).
    pub fn extension(&self) -> &str {
        self.archive
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
    }

    /// Where [`repack`] writes: `<extract_dir><suffix>.<extension>`.
    pub fn output_path(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.extract_dir.as_os_str());
        name.push(suffix);
        name.push(".");
        name.push(self.extension());
        PathBuf::from(name)
    }
}

/// Extract `path` into a sibling directory and locate its descriptor.
///
/// Existing files in the target directory are overwritten. The descriptor is
/// `<stem>.<ext without x>` when present, otherwise the only top-level file
/// with the descriptor extension.
pub fn unpack(path: &Path) -> Result<UnpackedPackage> {
    if !path.exists() {
        return Err(PackageError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let descriptor_extension = match classify(path)? {
        InputKind::Packaged {
            descriptor_extension,
        } => descriptor_extension,
        InputKind::Descriptor => {
            return Err(PackageError::UnsupportedExtension {
                path: path.to_path_buf(),
            });
        }
    };
    let archive_path = std::path::absolute(path).map_err(|e| PackageError::io(path, e))?;
    let extract_dir = archive_path.with_extension("");

    let file = File::open(&archive_path).map_err(|e| PackageError::io(&archive_path, e))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| PackageError::zip(&archive_path, e))?;
    debug!(entries = archive.len(), "opened archive");
    archive
        .extract(&extract_dir)
        .map_err(|e| PackageError::zip(&archive_path, e))?;
    info!(
        archive = %archive_path.display(),
        extract_dir = %extract_dir.display(),
        "unpacked archive"
    );

    let descriptor = locate_descriptor(&archive_path, &extract_dir, &descriptor_extension)?;
    debug!(descriptor = %descriptor.display(), "located descriptor");
    Ok(UnpackedPackage {
        archive: archive_path,
        extract_dir,
        descriptor,
    })
}

fn locate_descriptor(archive: &Path, extract_dir: &Path, extension: &str) -> Result<PathBuf> {
    if let Some(stem) = archive.file_stem() {
        let mut name = OsString::from(stem);
        name.push(".");
        name.push(extension);
        let expected = extract_dir.join(name);
        if expected.is_file() {
            return Ok(expected);
        }
    }

    let entries = fs::read_dir(extract_dir).map_err(|e| PackageError::io(extract_dir, e))?;
    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PackageError::io(extract_dir, e))?;
        let path = entry.path();
        let matches = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            candidates.push(path);
        }
    }
    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(PackageError::PrimaryDescriptor {
            path: archive.to_path_buf(),
            message: format!("no .{extension} file at the archive root"),
        }),
        count => Err(PackageError::PrimaryDescriptor {
            path: archive.to_path_buf(),
            message: format!("{count} .{extension} files at the archive root"),
        }),
    }
}

/// Read the descriptor of an archive without extracting anything.
///
/// Uses the same lookup as [`unpack`], applied to the entry names.
pub fn read_descriptor(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PackageError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let InputKind::Packaged {
        descriptor_extension,
    } = classify(path)?
    else {
        return Err(PackageError::UnsupportedExtension {
            path: path.to_path_buf(),
        });
    };
    let file = File::open(path).map_err(|e| PackageError::io(path, e))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| PackageError::zip(path, e))?;

    let expected = path
        .file_stem()
        .map(|stem| format!("{}.{descriptor_extension}", stem.to_string_lossy()));
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    let entry = match expected.filter(|name| names.contains(name)) {
        Some(name) => name,
        None => {
            let mut candidates: Vec<&String> = names
                .iter()
                .filter(|name| !name.contains('/'))
                .filter(|name| {
                    Path::new(name.as_str())
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(&descriptor_extension))
                })
                .collect();
            match candidates.len() {
                1 => candidates.remove(0).clone(),
                0 => {
                    return Err(PackageError::PrimaryDescriptor {
                        path: path.to_path_buf(),
                        message: format!("no .{descriptor_extension} file at the archive root"),
                    });
                }
                count => {
                    return Err(PackageError::PrimaryDescriptor {
                        path: path.to_path_buf(),
                        message: format!(
                            "{count} .{descriptor_extension} files at the archive root"
                        ),
                    });
                }
            }
        }
    };

    let mut text = String::new();
    archive
        .by_name(&entry)
        .map_err(|e| PackageError::zip(path, e))?
        .read_to_string(&mut text)
        .map_err(|e| PackageError::io(path, e))?;
    debug!(entry = %entry, bytes = text.len(), "read descriptor from archive");
    Ok(text)
}

/// Write the rewritten descriptor over the extracted one.
pub fn save_descriptor(package: &UnpackedPackage, text: &str) -> Result<()> {
    fs::write(&package.descriptor, text).map_err(|e| PackageError::io(&package.descriptor, e))?;
    debug!(descriptor = %package.descriptor.display(), bytes = text.len(), "saved descriptor");
    Ok(())
}

/// Zip the extracted directory into `<extract_dir><suffix>.<extension>`.
///
/// Entries are stored deflated, with `/`-separated paths relative to the
/// directory, in sorted order.
pub fn repack(package: &UnpackedPackage, suffix: &str) -> Result<PathBuf> {
    let output = package.output_path(suffix);
    info!(output = %output.display(), "repackaging");

    let mut files = Vec::new();
    collect_files(&package.extract_dir, &mut files)?;
    files.sort();

    let file = File::create(&output).map_err(|e| PackageError::io(&output, e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for path in &files {
        let name = entry_name(&package.extract_dir, path)?;
        writer
            .start_file(name, options)
            .map_err(|e| PackageError::zip(&output, e))?;
        let mut source = File::open(path).map_err(|e| PackageError::io(path, e))?;
        io::copy(&mut source, &mut writer).map_err(|e| PackageError::io(path, e))?;
    }
    writer.finish().map_err(|e| PackageError::zip(&output, e))?;
    debug!(entries = files.len(), "archive written");
    Ok(output)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| PackageError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| PackageError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| PackageError::io(&path, e))?;
        if file_type.is_dir() {
            collect_files(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| PackageError::PrimaryDescriptor {
            path: path.to_path_buf(),
            message: format!("outside {}", root.display()),
        })?;
    let parts: Vec<String> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}
