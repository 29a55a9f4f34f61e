//! Archive collaborators of the migrator.
//!
//! A packaged workbook (`.twbx`) or datasource (`.tdsx`) is a zip holding one
//! descriptor (`.twb` / `.tds`) and its assets. [`unpack`] extracts it next
//! to the archive, [`save_descriptor`] writes the rewritten descriptor back
//! in place and [`repack`] zips the directory under a suffixed name.
//! [`read_descriptor`] reads the descriptor straight from the archive for
//! read-only runs.

pub mod archive;
pub mod error;
pub mod kind;

pub use archive::{UnpackedPackage, read_descriptor, repack, save_descriptor, unpack};
pub use error::{PackageError, Result};
pub use kind::{DEFAULT_SUFFIX, InputKind, classify, suffixed_path};
