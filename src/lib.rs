//! A streaming codec for Unix `ar` archives.
//!
//! [`Reader`] reads BSD and GNU variant archives one member at a time,
//! resolving extended names and skipping symbol tables.  [`Writer`] produces
//! GNU variant archives, with a symbol table that lists every member and a
//! string table for names that don't fit in a header.
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//!
//! let mut writer = ar_stream::Writer::new(Vec::new());
//! let mut header = ar_stream::Header::new("hello.txt", 6);
//! header.set_mode(0o644);
//! writer.append(&header, &b"hello\n"[..])?;
//! let archive = writer.into_inner()?;
//!
//! let mut reader = ar_stream::Reader::new(archive.as_slice());
//! while let Some(mut entry) = reader.next_entry().transpose()? {
//!     let mut contents = String::new();
//!     entry.read_to_string(&mut contents)?;
//!     assert_eq!(entry.header().name(), "hello.txt");
//!     assert_eq!(contents, "hello\n");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod entry;
mod error;
mod header;
mod read;
mod write;

#[cfg(test)]
mod test_support;

pub use entry::Entry;
pub use error::{Error, FormatError, Result};
pub use header::Header;
pub use read::Reader;
pub use write::Writer;

// ========================================================================= //

pub(crate) const GLOBAL_HEADER_LEN: usize = 8;
pub(crate) const GLOBAL_HEADER: &[u8; GLOBAL_HEADER_LEN] = b"!<arch>\n";

pub(crate) const GNU_SYMBOL_TABLE_NAME: &str = "/";
pub(crate) const GNU_SYMBOL_TABLE_64BIT_NAME: &str = "/SYM64/";
pub(crate) const GNU_STRING_TABLE_NAME: &str = "//";

pub(crate) const BSD_EXTENDED_NAME_PREFIX: &str = "#1/";

/// BSD symbol tables are named `__.SYMDEF`, `__.SYMDEF SORTED` and so on.
pub(crate) const SYMDEF_MARKER: &str = "__.SYMDEF";

/// Index members written by toolchains that reuse the format.
pub(crate) const LEGACY_SYMBOL_TABLE_NAMES: [&str; 2] =
    ["__.PKGDEF", "__.GOSYMDEF"];

// ========================================================================= //
