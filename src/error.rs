use std::io;

use thiserror::Error;

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while reading or writing an archive.
#[derive(Debug, Error)]
pub enum Error {
    /// The input is not a well-formed archive.
    #[error("invalid ar archive: {0}")]
    Format(#[from] FormatError),

    /// A GNU extended name points at an offset that has no entry in the
    /// string table.
    #[error("entry name not in strings table (offset {0})")]
    MissingStringTableEntry(u64),

    /// The input ended inside an entry header or an extended entry name.
    #[error("unexpected EOF in the middle of archive entry header")]
    TruncatedHeader,

    /// The input ended before the entry's declared size was delivered.
    #[error("unexpected EOF in the middle of archive entry data ({remaining} bytes missing)")]
    TruncatedPayload {
        /// Number of declared bytes that never arrived.
        remaining: u64,
    },

    /// The writer has already been closed.
    #[error("write after close")]
    WriteAfterClose,

    /// An earlier `close()` failed, so the sink holds a partial archive.
    #[error("archive is incomplete (an earlier close failed)")]
    IncompleteArchive,

    /// More data was written to an entry than its header declared.  The
    /// bytes that fit were kept; the rest were discarded.
    #[error("write too long ({rejected} bytes past the declared size were discarded)")]
    WriteOverflow {
        /// Number of bytes that did not fit and were dropped.
        rejected: usize,
    },

    /// A header value does not fit its fixed-width field.
    #[error("header too long ({field} {value:?} does not fit in {width} bytes)")]
    HeaderFieldOverflow {
        /// The name of the offending field.
        field: &'static str,
        /// The formatted value.
        value: String,
        /// The width of the field, in bytes.
        width: usize,
    },

    /// An error from the underlying byte source or sink.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Ways in which an archive can be malformed.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The stream ended before the global header was complete.
    #[error("missing global header")]
    MissingMagic,

    /// The stream does not start with `!<arch>\n`.
    #[error("not an archive file (invalid global header)")]
    BadMagic,

    /// An entry header does not end with the `` `\n `` marker.
    #[error("invalid entry header terminator ({0:?})")]
    BadTrailer(String),

    /// A numeric field could not be parsed.
    #[error("invalid {field} field in entry header ({value:?})")]
    InvalidField {
        /// The name of the offending field.
        field: &'static str,
        /// The raw contents of the field.
        value: String,
    },

    /// A BSD extended name is longer than the entry it belongs to.
    #[error(
        "entry size ({size}) smaller than extended entry identifier length \
         ({name_len})"
    )]
    BsdNameTooLong {
        /// The declared length of the name.
        name_len: u64,
        /// The declared size of the entry, including the name.
        size: u64,
    },

    /// The archive contains more than one GNU string table.
    #[error("found duplicate name table")]
    DuplicateStringTable,
}

impl From<Error> for io::Error {
    fn from(error: Error) -> io::Error {
        let kind = match error {
            Error::Io(error) => return error,
            Error::TruncatedHeader | Error::TruncatedPayload { .. } => {
                io::ErrorKind::UnexpectedEof
            }
            Error::Format(_) | Error::MissingStringTableEntry(_) => {
                io::ErrorKind::InvalidData
            }
            Error::WriteAfterClose
            | Error::WriteOverflow { .. }
            | Error::HeaderFieldOverflow { .. } => io::ErrorKind::InvalidInput,
            Error::IncompleteArchive => io::ErrorKind::Other,
        };
        io::Error::new(kind, error)
    }
}

pub(crate) fn annotate(error: io::Error, msg: &str) -> io::Error {
    let kind = error.kind();
    if let Some(inner) = error.into_inner() {
        io::Error::new(kind, format!("{}: {}", msg, inner))
    } else {
        io::Error::new(kind, msg)
    }
}
