use std::fs::Metadata;
use std::ops::Range;
use std::str;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use crate::error::{Error, FormatError, Result};
use crate::{
    BSD_EXTENDED_NAME_PREFIX, GNU_STRING_TABLE_NAME,
    GNU_SYMBOL_TABLE_64BIT_NAME,
};

pub(crate) const ENTRY_HEADER_LEN: usize = 60;
pub(crate) const ENTRY_NAME_LEN: usize = 16;

const NAME_FIELD: Range<usize> = 0..16;
const MTIME_FIELD: Range<usize> = 16..28;
const UID_FIELD: Range<usize> = 28..34;
const GID_FIELD: Range<usize> = 34..40;
const MODE_FIELD: Range<usize> = 40..48;
const SIZE_FIELD: Range<usize> = 48..58;
const END_FIELD: Range<usize> = 58..60;

const HEADER_END_MARKER: &[u8; 2] = b"`\n";

const FILE_TYPE_MASK: u32 = 0o170000;
const REGULAR_FILE: u32 = 0o100000;

/// Representation of an archive entry header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    name: String,
    mtime: u64,
    uid: u32,
    gid: u32,
    mode: u32,
    size: u64,
}

impl Header {
    /// Creates a header with the given member name and size, and all other
    /// fields set to zero.
    pub fn new<S: Into<String>>(name: S, size: u64) -> Header {
        Header { name: name.into(), mtime: 0, uid: 0, gid: 0, mode: 0, size }
    }

    /// Creates a header with the given member name and all other fields set
    /// from the given filesystem metadata.
    #[cfg(unix)]
    pub fn from_metadata<S: Into<String>>(name: S, meta: &Metadata) -> Header {
        Header {
            name: name.into(),
            mtime: meta.mtime().max(0) as u64,
            uid: meta.uid(),
            gid: meta.gid(),
            mode: meta.mode(),
            size: meta.len(),
        }
    }

    /// Creates a header with the given member name and its size taken from
    /// the given filesystem metadata.
    #[cfg(not(unix))]
    pub fn from_metadata<S: Into<String>>(name: S, meta: &Metadata) -> Header {
        Header::new(name, meta.len())
    }

    /// Returns the member name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the member name.  Only the ASCII characters of the name are
    /// written to an archive.
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Returns the last modification time in Unix time format.
    pub fn mtime(&self) -> u64 {
        self.mtime
    }

    /// Sets the last modification time in Unix time format.
    pub fn set_mtime(&mut self, mtime: u64) {
        self.mtime = mtime;
    }

    /// Returns the value of the owner's user ID field.
    pub fn uid(&self) -> u32 {
        self.uid
    }

    /// Sets the value of the owner's user ID field.
    pub fn set_uid(&mut self, uid: u32) {
        self.uid = uid;
    }

    /// Returns the value of the owner's group ID field.
    pub fn gid(&self) -> u32 {
        self.gid
    }

    /// Sets the value of the owner's group ID field.
    pub fn set_gid(&mut self, gid: u32) {
        self.gid = gid;
    }

    /// Returns the mode bits for this member.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Sets the mode bits for this member.
    pub fn set_mode(&mut self, mode: u32) {
        self.mode = mode;
    }

    /// Returns the length of the member's data, in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Sets the length of the member's data, in bytes.
    pub fn set_size(&mut self, size: u64) {
        self.size = size;
    }

    /// Decodes a fixed-width header record.  The name of the returned header
    /// is the raw contents of the name field; callers resolve extended names
    /// through the returned `NameField`.
    pub(crate) fn decode(buffer: &[u8; ENTRY_HEADER_LEN]) -> Result<RawHeader> {
        let trailer = &buffer[END_FIELD];
        if trailer != HEADER_END_MARKER {
            let trailer = String::from_utf8_lossy(trailer).into_owned();
            return Err(FormatError::BadTrailer(trailer).into());
        }
        let name =
            String::from_utf8_lossy(trim_padding(&buffer[NAME_FIELD]))
                .into_owned();
        // The GNU string table may leave its metadata fields blank.
        let lenient = name == GNU_STRING_TABLE_NAME;
        let mtime = permit_if(lenient, parse_mtime(&buffer[MTIME_FIELD]))?;
        let uid = permit_if(
            lenient,
            parse_number("owner ID", &buffer[UID_FIELD], 10),
        )? as u32;
        let gid = permit_if(
            lenient,
            parse_number("group ID", &buffer[GID_FIELD], 10),
        )? as u32;
        let mode = permit_if(
            lenient,
            parse_number("file mode", &buffer[MODE_FIELD], 8),
        )? as u32;
        let size = parse_number("file size", &buffer[SIZE_FIELD], 10)?;
        Ok(RawHeader {
            name: NameField::parse(&name)?,
            header: Header { name, mtime, uid, gid, mode, size },
        })
    }

    /// Encodes this header into a fixed-width record, using `name_field` as
    /// the literal contents of the name field.  Standard members get the
    /// regular-file type bits added to a mode that carries none.
    pub(crate) fn encode(
        &self,
        name_field: &str,
        standard: bool,
    ) -> Result<[u8; ENTRY_HEADER_LEN]> {
        let mode = if standard && self.mode & FILE_TYPE_MASK == 0 {
            self.mode | REGULAR_FILE
        } else {
            self.mode
        };
        let mut buffer = [b' '; ENTRY_HEADER_LEN];
        let mut number = itoa::Buffer::new();
        fill_field(&mut buffer[NAME_FIELD], "name", name_field)?;
        fill_field(
            &mut buffer[MTIME_FIELD],
            "timestamp",
            number.format(self.mtime),
        )?;
        fill_field(&mut buffer[UID_FIELD], "owner ID", number.format(self.uid))?;
        fill_field(&mut buffer[GID_FIELD], "group ID", number.format(self.gid))?;
        fill_field(&mut buffer[MODE_FIELD], "file mode", &format!("{:o}", mode))?;
        fill_field(&mut buffer[SIZE_FIELD], "file size", number.format(self.size))?;
        buffer[END_FIELD].copy_from_slice(HEADER_END_MARKER);
        Ok(buffer)
    }
}

/// A decoded header record whose name has not been resolved yet.
#[derive(Debug)]
pub(crate) struct RawHeader {
    pub(crate) name: NameField,
    pub(crate) header: Header,
}

/// How a member name is stored in the 16-byte name field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum NameField {
    /// The name is stored inline (GNU names keep their `/` suffix here).
    Standard(String),
    /// `#1/<len>`: the name is the first `len` bytes of the payload.
    BsdExtended(u64),
    /// `/<offset>`: the name is stored in the GNU string table.
    GnuExtended(u64),
}

impl NameField {
    fn parse(field: &str) -> Result<NameField> {
        if let Some(len) = field.strip_prefix(BSD_EXTENDED_NAME_PREFIX) {
            if !len.is_empty() {
                let len = parse_number("BSD filename length", len.as_bytes(), 10)?;
                return Ok(NameField::BsdExtended(len));
            }
        }
        if let Some(offset) = field.strip_prefix('/') {
            if !offset.is_empty()
                && field != GNU_STRING_TABLE_NAME
                && field != GNU_SYMBOL_TABLE_64BIT_NAME
            {
                let offset =
                    parse_number("GNU filename index", offset.as_bytes(), 10)?;
                return Ok(NameField::GnuExtended(offset));
            }
        }
        Ok(NameField::Standard(field.to_string()))
    }
}

/// Strips everything but ASCII from a member name.
pub(crate) fn to_ascii(name: &str) -> String {
    name.chars().filter(char::is_ascii).collect()
}

pub(crate) fn trim_padding(bytes: &[u8]) -> &[u8] {
    let len = bytes
        .iter()
        .rposition(|&byte| byte != b' ' && byte != 0)
        .map_or(0, |index| index + 1);
    &bytes[..len]
}

fn fill_field(field: &mut [u8], name: &'static str, contents: &str) -> Result<()> {
    if contents.len() > field.len() {
        return Err(Error::HeaderFieldOverflow {
            field: name,
            value: contents.to_string(),
            width: field.len(),
        });
    }
    field[..contents.len()].copy_from_slice(contents.as_bytes());
    Ok(())
}

fn permit_if(lenient: bool, value: Result<u64>) -> Result<u64> {
    match value {
        Err(_) if lenient => Ok(0),
        value => value,
    }
}

fn invalid_field(field: &'static str, bytes: &[u8]) -> Error {
    let value = String::from_utf8_lossy(bytes).into_owned();
    FormatError::InvalidField { field, value }.into()
}

fn parse_number(field: &'static str, bytes: &[u8], radix: u32) -> Result<u64> {
    if let Ok(string) = str::from_utf8(trim_padding(bytes)) {
        if let Ok(value) = u64::from_str_radix(string, radix) {
            return Ok(value);
        }
    }
    Err(invalid_field(field, bytes))
}

/*
 * Equivalent to parse_number() except for the case of "-1"
 * as MS tools may emit for mtime.
 */
fn parse_mtime(bytes: &[u8]) -> Result<u64> {
    if trim_padding(bytes) == b"-1" {
        return Ok(0);
    }
    parse_number("timestamp", bytes, 10)
}
