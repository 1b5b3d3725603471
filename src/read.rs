use std::cmp;
use std::collections::HashMap;
use std::io::{self, ErrorKind, Read};

use log::{debug, trace};

use crate::entry::Entry;
use crate::error::{annotate, Error, FormatError, Result};
use crate::header::{trim_padding, Header, NameField, ENTRY_HEADER_LEN};
use crate::{
    GLOBAL_HEADER, GLOBAL_HEADER_LEN, GNU_STRING_TABLE_NAME,
    GNU_SYMBOL_TABLE_64BIT_NAME, GNU_SYMBOL_TABLE_NAME,
    LEGACY_SYMBOL_TABLE_NAMES, SYMDEF_MARKER,
};

/// What a decoded header turned out to describe.
enum Member {
    Ordinary(Header),
    StringTable(Header),
    SymbolTable(Header),
    Skip(Header),
}

impl Member {
    fn classify(header: Header) -> Member {
        let name = header.name();
        if name == GNU_STRING_TABLE_NAME {
            Member::StringTable(header)
        } else if name == GNU_SYMBOL_TABLE_NAME
            || name == GNU_SYMBOL_TABLE_64BIT_NAME
        {
            Member::SymbolTable(header)
        } else if is_legacy_symbol_table(name) {
            Member::Skip(header)
        } else {
            Member::Ordinary(header)
        }
    }

    fn header(&self) -> &Header {
        match self {
            Member::Ordinary(header)
            | Member::StringTable(header)
            | Member::SymbolTable(header)
            | Member::Skip(header) => header,
        }
    }
}

fn is_legacy_symbol_table(name: &str) -> bool {
    name.contains(SYMDEF_MARKER) || LEGACY_SYMBOL_TABLE_NAMES.contains(&name)
}

fn is_reserved_name(name: &str) -> bool {
    name == GNU_STRING_TABLE_NAME
        || name == GNU_SYMBOL_TABLE_NAME
        || name == GNU_SYMBOL_TABLE_64BIT_NAME
        || is_legacy_symbol_table(name)
}

/// A structure for reading archives sequentially.
///
/// `Reader` itself implements `Read`: after `next_header()` returns a
/// header, reads yield that member's payload and then report end of data
/// until the next call to `next_header()`.
pub struct Reader<R: Read> {
    reader: R,
    strings: Option<HashMap<u64, String>>,
    unread: u64,
    started: bool, // True if we've read past the global header.
    padding: bool, // True if there's a padding byte before the next entry.
    error: bool,   // True if we have encountered an error.
}

impl<R: Read> Reader<R> {
    /// Create a new archive reader with the underlying reader object as the
    /// source of all data read.
    pub fn new(reader: R) -> Reader<R> {
        Reader {
            reader,
            strings: None,
            unread: 0,
            started: false,
            padding: false,
            error: false,
        }
    }

    /// Unwrap this archive reader, returning the underlying reader object.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Returns the number of payload bytes of the current member that have
    /// not been read yet.
    pub fn remaining(&self) -> u64 {
        self.unread
    }

    /// Advances to the next ordinary member and returns its header, or
    /// `Ok(None)` if there are no more members.  Any unread data of the
    /// previous member is skipped.
    ///
    /// String and symbol tables are consumed internally and never returned.
    /// Once an error has been returned, the reader produces no more members.
    pub fn next_header(&mut self) -> Result<Option<Header>> {
        if self.error {
            return Ok(None);
        }
        let result = self.advance();
        if result.is_err() {
            self.error = true;
        }
        result
    }

    /// Reads the next entry from the archive, or returns None if there are no
    /// more.
    pub fn next_entry(&mut self) -> Option<Result<Entry<'_, R>>> {
        match self.next_header() {
            Ok(Some(header)) => Some(Ok(Entry { header, reader: self })),
            Ok(None) => None,
            Err(error) => Some(Err(error)),
        }
    }

    fn advance(&mut self) -> Result<Option<Header>> {
        self.read_global_header_if_necessary()?;
        loop {
            self.skip_unread()?;
            let member = match self.read_header()? {
                Some(member) => member,
                None => return Ok(None),
            };
            let size = member.header().size();
            self.unread = size;
            self.padding = size % 2 != 0;
            match member {
                Member::Ordinary(header) => return Ok(Some(header)),
                Member::StringTable(header) => {
                    self.read_string_table(&header)?
                }
                Member::SymbolTable(header) => {
                    debug!("skipping GNU symbol table ({} bytes)", header.size())
                }
                Member::Skip(header) => debug!(
                    "skipping legacy symbol table {:?} ({} bytes)",
                    header.name(),
                    header.size()
                ),
            }
        }
    }

    fn read_global_header_if_necessary(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        let mut buffer = [0; GLOBAL_HEADER_LEN];
        let bytes_read = read_full(&mut self.reader, &mut buffer)
            .map_err(|error| annotate(error, "failed to read global header"))?;
        if bytes_read < buffer.len() {
            return Err(FormatError::MissingMagic.into());
        }
        if &buffer != GLOBAL_HEADER {
            return Err(FormatError::BadMagic.into());
        }
        self.started = true;
        Ok(())
    }

    fn skip_unread(&mut self) -> Result<()> {
        if self.unread > 0 {
            let skipped = io::copy(
                &mut self.reader.by_ref().take(self.unread),
                &mut io::sink(),
            )?;
            self.unread -= skipped;
            if self.unread > 0 {
                return Err(Error::TruncatedPayload { remaining: self.unread });
            }
        }
        if self.padding {
            // A missing padding byte at the very end of the archive is
            // tolerated.
            let mut buffer = [0u8; 1];
            read_full(&mut self.reader, &mut buffer)?;
            self.padding = false;
        }
        Ok(())
    }

    /// Parses the next header record and resolves its name.  Returns
    /// `Ok(None)` if we are at EOF.
    fn read_header(&mut self) -> Result<Option<Member>> {
        let mut buffer = [0; ENTRY_HEADER_LEN];
        let bytes_read = read_full(&mut self.reader, &mut buffer)
            .map_err(|error| annotate(error, "failed to read archive entry header"))?;
        if bytes_read == 0 {
            return Ok(None);
        } else if bytes_read < buffer.len() {
            return Err(Error::TruncatedHeader);
        }
        let raw = Header::decode(&buffer)?;
        let mut header = raw.header;
        let member = match raw.name {
            NameField::Standard(name) => {
                if !is_reserved_name(&name) {
                    if let Some(stripped) = name.strip_suffix('/') {
                        header.set_name(stripped);
                    }
                }
                Member::classify(header)
            }
            NameField::BsdExtended(name_len) => {
                let size = header.size();
                if size < name_len {
                    return Err(FormatError::BsdNameTooLong { name_len, size }
                        .into());
                }
                let mut name = Vec::new();
                let bytes_read = self
                    .reader
                    .by_ref()
                    .take(name_len)
                    .read_to_end(&mut name)
                    .map_err(|error| {
                        annotate(error, "failed to read extended entry identifier")
                    })?;
                if (bytes_read as u64) < name_len {
                    return Err(Error::TruncatedHeader);
                }
                header.set_name(String::from_utf8_lossy(trim_padding(&name)));
                header.set_size(size - name_len);
                Member::classify(header)
            }
            NameField::GnuExtended(offset) => {
                let name = self
                    .strings
                    .as_ref()
                    .and_then(|strings| strings.get(&offset))
                    .ok_or(Error::MissingStringTableEntry(offset))?;
                header.set_name(name.clone());
                Member::classify(header)
            }
        };
        let header = member.header();
        trace!("read header for {:?} ({} bytes)", header.name(), header.size());
        Ok(Some(member))
    }

    fn read_string_table(&mut self, header: &Header) -> Result<()> {
        if self.strings.is_some() {
            return Err(FormatError::DuplicateStringTable.into());
        }
        let mut data = Vec::new();
        let bytes_read = self
            .reader
            .by_ref()
            .take(self.unread)
            .read_to_end(&mut data)
            .map_err(|error| annotate(error, "failed to read name table"))?;
        self.unread -= bytes_read as u64;
        if self.unread > 0 {
            return Err(Error::TruncatedPayload { remaining: self.unread });
        }
        let strings = parse_string_table(&data);
        debug!(
            "read GNU string table ({} bytes, {} names)",
            header.size(),
            strings.len()
        );
        self.strings = Some(strings);
        Ok(())
    }
}

impl<R: Read> Read for Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.unread == 0 || buf.is_empty() {
            return Ok(0);
        }
        let max_len = cmp::min(self.unread, buf.len() as u64) as usize;
        let bytes_read = self.reader.read(&mut buf[..max_len])?;
        if bytes_read == 0 {
            return Err(Error::TruncatedPayload { remaining: self.unread }.into());
        }
        self.unread -= bytes_read as u64;
        Ok(bytes_read)
    }
}

/// Splits a GNU string table into names keyed by their starting offset.
/// Each entry ends with `\n` and its trailing `/` is dropped.
fn parse_string_table(data: &[u8]) -> HashMap<u64, String> {
    let mut strings = HashMap::new();
    let mut start = 0;
    for (index, &byte) in data.iter().enumerate() {
        if byte == b'\n' {
            let name = &data[start..index];
            let name = name.strip_suffix(b"/").unwrap_or(name);
            strings.insert(
                start as u64,
                String::from_utf8_lossy(name).into_owned(),
            );
            start = index + 1;
        }
    }
    strings
}

/// Reads until `buffer` is full or the reader reaches EOF, returning the
/// number of bytes read.
fn read_full<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(count) => filled += count,
            Err(error) if error.kind() == ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
    Ok(filled)
}
