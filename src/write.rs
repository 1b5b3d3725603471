use std::cmp;
use std::io::{self, ErrorKind, Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::header::{to_ascii, Header, ENTRY_HEADER_LEN, ENTRY_NAME_LEN};
use crate::{
    GLOBAL_HEADER, GLOBAL_HEADER_LEN, GNU_STRING_TABLE_NAME,
    GNU_SYMBOL_TABLE_NAME,
};

/// Terminates every name in the GNU string table.
const GNU_NAME_TERMINATOR: &[u8] = b"/\n";

/// Appended to anything with an odd length.
const PADDING_BYTE: u8 = b'\n';

/// Stands in for member data that was declared but never written.
const FILL_BYTE: u8 = b' ';

const SYMTAB_WORD_LEN: u64 = 4;

fn padded_len(len: u64) -> u64 {
    len + len % 2
}

fn write_padded<W: Write>(writer: &mut W, data: &[u8]) -> io::Result<()> {
    writer.write_all(data)?;
    if data.len() % 2 != 0 {
        writer.write_all(&[PADDING_BYTE])?;
    }
    Ok(())
}

/// Names that need the string table: too long for the name field once the
/// GNU `/` terminator is added, holding a `/` of their own, or empty.
fn needs_string_table(name: &str) -> bool {
    name.is_empty() || name.len() + 1 > ENTRY_NAME_LEN || name.contains('/')
}

enum Chunk {
    Data(Vec<u8>),
    Fill(u64),
}

/// Member records and data, held until `close()`.  Declared bytes that were
/// never written are kept as a count and only produced on output.
#[derive(Default)]
struct MemberBuffer {
    chunks: Vec<Chunk>,
    len: u64,
}

impl MemberBuffer {
    fn len(&self) -> u64 {
        self.len
    }

    fn extend(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.len += data.len() as u64;
        match self.chunks.last_mut() {
            Some(Chunk::Data(bytes)) => bytes.extend_from_slice(data),
            _ => self.chunks.push(Chunk::Data(data.to_vec())),
        }
    }

    fn fill(&mut self, count: u64) {
        if count > 0 {
            self.len += count;
            self.chunks.push(Chunk::Fill(count));
        }
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for chunk in &self.chunks {
            match chunk {
                Chunk::Data(bytes) => writer.write_all(bytes)?,
                Chunk::Fill(count) => {
                    io::copy(&mut io::repeat(FILL_BYTE).take(*count), writer)?;
                }
            }
        }
        Ok(())
    }
}

struct DirectoryEntry {
    name: String,
    offset: u64,
}

/// The GNU symbol table, holding one entry per member that points at the
/// member's header.  Offsets are relative to the start of the member
/// buffer until the table is encoded.
#[derive(Default)]
struct MemberDirectory {
    entries: Vec<DirectoryEntry>,
}

impl MemberDirectory {
    fn push(&mut self, name: String, offset: u64) {
        self.entries.push(DirectoryEntry { name, offset });
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Length of the encoded table, not counting padding.
    fn encoded_len(&self) -> u64 {
        let names: u64 =
            self.entries.iter().map(|entry| entry.name.len() as u64 + 1).sum();
        SYMTAB_WORD_LEN * (self.entries.len() as u64 + 1) + names
    }

    /// Encodes the table, shifting every offset by `base`, the number of
    /// bytes that precede the first member in the archive.
    fn encode(&self, base: u64) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(self.encoded_len() as usize);
        data.extend_from_slice(&symtab_word(self.entries.len() as u64, "symbol count")?);
        for entry in &self.entries {
            let offset = entry.offset + base;
            data.extend_from_slice(&symtab_word(offset, "symbol offset")?);
        }
        for entry in &self.entries {
            data.extend_from_slice(entry.name.as_bytes());
            data.push(0);
        }
        Ok(data)
    }
}

fn symtab_word(value: u64, field: &'static str) -> Result<[u8; 4]> {
    u32::try_from(value)
        .map(u32::to_be_bytes)
        .map_err(|_| Error::HeaderFieldOverflow {
            field,
            value: value.to_string(),
            width: SYMTAB_WORD_LEN as usize,
        })
}

/// The GNU string table, holding the names that don't fit in a header.
#[derive(Default)]
struct StringTable {
    data: Vec<u8>,
}

impl StringTable {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Adds a name and returns the offset it was stored at.
    fn insert(&mut self, name: &str) -> u64 {
        let offset = self.len();
        self.data.extend_from_slice(name.as_bytes());
        self.data.extend_from_slice(GNU_NAME_TERMINATOR);
        offset
    }
}

/// A structure for writing GNU-variant archives.
///
/// Members are buffered in memory; nothing reaches the underlying writer
/// until `close()`, when the symbol table, the string table and all members
/// are written in one pass.
///
/// For each member, call `begin_member()` and then write exactly as many
/// bytes as the header declares, either with `write_data()` or through the
/// `Write` implementation.  Bytes that are declared but never written are
/// filled with spaces.
pub struct Writer<W: Write> {
    writer: W,
    members: MemberBuffer,
    directory: MemberDirectory,
    strings: StringTable,
    unwritten: u64, // Bytes the current member still expects.
    padding: bool,  // True if the current member needs a padding byte.
    closed: bool,
    close_failed: bool,
    deterministic: bool,
}

impl<W: Write> Writer<W> {
    /// Create a new archive writer with the underlying writer object as the
    /// destination of all data written.
    pub fn new(writer: W) -> Writer<W> {
        Writer {
            writer,
            members: MemberBuffer::default(),
            directory: MemberDirectory::default(),
            strings: StringTable::default(),
            unwritten: 0,
            padding: false,
            closed: false,
            close_failed: false,
            deterministic: false,
        }
    }

    /// In deterministic mode the symbol and string table headers carry a
    /// zero timestamp instead of the current time.  Off by default.
    pub fn set_deterministic(&mut self, deterministic: bool) {
        self.deterministic = deterministic;
    }

    /// Returns a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Closes the archive and returns the underlying writer object.  Fails
    /// with `Error::IncompleteArchive` if an earlier `close()` failed.
    pub fn into_inner(mut self) -> Result<W> {
        self.close()?;
        Ok(self.writer)
    }

    /// Starts a new member.  Any data the previous member declared but never
    /// received is filled in first.
    pub fn begin_member(&mut self, header: &Header) -> Result<()> {
        if self.closed {
            return Err(Error::WriteAfterClose);
        }
        self.fill_unwritten();
        let name = to_ascii(header.name());
        let extended = needs_string_table(&name);
        let name_field = if extended {
            format!("/{}", self.strings.len())
        } else {
            format!("{}/", name)
        };
        let record = header.encode(&name_field, true)?;
        if extended {
            self.strings.insert(&name);
        }
        trace!("member {:?} stored as {:?}", name, name_field);
        self.directory.push(name, self.members.len());
        self.members.extend(&record);
        self.unwritten = header.size();
        self.padding = header.size() % 2 != 0;
        Ok(())
    }

    /// Appends data to the current member.  If `data` is longer than what
    /// the member still expects, the part that fits is kept, the rest is
    /// discarded and `Error::WriteOverflow` is returned.
    pub fn write_data(&mut self, data: &[u8]) -> Result<()> {
        if self.closed {
            return Err(Error::WriteAfterClose);
        }
        let accepted = cmp::min(data.len() as u64, self.unwritten) as usize;
        self.members.extend(&data[..accepted]);
        self.unwritten -= accepted as u64;
        if accepted < data.len() {
            return Err(Error::WriteOverflow { rejected: data.len() - accepted });
        }
        Ok(())
    }

    /// Adds a member with the given header, taking its data from `data`.
    pub fn append<R: Read>(&mut self, header: &Header, mut data: R) -> Result<()> {
        self.begin_member(header)?;
        let mut buffer = [0u8; 8192];
        loop {
            let count = match data.read(&mut buffer) {
                Ok(0) => return Ok(()),
                Ok(count) => count,
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(error.into()),
            };
            self.write_data(&buffer[..count])?;
        }
    }

    /// Writes the complete archive to the underlying writer.  Calling this
    /// again after it succeeded has no effect.
    ///
    /// If this fails, the underlying writer may hold a partial archive, and
    /// every later call returns `Error::IncompleteArchive`.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            if self.close_failed {
                return Err(Error::IncompleteArchive);
            }
            return Ok(());
        }
        self.closed = true;
        let result = self.emit();
        self.close_failed = result.is_err();
        result
    }

    fn emit(&mut self) -> Result<()> {
        self.fill_unwritten();

        let mtime = self.pseudo_member_mtime();
        let symtab_len = self.directory.encoded_len();
        let strings_len = self.strings.len();
        let mut prefix_len = (GLOBAL_HEADER_LEN + ENTRY_HEADER_LEN) as u64
            + padded_len(symtab_len);
        if strings_len > 0 {
            prefix_len += ENTRY_HEADER_LEN as u64 + padded_len(strings_len);
        }

        let symtab = self.directory.encode(prefix_len)?;
        let mut symtab_header = Header::new(GNU_SYMBOL_TABLE_NAME, symtab_len);
        symtab_header.set_mtime(mtime);
        let symtab_record = symtab_header.encode(GNU_SYMBOL_TABLE_NAME, false)?;
        let strings_record = if strings_len > 0 {
            let mut strings_header =
                Header::new(GNU_STRING_TABLE_NAME, strings_len);
            strings_header.set_mtime(mtime);
            Some(strings_header.encode(GNU_STRING_TABLE_NAME, false)?)
        } else {
            None
        };

        debug!(
            "writing archive with {} members ({} byte prefix, {} byte string table)",
            self.directory.len(),
            prefix_len,
            strings_len
        );
        self.writer.write_all(GLOBAL_HEADER)?;
        self.writer.write_all(&symtab_record)?;
        write_padded(&mut self.writer, &symtab)?;
        if let Some(record) = strings_record {
            self.writer.write_all(&record)?;
            write_padded(&mut self.writer, &self.strings.data)?;
        }
        self.members.write_to(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    fn fill_unwritten(&mut self) {
        self.members.fill(self.unwritten);
        if self.padding {
            self.members.extend(&[PADDING_BYTE]);
        }
        self.unwritten = 0;
        self.padding = false;
    }

    fn pseudo_member_mtime(&self) -> u64 {
        if self.deterministic {
            return 0;
        }
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs())
    }
}

impl<W: Write> Write for Writer<W> {
    /// Accepts as much of `buf` as the current member still expects.  Once
    /// the member is full, further non-empty writes fail with
    /// `Error::WriteOverflow`.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let accepted = cmp::min(buf.len() as u64, self.unwritten) as usize;
        let data = if accepted == 0 { buf } else { &buf[..accepted] };
        self.write_data(data)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Writer;
    use crate::error::{Error, FormatError};
    use crate::{Header, Reader};
    use itertools::Itertools;
    use pretty_assertions::assert_eq;
    use std::io::{self, ErrorKind, Read, Write};

    fn header(name: &str, size: u64) -> Header {
        let mut header = Header::new(name, size);
        header.set_mode(0o644);
        header
    }

    fn record(name: &str, mode: &str, size: u64) -> String {
        format!(
            "{:<16}{:<12}{:<6}{:<6}{:<8}{:<10}`\n",
            name, 0, 0, 0, mode, size
        )
    }

    fn build(members: &[(Header, &[u8])]) -> Vec<u8> {
        let mut writer = Writer::new(Vec::new());
        writer.set_deterministic(true);
        for (header, data) in members {
            writer.append(header, *data).unwrap();
        }
        writer.into_inner().unwrap()
    }

    fn symbol_table(archive: &[u8]) -> Vec<(u32, String)> {
        let size: usize = String::from_utf8_lossy(&archive[56..66])
            .trim_end()
            .parse()
            .unwrap();
        let data = &archive[68..68 + size];
        let word = |index: usize| {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&data[index * 4..index * 4 + 4]);
            u32::from_be_bytes(bytes)
        };
        let count = word(0) as usize;
        let names = data[4 * (count + 1)..]
            .split(|&byte| byte == 0)
            .take(count)
            .map(|name| String::from_utf8_lossy(name).into_owned());
        (1..=count).map(word).zip(names).collect()
    }

    #[test]
    fn build_archive_with_one_member() {
        let actual = build(&[(header("exit.o", 4), &[1u8, 2, 3, 4][..])]);
        let mut expected = b"!<arch>\n".to_vec();
        expected.extend_from_slice(record("/", "0", 15).as_bytes());
        expected.extend_from_slice(b"\x00\x00\x00\x01\x00\x00\x00\x54exit.o\x00\n");
        expected.extend_from_slice(record("exit.o/", "100644", 4).as_bytes());
        expected.extend_from_slice(&[1, 2, 3, 4]);
        assert_eq!(String::from_utf8_lossy(&actual), String::from_utf8_lossy(&expected));
    }

    #[test]
    fn build_archive_with_long_name() {
        let name = "a".repeat(60);
        let actual = build(&[(header(&name, 3), &b"abc"[..])]);
        // The symbol table is 69 bytes, padded to 70.
        let mut symtab = vec![0, 0, 0, 1, 0, 0, 1, 4];
        symtab.extend_from_slice(name.as_bytes());
        symtab.extend_from_slice(b"\0\n");
        assert_eq!(&actual[68..138], symtab.as_slice());
        assert_eq!(
            String::from_utf8_lossy(&actual[138..198]),
            record("//", "0", 62)
        );
        assert_eq!(&actual[198..260], format!("{}/\n", name).as_bytes());
        assert_eq!(
            String::from_utf8_lossy(&actual[260..320]),
            record("/0", "100644", 3)
        );
        assert_eq!(&actual[320..], b"abc\n");
        assert_eq!(symbol_table(&actual), vec![(260, name)]);
    }

    #[test]
    fn string_table_only_holds_names_that_need_it() {
        let actual = build(&[
            (header("fifteen_chars.o", 0), &b""[..]),
            (header("sixteen_chars.oo", 0), &b""[..]),
            (header("dir/file.o", 0), &b""[..]),
            (header("seventeen_chars.o", 0), &b""[..]),
        ]);
        let text = String::from_utf8_lossy(&actual);
        assert!(text.contains(&record("fifteen_chars.o/", "100644", 0)));
        assert!(text.contains(&record("/0", "100644", 0)));
        assert!(text.contains(&record("/18", "100644", 0)));
        assert!(text.contains(&record("/30", "100644", 0)));
        assert!(!text.contains("sixteen_chars.oo "));
        assert!(text.contains(
            "sixteen_chars.oo/\ndir/file.o/\nseventeen_chars.o/\n"
        ));

        let mut archive = Reader::new(actual.as_slice());
        let mut names = Vec::new();
        while let Some(header) = archive.next_header().unwrap() {
            names.push(header.name().to_string());
        }
        assert_eq!(
            names,
            vec!["fifteen_chars.o", "sixteen_chars.oo", "dir/file.o", "seventeen_chars.o"]
        );
    }

    #[test]
    fn short_names_never_create_a_string_table() {
        let actual = build(&[(header("a.o", 1), &b"x"[..]), (header("b.o", 2), &b"yz"[..])]);
        let mut archive = Reader::new(actual.as_slice());
        while archive.next_header().unwrap().is_some() {}
        assert!(!String::from_utf8_lossy(&actual).contains("//"));
    }

    #[test]
    fn symbol_table_points_at_member_headers() {
        let actual = build(&[
            (header("one.o", 3), &b"abc"[..]),
            (header("a_rather_long_member_name.o", 5), &b"hello"[..]),
            (header("three.o", 0), &b""[..]),
        ]);
        let symbols = symbol_table(&actual);
        assert_eq!(
            symbols.iter().map(|(_, name)| name.as_str()).collect::<Vec<_>>(),
            vec!["one.o", "a_rather_long_member_name.o", "three.o"]
        );
        assert!(symbols.iter().tuple_windows().all(|(x, y)| x.0 < y.0));
        for (offset, _) in &symbols {
            let offset = *offset as usize;
            assert_eq!(offset % 2, 0);
            assert_eq!(&actual[offset + 58..offset + 60], b"`\n");
        }
        assert_eq!(&actual[symbols[0].0 as usize..][..6], b"one.o/");
        assert_eq!(&actual[symbols[1].0 as usize..][..3], b"/0 ");
    }

    #[test]
    fn empty_archive() {
        let actual = build(&[]);
        let mut expected = b"!<arch>\n".to_vec();
        expected.extend_from_slice(record("/", "0", 4).as_bytes());
        expected.extend_from_slice(&[0, 0, 0, 0]);
        assert_eq!(actual, expected);
        let mut archive = Reader::new(actual.as_slice());
        assert!(archive.next_header().unwrap().is_none());
    }

    #[test]
    fn nothing_is_written_before_close() {
        let mut writer = Writer::new(Vec::new());
        writer.begin_member(&header("foo.o", 3)).unwrap();
        writer.write_data(b"foo").unwrap();
        assert!(writer.get_ref().is_empty());
        writer.close().unwrap();
        assert!(!writer.get_ref().is_empty());
    }

    #[test]
    fn close_is_idempotent() {
        let mut writer = Writer::new(Vec::new());
        writer.append(&header("foo.o", 3), &b"foo"[..]).unwrap();
        writer.close().unwrap();
        let len = writer.get_ref().len();
        writer.close().unwrap();
        assert_eq!(writer.get_ref().len(), len);
    }

    #[test]
    fn write_after_close() {
        let mut writer = Writer::new(Vec::new());
        writer.close().unwrap();
        assert!(matches!(
            writer.begin_member(&header("foo.o", 3)),
            Err(Error::WriteAfterClose)
        ));
        assert!(matches!(writer.write_data(b""), Err(Error::WriteAfterClose)));
        let error = writer.write(b"foo").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn write_too_long_keeps_boundaries() {
        let mut writer = Writer::new(Vec::new());
        writer.begin_member(&header("foo.o", 3)).unwrap();
        match writer.write_data(b"foobar") {
            Err(Error::WriteOverflow { rejected }) => assert_eq!(rejected, 3),
            other => panic!("unexpected result: {:?}", other),
        }
        writer.append(&header("bar.o", 2), &b"hi"[..]).unwrap();
        let actual = writer.into_inner().unwrap();

        let mut archive = Reader::new(actual.as_slice());
        let mut data = Vec::new();
        assert_eq!(archive.next_header().unwrap().unwrap().name(), "foo.o");
        archive.read_to_end(&mut data).unwrap();
        assert_eq!(data, b"foo");
        data.clear();
        assert_eq!(archive.next_header().unwrap().unwrap().name(), "bar.o");
        archive.read_to_end(&mut data).unwrap();
        assert_eq!(data, b"hi");
        assert!(archive.next_header().unwrap().is_none());
    }

    #[test]
    fn write_trait_reports_overflow() {
        let mut writer = Writer::new(Vec::new());
        writer.begin_member(&header("foo.o", 4)).unwrap();
        let error = io::copy(&mut &b"foobar"[..], &mut writer).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        let inner = error.get_ref().unwrap().downcast_ref::<Error>().unwrap();
        assert!(matches!(inner, Error::WriteOverflow { .. }));
        assert_eq!(writer.write(b"").unwrap(), 0);
    }

    #[test]
    fn short_members_are_filled() {
        let mut writer = Writer::new(Vec::new());
        writer.set_deterministic(true);
        writer.begin_member(&header("foo.o", 5)).unwrap();
        writer.write_all(b"ab").unwrap();
        writer.begin_member(&header("bar.o", 1)).unwrap();
        let actual = writer.into_inner().unwrap();

        let mut archive = Reader::new(actual.as_slice());
        let mut data = Vec::new();
        archive.next_header().unwrap().unwrap();
        archive.read_to_end(&mut data).unwrap();
        assert_eq!(data, b"ab   ");
        data.clear();
        archive.next_header().unwrap().unwrap();
        archive.read_to_end(&mut data).unwrap();
        assert_eq!(data, b" ");
        assert!(actual.ends_with(b" \n"));
    }

    #[test]
    fn header_too_long_emits_nothing() {
        let mut writer = Writer::new(Vec::new());
        let mut bad = header("foo.o", 3);
        bad.set_uid(9999999);
        assert!(matches!(
            writer.begin_member(&bad),
            Err(Error::HeaderFieldOverflow { field: "owner ID", .. })
        ));
        let mut long = header("a_name_long_enough_for_the_string_table.o", 0);
        long.set_gid(12345678);
        assert!(writer.begin_member(&long).is_err());
        let actual = writer.into_inner().unwrap();
        assert_eq!(actual.len(), 8 + 60 + 4);
        let mut archive = Reader::new(actual.as_slice());
        assert!(archive.next_header().unwrap().is_none());
    }

    #[test]
    fn non_ascii_names_are_stripped() {
        let actual = build(&[(header("über.o", 1), &b"x"[..])]);
        let mut archive = Reader::new(actual.as_slice());
        assert_eq!(archive.next_header().unwrap().unwrap().name(), "ber.o");
    }

    #[test]
    fn reserved_names_are_hidden_on_read() {
        let actual = build(&[
            (header("/", 1), &b"a"[..]),
            (header("/SYM64/", 1), &b"b"[..]),
            (header("__.SYMDEF_SORTED_long", 2), &b"cd"[..]),
            (header("real.o", 1), &b"e"[..]),
        ]);
        let mut archive = Reader::new(actual.as_slice());
        let mut members = Vec::new();
        while let Some(header) = archive.next_header().unwrap() {
            let mut data = String::new();
            archive.read_to_string(&mut data).unwrap();
            members.push((header.name().to_string(), data));
        }
        assert_eq!(members, vec![("real.o".to_string(), "e".to_string())]);
    }

    #[test]
    fn member_named_like_the_string_table_is_rejected_on_read() {
        let actual = build(&[(header("//", 1), &b"a"[..])]);
        let mut archive = Reader::new(actual.as_slice());
        assert!(matches!(
            archive.next_header(),
            Err(Error::Format(FormatError::DuplicateStringTable))
        ));
    }

    #[test]
    fn unwritten_data_is_counted_not_buffered() {
        let mut writer = Writer::new(Vec::new());
        writer.begin_member(&header("huge.o", 9_999_999_999)).unwrap();
        writer.begin_member(&header("after.o", 0)).unwrap();
        match writer.close() {
            Err(Error::HeaderFieldOverflow { field, .. }) => {
                assert_eq!(field, "symbol offset")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(writer.get_ref().is_empty());
    }

    struct FailingSink {
        written: Vec<u8>,
        limit: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() >= self.limit {
                return Err(io::Error::new(ErrorKind::BrokenPipe, "sink full"));
            }
            let count = buf.len().min(self.limit - self.written.len());
            self.written.extend_from_slice(&buf[..count]);
            Ok(count)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_close_is_reported_again() {
        let sink = FailingSink { written: Vec::new(), limit: 20 };
        let mut writer = Writer::new(sink);
        writer.append(&header("foo.o", 3), &b"foo"[..]).unwrap();
        match writer.close() {
            Err(Error::Io(error)) => assert_eq!(error.kind(), ErrorKind::BrokenPipe),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(writer.get_ref().written.len(), 20);
        assert!(matches!(writer.close(), Err(Error::IncompleteArchive)));
        assert!(matches!(writer.into_inner(), Err(Error::IncompleteArchive)));
    }

    #[test]
    fn empty_name_round_trips() {
        let actual = build(&[(header("", 1), &b"x"[..])]);
        let mut archive = Reader::new(actual.as_slice());
        assert_eq!(archive.next_header().unwrap().unwrap().name(), "");
    }

    #[test]
    fn pseudo_members_carry_current_time() {
        let mut writer = Writer::new(Vec::new());
        writer.append(&header("foo.o", 0), io::empty()).unwrap();
        let actual = writer.into_inner().unwrap();
        let mtime: u64 = String::from_utf8_lossy(&actual[24..36])
            .trim_end()
            .parse()
            .unwrap();
        assert!(mtime > 0);
    }
}
