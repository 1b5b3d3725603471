use arbitrary::{Arbitrary, Unstructured};

#[derive(Clone, Default, Debug, Eq, PartialEq, Arbitrary)]
pub struct Model {
    pub entries: Vec<Entry>,
}

#[derive(Clone, Debug, Eq, PartialEq, Arbitrary)]
pub struct Entry {
    pub header: Header,
    pub data: Vec<u8>,
}

impl Entry {
    pub fn header(&self) -> ar_stream::Header {
        let mut header =
            ar_stream::Header::new(self.header.name.0.clone(), self.data.len() as u64);
        header.set_mtime(self.header.mtime.0);
        header.set_uid(self.header.uid.0);
        header.set_gid(self.header.gid.0);
        header.set_mode(self.header.mode.0);
        header
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Arbitrary)]
pub struct Header {
    name: Name,
    mtime: Timestamp,
    uid: Uid,
    gid: Uid,
    mode: Mode,
}

impl Header {
    pub fn from_ar(header: &ar_stream::Header) -> Header {
        Header {
            name: Name(header.name().to_string()),
            mtime: Timestamp(header.mtime()),
            uid: Uid(header.uid()),
            gid: Uid(header.gid()),
            mode: Mode(header.mode() & 0o7777),
        }
    }
}

/// Names the writer can store faithfully: ASCII without NUL or newlines,
/// no trailing spaces, and nothing the reader takes for a pseudo-member.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Name(String);

impl Arbitrary<'_> for Name {
    fn arbitrary(u: &mut Unstructured<'_>) -> arbitrary::Result<Self> {
        String::arbitrary(u).map(|mut v| {
            v.retain(|ch| ch.is_ascii() && ch != '\0' && ch != '\n');
            while v.ends_with(' ') {
                v.pop();
            }
            while v.contains("__.") {
                v = v.replace("__.", "_.");
            }
            if matches!(v.as_str(), "/" | "//" | "/SYM64/") {
                v.push('a');
            }
            Name(v)
        })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Mode(u32);

impl Arbitrary<'_> for Mode {
    fn arbitrary(u: &mut Unstructured<'_>) -> arbitrary::Result<Self> {
        u32::arbitrary(u).map(|v| Mode(v & 0o7777))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Timestamp(u64);

impl Arbitrary<'_> for Timestamp {
    fn arbitrary(u: &mut Unstructured<'_>) -> arbitrary::Result<Self> {
        u.int_in_range(0..=999_999_999_999).map(Timestamp)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Uid(u32);

impl Arbitrary<'_> for Uid {
    fn arbitrary(u: &mut Unstructured<'_>) -> arbitrary::Result<Self> {
        u.int_in_range(0..=999_999).map(Uid)
    }
}
