//! Test utils for ar-stream.
use crate::Header;

use proptest::{arbitrary::Arbitrary, collection::vec, prelude::*};

/// Arbitrary implementation of Header and Data for feeding into tests.
#[derive(Debug, Clone)]
pub struct HeaderAndData {
    /// The header generated for this case.
    pub header: Header,
    /// The data for this case.
    pub data: Vec<u8>,
}

impl Arbitrary for HeaderAndData {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    /// Produces arbitrary members for testing.
    ///
    /// **Note:** names are ASCII and never contain `__.` or equal a
    /// pseudo-member name, since the writer drops everything else and the
    /// reader hides such members.  Trailing spaces are lost for names stored
    /// inline.
    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        (
            vec(any::<u8>(), 0..4 * 1024),        // Data
            r#"[a-zA-Z0-9_.\-/ ]{0,40}"#,         // Name
            0..999999999999u64,                   // Mtime
            0..999999u32,                         // Uid
            0..999999u32,                         // Gid
            0..0o7777u32,                         // Mode
        )
            .prop_filter("reserved name", |(_, name, ..)| {
                !name.contains("__.")
                    && !matches!(name.as_str(), "/" | "//" | "/SYM64/")
                    && name.trim_end() == name
            })
            .prop_map(|(data, name, mtime, uid, gid, mode)| {
                let mut header = Header::new(name, data.len() as u64);
                header.set_mtime(mtime);
                header.set_uid(uid);
                header.set_gid(gid);
                header.set_mode(mode);
                HeaderAndData { header, data }
            })
            .boxed()
    }
}
