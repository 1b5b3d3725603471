#![no_main]

use ar_stream_fuzz::{Entry, Header, Model};
use arbitrary::{Arbitrary as _, Unstructured};
use libfuzzer_sys::fuzz_target;
use std::io::Read as _;

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let model = Model::arbitrary(&mut u).expect("make arbitrary model");

    let mut writer = ar_stream::Writer::new(Vec::new());
    writer.set_deterministic(true);
    for entry in &model.entries {
        if let Err(err) = writer.append(&entry.header(), &entry.data[..]) {
            panic!("append entry: {err} with {model:?}");
        }
    }
    let buffer = match writer.into_inner() {
        Ok(buffer) => buffer,
        Err(err) => panic!("close archive: {err} with {model:?}"),
    };
    assert_eq!(buffer.len() % 2, 0);

    let mut rountripped = Model::default();
    let mut archive = ar_stream::Reader::new(&buffer[..]);
    while let Some(entry) = archive.next_entry() {
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(err) => panic!("read entry: {err} with {model:?}"),
        };
        rountripped.entries.push(Entry {
            header: Header::from_ar(entry.header()),
            data: {
                let mut data = Vec::new();
                if let Err(err) = entry.read_to_end(&mut data) {
                    panic!("read entry data: {err} with {model:?}");
                }
                data
            },
        })
    }

    assert_eq!(model, rountripped);
});
