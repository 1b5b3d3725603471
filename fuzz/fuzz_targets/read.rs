#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Read;

fuzz_target!(|data: &[u8]| {
    let mut archive = ar_stream::Reader::new(data);
    while let Some(Ok(mut entry)) = archive.next_entry() {
        let mut discard = [0; 1024];
        let _ = entry.read(&mut discard[..]);
    }
    // A failed reader stays exhausted.
    assert!(matches!(archive.next_header(), Ok(None)));
});
