use std::io::{self, Read};

use crate::header::Header;
use crate::read::Reader;

/// Representation of an archive entry.
///
/// `Entry` objects implement the `Read` trait, and can be used to extract the
/// data from this archive entry.  An entry does not have to be read to the
/// end; the reader skips whatever is left when it advances.
pub struct Entry<'a, R: 'a + Read> {
    pub(crate) header: Header,
    pub(crate) reader: &'a mut Reader<R>,
}

impl<'a, R: 'a + Read> Entry<'a, R> {
    /// Returns the header for this archive entry.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the number of data bytes that have not been read yet.
    pub fn remaining(&self) -> u64 {
        self.reader.remaining()
    }
}

impl<'a, R: 'a + Read> Read for Entry<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use crate::Reader;
    use std::io::Read;

    #[test]
    fn entry_reads_are_bounded() {
        let input = "\
        !<arch>\n\
        foo.txt/        0           0     0     644     7         `\n\
        foobar\n\n\
        bar.txt/        0           0     0     644     3         `\n\
        bar\n";
        let mut archive = Reader::new(input.as_bytes());
        {
            let mut entry = archive.next_entry().unwrap().unwrap();
            assert_eq!(entry.remaining(), 7);
            let mut buffer = [0u8; 64];
            let mut total = 0;
            loop {
                let count = entry.read(&mut buffer[total..]).unwrap();
                if count == 0 {
                    break;
                }
                total += count;
            }
            assert_eq!(&buffer[..total], b"foobar\n");
            assert_eq!(entry.remaining(), 0);
        }
        let mut entry = archive.next_entry().unwrap().unwrap();
        let mut data = String::new();
        entry.read_to_string(&mut data).unwrap();
        assert_eq!(data, "bar");
    }
}
