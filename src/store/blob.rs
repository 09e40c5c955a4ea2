//! Blob - a stored object opened for reading

use std::fs::File;
use std::io::{self, BufReader, Read};

/// An open stored object, positioned at its first byte
///
/// The underlying file is closed when the blob is dropped, whether or not
/// it was read to the end.
#[derive(Debug)]
pub struct Blob {
    /// Size on disk at open time
    size: u64,
    reader: BufReader<File>,
}

impl Blob {
    pub(crate) fn new(file: File, size: u64) -> Self {
        Blob {
            size,
            reader: BufReader::new(file),
        }
    }

    /// Get the size of the stored object in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read the rest of the object into memory
    pub fn into_bytes(mut self) -> crate::Result<Vec<u8>> {
        let mut data = Vec::with_capacity(self.size as usize);
        self.reader.read_to_end(&mut data)?;
        Ok(data)
    }
}

impl Read for Blob {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}
