//! Exact-length reads over a gzip compressed stream.

use std::{
    fs::File,
    io::{self, BufReader, Cursor, Read},
    path::Path,
};

use flate2::read::GzDecoder;
use tracing::{instrument, trace};

use crate::{error::StreamError, types::Record};

/// Result type for stream reads, `Ok` being a [`crate::error::ReadResult::Success`]
pub type StreamResult<T> = core::result::Result<T, StreamError>;

/// Reads exact amounts of decompressed data from a gzip stream
///
/// Every read either fills the requested amount of bytes or reports how it fell short:
/// [`StreamError::EndOfFile`] when nothing could be read, [`StreamError::PartialRead`] when only
/// part of it was, and [`StreamError::Decompression`] when the decoder failed.
pub struct CompressedStream<R: Read> {
    decoder: GzDecoder<R>,
}

impl CompressedStream<BufReader<File>> {
    /// Open a gzip compressed file
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> CompressedStream<R> {
    /// Wrap a reader producing gzip compressed data
    pub fn new(reader: R) -> Self {
        Self {
            decoder: GzDecoder::new(reader),
        }
    }

    /// Fill `buf` with decompressed data
    pub fn read_data(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        let requested = buf.len();
        let mut read = 0;
        while read < requested {
            match self.decoder.read(&mut buf[read..]) {
                Ok(0) => break,
                Ok(n) => read += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamError::Decompression(e)),
            }
        }

        trace!(requested, read, "read from compressed stream");
        match read {
            n if n == requested => Ok(()),
            0 => Err(StreamError::EndOfFile),
            _ => Err(StreamError::PartialRead { read, requested }),
        }
    }

    /// Read one fixed size record
    #[instrument(
        skip(self),
        fields(record = std::any::type_name::<T>()),
        err(level = "debug")
    )]
    pub fn read_object<T: Record>(&mut self) -> StreamResult<T> {
        let mut buf = vec![0u8; T::SIZE];
        self.read_data(&mut buf)?;
        Ok(T::read_le(&mut Cursor::new(buf))?)
    }

    /// Read exactly `len` raw bytes, usually a NUL padded string
    ///
    /// The buffer only grows with the data actually decompressed, `len` is not trusted.
    pub fn read_string(&mut self, len: usize) -> StreamResult<Vec<u8>> {
        let mut buf = Vec::new();
        let read = (&mut self.decoder)
            .take(len as u64)
            .read_to_end(&mut buf)
            .map_err(StreamError::Decompression)?;

        trace!(requested = len, read, "read string from compressed stream");
        match read {
            n if n == len => Ok(buf),
            0 => Err(StreamError::EndOfFile),
            _ => Err(StreamError::PartialRead {
                read,
                requested: len,
            }),
        }
    }

    /// Unwrap and return the inner reader object
    pub fn into_inner(self) -> R {
        self.decoder.into_inner()
    }
}
