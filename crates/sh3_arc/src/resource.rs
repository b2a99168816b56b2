//! Generic access to assets made of a header followed by data
//!
//! A [`Resource`] owns the bytes of one asset. The [`Header`] at its start decides whether the
//! asset is valid and where its data lives, and a [`SubHeader`] implementation describes where a
//! nested header starts. Nested headers are copied out into a resource of their own, so a resource
//! never borrows from another resource or from a mapped section file.

use std::fmt::{self, Debug};
use tracing::{debug, instrument};

use crate::{
    archive::FileSource,
    error::{Error, Result},
};

/// A fixed size header at the start of a resource
pub trait Header: Sized {
    /// Number of bytes the header occupies
    const SIZE: usize;

    /// Extra arguments needed to locate the data, `()` for resources with a single data range
    type DataArgs: Copy;

    /// Decode the header from the start of `bytes`, which holds at least [`Header::SIZE`] bytes
    fn parse(bytes: &[u8]) -> Result<Self>;

    /// Whether the header describes a valid resource
    fn check(&self) -> bool;

    /// Offset of the data from the start of the resource
    fn data_offset(&self, _args: Self::DataArgs) -> usize {
        Self::SIZE
    }

    /// Size of the data, `remaining` being the amount of bytes from the data offset to the end
    fn data_size(&self, remaining: usize, _args: Self::DataArgs) -> usize {
        remaining
    }
}

/// A header `T` nested inside of a resource with this header
pub trait SubHeader<T: Header>: Header {
    /// Offset of the nested header from the start of this resource
    fn sub_header_offset(&self) -> usize;
}

/// The bytes of one asset together with its decoded header
///
/// A resource is either unloaded (empty) or holds at least a full header.
pub struct Resource<H: Header> {
    raw: Vec<u8>,
    header: Option<H>,
}

impl<H: Header> Default for Resource<H> {
    fn default() -> Self {
        Self {
            raw: Vec::new(),
            header: None,
        }
    }
}

impl<H: Header + Debug> Debug for Resource<H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Resource")
            .field("len", &self.raw.len())
            .field("header", &self.header)
            .finish()
    }
}

impl<H: Header> Resource<H> {
    /// Create a resource over `raw`
    ///
    /// An empty buffer gives an unloaded resource. The header is not checked.
    pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::default());
        }
        if raw.len() < H::SIZE {
            return Err(Error::HeaderTruncated {
                needed: H::SIZE,
                available: raw.len(),
            });
        }

        let header = H::parse(&raw[..H::SIZE])?;
        Ok(Self {
            raw,
            header: Some(header),
        })
    }

    /// Load the resource from a file
    ///
    /// Returns the number of bytes read, or `None` if the file does not exist. If the file is too
    /// small for the header or the header check fails the resource stays unloaded, callers should
    /// look at [`Resource::is_loaded`] afterwards.
    #[instrument(skip(self, source), err)]
    pub fn load_from_file<S: FileSource + ?Sized>(
        &mut self,
        source: &S,
        name: &str,
    ) -> Result<Option<usize>> {
        if self.is_loaded() {
            return Err(Error::AlreadyLoaded);
        }

        self.raw.clear();
        let Some(length) = source.load_file(name, &mut self.raw)? else {
            return Ok(None);
        };

        if self.raw.len() < H::SIZE {
            debug!(length, needed = H::SIZE, "file too small for header");
            self.raw.clear();
            return Ok(Some(length));
        }

        let header = match H::parse(&self.raw[..H::SIZE]) {
            Ok(header) => header,
            Err(e) => {
                self.raw.clear();
                return Err(e);
            }
        };
        if !header.check() {
            debug!(length, "header check failed");
            self.raw.clear();
            return Ok(Some(length));
        }

        self.header = Some(header);
        Ok(Some(length))
    }

    /// Whether the resource holds a header
    pub fn is_loaded(&self) -> bool {
        self.header.is_some()
    }

    /// Whether the resource is loaded and its header check passes
    pub fn check(&self) -> bool {
        self.header.as_ref().is_some_and(|h| h.check())
    }

    /// The decoded header
    pub fn header(&self) -> Result<&H> {
        self.header.as_ref().ok_or(Error::NotLoaded)
    }

    /// The data range described by the header
    pub fn raw_data(&self, args: H::DataArgs) -> Result<&[u8]> {
        let header = self.header()?;

        let offset = header.data_offset(args);
        let remaining = self.raw.len().checked_sub(offset).ok_or(Error::RangeOutOfBounds {
            offset,
            size: 0,
            available: self.raw.len(),
        })?;
        let size = header.data_size(remaining, args);
        if size > remaining {
            return Err(Error::RangeOutOfBounds {
                offset,
                size,
                available: self.raw.len(),
            });
        }

        Ok(&self.raw[offset..offset + size])
    }

    /// Copy the nested header `T` and everything after it into a new resource
    pub fn sub_header<T: Header>(&self) -> Result<Resource<T>>
    where
        H: SubHeader<T>,
    {
        let offset = self.header()?.sub_header_offset();
        if offset >= self.raw.len() {
            return Err(Error::RangeOutOfBounds {
                offset,
                size: T::SIZE,
                available: self.raw.len(),
            });
        }
        Resource::from_bytes(self.raw[offset..].to_vec())
    }

    /// All bytes of the resource
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Unwrap and return the bytes of the resource
    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use byteorder::{ByteOrder, LittleEndian};
    use pretty_assertions::assert_eq;

    use crate::archive::FileSource;
    use crate::error::{Error, Result};
    use crate::resource::{Header, Resource, SubHeader};

    struct Files(HashMap<&'static str, Vec<u8>>);

    impl FileSource for Files {
        fn load_file(&self, name: &str, buffer: &mut Vec<u8>) -> Result<Option<usize>> {
            Ok(self.0.get(name).map(|data| {
                buffer.extend_from_slice(data);
                data.len()
            }))
        }
    }

    /// magic, data size, nested offset
    #[derive(Debug, PartialEq)]
    struct Outer {
        magic: u16,
        size: u16,
        nested: u16,
    }

    impl Header for Outer {
        const SIZE: usize = 6;
        type DataArgs = ();

        fn parse(bytes: &[u8]) -> Result<Self> {
            Ok(Self {
                magic: LittleEndian::read_u16(&bytes[0..2]),
                size: LittleEndian::read_u16(&bytes[2..4]),
                nested: LittleEndian::read_u16(&bytes[4..6]),
            })
        }

        fn check(&self) -> bool {
            self.magic == 0x1234
        }

        fn data_size(&self, _remaining: usize, _args: ()) -> usize {
            self.size as usize
        }
    }

    /// fixed 2 byte records, the argument picks one
    #[derive(Debug, PartialEq)]
    struct Inner {
        count: u8,
    }

    impl Header for Inner {
        const SIZE: usize = 1;
        type DataArgs = usize;

        fn parse(bytes: &[u8]) -> Result<Self> {
            Ok(Self { count: bytes[0] })
        }

        fn check(&self) -> bool {
            true
        }

        fn data_offset(&self, idx: usize) -> usize {
            Self::SIZE + 2 * idx
        }

        fn data_size(&self, _remaining: usize, _idx: usize) -> usize {
            2
        }
    }

    impl SubHeader<Inner> for Outer {
        fn sub_header_offset(&self) -> usize {
            self.nested as usize
        }
    }

    #[rustfmt::skip]
    fn outer_bytes() -> Vec<u8> {
        vec![
            0x34, 0x12,             // magic
            0x02, 0x00,             // data size
            0x08, 0x00,             // nested header offset
            0xAA, 0xBB,             // data
            0x02,                   // nested header
            0x01, 0x02, 0x03, 0x04, // nested records
        ]
    }

    fn files() -> Files {
        let mut files = HashMap::new();
        files.insert("good", outer_bytes());
        files.insert("bad", vec![0x00; 12]);
        files.insert("short", vec![0x34, 0x12]);
        Files(files)
    }

    #[test]
    fn load_and_read_data() -> Result<()> {
        let mut resource = Resource::<Outer>::default();
        assert!(!resource.is_loaded());

        assert_eq!(resource.load_from_file(&files(), "good")?, Some(13));
        assert!(resource.is_loaded());
        assert!(resource.check());
        assert_eq!(resource.header()?.size, 2);
        assert_eq!(resource.raw_data(())?, &[0xAA, 0xBB]);

        Ok(())
    }

    #[test]
    fn failed_check_leaves_resource_unloaded() -> Result<()> {
        let mut resource = Resource::<Outer>::default();
        assert_eq!(resource.load_from_file(&files(), "bad")?, Some(12));
        assert!(!resource.is_loaded());
        assert!(resource.as_bytes().is_empty());
        assert!(matches!(resource.header(), Err(Error::NotLoaded)));

        let mut resource = Resource::<Outer>::default();
        assert_eq!(resource.load_from_file(&files(), "short")?, Some(2));
        assert!(!resource.is_loaded());

        Ok(())
    }

    #[test]
    fn missing_file() -> Result<()> {
        let mut resource = Resource::<Outer>::default();
        assert_eq!(resource.load_from_file(&files(), "missing")?, None);
        assert!(!resource.is_loaded());
        Ok(())
    }

    #[test]
    fn double_load_is_an_error() -> Result<()> {
        let mut resource = Resource::<Outer>::default();
        resource.load_from_file(&files(), "good")?;
        assert!(matches!(
            resource.load_from_file(&files(), "good"),
            Err(Error::AlreadyLoaded)
        ));
        Ok(())
    }

    #[test]
    fn sub_header_copies_tail() -> Result<()> {
        let resource = Resource::<Outer>::from_bytes(outer_bytes())?;
        let inner: Resource<Inner> = resource.sub_header()?;

        assert_eq!(inner.as_bytes(), &[0x02, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(inner.header()?.count, 2);
        assert_eq!(inner.raw_data(0)?, &[0x01, 0x02]);
        assert_eq!(inner.raw_data(1)?, &[0x03, 0x04]);
        assert!(matches!(
            inner.raw_data(2),
            Err(Error::RangeOutOfBounds { offset: 5, size: 2, available: 5 })
        ));

        Ok(())
    }

    #[test]
    fn data_past_the_end_is_an_error() -> Result<()> {
        let mut raw = outer_bytes();
        raw[2] = 0x40;
        let resource = Resource::<Outer>::from_bytes(raw)?;
        assert!(matches!(
            resource.raw_data(()),
            Err(Error::RangeOutOfBounds { .. })
        ));
        Ok(())
    }

    #[test]
    fn from_bytes_requires_full_header() {
        assert!(!Resource::<Outer>::from_bytes(Vec::new()).unwrap().is_loaded());
        assert!(matches!(
            Resource::<Outer>::from_bytes(vec![0x34, 0x12]),
            Err(Error::HeaderTruncated { needed: 6, available: 2 })
        ));
    }
}
