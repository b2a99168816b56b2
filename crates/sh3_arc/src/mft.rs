//! Types for reading the master index (`arc.arc`)
//!

use indexmap::IndexMap;
use std::{
    fmt::{self, Debug},
    io::Read,
    path::Path,
};
use tracing::{debug, instrument, warn};

use crate::{
    error::{Error, Result},
    stream::CompressedStream,
    types::{ArcDescriptor, ArcHeader, FileEntryHeader, Record, SectionHeader, ARC_MAGIC},
};

/// Maps file names to their index inside a section file
///
/// Names may appear more than once in a section, the first entry inserted stays authoritative.
/// Names read from the master index that are not valid UTF-8 are stored with their bytes escaped,
/// see [`MasterIndex`].
#[derive(Clone, Default, PartialEq)]
pub struct FileTable {
    files: IndexMap<Box<str>, u16>,
}

impl Debug for FileTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FileTable({} files)", self.files.len())
    }
}

impl FileTable {
    /// Insert a name, returning `false` (and keeping the existing index) if it is already present.
    pub fn insert(&mut self, name: impl Into<Box<str>>, index: u16) -> bool {
        let name = name.into();
        if let Some(existing) = self.files.get(&name) {
            warn!(
                name = %name,
                existing = *existing,
                ignored = index,
                "duplicate file name, keeping the first entry"
            );
            return false;
        }
        self.files.insert(name, index);
        true
    }

    /// Get the section file index of a name
    pub fn get(&self, name: &str) -> Option<u16> {
        self.files.get(name).copied()
    }

    /// Number of unique names
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the table holds no names
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over names and indices in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.files.iter().map(|(name, index)| (name.as_ref(), *index))
    }
}

/// A file listed by a section record
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    /// Index of the file inside the section file
    pub index: u16,
    /// Name of the file with the NUL padding removed
    pub name: Box<str>,
}

/// A named section of the archive
#[derive(Debug, Clone)]
pub struct Section {
    /// Name of the section, which is also the stem of the section file
    pub name: Box<str>,
    /// The raw section header
    pub header: SectionHeader,
    /// Every file entry in the order it was listed, duplicates included
    pub entries: Vec<FileEntry>,
    /// Lookup from name to index
    pub files: FileTable,
}

/// The master index of an archive
///
/// Loading is all or nothing: any inconsistency in the master index is reported as an error and no
/// partial index is produced.
///
/// ```no_run
/// fn list_sections() -> sh3_arc::error::Result<()> {
///     let mft = sh3_arc::MasterIndex::open("data/arc.arc")?;
///
///     for section in mft.sections() {
///         println!("{}: {} files", section.name, section.files.len());
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MasterIndex {
    header: ArcHeader,
    descriptor: ArcDescriptor,
    sections: Vec<Section>,
}

impl MasterIndex {
    /// Open and load a master index file
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn open(path: impl AsRef<Path>) -> Result<MasterIndex> {
        let stream = CompressedStream::open(path.as_ref()).map_err(|source| {
            Error::MasterIndexMissing {
                path: path.as_ref().to_owned(),
                source,
            }
        })?;
        Self::load(stream)
    }

    /// Load a master index from a reader producing the gzip compressed index
    pub fn from_reader<R: Read>(reader: R) -> Result<MasterIndex> {
        Self::load(CompressedStream::new(reader))
    }

    fn load<R: Read>(mut stream: CompressedStream<R>) -> Result<MasterIndex> {
        let header: ArcHeader = stream.read_object().map_err(Error::HeaderRead)?;
        if header.magic != ARC_MAGIC {
            return Err(Error::InvalidMarker {
                found: header.magic,
            });
        }

        let descriptor: ArcDescriptor = stream.read_object().map_err(Error::DescriptorRead)?;
        debug!(sections = descriptor.section_count, "reading sections");

        let sections = (0..descriptor.section_count)
            .map(|_| Self::read_section(&mut stream))
            .collect::<Result<Vec<_>>>()?;

        Ok(MasterIndex {
            header,
            descriptor,
            sections,
        })
    }

    fn read_section<R: Read>(stream: &mut CompressedStream<R>) -> Result<Section> {
        let header: SectionHeader = stream.read_object().map_err(Error::SectionRead)?;

        let name_len = (header.record_size as usize)
            .checked_sub(SectionHeader::SIZE)
            .ok_or(Error::SectionRecordTooSmall {
                record_size: header.record_size,
                header_size: SectionHeader::SIZE,
            })?;
        let raw = stream.read_string(name_len).map_err(Error::SectionRead)?;
        let name = trim_name(&raw).ok_or_else(|| Error::SectionNameUnterminated {
            name: String::from_utf8_lossy(&raw).into_owned(),
        })?;

        debug!(section = %name, files = header.file_count, "reading section");

        let mut entries = Vec::new();
        let mut files = FileTable::default();
        for _ in 0..header.file_count {
            let entry = Self::read_file_entry(stream, &name)?;
            files.insert(entry.name.clone(), entry.index);
            entries.push(entry);
        }

        Ok(Section {
            name,
            header,
            entries,
            files,
        })
    }

    fn read_file_entry<R: Read>(
        stream: &mut CompressedStream<R>,
        section: &str,
    ) -> Result<FileEntry> {
        let read_error = |source| Error::FileEntryRead {
            section: section.to_owned(),
            source,
        };

        let header: FileEntryHeader = stream.read_object().map_err(read_error)?;

        let name_len = (header.entry_size as usize)
            .checked_sub(FileEntryHeader::SIZE)
            .ok_or_else(|| Error::FileEntryTooSmall {
                section: section.to_owned(),
                entry_size: header.entry_size,
                header_size: FileEntryHeader::SIZE,
            })?;
        let raw = stream.read_string(name_len).map_err(read_error)?;
        let name = trim_name(&raw).ok_or_else(|| Error::FileNameUnterminated {
            section: section.to_owned(),
            name: String::from_utf8_lossy(&raw).into_owned(),
        })?;

        Ok(FileEntry {
            index: header.arc_index,
            name,
        })
    }

    /// The master index header
    pub fn header(&self) -> &ArcHeader {
        &self.header
    }

    /// The archive descriptor following the header
    pub fn descriptor(&self) -> &ArcDescriptor {
        &self.descriptor
    }

    /// All sections in the order they are listed
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Find a section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name.as_ref() == name)
    }

    /// Unwrap and return the sections
    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}

/// Strip the NUL padding of a name, or `None` if the last byte is not a NUL terminator.
///
/// A name that is not valid UTF-8 is escaped with [`slice::escape_ascii`] so distinct byte
/// strings stay distinct.
fn trim_name(raw: &[u8]) -> Option<Box<str>> {
    if raw.last() != Some(&b'\0') {
        return None;
    }
    let end = raw.iter().rposition(|&c| c != b'\0').map_or(0, |i| i + 1);
    let name = &raw[..end];
    Some(match std::str::from_utf8(name) {
        Ok(name) => name.into(),
        Err(_) => name.escape_ascii().to_string().into(),
    })
}
