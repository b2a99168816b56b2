use std::{fs, io::Write, path::Path};

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::{write::GzEncoder, Compression};
use pretty_assertions::assert_eq;
use sh3_arc::{
    error::{Error, Result},
    Archive, ArchiveOptions, FileSource, MasterIndex,
};
use tempfile::TempDir;
use tracing_test::traced_test;

type Files<'a> = &'a [(&'a [u8], u16)];

fn master_index(sections: &[(&[u8], Files)]) -> Vec<u8> {
    let mut out = Vec::new();
    for v in [0x2003_0417, 0, 1, 16, 1, 16, sections.len() as u32, 0] {
        out.write_u32::<LittleEndian>(v).unwrap();
    }
    for (name, files) in sections {
        for v in [2, 16 + name.len() as u32, files.len() as u32, 0] {
            out.write_u32::<LittleEndian>(v).unwrap();
        }
        out.extend_from_slice(name);
        for (file, index) in *files {
            out.write_u32::<LittleEndian>(3).unwrap();
            out.write_u16::<LittleEndian>(8 + file.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(*index).unwrap();
            out.extend_from_slice(file);
        }
    }

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&out).unwrap();
    encoder.finish().unwrap()
}

/// Lay out a section file, `extra` entries point past the end of the file
fn section_file(magic: u32, files: &[&[u8]], extra: &[(u32, u32)]) -> Vec<u8> {
    let count = files.len() + extra.len();
    let data_pointer = 16 + 16 * count as u32;

    let mut out = Vec::new();
    for v in [magic, count as u32, data_pointer, 0] {
        out.write_u32::<LittleEndian>(v).unwrap();
    }

    let mut offset = data_pointer;
    for (id, file) in files.iter().enumerate() {
        let length = file.len() as u32;
        for v in [offset, id as u32, length, length] {
            out.write_u32::<LittleEndian>(v).unwrap();
        }
        offset += length;
    }
    for (id, (offset, length)) in extra.iter().enumerate() {
        for v in [*offset, (files.len() + id) as u32, *length, *length] {
            out.write_u32::<LittleEndian>(v).unwrap();
        }
    }

    for file in files {
        out.extend_from_slice(file);
    }
    out
}

/// pic: three good files and two broken entries, bg: two files, snd: no section file,
/// bad: a section file with the wrong magic
fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();

    let mft = master_index(&[
        (
            b"pic\0\0\0\0\0",
            &[
                (b"data/pic/a.bin\0\0\0", 0),
                (b"data/pic/b.bin\0", 1),
                (b"data/pic/a.bin\0", 1),
                (b"data/pic/broken.bin\0", 2),
                (b"data/pic/gone.bin\0", 9),
            ],
        ),
        (
            b"bg\0\0",
            &[(b"data/bg/c.bin\0\0", 0), (b"data/pic/b.bin\0", 1)],
        ),
        (b"snd\0", &[(b"data/snd/d.bin\0", 0)]),
        (b"bad\0", &[(b"data/bad/e.bin\0", 0)]),
    ]);
    fs::write(dir.path().join("arc.arc"), mft).unwrap();

    let pic = section_file(0x2003_0507, &[b"AAAA", b"hello world"], &[(79, 1000)]);
    assert_eq!(pic.len(), 79);
    fs::write(dir.path().join("pic.arc"), pic).unwrap();
    fs::write(
        dir.path().join("bg.arc"),
        section_file(0x2003_0507, &[b"bg", b"shadowed"], &[]),
    )
    .unwrap();
    fs::write(
        dir.path().join("bad.arc"),
        section_file(0x1234_5678, &[b"never"], &[]),
    )
    .unwrap();

    dir
}

fn open(dir: &Path) -> Result<Archive> {
    Archive::open(ArchiveOptions::builder().data_dir(dir).build())
}

#[traced_test]
#[test]
fn master_index_lists_every_section() -> Result<()> {
    let dir = data_dir();
    let mft = MasterIndex::open(dir.path().join("arc.arc"))?;

    let names = mft
        .sections()
        .iter()
        .map(|s| s.name.as_ref())
        .collect::<Vec<_>>();
    assert_eq!(names, ["pic", "bg", "snd", "bad"]);

    let pic = mft.section("pic").unwrap();
    assert_eq!(pic.entries.len(), 5);
    assert_eq!(pic.files.len(), 4);
    assert_eq!(pic.files.get("data/pic/a.bin"), Some(0));
    assert!(logs_contain("duplicate file name"));

    Ok(())
}

#[traced_test]
#[test]
fn open_archive_with_broken_sections() -> Result<()> {
    let dir = data_dir();
    let archive = open(dir.path())?;

    assert_eq!(archive.sections().len(), 4);
    assert!(archive.section("pic").unwrap().is_open());
    assert!(archive.section("bg").unwrap().is_open());
    assert!(!archive.section("snd").unwrap().is_open());
    assert!(!archive.section("bad").unwrap().is_open());
    assert!(logs_contain("not every section file could be opened"));
    logs_assert(|lines: &[&str]| {
        let failed = lines
            .iter()
            .filter(|line| line.contains("failed to open section file"))
            .count();
        match failed {
            2 => Ok(()),
            n => Err(format!("expected 2 failed sections to be logged, got {n}")),
        }
    });
    assert!(!logs_contain("ERROR"));

    assert_eq!(archive.section("pic").unwrap().len(), 3);
    assert_eq!(archive.section("snd").unwrap().len(), 0);

    Ok(())
}

#[traced_test]
#[test]
fn load_files_by_name() -> Result<()> {
    let dir = data_dir();
    let archive = open(dir.path())?;

    let mut buffer = Vec::new();
    assert_eq!(archive.load_file("data/pic/a.bin", &mut buffer)?, Some(4));
    assert_eq!(buffer, b"AAAA");

    buffer.clear();
    assert_eq!(archive.load_file("data/pic/b.bin", &mut buffer)?, Some(11));
    assert_eq!(buffer, b"hello world");

    buffer.clear();
    assert_eq!(archive.load_file("data/bg/c.bin", &mut buffer)?, Some(2));
    assert_eq!(buffer, b"bg");

    Ok(())
}

#[traced_test]
#[test]
fn missing_files_are_not_errors() -> Result<()> {
    let dir = data_dir();
    let archive = open(dir.path())?;

    let mut buffer = Vec::new();
    assert_eq!(archive.load_file("data/pic/z.bin", &mut buffer)?, None);
    assert_eq!(archive.load_file("data/snd/d.bin", &mut buffer)?, None);
    assert_eq!(archive.load_file("data/bad/e.bin", &mut buffer)?, None);
    assert!(buffer.is_empty());

    Ok(())
}

#[traced_test]
#[test]
fn insert_grows_by_the_shortfall() -> Result<()> {
    let dir = data_dir();
    let archive = open(dir.path())?;
    let pic = archive.section("pic").unwrap();

    let mut buffer = vec![0xFF; 6];
    let mut insert = 4;
    assert_eq!(pic.load_file_at("data/pic/a.bin", &mut buffer, &mut insert)?, Some(4));
    assert_eq!(buffer, b"\xFF\xFF\xFF\xFFAAAA");
    assert_eq!(insert, 8);

    assert_eq!(pic.load_file_at("data/pic/b.bin", &mut buffer, &mut insert)?, Some(11));
    assert_eq!(buffer.len(), 19);
    assert_eq!(&buffer[8..], b"hello world");
    assert_eq!(insert, 19);

    let mut buffer = vec![0x00; 32];
    let mut insert = 0;
    pic.load_index_at(0, &mut buffer, &mut insert)?;
    assert_eq!(buffer.len(), 32);
    assert_eq!(&buffer[..5], b"AAAA\x00");

    Ok(())
}

#[traced_test]
#[test]
fn insert_past_the_end_is_an_error() -> Result<()> {
    let dir = data_dir();
    let archive = open(dir.path())?;
    let pic = archive.section("pic").unwrap();

    let mut buffer = vec![0x00; 2];
    let mut insert = 3;
    let err = pic
        .load_file_at("data/pic/a.bin", &mut buffer, &mut insert)
        .unwrap_err();
    assert!(matches!(err, Error::InsertOutOfRange { insert: 3, len: 2 }));
    assert_eq!(insert, 3);

    Ok(())
}

#[traced_test]
#[test]
fn broken_entries_are_errors() -> Result<()> {
    let dir = data_dir();
    let archive = open(dir.path())?;

    let mut buffer = Vec::new();
    let err = archive
        .load_file("data/pic/broken.bin", &mut buffer)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::EntryExceedsMapping {
            index: 2,
            offset: 79,
            length: 1000,
            mapped: 79
        }
    ));

    let err = archive.load_file("data/pic/gone.bin", &mut buffer).unwrap_err();
    assert!(matches!(err, Error::EntryOutOfRange { index: 9, mapped: 79 }));
    assert!(buffer.is_empty());

    Ok(())
}

#[traced_test]
#[test]
fn reopen_after_the_file_appears() -> Result<()> {
    let dir = data_dir();
    let mut archive = open(dir.path())?;

    fs::write(
        dir.path().join("snd.arc"),
        section_file(0x2003_0507, &[b"snd"], &[]),
    )?;
    let snd = archive.section_mut("snd").unwrap();
    snd.reopen()?;
    assert!(snd.is_open());

    let mut buffer = Vec::new();
    assert_eq!(archive.load_file("data/snd/d.bin", &mut buffer)?, Some(3));
    assert_eq!(buffer, b"snd");

    Ok(())
}

#[test]
fn missing_master_index() {
    let dir = tempfile::tempdir().unwrap();
    let err = open(dir.path()).unwrap_err();
    assert!(matches!(err, Error::MasterIndexMissing { .. }));
}
