#![allow(dead_code)]

use std::io::{self, Cursor, Read, Write};
use typegate::{FileType, TypeDetector};
use uuid::Uuid;

pub const WORD_CLSID: &str = "00020906-0000-0000-c000-000000000046";

/// Minimal files that the `infer` matchers recognise.
pub fn fixture(name: &str) -> Vec<u8> {
    let mut bytes = match name {
        "png" => vec![
            0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H',
            b'D', b'R',
        ],
        "jpg" => vec![
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01,
        ],
        "gif" => b"GIF89a".to_vec(),
        "bmp" => {
            let mut header = b"BM".to_vec();
            header.extend_from_slice(&[0x46, 0, 0, 0, 0, 0, 0, 0, 0x36, 0, 0, 0, 0x28, 0, 0, 0]);
            header
        }
        "zip" => zip_archive(&[("hello.txt", b"hello")]),
        "docx" => zip_archive(&[
            ("[Content_Types].xml", b"<Types/>"),
            ("_rels/.rels", b"<Relationships/>"),
            ("word/document.xml", b"<w:document/>"),
        ]),
        "xlsx" => zip_archive(&[
            ("[Content_Types].xml", b"<Types/>"),
            ("_rels/.rels", b"<Relationships/>"),
            ("xl/workbook.xml", b"<workbook/>"),
        ]),
        "doc" => compound_file(WORD_CLSID, "WordDocument", 20_000),
        "7z" => vec![0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, 0x00, 0x04],
        "gz" => vec![0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03],
        "bz2" => b"BZh91AY&SY".to_vec(),
        "rar" => vec![b'R', b'a', b'r', b'!', 0x1A, 0x07, 0x00, 0xCF],
        "pdf" => b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n".to_vec(),
        "exe" => portable_executable(),
        "acme" => b"..ACME container".to_vec(),
        "txt" => b"plain text notes, nothing to see\n".to_vec(),
        other => panic!("no fixture for {}", other),
    };

    // Pad so every matcher has enough bytes to look at.
    if bytes.len() < 512 {
        bytes.resize(512, 0);
    }
    bytes
}

pub fn fixtures(names: &[&str]) -> Vec<Cursor<Vec<u8>>> {
    names.iter().map(|name| Cursor::new(fixture(name))).collect()
}

/// Stored zip entries in order, as local file headers followed by their data.
fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (name, data) in entries {
        bytes.extend_from_slice(&[b'P', b'K', 0x03, 0x04]);
        bytes.extend_from_slice(&[0x14, 0x00]); // version needed
        bytes.extend_from_slice(&[0x00, 0x00]); // flags
        bytes.extend_from_slice(&[0x00, 0x00]); // stored
        bytes.extend_from_slice(&[0x00; 4]); // time, date
        bytes.extend_from_slice(&[0x00; 4]); // crc
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes()); // compressed size
        bytes.extend_from_slice(&(data.len() as u32).to_le_bytes()); // uncompressed size
        bytes.extend_from_slice(&(name.len() as u16).to_le_bytes());
        bytes.extend_from_slice(&[0x00, 0x00]); // extra length
        bytes.extend_from_slice(name.as_bytes());
        bytes.extend_from_slice(data);
    }
    bytes
}

/// An OLE compound file whose root storage carries `clsid` and holds one
/// stream of `stream_len` bytes.
pub fn compound_file(clsid: &str, stream: &str, stream_len: usize) -> Vec<u8> {
    let mut file = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
    file.set_storage_clsid("/", Uuid::parse_str(clsid).unwrap())
        .unwrap();
    {
        let mut stream = file.create_stream(format!("/{}", stream)).unwrap();
        stream.write_all(&vec![0x42; stream_len]).unwrap();
    }
    file.flush().unwrap();
    file.into_inner().into_inner()
}

/// DOS stub, PE signature, COFF header and the start of a PE32 optional header.
fn portable_executable() -> Vec<u8> {
    let mut bytes = vec![0u8; 512];
    bytes[0] = b'M';
    bytes[1] = b'Z';
    bytes[0x3C..0x40].copy_from_slice(&0x80u32.to_le_bytes());

    let pe = 0x80;
    bytes[pe..pe + 4].copy_from_slice(b"PE\0\0");
    bytes[pe + 4..pe + 6].copy_from_slice(&0x014Cu16.to_le_bytes()); // i386
    bytes[pe + 6..pe + 8].copy_from_slice(&1u16.to_le_bytes()); // sections
    bytes[pe + 20..pe + 22].copy_from_slice(&0xE0u16.to_le_bytes()); // optional header size
    bytes[pe + 22..pe + 24].copy_from_slice(&0x0102u16.to_le_bytes()); // executable, 32-bit

    let optional = pe + 24;
    bytes[optional..optional + 2].copy_from_slice(&0x010Bu16.to_le_bytes()); // PE32
    bytes[optional + 68..optional + 70].copy_from_slice(&3u16.to_le_bytes()); // console

    bytes
}

/// Detector that reads the whole source as the name of its type.
///
/// Lets scenario tests use formats whose real signatures are impractical to
/// build by hand. An empty source is reported as unidentified.
pub struct NamedDetector;

impl TypeDetector for NamedDetector {
    fn detect_type(&self, source: &mut dyn Read) -> io::Result<Option<FileType>> {
        let mut name = String::new();
        source.read_to_string(&mut name)?;
        let name = name.trim();

        Ok((!name.is_empty()).then(|| FileType::new(name)))
    }
}

pub fn named(names: &[&str]) -> Vec<Cursor<Vec<u8>>> {
    names
        .iter()
        .map(|name| Cursor::new(name.as_bytes().to_vec()))
        .collect()
}
