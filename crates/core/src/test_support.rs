use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Writes a minimal TIFF carrying a `DateTime` tag, or only a `Make` tag when `datetime` is `None`.
pub fn write_photo(path: &Path, datetime: Option<&str>) {
    write_file(path, &encode_tiff(&photo_tags(datetime)));
}

pub fn write_photo_with_tags(path: &Path, tags: &[(Tag, Value)]) {
    write_file(path, &encode_tiff(tags));
}

/// Same tags as [`write_photo`], wrapped in a JPEG APP1 segment.
pub fn write_jpeg_photo(path: &Path, datetime: Option<&str>) {
    let tiff = encode_tiff(&photo_tags(datetime));
    let segment_len = u16::try_from(2 + 6 + tiff.len()).expect("APP1 segment fits");

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&segment_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    write_file(path, &jpeg);
}

/// A JPEG with only a JFIF APP0 segment and no EXIF block.
pub fn write_jfif_without_exif(path: &Path) {
    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];
    jpeg.extend_from_slice(b"JFIF\0");
    jpeg.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    write_file(path, &jpeg);
}

fn photo_tags(datetime: Option<&str>) -> Vec<(Tag, Value)> {
    match datetime {
        Some(raw) => vec![(Tag::DateTime, Value::Ascii(vec![raw.as_bytes().to_vec()]))],
        None => vec![(Tag::Make, Value::Ascii(vec![b"FUJIFILM".to_vec()]))],
    }
}

fn encode_tiff(tags: &[(Tag, Value)]) -> Vec<u8> {
    let fields: Vec<Field> = tags
        .iter()
        .map(|(tag, value)| Field {
            tag: *tag,
            ifd_num: In::PRIMARY,
            value: value.clone(),
        })
        .collect();

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).expect("encode TIFF fixture");
    buf.into_inner()
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create fixture dir");
    }
    fs::write(path, bytes).expect("write fixture");
}
