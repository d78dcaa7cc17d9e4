use crate::metadata::ExifTags;
use anyhow::{Context, Result};
use exif::{In, Reader, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub fn read_exif_tags(path: &Path) -> Result<ExifTags> {
    let file = File::open(path)
        .with_context(|| format!("could not open file for EXIF reading: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    let exif = match Reader::new().read_from_container(&mut buf) {
        Ok(exif) => exif,
        // A readable image that simply carries no EXIF block.
        Err(exif::Error::NotFound(_)) => {
            debug!(path = %path.display(), "no EXIF block");
            return Ok(ExifTags::new());
        }
        Err(err) => {
            return Err(anyhow::Error::new(err)
                .context(format!("could not parse EXIF data: {}", path.display())))
        }
    };

    let mut tags = ExifTags::new();
    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        let name = field.tag.to_string();
        let value = match &field.value {
            Value::Ascii(parts) => parts
                .first()
                .map(|bytes| normalize_ascii(bytes))
                .unwrap_or_default(),
            _ => field.display_value().with_unit(&exif).to_string(),
        };
        tags.entry(name).or_insert(value);
    }

    debug!(path = %path.display(), tags = tags.len(), "read EXIF tags");
    Ok(tags)
}

fn normalize_ascii(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}
