use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use std::fmt::Write;
use std::path::{Component, PathBuf};
use thiserror::Error;

/// Substituted with the file's name. May be written with or without a leading `%`.
pub const FILENAME_PLACEHOLDER: &str = "original_filename";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// strftime-style text, formatted against the capture time.
    Date(String),
    FileName,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("path template is empty")]
    Empty,
    #[error("unsupported date directive in path template: {0:?}")]
    InvalidDirective(String),
    #[error("date directive needs a time zone, which capture times do not carry: {0:?}")]
    Render(String),
    #[error("rendered path must be a relative path inside the destination: {}", .0.display())]
    OutsideDestination(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    parts: Vec<TemplatePart>,
}

impl PathTemplate {
    pub fn parse(input: &str) -> Result<Self, TemplateError> {
        if input.is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut parts = Vec::new();
        let mut segment = String::new();
        let mut rest = input;

        while let Some(ch) = rest.chars().next() {
            if ch == '%' {
                if let Some(after) = rest.strip_prefix("%%") {
                    segment.push_str("%%");
                    rest = after;
                    continue;
                }
                if let Some(after) = rest[1..].strip_prefix(FILENAME_PLACEHOLDER) {
                    flush_segment(&mut segment, &mut parts)?;
                    parts.push(TemplatePart::FileName);
                    rest = after;
                    continue;
                }
            } else if let Some(after) = rest.strip_prefix(FILENAME_PLACEHOLDER) {
                flush_segment(&mut segment, &mut parts)?;
                parts.push(TemplatePart::FileName);
                rest = after;
                continue;
            }
            segment.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
        flush_segment(&mut segment, &mut parts)?;

        Ok(Self {
            source: input.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// Renders the destination path, relative to the destination root.
    pub fn render(&self, time: &NaiveDateTime, file_name: &str) -> Result<PathBuf, TemplateError> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                TemplatePart::Date(fmt) => write!(out, "{}", time.format(fmt))
                    .map_err(|_| TemplateError::Render(fmt.clone()))?,
                TemplatePart::FileName => out.push_str(file_name),
            }
        }

        let path = PathBuf::from(out);
        let stays_inside = !path.as_os_str().is_empty()
            && path
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !stays_inside {
            return Err(TemplateError::OutsideDestination(path));
        }
        Ok(path)
    }
}

fn flush_segment(segment: &mut String, parts: &mut Vec<TemplatePart>) -> Result<(), TemplateError> {
    if segment.is_empty() {
        return Ok(());
    }
    let fmt = std::mem::take(segment);
    if StrftimeItems::new(&fmt).any(|item| matches!(item, Item::Error)) {
        return Err(TemplateError::InvalidDirective(fmt));
    }
    // Directives such as %z only fail once formatted.
    let mut sample = String::new();
    if write!(sample, "{}", NaiveDateTime::default().format(&fmt)).is_err() {
        return Err(TemplateError::Render(fmt));
    }
    parts.push(TemplatePart::Date(fmt));
    Ok(())
}
