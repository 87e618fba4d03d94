// PDF → Word Converter
// Extracts the text flow of a PDF and writes it as a plain .docx, one Word paragraph per text paragraph.

use docx_rs::{Docx, Paragraph, Run};
use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to extract text from PDF: {0}")]
    Extract(String),
    #[error("failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub paragraphs: usize,
    pub chars: usize,
}

/// Convert `pdf_path` into a Word document at `docx_path`
pub fn convert_pdf_to_docx(pdf_path: &Path, docx_path: &Path) -> Result<ConversionSummary, ConvertError> {
    let bytes = fs::read(pdf_path).map_err(|source| ConvertError::Read {
        path: pdf_path.to_path_buf(),
        source,
    })?;

    let text = pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| ConvertError::Extract(e.to_string()))?;
    let paragraphs = text_paragraphs(&text);
    debug!(bytes = bytes.len(), paragraphs = paragraphs.len(), "[CONVERT] Extracted text");

    let write_err = |message: String| ConvertError::Write {
        path: docx_path.to_path_buf(),
        message,
    };
    let file = File::create(docx_path).map_err(|e| write_err(e.to_string()))?;
    write_docx(&paragraphs, file).map_err(write_err)?;

    let summary = ConversionSummary {
        paragraphs: paragraphs.len(),
        chars: paragraphs.iter().map(|p| p.chars().count()).sum(),
    };
    info!(
        input = %pdf_path.display(),
        output = %docx_path.display(),
        paragraphs = summary.paragraphs,
        "[CONVERT] Done"
    );
    Ok(summary)
}

/// Split extracted text on blank lines; lines inside a paragraph are joined with spaces
pub fn text_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

pub fn build_docx(paragraphs: &[String]) -> Docx {
    paragraphs.iter().fold(Docx::new(), |doc, text| {
        doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
    })
}

/// Pack the document into any seekable writer
pub fn write_docx<W: Write + Seek>(paragraphs: &[String], writer: W) -> Result<(), String> {
    build_docx(paragraphs)
        .build()
        .pack(writer)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{read_docx, DocumentChild};
    use std::io::Cursor;

    #[test]
    fn test_text_paragraphs() {
        let text = "First line\nsecond line\n\n\n  Next paragraph  \n\n";
        assert_eq!(
            text_paragraphs(text),
            vec!["First line second line".to_string(), "Next paragraph".to_string()]
        );
        assert!(text_paragraphs("\n \n").is_empty());
    }

    #[test]
    fn test_write_docx_produces_zip() {
        let paragraphs = vec!["Hello world".to_string(), "Second paragraph".to_string()];
        let mut buf = Cursor::new(Vec::new());
        write_docx(&paragraphs, &mut buf).unwrap();

        let bytes = buf.into_inner();
        assert!(bytes.starts_with(b"PK"));

        let doc = read_docx(&bytes).unwrap();
        let count = doc
            .document
            .children
            .iter()
            .filter(|c| matches!(c, DocumentChild::Paragraph(_)))
            .count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_missing_pdf_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_pdf_to_docx(&dir.path().join("missing.pdf"), &dir.path().join("out.docx"))
            .unwrap_err();
        let io_detail = match &err {
            ConvertError::Read { source, .. } => source.to_string(),
            other => panic!("expected read error, got {other:?}"),
        };

        let chained = format!("{:#}", anyhow::Error::from(err));
        assert!(chained.starts_with("failed to read "));
        assert_eq!(chained.matches(&io_detail).count(), 1, "{chained}");
    }

    #[test]
    fn test_invalid_pdf_is_extract_error() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("bad.pdf");
        fs::write(&pdf, b"not a pdf at all").unwrap();
        let err = convert_pdf_to_docx(&pdf, &dir.path().join("out.docx")).unwrap_err();
        assert!(matches!(err, ConvertError::Extract(_)));
    }
}
