use base64::Engine;

/// `%PDF`
pub const PDF_MAGIC: &[u8; 4] = b"%PDF";

const DATA_URL_PREFIX: &str = "data:application/pdf;base64,";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Decodes a base64 PDF payload as sent by editors.
///
/// Accepts an optional `data:application/pdf;base64,` prefix and ignores
/// embedded whitespace (line-wrapped base64). Payloads whose encoded length
/// cannot possibly fit under `max_size` are rejected before decoding.
pub fn decode_pdf_payload(payload: &str, max_size: usize) -> Result<Vec<u8>, ValidationError> {
    let trimmed = payload.trim();
    let body = trimmed.strip_prefix(DATA_URL_PREFIX).unwrap_or(trimmed);
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if compact.len() / 4 * 3 > max_size + 3 {
        return Err(too_large(max_size));
    }

    base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ValidationError::new("INVALID_ENCODING", format!("PDF payload is not valid base64: {}", e)))
}

/// Checks that `data` looks like a PDF and fits under `max_size`.
pub fn validate_pdf(data: &[u8], max_size: usize) -> Result<(), ValidationError> {
    if data.is_empty() {
        return Err(ValidationError::new("EMPTY_FILE", "The PDF file is empty"));
    }

    if data.len() > max_size {
        return Err(too_large(max_size));
    }

    if !data.starts_with(PDF_MAGIC) {
        return Err(ValidationError::new(
            "INVALID_PDF",
            "The uploaded file is not a valid PDF document",
        ));
    }

    Ok(())
}

/// Page count of a parseable PDF, `None` when lopdf cannot read it.
pub fn inspect_page_count(data: &[u8]) -> Option<i32> {
    match lopdf::Document::load_mem(data) {
        Ok(doc) => i32::try_from(doc.get_pages().len()).ok(),
        Err(e) => {
            tracing::debug!("Could not parse PDF for page count: {}", e);
            None
        }
    }
}

fn too_large(max_size: usize) -> ValidationError {
    ValidationError::new(
        "FILE_TOO_LARGE",
        format!(
            "The PDF file exceeds the maximum allowed size of {}",
            super::format::format_file_size(max_size as u64)
        ),
    )
}
