use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// Builds an inline `Content-Disposition` value for a delivered PDF.
///
/// Uses the stored filename when present, otherwise `flipbook_{id}.pdf`.
/// The plain `filename` parameter is an ASCII fallback; the RFC 5987
/// `filename*` parameter carries the original UTF-8 name.
pub fn inline_disposition(filename: Option<&str>, id: i32) -> String {
    let name = match filename.map(str::trim) {
        Some(f) if !f.is_empty() => f.to_string(),
        _ => format!("flipbook_{}.pdf", id),
    };

    let ascii_filename = name
        .chars()
        .filter(|c| c.is_ascii() && !c.is_control() && *c != '"' && *c != '\\' && *c != ';')
        .take(64)
        .collect::<String>();
    let fallback = if ascii_filename.trim().is_empty() {
        format!("flipbook_{}.pdf", id)
    } else {
        ascii_filename
    };

    let encoded = utf8_percent_encode(&name, NON_ALPHANUMERIC).to_string();

    format!(
        "inline; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filename() {
        assert_eq!(
            inline_disposition(None, 12),
            "inline; filename=\"flipbook_12.pdf\"; filename*=UTF-8''flipbook%5F12%2Epdf"
        );
        assert!(inline_disposition(Some("   "), 3).contains("filename=\"flipbook_3.pdf\""));
    }

    #[test]
    fn test_stored_filename() {
        let value = inline_disposition(Some("catalogue.pdf"), 1);
        assert!(value.starts_with("inline; filename=\"catalogue.pdf\""));
    }

    #[test]
    fn test_unicode_and_quotes_are_sanitized() {
        let value = inline_disposition(Some("cat\"álogo;2024.pdf"), 1);
        assert!(value.contains("filename=\"catlogo2024.pdf\""));
        assert!(value.contains("filename*=UTF-8''cat%22%C3%A1logo%3B2024%2Epdf"));
    }

    #[test]
    fn test_non_ascii_only_name_falls_back() {
        let value = inline_disposition(Some("目录"), 5);
        assert!(value.contains("filename=\"flipbook_5.pdf\""));
    }
}
