use std::env;

/// Hard upper bound for stored PDFs: 50 MB
pub const MAX_PDF_SIZE: usize = 50 * 1024 * 1024;

/// Runtime configuration for the flipbook service
#[derive(Debug, Clone)]
pub struct FlipbookConfig {
    /// Maximum PDF size in bytes (default and ceiling: 50 MB)
    pub max_pdf_size: usize,

    /// `Cache-Control` max-age for delivered PDFs, in seconds (default: 3600)
    pub cache_max_age: u64,

    /// Bearer key for the editor API. `None` disables every editor route.
    pub editor_api_key: Option<String>,

    /// Prefix for URLs handed to clients (default: empty, relative URLs)
    pub public_base_url: String,

    /// Where the viewer page loads the page-flip and PDF render assets from
    pub assets_base_url: String,

    /// Allowed CORS Origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for FlipbookConfig {
    fn default() -> Self {
        Self {
            max_pdf_size: MAX_PDF_SIZE,
            cache_max_age: 3600,
            editor_api_key: None,
            public_base_url: String::new(),
            assets_base_url: "/static/flipbook".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8069".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl FlipbookConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_pdf_size: env::var("MAX_PDF_SIZE")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map(|v| v.min(MAX_PDF_SIZE))
                .unwrap_or(default.max_pdf_size),

            cache_max_age: env::var("PDF_CACHE_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.cache_max_age),

            editor_api_key: env::var("EDITOR_API_KEY")
                .ok()
                .filter(|v| !v.trim().is_empty()),

            public_base_url: env::var("PUBLIC_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(default.public_base_url),

            assets_base_url: env::var("ASSETS_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(default.assets_base_url),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Config for local development and tests: fixed editor key, no caching
    pub fn development() -> Self {
        Self {
            cache_max_age: 0,
            editor_api_key: Some("dev-editor-key".to_string()),
            ..Self::default()
        }
    }

    pub fn pdf_url(&self, id: i32) -> String {
        format!("{}/flipbook/pdf/{}", self.public_base_url, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FlipbookConfig::default();
        assert_eq!(config.max_pdf_size, 50 * 1024 * 1024);
        assert_eq!(config.cache_max_age, 3600);
        assert!(config.editor_api_key.is_none());
        assert!(!config.allowed_origins.contains(&"*".to_string()));
    }

    #[test]
    fn test_development_config() {
        let config = FlipbookConfig::development();
        assert_eq!(config.editor_api_key.as_deref(), Some("dev-editor-key"));
        assert_eq!(config.max_pdf_size, MAX_PDF_SIZE);
    }

    #[test]
    fn test_pdf_url() {
        let mut config = FlipbookConfig::default();
        assert_eq!(config.pdf_url(7), "/flipbook/pdf/7");
        config.public_base_url = "https://books.example.com".to_string();
        assert_eq!(config.pdf_url(7), "https://books.example.com/flipbook/pdf/7");
    }

    #[test]
    fn test_from_env_clamps_pdf_size() {
        unsafe { env::set_var("MAX_PDF_SIZE", "999999999999") };
        let config = FlipbookConfig::from_env();
        unsafe { env::remove_var("MAX_PDF_SIZE") };
        assert_eq!(config.max_pdf_size, MAX_PDF_SIZE);
    }
}
