use std::{fmt, path::Path};

/// Serialization formats oh-my-posh themes and schemas are stored in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentFormat {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl DocumentFormat {
    /// Formats compiled into this build, JSON first.
    pub fn available_formats() -> Vec<DocumentFormat> {
        #[allow(unused_mut)]
        let mut formats = vec![DocumentFormat::Json];
        #[cfg(feature = "yaml")]
        formats.push(DocumentFormat::Yaml);
        #[cfg(feature = "toml")]
        formats.push(DocumentFormat::Toml);
        formats
    }

    /// Guesses the format from a file extension (`.omp.json`, `.yml`, ...).
    pub fn from_path(path: impl AsRef<Path>) -> Option<DocumentFormat> {
        let ext = path.as_ref().extension()?.to_string_lossy().to_ascii_lowercase();
        match ext.as_str() {
            "json" | "jsonc" => Some(DocumentFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            #[cfg(feature = "toml")]
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}
