use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use super::DocumentFormat;

/// Parse a theme or schema document in any supported format into a
/// `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Parse `contents` as `preferred`, then as each other compiled-in format.
/// The error names every format tried and keeps the first failure.
pub fn parse_document_with_fallback(contents: &str, preferred: DocumentFormat) -> Result<Value> {
    let primary = match parse_document_str(contents, preferred) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    let available = DocumentFormat::available_formats();
    for candidate in available.iter().copied().filter(|fmt| *fmt != preferred) {
        if let Ok(value) = parse_document_str(contents, candidate) {
            tracing::debug!(format = %candidate, "parsed with fallback format");
            return Ok(value);
        }
    }
    let tried: Vec<String> = available.iter().map(ToString::to_string).collect();
    Err(anyhow!(
        "tried {} (first error: {primary:#})",
        tried.join(", ")
    ))
}

/// Read a document from disk. The extension picks the first format tried;
/// the remaining compiled-in formats are tried when it fails.
pub fn read_document(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read file {}", path.display()))?;
    let preferred = DocumentFormat::from_path(path).unwrap_or_default();
    parse_document_with_fallback(&contents, preferred)
        .with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde_json::json;

    use super::*;

    #[test]
    fn parse_json_documents() {
        let raw = "{\"version\":3,\"blocks\":[]}";
        let parsed = parse_document_str(raw, DocumentFormat::Json).unwrap();
        assert_eq!(parsed["version"], json!(3));
    }

    #[test]
    fn reports_invalid_json() {
        assert!(parse_document_str("{blocks:", DocumentFormat::Json).is_err());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn parse_yaml_documents() {
        let raw = "version: 3\nblocks:\n  - type: prompt\n    alignment: left";
        let parsed = parse_document_str(raw, DocumentFormat::Yaml).unwrap();
        assert_eq!(parsed["blocks"][0]["alignment"], json!("left"));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parse_toml_documents() {
        let raw = "version = 3\n[[blocks]]\ntype = \"prompt\"";
        let parsed = parse_document_str(raw, DocumentFormat::Toml).unwrap();
        assert_eq!(parsed["blocks"][0]["type"], json!("prompt"));
    }

    #[test]
    fn fallback_reports_every_format_tried() {
        let value = parse_document_with_fallback("{\"blocks\": []}", DocumentFormat::Json).unwrap();
        assert_eq!(value, json!({"blocks": []}));

        let err = parse_document_with_fallback("{blocks:", DocumentFormat::Json).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("tried json"));
        assert!(message.contains("failed to parse JSON document"));
    }

    #[test]
    fn reads_documents_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "ompform-input-{}.omp.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::write(&path, "{\"blocks\": []}").unwrap();
        let value = read_document(&path).unwrap();
        assert_eq!(value, json!({"blocks": []}));
        let _ = fs::remove_file(&path);

        assert!(read_document(path.with_extension("missing")).is_err());
    }
}
