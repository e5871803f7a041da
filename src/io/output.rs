use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use super::DocumentFormat;

/// Where an edited theme or a debug dump is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Serialize `value` once and write it to every configured destination.
pub fn emit(value: &Value, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = serialize_value(value, options.format, options.pretty)?;
    for destination in &options.destinations {
        match destination {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{payload}")
                    .and_then(|_| stdout.flush())
                    .context("failed to write to stdout")?;
            }
            OutputDestination::File(path) => fs::write(path, format!("{payload}\n"))
                .with_context(|| format!("failed to write to file {}", path.display()))?,
        }
    }
    Ok(())
}

pub fn serialize_value(value: &Value, format: DocumentFormat, pretty: bool) -> Result<String> {
    match format {
        DocumentFormat::Json if pretty => {
            serde_json::to_string_pretty(value).context("failed to serialize JSON")
        }
        DocumentFormat::Json => serde_json::to_string(value).context("failed to serialize JSON"),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value).context("failed to serialize YAML"),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml if pretty => {
            toml::to_string_pretty(value).context("failed to serialize TOML")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::to_string(value).context("failed to serialize TOML"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde_json::json;

    use super::*;

    #[test]
    fn no_destinations_is_a_noop() {
        let options = OutputOptions::default().with_destinations(Vec::new());
        emit(&json!({"blocks": []}), &options).unwrap();
    }

    #[test]
    fn compact_json() {
        let payload = serialize_value(&json!({"a": [1, 2]}), DocumentFormat::Json, false).unwrap();
        assert_eq!(payload, "{\"a\":[1,2]}");
    }

    #[test]
    fn writes_to_file_destination() {
        let path = std::env::temp_dir().join(format!(
            "ompform-output-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let options = OutputOptions::default()
            .with_destinations(vec![OutputDestination::file(&path)])
            .with_pretty(false);
        emit(&json!({"version": 3}), &options).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{\"version\":3}\n");
        let _ = fs::remove_file(path);
    }
}
