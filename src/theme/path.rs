use std::fmt;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A property address such as `properties.branch_icon` or
/// `properties.templates[1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for part in raw.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(open) => part.split_at(open),
                None => (part, ""),
            };
            if key.is_empty() && (rest.is_empty() || segments.is_empty()) {
                bail!("empty key in property path '{raw}'");
            }
            if !key.is_empty() {
                segments.push(PathSegment::Key(key.to_string()));
            }
            while !rest.is_empty() {
                let inner = rest
                    .strip_prefix('[')
                    .and_then(|tail| tail.split_once(']'))
                    .with_context(|| format!("unbalanced brackets in property path '{raw}'"))?;
                let index = inner
                    .0
                    .parse::<usize>()
                    .with_context(|| format!("invalid index '{}' in path '{raw}'", inner.0))?;
                segments.push(PathSegment::Index(index));
                rest = inner.1;
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn get<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| match segment {
                PathSegment::Key(key) => current.get(key),
                PathSegment::Index(index) => current.get(*index),
            })
    }

    /// Writes `value` at this path, creating intermediate objects as needed.
    /// An index may replace an element or append right after the last one.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<()> {
        let Some((last, parents)) = self.segments.split_last() else {
            *root = value;
            return Ok(());
        };

        let mut current = root;
        for (position, segment) in parents.iter().enumerate() {
            let next_is_index = matches!(self.segments[position + 1], PathSegment::Index(_));
            current = descend(current, segment, next_is_index)
                .with_context(|| format!("cannot patch '{self}'"))?;
        }
        assign(current, last, value).with_context(|| format!("cannot patch '{self}'"))
    }
}

fn descend<'v>(
    current: &'v mut Value,
    segment: &PathSegment,
    index_next: bool,
) -> Result<&'v mut Value> {
    let empty = || {
        if index_next {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        }
    };
    match segment {
        PathSegment::Key(key) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            let Value::Object(map) = current else {
                bail!("'{key}' is not inside an object");
            };
            let slot = map.entry(key.clone()).or_insert_with(empty);
            if slot.is_null() {
                *slot = empty();
            }
            Ok(slot)
        }
        PathSegment::Index(index) => {
            let Value::Array(items) = current else {
                bail!("index {index} is not inside an array");
            };
            if *index == items.len() {
                items.push(empty());
            }
            let len = items.len();
            items
                .get_mut(*index)
                .with_context(|| format!("index {index} out of bounds (len {len})"))
        }
    }
}

fn assign(current: &mut Value, segment: &PathSegment, value: Value) -> Result<()> {
    match segment {
        PathSegment::Key(key) => {
            if current.is_null() {
                *current = Value::Object(Map::new());
            }
            let Value::Object(map) = current else {
                bail!("'{key}' is not inside an object");
            };
            map.insert(key.clone(), value);
            Ok(())
        }
        PathSegment::Index(index) => {
            let Value::Array(items) = current else {
                bail!("index {index} is not inside an array");
            };
            match index.cmp(&items.len()) {
                std::cmp::Ordering::Less => items[*index] = value,
                std::cmp::Ordering::Equal => items.push(value),
                std::cmp::Ordering::Greater => {
                    bail!("index {index} out of bounds (len {})", items.len())
                }
            }
            Ok(())
        }
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_keys_and_indices() {
        let path = PropertyPath::parse("properties.templates[1][0]").unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Key("properties".into()),
                PathSegment::Key("templates".into()),
                PathSegment::Index(1),
                PathSegment::Index(0),
            ]
        );
        assert_eq!(path.to_string(), "properties.templates[1][0]");
    }

    #[test]
    fn rejects_malformed_paths() {
        for raw in ["", "a..b", "a[", "a[x]", "[0]", "a[1"] {
            assert!(PropertyPath::parse(raw).is_err(), "{raw} should fail");
        }
    }

    #[test]
    fn sets_nested_values_creating_objects() {
        let mut segment = json!({"type": "git"});
        PropertyPath::parse("properties.branch_icon")
            .unwrap()
            .set(&mut segment, json!("\u{e0a0} "))
            .unwrap();
        assert_eq!(segment["properties"]["branch_icon"], json!("\u{e0a0} "));

        PropertyPath::parse("properties.templates[0]")
            .unwrap()
            .set(&mut segment, json!("{{ .HEAD }}"))
            .unwrap();
        assert_eq!(segment["properties"]["templates"], json!(["{{ .HEAD }}"]));
    }

    #[test]
    fn replaces_and_appends_array_items() {
        let mut segment = json!({"tips": ["a", "b"]});
        let first = PropertyPath::parse("tips[0]").unwrap();
        first.set(&mut segment, json!("z")).unwrap();
        PropertyPath::parse("tips[2]").unwrap().set(&mut segment, json!("c")).unwrap();
        assert_eq!(segment["tips"], json!(["z", "b", "c"]));
        assert_eq!(first.get(&segment), Some(&json!("z")));

        let err = PropertyPath::parse("tips[9]")
            .unwrap()
            .set(&mut segment, json!("x"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("out of bounds"));
    }

    #[test]
    fn refuses_to_overwrite_scalars() {
        let mut segment = json!({"style": "plain"});
        assert!(
            PropertyPath::parse("style.inner")
                .unwrap()
                .set(&mut segment, json!(1))
                .is_err()
        );
        assert_eq!(segment["style"], json!("plain"));
    }
}
