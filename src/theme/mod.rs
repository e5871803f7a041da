//! The live theme document: `blocks[]`, each holding `segments[]`.

mod path;

pub use path::{PathSegment, PropertyPath};

use anyhow::{Context, Result, bail, ensure};
use serde_json::{Map, Value};

/// Owns an oh-my-posh theme and applies edits to its segments.
///
/// Keys the editor does not know about are kept untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    raw: Map<String, Value>,
}

impl Theme {
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut raw) = value else {
            bail!("theme must be a JSON object");
        };
        match raw.get("blocks") {
            None | Some(Value::Null) => {
                raw.insert("blocks".into(), Value::Array(Vec::new()));
            }
            Some(Value::Array(_)) => {}
            Some(_) => bail!("theme 'blocks' must be an array"),
        }
        Ok(Self { raw })
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.raw.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.raw)
    }

    pub fn blocks(&self) -> &[Value] {
        self.raw
            .get("blocks")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn segments(&self, block: usize) -> &[Value] {
        self.blocks()
            .get(block)
            .and_then(|b| b.get("segments"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn segment(&self, block: usize, index: usize) -> Option<&Value> {
        self.segments(block).get(index)
    }

    pub fn segment_mut(&mut self, block: usize, index: usize) -> Option<&mut Value> {
        self.segments_mut(block).ok()?.get_mut(index)
    }

    /// Appends `segment` to `block` and returns its index.
    pub fn push_segment(&mut self, block: usize, segment: Value) -> Result<usize> {
        ensure!(segment.is_object(), "segment must be a JSON object");
        let segments = self.segments_mut(block)?;
        segments.push(segment);
        Ok(segments.len() - 1)
    }

    pub fn remove_segment(&mut self, block: usize, index: usize) -> Result<Value> {
        let segments = self.segments_mut(block)?;
        ensure!(
            index < segments.len(),
            "segment {index} out of bounds in block {block}"
        );
        Ok(segments.remove(index))
    }

    /// Moves a segment within its block, shifting the ones in between.
    pub fn move_segment(&mut self, block: usize, from: usize, to: usize) -> Result<()> {
        let segments = self.segments_mut(block)?;
        let len = segments.len();
        ensure!(
            from < len && to < len,
            "cannot move segment {from} to {to} in block {block} of {len}"
        );
        let segment = segments.remove(from);
        segments.insert(to, segment);
        Ok(())
    }

    /// Merges one edited value into a segment, e.g. `properties.branch_icon`.
    pub fn patch_segment(
        &mut self,
        block: usize,
        index: usize,
        path: &str,
        value: Value,
    ) -> Result<()> {
        let path = PropertyPath::parse(path)?;
        let segment = self
            .segment_mut(block, index)
            .with_context(|| format!("no segment {index} in block {block}"))?;
        path.set(segment, value)
    }

    fn segments_mut(&mut self, block: usize) -> Result<&mut Vec<Value>> {
        let block_value = self
            .raw
            .get_mut("blocks")
            .and_then(Value::as_array_mut)
            .and_then(|blocks| blocks.get_mut(block))
            .with_context(|| format!("no block {block} in theme"))?;
        let Value::Object(block_map) = block_value else {
            bail!("block {block} is not an object");
        };
        let segments = block_map
            .entry("segments")
            .or_insert_with(|| Value::Array(Vec::new()));
        if segments.is_null() {
            *segments = Value::Array(Vec::new());
        }
        segments
            .as_array_mut()
            .with_context(|| format!("block {block} 'segments' is not an array"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SCHEMA_URL: &str =
        "https://raw.githubusercontent.com/JanDeDobbeleer/oh-my-posh/main/themes/schema.json";

    fn theme() -> Theme {
        Theme::from_value(json!({
            "$schema": SCHEMA_URL,
            "version": 3,
            "blocks": [
                {
                    "type": "prompt",
                    "alignment": "left",
                    "segments": [
                        {"type": "path", "style": "powerline"},
                        {"type": "git", "style": "plain", "properties": {"fetch_status": true}}
                    ]
                },
                {"type": "rprompt"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn rejects_non_object_themes() {
        assert!(Theme::from_value(json!([])).is_err());
        assert!(Theme::from_value(json!({"blocks": {}})).is_err());
        assert!(Theme::from_value(json!({})).unwrap().blocks().is_empty());
    }

    #[test]
    fn patches_segment_properties() {
        let mut theme = theme();
        theme
            .patch_segment(0, 1, "properties.branch_icon", json!(" "))
            .unwrap();
        theme.patch_segment(0, 0, "style", json!("diamond")).unwrap();
        let git = theme.segment(0, 1).unwrap();
        assert_eq!(git["properties"], json!({"fetch_status": true, "branch_icon": " "}));
        assert_eq!(theme.segment(0, 0).unwrap()["style"], json!("diamond"));
        assert_eq!(theme.as_value()["version"], json!(3));

        assert!(theme.patch_segment(0, 5, "style", json!("plain")).is_err());
        assert!(theme.patch_segment(7, 0, "style", json!("plain")).is_err());
    }

    #[test]
    fn reorders_segments() {
        let mut theme = theme();
        theme.move_segment(0, 1, 0).unwrap();
        let types: Vec<_> = theme.segments(0).iter().map(|s| s["type"].clone()).collect();
        assert_eq!(types, vec![json!("git"), json!("path")]);
        assert!(theme.move_segment(0, 0, 2).is_err());
    }

    #[test]
    fn pushes_into_blocks_without_segments() {
        let mut theme = theme();
        let index = theme
            .push_segment(1, json!({"type": "time", "properties": {}}))
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(theme.segments(1).len(), 1);
        assert!(theme.push_segment(1, json!("time")).is_err());

        let removed = theme.remove_segment(1, 0).unwrap();
        assert_eq!(removed["type"], json!("time"));
        assert!(theme.remove_segment(1, 0).is_err());
    }
}
