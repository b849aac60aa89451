//! Label mapping: position `i` names output index `i`.

use std::path::Path;

use anyhow::{bail, Context};

#[derive(Debug, Clone, PartialEq)]
pub struct Labels(Vec<String>);

impl Labels {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    /// Read a JSON array of class names.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read labels file {}", path.display()))?;
        let labels = Self::from_json(&raw)
            .with_context(|| format!("Invalid labels file {}", path.display()))?;
        Ok(labels)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let names: Vec<String> = serde_json::from_str(raw)
            .context("Labels must be a JSON array of strings")?;
        if names.is_empty() {
            bail!("Labels list is empty");
        }
        Ok(Self::new(names))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_in_order() {
        let labels = Labels::from_json(r#"["glioma", "meningioma", "notumor", "pituitary"]"#).unwrap();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels.get(0), Some("glioma"));
        assert_eq!(labels.get(3), Some("pituitary"));
        assert_eq!(labels.get(4), None);
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(Labels::from_json(r#"{"0": "glioma"}"#).is_err());
        assert!(Labels::from_json(r#"[1, 2, 3]"#).is_err());
        assert!(Labels::from_json("not json").is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(Labels::from_json("[]").is_err());
    }
}
