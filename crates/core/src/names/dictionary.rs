use std::collections::HashMap;
use std::path::Path;

use log::info;

use crate::errors::{Error, Result};

/// Static ticker → localized name map loaded from a JSON object file.
#[derive(Clone, Debug, Default)]
pub struct NameDictionary {
    names: HashMap<String, String>,
}

impl NameDictionary {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        let names: HashMap<String, String> = serde_json::from_str(&raw)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        let dictionary = Self::from_map(names);
        info!(
            "Loaded {} localized names from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    pub fn from_map(names: HashMap<String, String>) -> Self {
        let names = names
            .into_iter()
            .map(|(ticker, name)| (ticker.trim().to_uppercase(), name.trim().to_string()))
            .filter(|(ticker, name)| !ticker.is_empty() && !name.is_empty())
            .collect();
        Self { names }
    }

    pub fn get(&self, ticker: &str) -> Option<&str> {
        self.names.get(ticker).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .names
            .iter()
            .map(|(t, n)| (t.clone(), n.clone()))
            .collect();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_path_normalizes_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"aapl": "苹果公司", "MSFT": "微软", "": "x", "BAD": " "}}"#).unwrap();

        let dict = NameDictionary::from_path(file.path()).unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("AAPL"), Some("苹果公司"));
        assert_eq!(dict.get("BAD"), None);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = NameDictionary::from_path("/nonexistent/names.json").unwrap_err();
        assert!(matches!(err, Error::ConfigIO(_)));
    }
}
