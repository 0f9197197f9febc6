use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;

use crate::models::{Card, RawEntry};

/// Where round-start card data comes from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Raw, unvalidated entries. Validation happens when a round is built.
    async fn load(&self) -> Result<Vec<RawEntry>>;
}

/// JSON card file, re-read at every round start so edits apply to the next round
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn load(&self) -> Result<Vec<RawEntry>> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read card catalog {}", self.path.display()))?;
        let values: Vec<serde_json::Value> = serde_json::from_str(&content)
            .with_context(|| format!("Card catalog {} is not valid JSON", self.path.display()))?;

        // Entries that are not even objects are dropped here; the rest are
        // validated one by one when a round is built
        let entries: Vec<RawEntry> = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("Skipping malformed catalog entry: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!(
            "Loaded {} catalog entries from {}",
            entries.len(),
            self.path.display()
        );

        Ok(entries)
    }
}

/// Fixed in-memory catalog
#[cfg(test)]
pub struct StaticCatalog {
    entries: Vec<RawEntry>,
}

#[cfg(test)]
impl StaticCatalog {
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self { entries }
    }

    /// Create an empty catalog (for testing)
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load(&self) -> Result<Vec<RawEntry>> {
        Ok(self.entries.clone())
    }
}

/// Number of entries that survive validation
pub fn playable_count(entries: &[RawEntry]) -> usize {
    entries.iter().filter_map(Card::from_raw).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.json", name, uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_file_catalog_loads_entries() {
        let path = temp_file(
            "cards",
            r#"[{"word":"Beach","taboo":["sand","sea"]},{"word":"","taboo":["x"]}]"#,
        );
        let entries = FileCatalog::new(&path).load().await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(entries.len(), 2);
        assert_eq!(playable_count(&entries), 1);
    }

    #[tokio::test]
    async fn test_file_catalog_keeps_valid_cards_beside_malformed_ones() {
        let path = temp_file(
            "mixed",
            r#"[
                {"word":"Beach","taboo":["sand"]},
                {"word":null,"taboo":["x"]},
                {"word":"Cat","taboo":["meow",7]},
                "stray",
                42
            ]"#,
        );
        let entries = FileCatalog::new(&path).load().await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(entries.len(), 3);
        let words: Vec<String> = entries
            .iter()
            .filter_map(Card::from_raw)
            .map(|card| card.word)
            .collect();
        assert_eq!(words, vec!["Beach", "Cat"]);
    }

    #[tokio::test]
    async fn test_file_catalog_missing_file() {
        let err = FileCatalog::new("/nonexistent/cards.json").load().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read card catalog"));
    }

    #[tokio::test]
    async fn test_file_catalog_invalid_json() {
        let path = temp_file("broken", "{not json");
        let result = FileCatalog::new(&path).load().await;
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_static_catalog() {
        let entries = tokio_test::block_on(StaticCatalog::empty().load()).unwrap();
        assert!(entries.is_empty());
    }
}
