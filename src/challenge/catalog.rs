use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::OnceCell;
use crate::errors::VulnsnipError;
use super::loader::SnippetLoader;
use super::snippet::SnippetRecord;

/// Read-only map from challenge key to its annotated snippet.
///
/// Source-backed catalogs scan their directories on first access. A failed
/// scan is not cached, so a later request retries it.
pub struct ChallengeCatalog {
    loader: Option<SnippetLoader>,
    snippets: OnceCell<BTreeMap<String, SnippetRecord>>,
}

impl ChallengeCatalog {
    pub fn from_sources(source_dirs: Vec<PathBuf>) -> Self {
        Self {
            loader: Some(SnippetLoader::new(source_dirs)),
            snippets: OnceCell::new(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = SnippetRecord>) -> Self {
        let snippets = records
            .into_iter()
            .map(|r| (r.key.clone(), r))
            .collect();
        Self {
            loader: None,
            snippets: OnceCell::new_with(Some(snippets)),
        }
    }

    async fn snippets(&self) -> Result<&BTreeMap<String, SnippetRecord>, VulnsnipError> {
        self.snippets
            .get_or_try_init(|| async {
                match &self.loader {
                    Some(loader) => {
                        let loader = loader.clone();
                        match tokio::task::spawn_blocking(move || loader.load()).await {
                            Ok(result) => result,
                            Err(e) => Err(VulnsnipError::Internal(format!("Catalog load task failed: {}", e))),
                        }
                    }
                    None => Ok(BTreeMap::new()),
                }
            })
            .await
    }

    pub async fn get(&self, key: &str) -> Result<Option<&SnippetRecord>, VulnsnipError> {
        Ok(self.snippets().await?.get(key))
    }

    pub async fn keys(&self) -> Result<Vec<String>, VulnsnipError> {
        Ok(self.snippets().await?.keys().cloned().collect())
    }

    pub async fn records(&self) -> Result<Vec<&SnippetRecord>, VulnsnipError> {
        Ok(self.snippets().await?.values().collect())
    }
}
