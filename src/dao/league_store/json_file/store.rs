use std::{io::ErrorKind, sync::Arc};

use futures::future::BoxFuture;
use tokio::{fs, sync::Mutex};
use tracing::debug;

use crate::dao::{
    league_store::LeagueStore,
    models::{LeagueSnapshot, StoreMutation},
    storage::StorageResult,
};

use super::{
    config::JsonFileConfig,
    error::{JsonStoreError, JsonStoreResult},
};

/// [`LeagueStore`] keeping the whole league in one pretty-printed JSON document.
///
/// Every commit rewrites the document through a temporary sibling file renamed into place, so
/// readers only ever observe a complete changeset.
#[derive(Clone)]
pub struct JsonFileLeagueStore {
    inner: Arc<JsonInner>,
}

struct JsonInner {
    config: JsonFileConfig,
    cache: Mutex<Option<LeagueSnapshot>>,
}

impl JsonFileLeagueStore {
    /// Open the store, creating the data directory when needed. The document itself is only
    /// created by the first commit.
    pub async fn open(config: JsonFileConfig) -> JsonStoreResult<Self> {
        let directory = config.directory().to_path_buf();
        fs::create_dir_all(&directory)
            .await
            .map_err(|source| JsonStoreError::Directory {
                path: directory,
                source,
            })?;

        Ok(Self {
            inner: Arc::new(JsonInner {
                config,
                cache: Mutex::new(None),
            }),
        })
    }

    async fn read(config: &JsonFileConfig) -> JsonStoreResult<LeagueSnapshot> {
        let bytes = match fs::read(&config.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LeagueSnapshot::default()),
            Err(source) => {
                return Err(JsonStoreError::Read {
                    path: config.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| JsonStoreError::Decode {
            path: config.path.clone(),
            source,
        })
    }

    async fn write(config: &JsonFileConfig, snapshot: &LeagueSnapshot) -> JsonStoreResult<()> {
        let body =
            serde_json::to_vec_pretty(snapshot).map_err(|source| JsonStoreError::Encode { source })?;

        let temp = config.temp_path();
        fs::write(&temp, body)
            .await
            .map_err(|source| JsonStoreError::Write {
                path: temp.clone(),
                source,
            })?;
        fs::rename(&temp, &config.path)
            .await
            .map_err(|source| JsonStoreError::Write {
                path: config.path.clone(),
                source,
            })
    }
}

impl LeagueStore for JsonFileLeagueStore {
    fn backend(&self) -> &'static str {
        "json_file"
    }

    fn load(&self) -> BoxFuture<'static, StorageResult<LeagueSnapshot>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut cache = inner.cache.lock().await;
            let snapshot = Self::read(&inner.config).await?;
            *cache = Some(snapshot.clone());
            Ok(snapshot)
        })
    }

    fn commit(&self, changes: Vec<StoreMutation>) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            if changes.is_empty() {
                return Ok(());
            }

            let mut cache = inner.cache.lock().await;
            let mut next = match cache.as_ref() {
                Some(snapshot) => snapshot.clone(),
                None => Self::read(&inner.config).await?,
            };
            let count = changes.len();
            for mutation in changes {
                next.apply(mutation);
            }

            Self::write(&inner.config, &next).await?;
            *cache = Some(next);
            debug!(path = %inner.config.path.display(), mutations = count, "league document written");
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let directory = inner.config.directory().to_path_buf();
            let metadata = fs::metadata(&directory)
                .await
                .map_err(|source| JsonStoreError::Directory {
                    path: directory.clone(),
                    source,
                })?;
            if metadata.is_dir() {
                Ok(())
            } else {
                Err(JsonStoreError::Directory {
                    path: directory,
                    source: std::io::Error::new(ErrorKind::NotADirectory, "not a directory"),
                }
                .into())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::dao::{seed, storage::StorageError};

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("dugout-back-{}", uuid::Uuid::new_v4().simple()))
            .join(name)
    }

    #[tokio::test]
    async fn missing_document_loads_empty() {
        let store = JsonFileLeagueStore::open(JsonFileConfig::new(scratch("league.json")))
            .await
            .unwrap();
        assert!(store.load().await.unwrap().is_empty());
        assert!(store.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn commits_survive_reopen() {
        let path = scratch("league.json");
        let store = JsonFileLeagueStore::open(JsonFileConfig::new(&path))
            .await
            .unwrap();
        store.load().await.unwrap();
        store
            .commit(seed::snapshot().into_mutations())
            .await
            .unwrap();
        store
            .commit(vec![StoreMutation::DeleteGame("8".into())])
            .await
            .unwrap();

        let reopened = JsonFileLeagueStore::open(JsonFileConfig::new(&path))
            .await
            .unwrap();
        let loaded = reopened.load().await.unwrap();
        assert_eq!(loaded.games.len(), 7);
        assert_eq!(loaded.teams, seed::snapshot().teams);
        assert!(!JsonFileConfig::new(&path).temp_path().exists());
    }

    #[tokio::test]
    async fn garbage_document_is_corrupt() {
        let path = scratch("league.json");
        let store = JsonFileLeagueStore::open(JsonFileConfig::new(&path))
            .await
            .unwrap();
        fs::write(&path, b"{ not json").await.unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }
}
