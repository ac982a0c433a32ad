//! One-time loading of the vocabulary graph.
//!
//! The document is cached on disk. A [`GraphLoader`] downloads it when the
//! cache file is missing (or always, with `overwrite`), parses it on the
//! blocking pool and hands every caller the same [`Arc<GraphStore>`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;

use crate::config::VocabConfig;

use super::error::VocabError;
use super::graph::GraphStore;

/// Content type requested from the vocabulary publisher.
const JSONLD_CONTENT_TYPE: &str = "application/ld+json";

/// Loads the vocabulary graph exactly once per instance.
///
/// Concurrent callers of [`GraphLoader::load`] wait on the same in-flight
/// load. A failed load leaves the loader empty; the next call tries again.
///
/// A downloaded document that fails to parse stays in the cache file, so
/// later loads keep failing on it until `overwrite` is set or the file is
/// removed.
pub struct GraphLoader {
    file: PathBuf,
    source: String,
    overwrite: bool,
    deadline: Option<Duration>,
    client: Client,
    graph: OnceCell<Arc<GraphStore>>,
}

impl GraphLoader {
    /// Creates a loader for a local cache file and remote source.
    pub fn new(file: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
            overwrite: false,
            deadline: None,
            client: Client::new(),
            graph: OnceCell::new(),
        }
    }

    /// Creates a loader from the `[vocab]` configuration section.
    pub fn from_config(config: &VocabConfig) -> Self {
        Self::new(config.file_path(), config.source.clone())
            .with_overwrite(config.overwrite)
            .with_deadline(config.download_timeout())
    }

    /// Download even when the local file already exists.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Deadline for the download step.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Uses a preconfigured HTTP client (proxies, TLS roots, ...).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Path of the local cache file.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Whether the graph has already been loaded.
    pub fn is_loaded(&self) -> bool {
        self.graph.initialized()
    }

    /// Loads the graph, or returns the already loaded one.
    pub async fn load(&self) -> Result<Arc<GraphStore>, VocabError> {
        self.load_with_deadline(self.deadline).await
    }

    /// Like [`GraphLoader::load`] with a caller-supplied download deadline.
    pub async fn load_with_deadline(
        &self,
        deadline: Option<Duration>,
    ) -> Result<Arc<GraphStore>, VocabError> {
        let graph = self
            .graph
            .get_or_try_init(|| async {
                self.ensure_downloaded(deadline).await?;
                let graph = parse_file(self.file.clone()).await?;
                Ok::<_, VocabError>(Arc::new(graph))
            })
            .await?;

        Ok(Arc::clone(graph))
    }

    async fn ensure_downloaded(&self, deadline: Option<Duration>) -> Result<(), VocabError> {
        if !self.overwrite {
            let exists = tokio::fs::try_exists(&self.file)
                .await
                .map_err(|e| VocabError::io(&self.file, e))?;
            if exists {
                tracing::debug!(file = %self.file.display(), "vocabulary already downloaded");
                return Ok(());
            }
        }

        let download = download_to_path(&self.client, &self.source, &self.file);
        let Some(limit) = deadline else {
            return download.await;
        };

        match tokio::time::timeout(limit, download).await {
            Ok(result) => result,
            Err(_) => {
                let tmp = partial_path(&self.file);
                if let Err(e) = tokio::fs::remove_file(&tmp).await {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(file = %tmp.display(), error = %e, "failed to remove partial download");
                    }
                }
                Err(VocabError::Timeout {
                    url: self.source.clone(),
                })
            }
        }
    }
}

/// Fetches `url` and streams the body into `path`.
///
/// The body goes to a sibling `.part` file that is renamed into place once
/// complete.
pub async fn download_to_path(client: &Client, url: &str, path: &Path) -> Result<(), VocabError> {
    tracing::info!(url, file = %path.display(), "downloading vocabulary");

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, JSONLD_CONTENT_TYPE)
        .send()
        .await
        .map_err(|e| VocabError::Download {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(VocabError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| VocabError::io(parent, e))?;
    }

    let tmp = partial_path(path);
    let mut out = tokio::fs::File::create(&tmp)
        .await
        .map_err(|e| VocabError::io(&tmp, e))?;

    let mut written = 0usize;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| VocabError::Download {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        out.write_all(&chunk).await.map_err(|e| VocabError::io(&tmp, e))?;
        written += chunk.len();
    }
    out.flush().await.map_err(|e| VocabError::io(&tmp, e))?;
    drop(out);

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| VocabError::io(path, e))?;

    tracing::info!(bytes = written, file = %path.display(), "vocabulary downloaded");
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

async fn parse_file(path: PathBuf) -> Result<GraphStore, VocabError> {
    let graph = tokio::task::spawn_blocking(move || GraphStore::from_jsonld_file(&path))
        .await
        .map_err(|e| VocabError::parse("vocabulary", format!("parser task failed: {}", e)))??;

    tracing::info!(triples = graph.len(), "vocabulary graph parsed");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/tmp/vocab.jsonld")),
            PathBuf::from("/tmp/vocab.jsonld.part")
        );
    }

    #[test]
    fn test_from_config() {
        let config = VocabConfig {
            file: "cache/vocab.jsonld".to_string(),
            overwrite: true,
            ..VocabConfig::default()
        };
        let loader = GraphLoader::from_config(&config);
        assert_eq!(loader.file(), Path::new("cache/vocab.jsonld"));
        assert!(loader.overwrite);
        assert!(!loader.is_loaded());
    }
}
