//! Resolution of an image source into bytes and a name hint.
//!
//! Buffers pass straight through. References are classified as local paths
//! or remote URLs and read or fetched accordingly.

use async_trait::async_trait;
use reqwest::Url;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::types::{ImageSource, NameHint};

use super::fetch::RemoteFetcher;

/// Reads local files.
#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, PipelineError>;
}

/// Reads files with `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFileReader;

#[async_trait]
impl FileReader for TokioFileReader {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, PipelineError> {
        tokio::fs::read(path)
            .await
            .map_err(|source| PipelineError::ReadFailure {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Where a string reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    Remote(Url),
}

impl SourceLocation {
    /// Classify a reference.
    ///
    /// `http`/`https` URLs are remote and `file` URLs map to their path.
    /// Anything else is a local path, with a leading `~` expanded.
    pub fn classify(reference: &str) -> Self {
        if let Ok(url) = Url::parse(reference) {
            match url.scheme() {
                "http" | "https" => return Self::Remote(url),
                "file" => {
                    if let Ok(path) = url.to_file_path() {
                        return Self::Local(path);
                    }
                }
                _ => {}
            }
        }
        Self::Local(PathBuf::from(shellexpand::tilde(reference).into_owned()))
    }
}

/// Bytes ready for sniffing, with the name they came under.
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub bytes: Vec<u8>,
    pub name: Option<NameHint>,
}

/// Turns an `ImageSource` into a `ResolvedSource`.
pub struct SourceResolver {
    reader: Box<dyn FileReader>,
    fetcher: Box<dyn RemoteFetcher>,
}

impl SourceResolver {
    pub fn new(reader: Box<dyn FileReader>, fetcher: Box<dyn RemoteFetcher>) -> Self {
        Self { reader, fetcher }
    }

    pub(crate) fn set_reader(&mut self, reader: Box<dyn FileReader>) {
        self.reader = reader;
    }

    pub(crate) fn set_fetcher(&mut self, fetcher: Box<dyn RemoteFetcher>) {
        self.fetcher = fetcher;
    }

    /// Resolve a source, performing at most one read or fetch.
    ///
    /// An absent source fails before any I/O.
    pub async fn resolve(
        &self,
        source: Option<ImageSource>,
    ) -> Result<ResolvedSource, PipelineError> {
        match source.ok_or(PipelineError::SourceMissing)? {
            ImageSource::Buffer { bytes, name } => Ok(ResolvedSource {
                bytes,
                name: name.as_deref().and_then(NameHint::new),
            }),
            ImageSource::Reference(reference) => match SourceLocation::classify(&reference) {
                SourceLocation::Local(path) => {
                    tracing::trace!("  Reading local file {:?}", path);
                    let bytes = self.reader.read(&path).await?;
                    let name = path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .and_then(NameHint::new);
                    Ok(ResolvedSource { bytes, name })
                }
                SourceLocation::Remote(url) => {
                    tracing::trace!("  Fetching {}", url);
                    let fetched = self.fetcher.fetch(&url).await?;
                    Ok(ResolvedSource {
                        bytes: fetched.bytes,
                        name: remote_name_hint(&fetched.final_url),
                    })
                }
            },
        }
    }
}

/// Last non-empty path segment of the final URL.
fn remote_name_hint(url: &Url) -> Option<NameHint> {
    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .and_then(NameHint::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fetch::FetchedResource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Calls {
        reads: AtomicUsize,
        fetches: AtomicUsize,
    }

    struct FakeReader(Arc<Calls>);

    #[async_trait]
    impl FileReader for FakeReader {
        async fn read(&self, path: &Path) -> Result<Vec<u8>, PipelineError> {
            self.0.reads.fetch_add(1, Ordering::SeqCst);
            TokioFileReader.read(path).await
        }
    }

    struct FakeFetcher {
        calls: Arc<Calls>,
        final_url: &'static str,
    }

    #[async_trait]
    impl RemoteFetcher for FakeFetcher {
        async fn fetch(&self, _url: &Url) -> Result<FetchedResource, PipelineError> {
            self.calls.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(FetchedResource {
                bytes: vec![1, 2, 3],
                final_url: Url::parse(self.final_url).unwrap(),
            })
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl RemoteFetcher for FailingFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedResource, PipelineError> {
            Err(PipelineError::FetchFailure {
                url: url.to_string(),
                message: "HTTP 404 Not Found".to_string(),
                status_code: Some(404),
            })
        }
    }

    fn resolver(final_url: &'static str) -> (SourceResolver, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let resolver = SourceResolver::new(
            Box::new(FakeReader(calls.clone())),
            Box::new(FakeFetcher {
                calls: calls.clone(),
                final_url,
            }),
        );
        (resolver, calls)
    }

    #[tokio::test]
    async fn test_missing_source_does_no_io() {
        let (resolver, calls) = resolver("https://example.com/a.png");
        let err = resolver.resolve(None).await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceMissing));
        assert_eq!(calls.reads.load(Ordering::SeqCst), 0);
        assert_eq!(calls.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_buffer_passes_through_without_io() {
        let (resolver, calls) = resolver("https://example.com/a.png");
        let resolved = resolver
            .resolve(Some(ImageSource::named_buffer(vec![9, 9], "photo.png")))
            .await
            .unwrap();
        assert_eq!(resolved.bytes, vec![9, 9]);
        assert_eq!(resolved.name.unwrap().as_str(), "photo.png");

        let resolved = resolver
            .resolve(Some(ImageSource::buffer(vec![1])))
            .await
            .unwrap();
        assert!(resolved.name.is_none());
        assert_eq!(calls.reads.load(Ordering::SeqCst), 0);
        assert_eq!(calls.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_local_file_read_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Holiday.JPG");
        std::fs::write(&path, b"contents").unwrap();

        let (resolver, calls) = resolver("https://example.com/a.png");
        let resolved = resolver
            .resolve(Some(ImageSource::reference(path.to_string_lossy())))
            .await
            .unwrap();
        assert_eq!(resolved.bytes, b"contents");
        assert_eq!(resolved.name.unwrap().as_str(), "Holiday.JPG");
        assert_eq!(calls.reads.load(Ordering::SeqCst), 1);
        assert_eq!(calls.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.png");

        let (resolver, _) = resolver("https://example.com/a.png");
        let err = resolver
            .resolve(Some(ImageSource::reference(path.to_string_lossy())))
            .await
            .unwrap_err();
        match err {
            PipelineError::ReadFailure { path: failed, source } => {
                assert_eq!(failed, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected ReadFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_remote_name_comes_from_final_url() {
        let (resolver, calls) = resolver("https://cdn.example.com/img/final.jpeg?sig=abc");
        let resolved = resolver
            .resolve(Some(ImageSource::reference(
                "https://example.com/redirect/original.png",
            )))
            .await
            .unwrap();
        assert_eq!(resolved.bytes, vec![1, 2, 3]);
        assert_eq!(resolved.name.unwrap().as_str(), "final.jpeg");
        assert_eq!(calls.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(calls.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_directory_url_has_no_name() {
        let (resolver, _) = resolver("https://example.com/");
        let resolved = resolver
            .resolve(Some(ImageSource::reference("https://example.com/")))
            .await
            .unwrap();
        assert!(resolved.name.is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let resolver = SourceResolver::new(Box::new(TokioFileReader), Box::new(FailingFetcher));
        let err = resolver
            .resolve(Some(ImageSource::reference("https://example.com/gone.png")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::FetchFailure {
                status_code: Some(404),
                ..
            }
        ));
    }

    #[test]
    fn test_classify_references() {
        assert!(matches!(
            SourceLocation::classify("https://example.com/a.png"),
            SourceLocation::Remote(_)
        ));
        assert!(matches!(
            SourceLocation::classify("http://example.com/a.png"),
            SourceLocation::Remote(_)
        ));
        assert_eq!(
            SourceLocation::classify("images/a.png"),
            SourceLocation::Local(PathBuf::from("images/a.png"))
        );
        assert_eq!(
            SourceLocation::classify("/tmp/a.png"),
            SourceLocation::Local(PathBuf::from("/tmp/a.png"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_classify_file_url() {
        assert_eq!(
            SourceLocation::classify("file:///tmp/photo.png"),
            SourceLocation::Local(PathBuf::from("/tmp/photo.png"))
        );
    }

    #[test]
    fn test_classify_expands_tilde() {
        match SourceLocation::classify("~/photo.png") {
            SourceLocation::Local(path) => assert!(!path.starts_with("~")),
            other => panic!("expected local path, got {other:?}"),
        }
    }
}
