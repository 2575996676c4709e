//! HttpSubmitter - PUT submission of staged files

use std::time::Duration;

use contracts::{FileSubmitter, RelayError, StagedFile};
use tokio_util::io::ReaderStream;
use tracing::{debug, instrument};

use crate::error::DispatcherError;

/// Submits staged files to their destinations via HTTP PUT.
///
/// The staged bytes are streamed as the request body. No content-type header
/// is set; the destination infers it. A response status of exactly 200 is
/// the sole success criterion.
pub struct HttpSubmitter {
    name: String,
    client: reqwest::Client,
}

impl HttpSubmitter {
    /// Create a new HttpSubmitter with a bounded request timeout
    pub fn new(name: impl Into<String>, timeout: Duration) -> Result<Self, DispatcherError> {
        let name = name.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatcherError::submitter_creation(&name, e.to_string()))?;

        Ok(Self { name, client })
    }

    async fn open_body(&self, staged: &StagedFile) -> Result<reqwest::Body, RelayError> {
        let file = tokio::fs::File::open(&staged.local_path)
            .await
            .map_err(|e| {
                RelayError::dispatch(
                    &staged.destination,
                    format!(
                        "cannot open staged file {}: {e}",
                        staged.local_path.display()
                    ),
                )
            })?;

        Ok(reqwest::Body::wrap_stream(ReaderStream::new(file)))
    }
}

impl FileSubmitter for HttpSubmitter {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_submitter_submit",
        skip(self, staged),
        fields(submitter = %self.name, destination = %staged.destination)
    )]
    async fn submit(&self, staged: &StagedFile) -> Result<(), RelayError> {
        let body = self.open_body(staged).await?;

        let response = self
            .client
            .put(&staged.destination)
            .body(body)
            .send()
            .await
            .map_err(|e| RelayError::dispatch(&staged.destination, e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 200 {
            debug!(destination = %staged.destination, "PUT accepted");
            return Ok(());
        }

        let body_text = response.text().await.unwrap_or_default();
        Err(RelayError::dispatch(
            &staged.destination,
            format!("status {}: {}", status.as_u16(), body_text),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn stage(dir: &std::path::Path, name: &str, content: &[u8], destination: &str) -> StagedFile {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        StagedFile {
            destination: destination.to_string(),
            local_path: path,
        }
    }

    #[tokio::test]
    async fn test_submit_200_succeeds() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/a.txt")
            .match_body("hello world!")
            .with_status(200)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let destination = format!("{}/a.txt", server.url());
        let staged = stage(dir.path(), "a.txt", b"hello world!", &destination);

        let submitter = HttpSubmitter::new("http", Duration::from_secs(5)).unwrap();
        submitter.submit(&staged).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_submit_500_fails_with_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/b.txt")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let destination = format!("{}/b.txt", server.url());
        let staged = stage(dir.path(), "b.txt", b"payload", &destination);

        let submitter = HttpSubmitter::new("http", Duration::from_secs(5)).unwrap();
        let err = submitter.submit(&staged).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("status 500"), "got: {text}");
        assert!(text.contains("boom"), "got: {text}");
    }

    #[tokio::test]
    async fn test_submit_non_200_success_status_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/c.txt")
            .with_status(204)
            .create_async()
            .await;

        let dir = tempdir().unwrap();
        let destination = format!("{}/c.txt", server.url());
        let staged = stage(dir.path(), "c.txt", b"payload", &destination);

        let submitter = HttpSubmitter::new("http", Duration::from_secs(5)).unwrap();
        let err = submitter.submit(&staged).await.unwrap_err();
        assert!(err.to_string().contains("status 204"));
    }

    #[tokio::test]
    async fn test_submit_connection_refused_fails() {
        let dir = tempdir().unwrap();
        // Port from the reserved range, nothing listens there
        let staged = stage(dir.path(), "d.txt", b"payload", "http://127.0.0.1:1/d.txt");

        let submitter = HttpSubmitter::new("http", Duration::from_secs(2)).unwrap();
        let err = submitter.submit(&staged).await.unwrap_err();
        assert!(matches!(err, RelayError::Dispatch { .. }));
    }

    #[tokio::test]
    async fn test_submit_missing_staged_file_fails() {
        let staged = StagedFile {
            destination: "http://127.0.0.1:1/e.txt".to_string(),
            local_path: std::path::PathBuf::from("/nonexistent/e.txt"),
        };

        let submitter = HttpSubmitter::new("http", Duration::from_secs(2)).unwrap();
        let err = submitter.submit(&staged).await.unwrap_err();
        assert!(err.to_string().contains("cannot open staged file"));
    }
}
