//! Tree document loaders: local file or HTTP(S) URL.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::infrastructure::traits::{DocumentSource, FileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Document stored on the local filesystem.
pub struct FileDocumentSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileDocumentSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl DocumentSource for FileDocumentSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> InfraResult<String> {
        debug!("fetch: path={}", self.path.display());
        let context = format!("read {}", self.path.display());
        if !self.fs.is_file(&self.path) {
            return Err(InfraError::io(
                context,
                io::Error::new(io::ErrorKind::NotFound, "not a file"),
            ));
        }
        self.fs
            .read_to_string(&self.path)
            .map_err(|e| InfraError::io(context, e))
    }
}

/// Document served over HTTP(S).
pub struct HttpDocumentSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpDocumentSource {
    pub fn new(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(10))
            .build();
        Self {
            url: url.into(),
            agent,
        }
    }

    fn http_error(&self, message: impl Into<String>) -> InfraError {
        InfraError::Http {
            url: self.url.clone(),
            message: message.into(),
        }
    }
}

impl DocumentSource for HttpDocumentSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> InfraResult<String> {
        debug!("fetch: url={}", self.url);
        let response = self.agent.get(&self.url).call().map_err(|e| match e {
            ureq::Error::Status(code, response) => {
                self.http_error(format!("status {code} {}", response.status_text()))
            }
            ureq::Error::Transport(t) => self.http_error(t.to_string()),
        })?;
        response
            .into_string()
            .map_err(|e| self.http_error(format!("reading body: {e}")))
    }
}

/// True if `location` should be fetched over HTTP rather than read from disk.
pub fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}
