use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};

use parking_lot::Mutex;

use crate::{GiftDocsError, GiftDocsResult};

use super::FilePath;
use super::http::{HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService};
use super::traits::{Pal, ReadSeek};

/// In-memory PAL for tests.
///
/// Files live in a map, and "started" HTTP servers are just services registered
/// under a port that [`MockPal::simulate_request`] dispatches to.
///
/// ```
/// use giftdocs_base::{FilePath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("giftdocs.toml"), b"title = \"Docs\"".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("giftdocs.toml")).unwrap();
/// assert_eq!(content, "title = \"Docs\"");
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FilePath, Vec<u8>>>>,
    http_servers: Arc<Mutex<HashMap<u16, Arc<dyn HttpService>>>>,
    next_port: Arc<AtomicU16>,
}

impl MockPal {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            http_servers: Arc::new(Mutex::new(HashMap::new())),
            next_port: Arc::new(AtomicU16::new(10000)),
        }
    }

    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        self.files.lock().insert(path, content);
    }

    /// Dispatch a request to the service registered on `port`.
    ///
    /// Errors from the service are returned as-is, so tests can assert on the
    /// message that RealPal would have put into the 599 body.
    pub fn simulate_request(&self, port: u16, request: HttpRequest) -> GiftDocsResult<HttpResponse> {
        let service = self
            .http_servers
            .lock()
            .get(&port)
            .cloned()
            .ok_or_else(|| crate::err!("No HTTP server registered on port {}", port))?;
        service.handle_request(request)
    }

    pub fn http_server_count(&self) -> usize {
        self.http_servers.lock().len()
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> GiftDocsResult<bool> {
        Ok(self.files.lock().contains_key(path))
    }

    fn read_file(&self, path: &FilePath) -> GiftDocsResult<Box<dyn ReadSeek + 'static>> {
        let content = self.files.lock().get(path).cloned().ok_or_else(|| {
            Box::new(GiftDocsError::file_error(
                path.as_path(),
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ),
            ))
        })?;
        Ok(Box::new(Cursor::new(content)))
    }

    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> GiftDocsResult<HttpServerHandle> {
        let port = config
            .port
            .unwrap_or_else(|| self.next_port.fetch_add(1, Ordering::SeqCst));
        self.http_servers.lock().insert(port, Arc::from(service));
        Ok(HttpServerHandle::new(port))
    }
}
