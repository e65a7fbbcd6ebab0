use std::io::{Read, Seek};
use std::sync::Arc;

use crate::{GiftDocsError, GiftDocsResult};

use super::file_path::FilePath;
use super::http::{HttpServerConfig, HttpServerHandle, HttpService};

/// Opaque readable and seekable file handle.
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/* 📖 # Why is Pal a trait instead of a struct?

The engine never decides whether it runs against the real machine. Tests hand it
a MockPal, the binary hands it a RealPal, and the code in between is identical.
*/

/// Platform operations needed by the documentation site.
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check if a file exists at the given path.
    fn file_exists(&self, path: &FilePath) -> GiftDocsResult<bool>;

    /// Open a file for reading.
    fn read_file(&self, path: &FilePath) -> GiftDocsResult<Box<dyn ReadSeek + 'static>>;

    /// Read entire file contents as a UTF-8 string.
    fn read_file_to_string(&self, path: &FilePath) -> GiftDocsResult<String> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .map_err(|e| Box::new(GiftDocsError::file_error(path.as_path(), e)))?;
        String::from_utf8(contents).map_err(|_e| crate::err!("File is not valid UTF-8: {}", path))
    }

    /// Start an HTTP server dispatching every request to `service`.
    ///
    /// The server keeps running until the returned handle is dropped or
    /// [`HttpServerHandle::shutdown`] is called.
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> GiftDocsResult<HttpServerHandle>;
}

/// Shared handle to a PAL implementation.
///
/// ```no_run
/// use giftdocs_base::{PalHandle, RealPal};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let for_server = pal.clone();
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
