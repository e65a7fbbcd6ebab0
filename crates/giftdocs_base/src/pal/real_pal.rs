use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::{GiftDocsError, GiftDocsResult};

use super::FilePath;
use super::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService,
};
use super::traits::{Pal, ReadSeek};

/* 📖 # Why tiny_http and a plain thread?

The site serves a handful of small JSON and HTML responses. A blocking accept
loop on one thread is enough, and it keeps the whole code base free of async.
The loop polls with a short timeout so it notices the shutdown flag.
*/

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// PAL implementation backed by std::fs and tiny_http.
///
/// File paths are resolved relative to `base_dir`.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        path.resolve_in(&self.base_dir)
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> GiftDocsResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.is_file();
        debug!(exists, resolved = %resolved.display(), "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> GiftDocsResult<Box<dyn ReadSeek + 'static>> {
        let resolved = self.resolve_path(path);
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Box::new(GiftDocsError::file_error(resolved.clone(), e))
        })?;
        debug!(resolved = %resolved.display(), "file opened");
        Ok(Box::new(file))
    }

    #[instrument(skip(self, service), fields(address = %config.address()))]
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> GiftDocsResult<HttpServerHandle> {
        let server = tiny_http::Server::http(config.address()).map_err(|e| {
            crate::err!("Failed to bind HTTP server on {}: {}", config.address(), e)
        })?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| crate::err!("HTTP server is not listening on an IP address"))?;

        let handle = HttpServerHandle::new(port);
        let shutdown = handle.shutdown_flag();
        let server_name = config.server_name.clone();
        std::thread::Builder::new()
            .name(format!("http-{}", port))
            .spawn(move || serve_loop(server, service, shutdown, server_name))
            .map_err(|e| crate::err!("Failed to spawn HTTP server thread: {}", e))?;

        info!(host = %config.host, port, "HTTP server listening");
        Ok(handle)
    }
}

fn serve_loop(
    server: tiny_http::Server,
    service: Box<dyn HttpService>,
    shutdown: Arc<AtomicBool>,
    server_name: String,
) {
    while !shutdown.load(Ordering::SeqCst) {
        let request = match server.recv_timeout(ACCEPT_POLL_INTERVAL) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => {
                error!(error = %e, "HTTP accept failed");
                continue;
            }
        };
        handle_connection(request, service.as_ref(), &server_name);
    }
    info!("HTTP server stopped");
}

fn handle_connection(mut raw: tiny_http::Request, service: &dyn HttpService, server_name: &str) {
    let method_name = raw.method().to_string();
    let target = raw.url().to_string();

    let response = match convert_request(&mut raw) {
        Ok(request) => match service.handle_request(request) {
            Ok(response) => response,
            Err(e) => {
                warn!(method = %method_name, target = %target, error = %e, "request failed");
                HttpResponse::service_error(e.to_string())
            }
        },
        Err(e) => {
            warn!(method = %method_name, target = %target, error = %e, "unreadable request");
            HttpResponse::service_error(e.to_string())
        }
    };

    let status = response.status().as_u16();
    info!(method = %method_name, target = %target, status, "handled request");

    let mut outgoing = tiny_http::Response::from_data(response.body().as_bytes().to_vec())
        .with_status_code(status);
    let headers = response
        .headers()
        .iter()
        .chain(std::iter::once(("Server", server_name)));
    for (name, value) in headers {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(header) => outgoing.add_header(header),
            Err(()) => warn!(header = name, "dropping invalid response header"),
        }
    }
    if let Err(e) = raw.respond(outgoing) {
        warn!(error = %e, "failed to write response");
    }
}

fn convert_request(raw: &mut tiny_http::Request) -> GiftDocsResult<HttpRequest> {
    let method_name = raw.method().to_string();
    let method = HttpMethod::parse(&method_name)
        .ok_or_else(|| crate::err!("Unsupported HTTP method: {}", method_name))?;

    let mut request = HttpRequest::new(method, raw.url());
    for header in raw.headers() {
        request = request.with_header(header.field.as_str().as_str(), header.value.as_str());
    }

    let mut body = Vec::new();
    raw.as_reader()
        .read_to_end(&mut body)
        .map_err(|e| crate::err!("Failed to read request body: {}", e))?;
    Ok(request.with_body(body))
}
