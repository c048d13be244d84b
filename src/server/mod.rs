//! Static file server
//!
//! Serves the game page, the wasm bundle and any assets from a single
//! directory. GET and HEAD only; requests are handled one at a time.

pub mod config;
pub mod files;

use std::fs::File;
use std::path::{Path, PathBuf};

use tiny_http::{Header, Method, Request, Response};

pub use config::ServerConfig;
pub use files::{PathError, content_type, resolve_path};

/// Server errors
#[derive(thiserror::Error, Debug)]
pub enum ServerError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Could not listen on the requested address
    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),
}

/// What to send back for a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Stream this file with the given content type
    File {
        path: PathBuf,
        content_type: &'static str,
    },
    /// Plain-text status response
    Status(u16, &'static str),
}

/// Decide how to answer `method url` for files under `root`
pub fn route(method: &Method, url: &str, root: &Path) -> Reply {
    if !matches!(method, Method::Get | Method::Head) {
        return Reply::Status(405, "Method Not Allowed");
    }

    match resolve_path(root, url) {
        Ok(path) => {
            let content_type = content_type(&path);
            Reply::File { path, content_type }
        }
        Err(PathError::Forbidden) => Reply::Status(403, "Forbidden"),
        Err(PathError::NotFound) => Reply::Status(404, "Not Found"),
    }
}

/// A bound static file server
pub struct StaticServer {
    server: tiny_http::Server,
    root: PathBuf,
}

impl StaticServer {
    /// Bind the listening socket
    pub fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let addr = config.bind_addr();
        let server = tiny_http::Server::http(&addr).map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            reason: e.to_string(),
        })?;

        if !config.root.is_dir() {
            log::warn!(
                "Root directory {} does not exist - every request will 404",
                config.root.display()
            );
        }

        Ok(Self {
            server,
            root: config.root.clone(),
        })
    }

    /// Port actually bound (useful when configured with port 0)
    pub fn port(&self) -> Option<u16> {
        self.server.server_addr().to_ip().map(|addr| addr.port())
    }

    /// Serve requests until the listener shuts down
    pub fn run(&self) {
        if let Some(port) = self.port() {
            log::info!("Server is running on http://localhost:{}", port);
        }
        log::info!("Serving files from {}", self.root.display());

        for request in self.server.incoming_requests() {
            self.handle(request);
        }
    }

    /// Serve exactly one request (blocking)
    pub fn handle_one(&self) -> Result<(), ServerError> {
        let request = self.server.recv()?;
        self.handle(request);
        Ok(())
    }

    fn handle(&self, request: Request) {
        let reply = route(request.method(), request.url(), &self.root);
        log::debug!("{} {} -> {:?}", request.method(), request.url(), reply);

        let result = match reply {
            Reply::File { path, content_type } => match File::open(&path) {
                Ok(file) => {
                    let mut response = Response::from_file(file);
                    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
                        response.add_header(header);
                    }
                    request.respond(response)
                }
                Err(e) => {
                    log::warn!("Failed to open {}: {}", path.display(), e);
                    request.respond(Response::from_string("Internal Server Error").with_status_code(500))
                }
            },
            Reply::Status(code, text) => {
                request.respond(Response::from_string(text).with_status_code(code))
            }
        };

        if let Err(e) = result {
            log::warn!("Failed to send response: {}", e);
        }
    }
}
