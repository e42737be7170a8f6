use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use log::{info, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_util::codec::Framed;

use super::http::{HttpFramer, Request, Response, Status};
use crate::export::MemoryDownload;
use crate::keys::KeyMaterialGenerator;
use crate::notice::Notice;
use crate::session::Session;
use crate::storage;

/// How long a connection may take to send its request head.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// The page and script served to the browser, read once at startup.
pub struct Assets {
    index_page: Vec<u8>,
    script: Vec<u8>,
}

impl Assets {
    pub fn new(index_page: impl Into<Vec<u8>>, script: impl Into<Vec<u8>>) -> Self {
        Self {
            index_page: index_page.into(),
            script: script.into(),
        }
    }

    /// Reads `index.html` and `index.js` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read.
    pub async fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let index_page = tokio::fs::read(dir.join("index.html"))
            .await
            .with_context(|| format!("Failed to read {}/index.html", dir.display()))?;
        let script = tokio::fs::read(dir.join("index.js"))
            .await
            .with_context(|| format!("Failed to read {}/index.js", dir.display()))?;
        Ok(Self::new(index_page, script))
    }
}

/// Serves the page, its script, a health check and the exported configuration.
///
/// The responder keeps no state of its own between requests. The configuration route reads
/// the persisted session each time, so it always reflects the last saved state.
///
/// Connections are served one at a time. A connection that does not deliver its request
/// within the read timeout gets `408` and is closed, so it cannot hold up the next one.
pub struct StaticResponder {
    assets: Assets,
    state_path: PathBuf,
    read_timeout: Duration,
}

impl StaticResponder {
    pub fn new(assets: Assets, state_path: impl Into<PathBuf>) -> Self {
        Self {
            assets,
            state_path: state_path.into(),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Maps a request to its response.
    pub fn respond(&self, request: &Request) -> Response {
        match request.route().as_str() {
            "GET /" => Response::ok("text/html; charset=utf-8", self.assets.index_page.clone()),
            "GET /index.js" => Response::ok("text/javascript", self.assets.script.clone()),
            "GET /server" => Response::ok("text/plain", "OK"),
            "GET /wg0.conf" => self.export(),
            _ => Response::not_found(),
        }
    }

    fn export(&self) -> Response {
        let state = match storage::load(&self.state_path) {
            Ok(state) => state,
            Err(e) => {
                warn!("Failed to load state for export: {}", e);
                return Response::new(Status::InternalServerError);
            }
        };
        let session = Session::from_state(state, KeyMaterialGenerator::new());
        let mut sink = MemoryDownload::default();
        match session.export(&mut sink) {
            Ok(Notice::ConfigurationExported) => match sink.downloads.pop() {
                Some(download) => Response::ok(download.mime_type, download.content)
                    .with_header(
                        "Content-Disposition",
                        &format!("attachment; filename=\"{}\"", download.file_name),
                    ),
                None => Response::new(Status::InternalServerError),
            },
            Ok(notice) => Response::not_found().with_body(notice.to_string()),
            Err(e) => {
                warn!("Export failed: {}", e);
                Response::new(Status::InternalServerError)
            }
        }
    }

    /// Answers a single request on `stream`, then closes it.
    ///
    /// A stream that stays silent past the read timeout is answered with `408`.
    ///
    /// # Errors
    ///
    /// Returns an error if the response cannot be written.
    pub async fn handle<S>(&self, stream: S) -> std::io::Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut framed = Framed::new(stream, HttpFramer);
        let next = tokio::time::timeout(self.read_timeout, framed.next()).await;
        let Ok(next) = next else {
            warn!("No request within {:?}, closing", self.read_timeout);
            return framed.send(Response::new(Status::RequestTimeout)).await;
        };
        let response = match next {
            Some(Ok(request)) => {
                let response = self.respond(&request);
                info!("{} -> {}", request.route(), response.status() as u16);
                response
            }
            Some(Err(e)) => {
                warn!("Bad request: {}", e);
                Response::new(Status::BadRequest)
            }
            // Closed before a full request arrived.
            None => return Ok(()),
        };
        // `send` flushes; the stream is closed when `framed` is dropped.
        framed.send(response).await
    }

    /// Accepts connections forever, handling each one to completion before the next.
    ///
    /// # Errors
    ///
    /// Returns an error if accepting a connection fails.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        info!(
            "Server started at :{}",
            listener.local_addr().context("Listener has no address")?.port()
        );
        loop {
            let (stream, peer) = listener
                .accept()
                .await
                .context("Failed to accept connection.")?;
            if let Err(e) = self.handle(stream).await {
                warn!("Connection from {} failed: {}", peer, e);
            }
        }
    }
}
