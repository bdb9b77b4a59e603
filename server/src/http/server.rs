//! Hyper server setup and connection handling.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::Instrument;

use super::router::Router;

/// HTTP/1 server: one task per accepted connection.
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
}

impl Server {
    /// Bind `addr`. Port 0 picks a free port; see [`Server::local_addr`].
    pub async fn bind(addr: SocketAddr, router: Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` resolves.
    pub async fn serve_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(addr = %self.local_addr()?, "HTTP server listening");
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                },
            };

            let io = TokioIo::new(stream);
            let router = Arc::clone(&self.router);

            tokio::spawn(
                async move {
                    let service =
                        service_fn(move |req| handle_request(req, Arc::clone(&router)));
                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        tracing::debug!(error = %err, "Error serving connection");
                    }
                }
                .instrument(connection_span(peer)),
            );
        }
    }
}

/// Span covering one accepted connection until hyper finishes with it.
fn connection_span(peer: SocketAddr) -> tracing::Span {
    tracing::info_span!("connection", %peer)
}

async fn handle_request(
    req: Request<Incoming>,
    router: Arc<Router>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(router.route(req).await.map(Full::new))
}
