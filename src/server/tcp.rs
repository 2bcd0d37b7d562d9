use std::io::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use crate::server::protocol::{ProtocolError, Request, Response, read_frame, write_frame};
use crate::service::WorldService;

/// Answer one request. Service errors become `Response::Error`.
pub fn handle_request(service: &WorldService, request: Request) -> Response {
    let result = match request {
        Request::Chunk { x, z, seed } => service
            .chunk(&x, &z, seed.as_deref())
            .map(Response::Chunk),
        Request::WorldInfo { world_id } => Ok(Response::WorldInfo(service.world_info(&world_id))),
        Request::CreateWorld { name, seed } => service
            .create_world(&name, seed.as_deref())
            .map(Response::World),
        Request::Ping { timestamp } => Ok(Response::Pong { timestamp }),
    };

    result.unwrap_or_else(|e| Response::Error {
        message: e.to_string(),
    })
}

/// TCP server answering generation requests
pub struct GenerationServer {
    listener: TcpListener,
    service: Arc<WorldService>,
    next_id: AtomicU32,
}

impl GenerationServer {
    pub async fn bind(addr: &str, service: Arc<WorldService>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "generation server listening");

        Ok(Self {
            listener,
            service,
            next_id: AtomicU32::new(1),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever, one task per client
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, addr) = self.listener.accept().await?;
            stream.set_nodelay(true)?;

            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            let service = self.service.clone();
            debug!(id, %addr, "client connected");

            tokio::spawn(async move {
                match serve_connection(stream, service).await {
                    Ok(served) => debug!(id, served, "client disconnected"),
                    Err(e) => warn!(id, %addr, error = %e, "client connection failed"),
                }
            });
        }
    }
}

/// Serve frames until the client closes; returns the number of requests answered
async fn serve_connection(
    mut stream: TcpStream,
    service: Arc<WorldService>,
) -> std::result::Result<usize, ProtocolError> {
    let mut served = 0;

    while let Some(request) = read_frame::<_, Request>(&mut stream).await? {
        let service = service.clone();
        // Generation is CPU-bound, keep it off the reactor threads
        let response = tokio::task::spawn_blocking(move || handle_request(&service, request))
            .await
            .unwrap_or_else(|e| Response::Error {
                message: format!("generation task failed: {e}"),
            });

        write_frame(&mut stream, &response).await?;
        served += 1;
    }

    Ok(served)
}

/// Client for a [`GenerationServer`]
pub struct GenerationClient {
    stream: TcpStream,
}

impl GenerationClient {
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        debug!(%addr, "connected to generation server");
        Ok(Self { stream })
    }

    /// Send a request and wait for its response
    pub async fn request(&mut self, request: &Request) -> std::result::Result<Response, ProtocolError> {
        write_frame(&mut self.stream, request).await?;
        match read_frame(&mut self.stream).await? {
            Some(response) => Ok(response),
            None => Err(ProtocolError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "server closed the connection",
            ))),
        }
    }
}
