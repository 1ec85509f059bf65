//! Single-owner task for the MPD connection.
//!
//! All daemon traffic goes through one [`DaemonActor`]. Requests arrive over
//! an mpsc channel with a oneshot for the reply, so the connection is never
//! shared and commands never interleave on the wire.

use super::{DaemonError, MusicDaemon, SearchQuery};
use async_trait::async_trait;
use futures_util::future::BoxFuture;
use mpd_proto::{MpdClient, ProtocolError, Request, Song, Status};
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, info, warn};

type Pairs = Vec<(String, String)>;
type ConnectFn<S> = Box<dyn FnMut() -> BoxFuture<'static, mpd_proto::Result<MpdClient<S>>> + Send>;

const MAILBOX_CAPACITY: usize = 32;

enum DaemonRequest {
    Execute {
        request: Request,
        reply: oneshot::Sender<Result<Pairs, DaemonError>>,
    },
}

/// Owns the connection and serves requests one at a time.
///
/// The connection is opened on the first request. When a request fails
/// because the connection broke, the actor drops it and replays the request
/// once on a fresh connection before giving up.
pub struct DaemonActor<S = TcpStream> {
    connect: ConnectFn<S>,
    io_timeout: Duration,
    client: Option<MpdClient<S>>,
}

impl DaemonActor<TcpStream> {
    /// Spawn an actor talking to `server:port` over TCP.
    pub fn spawn_tcp(server: String, port: u16, io_timeout: Duration) -> DaemonHandle {
        Self::spawn(
            move || {
                let host = server.clone();
                Box::pin(async move { MpdClient::connect(&host, port).await })
            },
            io_timeout,
        )
    }
}

impl<S> DaemonActor<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Spawn an actor that opens connections with `connect`.
    pub fn spawn<F>(connect: F, io_timeout: Duration) -> DaemonHandle
    where
        F: FnMut() -> BoxFuture<'static, mpd_proto::Result<MpdClient<S>>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        let actor = Self {
            connect: Box::new(connect),
            io_timeout,
            client: None,
        };
        tokio::spawn(actor.run(rx));
        DaemonHandle { tx }
    }

    async fn run(mut self, mut rx: mpsc::Receiver<DaemonRequest>) {
        while let Some(msg) = rx.recv().await {
            match msg {
                DaemonRequest::Execute { request, reply } => {
                    let result = self.execute(request).await;
                    // Caller may have given up; nothing to do then.
                    let _ = reply.send(result);
                }
            }
        }
        debug!("daemon actor stopped");
    }

    async fn execute(&mut self, request: Request) -> Result<Pairs, DaemonError> {
        let err = match self.try_execute(request.clone()).await {
            Ok(pairs) => return Ok(pairs),
            Err(e) if !e.is_connection_error() => return Err(e.into()),
            Err(e) => e,
        };

        warn!(command = request.name(), error = %err, "daemon connection lost, reconnecting");
        self.client = None;

        match self.try_execute(request).await {
            Ok(pairs) => Ok(pairs),
            Err(e) if e.is_connection_error() => {
                self.client = None;
                Err(DaemonError::Unavailable(e.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn try_execute(&mut self, request: Request) -> mpd_proto::Result<Pairs> {
        if self.client.is_none() {
            let client = timeout(self.io_timeout, (self.connect)())
                .await
                .map_err(|_| timed_out("connect"))??;
            info!(version = client.version(), "connected to music daemon");
            self.client = Some(client);
        }

        let Some(client) = self.client.as_mut() else {
            return Err(ProtocolError::ConnectionClosed);
        };
        timeout(self.io_timeout, client.execute(request))
            .await
            .map_err(|_| timed_out("request"))?
    }
}

fn timed_out(stage: &str) -> ProtocolError {
    ProtocolError::Io(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("{stage} timed out"),
    ))
}

/// Cloneable front for a [`DaemonActor`].
#[derive(Clone)]
pub struct DaemonHandle {
    tx: mpsc::Sender<DaemonRequest>,
}

impl DaemonHandle {
    async fn request(&self, request: Request) -> Result<Pairs, DaemonError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(DaemonRequest::Execute { request, reply })
            .await
            .map_err(|_| DaemonError::ActorGone)?;
        rx.await.map_err(|_| DaemonError::ActorGone)?
    }
}

#[async_trait]
impl MusicDaemon for DaemonHandle {
    async fn current_song(&self) -> Result<Option<Song>, DaemonError> {
        Ok(Song::from_pairs(self.request(Request::current_song()).await?))
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Song>, DaemonError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let request = Request::search(
            query
                .pairs()
                .iter()
                .map(|(tag, value)| (tag.as_str(), value.as_str())),
        );
        Ok(Song::list_from_pairs(self.request(request).await?))
    }

    async fn playlist(&self) -> Result<Vec<Song>, DaemonError> {
        Ok(Song::list_from_pairs(
            self.request(Request::playlist_info()).await?,
        ))
    }

    async fn add(&self, uri: &str) -> Result<(), DaemonError> {
        self.request(Request::add(uri)).await.map(drop)
    }

    async fn set_pause(&self, paused: bool) -> Result<(), DaemonError> {
        self.request(Request::pause(paused)).await.map(drop)
    }

    async fn play(&self, position: u32) -> Result<(), DaemonError> {
        self.request(Request::play(position)).await.map(drop)
    }

    async fn status(&self) -> Result<Status, DaemonError> {
        Ok(Status::from_pairs(self.request(Request::status()).await?))
    }
}
