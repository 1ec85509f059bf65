//! Async MPD client over any byte stream.

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, trace};

use crate::codec::MpdCodec;
use crate::error::{ProtocolError, Result};
use crate::frame::Frame;
use crate::request::Request;
use crate::response::{Song, Status};

/// A connected MPD session.
///
/// Generic over the stream so tests can drive it with an in-memory duplex.
pub struct MpdClient<T = TcpStream> {
    framed: Framed<T, MpdCodec>,
    version: String,
}

impl MpdClient<TcpStream> {
    /// Open a TCP connection and read the greeting.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        Self::handshake(stream).await
    }
}

impl<T> MpdClient<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already-open stream and consume the `OK MPD` greeting.
    pub async fn handshake(io: T) -> Result<Self> {
        let mut framed = Framed::new(io, MpdCodec::new());
        match framed.next().await {
            Some(Ok(Frame::Greeting(version))) => {
                debug!(version = %version, "MPD greeting received");
                Ok(Self { framed, version })
            }
            Some(Ok(other)) => Err(ProtocolError::BadGreeting(format!("{other:?}"))),
            Some(Err(e)) => Err(e),
            None => Err(ProtocolError::ConnectionClosed),
        }
    }

    /// Protocol version announced by the daemon.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Send one request and collect its pairs up to the terminating `OK`.
    pub async fn execute(&mut self, req: Request) -> Result<Vec<(String, String)>> {
        trace!(command = req.name(), "MPD request");
        self.framed.send(req).await?;

        let mut pairs = Vec::new();
        loop {
            match self.framed.next().await {
                Some(Ok(Frame::Pair(key, value))) => pairs.push((key, value)),
                Some(Ok(Frame::Ok)) => return Ok(pairs),
                Some(Ok(Frame::Ack(ack))) => return Err(ProtocolError::Ack(ack)),
                Some(Ok(Frame::Greeting(g))) => {
                    return Err(ProtocolError::MalformedLine(format!("OK MPD {g}")));
                }
                Some(Err(e)) => return Err(e),
                None => return Err(ProtocolError::ConnectionClosed),
            }
        }
    }

    /// `currentsong`; `None` when nothing is loaded.
    pub async fn current_song(&mut self) -> Result<Option<Song>> {
        Ok(Song::from_pairs(self.execute(Request::current_song()).await?))
    }

    /// `search` with `(tag, value)` filters.
    pub async fn search(&mut self, filters: &[(String, String)]) -> Result<Vec<Song>> {
        let req = Request::search(filters.iter().map(|(t, v)| (t.as_str(), v.as_str())));
        Ok(Song::list_from_pairs(self.execute(req).await?))
    }

    /// `playlistinfo`
    pub async fn playlist_info(&mut self) -> Result<Vec<Song>> {
        Ok(Song::list_from_pairs(
            self.execute(Request::playlist_info()).await?,
        ))
    }

    /// `add`
    pub async fn add(&mut self, uri: &str) -> Result<()> {
        self.execute(Request::add(uri)).await.map(drop)
    }

    /// `pause 0|1`
    pub async fn pause(&mut self, paused: bool) -> Result<()> {
        self.execute(Request::pause(paused)).await.map(drop)
    }

    /// `play <pos>`
    pub async fn play(&mut self, position: u32) -> Result<()> {
        self.execute(Request::play(position)).await.map(drop)
    }

    /// `status`
    pub async fn status(&mut self) -> Result<Status> {
        Ok(Status::from_pairs(self.execute(Request::status()).await?))
    }
}
