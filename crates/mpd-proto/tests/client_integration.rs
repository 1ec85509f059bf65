//! Drives `MpdClient` against a scripted in-memory daemon.

use mpd_proto::{MpdClient, PlayState, ProtocolError};
use tokio::io::{duplex, AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

/// Spawn a fake daemon that greets, then answers each received line from
/// `script` in order, returning the lines it saw.
fn spawn_daemon(
    io: DuplexStream,
    script: Vec<&'static str>,
) -> tokio::task::JoinHandle<Vec<String>> {
    tokio::spawn(async move {
        let (read, mut write) = tokio::io::split(io);
        let mut lines = BufReader::new(read).lines();
        write.write_all(b"OK MPD 0.23.5\n").await.unwrap();

        let mut seen = Vec::new();
        for reply in script {
            let Some(line) = lines.next_line().await.unwrap() else {
                break;
            };
            seen.push(line);
            write.write_all(reply.as_bytes()).await.unwrap();
        }
        seen
    })
}

#[tokio::test]
async fn search_round_trip() {
    let (client_io, daemon_io) = duplex(4096);
    let daemon = spawn_daemon(
        daemon_io,
        vec![concat!(
            "file: Beatles/Abbey Road/01 Come Together.flac\n",
            "Title: Come Together\n",
            "Artist: The Beatles\n",
            "Album: Abbey Road\n",
            "duration: 259.000\n",
            "file: Beatles/Abbey Road/17 Her Majesty.flac\n",
            "Title: Her Majesty\n",
            "OK\n",
        )],
    );

    let mut client = MpdClient::handshake(client_io).await.unwrap();
    assert_eq!(client.version(), "0.23.5");

    let songs = client
        .search(&[
            ("any".to_string(), "beatles".to_string()),
            ("album".to_string(), "abbey road".to_string()),
        ])
        .await
        .unwrap();

    assert_eq!(songs.len(), 2);
    assert_eq!(songs[0].title(), "Come Together");
    assert_eq!(songs[1].title(), "Her Majesty");

    let seen = daemon.await.unwrap();
    assert_eq!(
        seen,
        vec![r#"search "any" "beatles" "album" "abbey road""#.to_string()]
    );
}

#[tokio::test]
async fn ack_is_reported_and_connection_stays_usable() {
    let (client_io, daemon_io) = duplex(4096);
    let daemon = spawn_daemon(
        daemon_io,
        vec![
            "ACK [50@0] {add} No such directory\n",
            "state: play\nplaylistlength: 4\nOK\n",
        ],
    );

    let mut client = MpdClient::handshake(client_io).await.unwrap();

    let err = client.add("missing.flac").await.unwrap_err();
    match &err {
        ProtocolError::Ack(ack) => assert_eq!(ack.code, 50),
        other => panic!("expected ACK, got {other:?}"),
    }
    assert!(!err.is_connection_error());

    let status = client.status().await.unwrap();
    assert_eq!(status.state, PlayState::Play);
    assert_eq!(status.playlist_length, 4);

    daemon.await.unwrap();
}

#[tokio::test]
async fn closed_connection_mid_response() {
    let (client_io, daemon_io) = duplex(4096);
    let daemon = spawn_daemon(daemon_io, vec!["file: a.flac\n"]);

    let mut client = MpdClient::handshake(client_io).await.unwrap();
    let join = tokio::spawn(async move { client.playlist_info().await });

    daemon.await.unwrap();
    let err = join.await.unwrap().unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn rejects_non_mpd_greeting() {
    let (client_io, mut daemon_io) = duplex(256);
    daemon_io.write_all(b"Title: hello\n").await.unwrap();
    let err = MpdClient::handshake(client_io).await.err().unwrap();
    assert!(matches!(err, ProtocolError::BadGreeting(_)));
}
