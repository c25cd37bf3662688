//! Exercises `ConnectionMux` end to end over real TCP sockets: a channel
//! that is only pending gets its first connection bound on arrival, a
//! later frame for the same channel on a different connection migrates
//! it, and a connection accepted with no pending channel waiting for it
//! is refused outright.

use std::time::Duration;

use mrcp_core::generator::generate;
use mrcp_core::message::{ChannelId, RequestId, StartLine};
use mrcp_core::version::MessageVersion;
use mrcp_core::MrcpMessage;
use mrcp_transport::ConnectionMux;
use mrcp_transport::Transport;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

fn speak_request(channel_id: ChannelId, request_id: u32) -> MrcpMessage {
    MrcpMessage::new(StartLine::Request {
        version: MessageVersion::V2,
        request_id: RequestId::new(request_id).unwrap(),
        method_id: Some(2),
        method_name: "SPEAK".to_string(),
    })
    .with_channel_id(channel_id)
}

async fn send_message(stream: &mut TcpStream, message: &MrcpMessage) {
    let mut buf = bytes::BytesMut::new();
    generate(message, &mut buf).unwrap();
    stream.write_all(&buf).await.unwrap();
}

#[tokio::test]
async fn first_frame_binds_a_pending_channel() {
    let (tx, mut rx) = mpsc::channel(16);
    let mux = ConnectionMux::new(Transport::Tcp, tx);
    let addr = mux.clone().listen("127.0.0.1:0".parse().unwrap()).await.unwrap();

    let channel_id = ChannelId::new("sess-bind", "speechsynth");
    mux.register_pending(channel_id.to_string());
    assert!(mux.channel_connection(&channel_id.to_string()).is_none());

    let mut client = TcpStream::connect(addr).await.unwrap();
    send_message(&mut client, &speak_request(channel_id.clone(), 1)).await;

    let frame = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
    assert_eq!(frame.message.channel_id, Some(channel_id.clone()));
    assert!(mux.channel_connection(&channel_id.to_string()).is_some());
}

#[tokio::test]
async fn second_connection_migrates_an_already_bound_channel() {
    let (tx, mut rx) = mpsc::channel(16);
    let mux = ConnectionMux::new(Transport::Tcp, tx);
    let addr = mux.clone().listen("127.0.0.1:0".parse().unwrap()).await.unwrap();

    let channel_id = ChannelId::new("sess-migrate", "speechsynth");
    mux.register_pending(channel_id.to_string());

    let mut first = TcpStream::connect(addr).await.unwrap();
    send_message(&mut first, &speak_request(channel_id.clone(), 1)).await;
    let first_frame = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
    let first_connection = mux.channel_connection(&channel_id.to_string()).unwrap();
    assert_eq!(first_connection.id, first_frame.connection_id);

    // A second, unrelated channel is what invites the second connection
    // in (the accept-reject policy only cares that *some* channel is
    // pending); the frame that arrives on it names the already-bound
    // channel above, which is what actually triggers migration.
    let other_channel_id = ChannelId::new("sess-migrate", "speechrecog");
    mux.register_pending(other_channel_id.to_string());
    let mut second = TcpStream::connect(addr).await.unwrap();
    send_message(&mut second, &speak_request(channel_id.clone(), 2)).await;
    let second_frame = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();

    assert_ne!(second_frame.connection_id, first_frame.connection_id);
    let migrated_connection = mux.channel_connection(&channel_id.to_string()).unwrap();
    assert_eq!(migrated_connection.id, second_frame.connection_id);
}

#[tokio::test]
async fn connection_with_no_pending_channel_is_refused() {
    let (tx, _rx) = mpsc::channel(16);
    let mux = ConnectionMux::new(Transport::Tcp, tx);
    let addr = mux.listen("127.0.0.1:0".parse().unwrap()).await.unwrap();

    // Nothing was ever registered as pending, so this connection was not
    // invited by any offer.
    let mut client = TcpStream::connect(addr).await.unwrap();
    let mut buf = [0u8; 16];
    let read = tokio::time::timeout(Duration::from_secs(2), client.read(&mut buf)).await.unwrap().unwrap();
    assert_eq!(read, 0, "server should have closed the connection immediately");
}
