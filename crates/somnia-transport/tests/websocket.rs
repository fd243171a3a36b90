//! Integration tests for the WebSocket transport using a real client.

use futures_util::{SinkExt, StreamExt};
use somnia_transport::{Connection, Transport, WebSocketTransport};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

async fn bind() -> (WebSocketTransport, String) {
    let transport = WebSocketTransport::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = transport.local_addr().expect("local addr");
    (transport, format!("ws://{addr}"))
}

#[tokio::test]
async fn accepts_and_echoes_binary() {
    let (mut transport, url) = bind().await;
    let server = tokio::spawn(async move {
        let conn = transport.accept().await.expect("accept");
        let data = conn.recv().await.expect("recv").expect("open");
        conn.send(&data).await.expect("send");
    });

    let (mut client, _) = connect_async(&url).await.expect("connect");
    client
        .send(Message::Binary(b"hello".to_vec().into()))
        .await
        .expect("client send");
    let reply = client.next().await.expect("reply").expect("ws ok");
    assert_eq!(reply.into_data().as_ref(), b"hello");
    server.await.unwrap();
}

#[tokio::test]
async fn text_frames_arrive_as_bytes() {
    let (mut transport, url) = bind().await;
    let server = tokio::spawn(async move {
        let conn = transport.accept().await.expect("accept");
        conn.recv().await.expect("recv").expect("open")
    });

    let (mut client, _) = connect_async(&url).await.expect("connect");
    client
        .send(Message::Text("{\"seq\":1}".into()))
        .await
        .expect("client send");
    assert_eq!(server.await.unwrap(), b"{\"seq\":1}");
}

#[tokio::test]
async fn clone_can_send_while_other_clone_receives() {
    let (mut transport, url) = bind().await;
    let server = tokio::spawn(async move {
        let conn = transport.accept().await.expect("accept");
        let writer = conn.clone();

        // The reader side blocks in recv while the writer clone pushes
        // a frame out; a shared stream lock would deadlock this.
        let reader = tokio::spawn(async move {
            conn.recv().await.expect("recv").expect("open")
        });
        writer.send(b"from-server").await.expect("send");
        reader.await.unwrap()
    });

    let (mut client, _) = connect_async(&url).await.expect("connect");
    let pushed = client.next().await.expect("frame").expect("ws ok");
    assert_eq!(pushed.into_data().as_ref(), b"from-server");
    client
        .send(Message::Binary(b"from-client".to_vec().into()))
        .await
        .expect("client send");
    assert_eq!(server.await.unwrap(), b"from-client");
}

#[tokio::test]
async fn recv_returns_none_on_client_close() {
    let (mut transport, url) = bind().await;
    let server = tokio::spawn(async move {
        let conn = transport.accept().await.expect("accept");
        conn.recv().await.expect("recv")
    });

    let (mut client, _) = connect_async(&url).await.expect("connect");
    client.close(None).await.expect("close");
    assert!(server.await.unwrap().is_none());
}
