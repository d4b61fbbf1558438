//! TCP 连接测试（本地回环对端）

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use smpp_transport::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Mutex};

/// 记录收到的帧，并把每个帧原样回送
struct EchoBackHandler {
    frames: mpsc::UnboundedSender<Bytes>,
    closed: Mutex<Option<Option<String>>>,
}

#[async_trait]
impl InboundHandler for EchoBackHandler {
    async fn on_frame(&self, frame: Bytes, reply: Arc<dyn FrameSink>) {
        let _ = self.frames.send(frame.clone());
        let _ = reply.send_frame(frame).await;
    }

    async fn on_closed(&self, _peer: &PeerInfo, reason: Option<String>) {
        *self.closed.lock().await = Some(reason);
    }
}

fn frame(command_id: u32, seq: u32) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u32(16);
    buf.put_u32(command_id);
    buf.put_u32(0);
    buf.put_u32(seq);
    buf.freeze()
}

#[tokio::test]
async fn test_open_send_receive_close() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // 对端：读一个帧，回送一个 enquire_link 请求，再读回送回来的帧
    let peer_task = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 16];
        socket.read_exact(&mut buf).await.unwrap();
        socket.write_all(&frame(0x15, 42)).await.unwrap();
        let mut echoed = [0u8; 16];
        socket.read_exact(&mut echoed).await.unwrap();
        (buf, echoed)
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let handler = Arc::new(EchoBackHandler {
        frames: tx,
        closed: Mutex::new(None),
    });

    let connector = TcpConnector::default();
    let mut conn = connector
        .open(&PeerInfo::new("127.0.0.1", port), handler.clone())
        .await
        .unwrap();
    assert_eq!(conn.state().await, ConnectionState::Connected);

    conn.sink().send_frame(frame(0x04, 1)).await.unwrap();

    let inbound = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(&inbound[..], &frame(0x15, 42)[..]);

    let (sent, echoed) = peer_task.await.unwrap();
    assert_eq!(&sent[..], &frame(0x04, 1)[..]);
    assert_eq!(&echoed[..], &frame(0x15, 42)[..]);

    conn.close().await.unwrap();
    assert_eq!(conn.state().await, ConnectionState::Disconnected);

    // 本端主动关闭不触发 on_closed
    assert!(handler.closed.lock().await.is_none());

    // 关闭后发送失败
    assert!(matches!(
        conn.sink().send_frame(frame(0x15, 2)).await,
        Err(TransportError::Disconnected)
    ));
}

#[tokio::test]
async fn test_peer_close_reported_once() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        drop(socket);
    });

    let (tx, _rx) = mpsc::unbounded_channel();
    let handler = Arc::new(EchoBackHandler {
        frames: tx,
        closed: Mutex::new(None),
    });

    let mut conn = TcpConnector::default()
        .open(&PeerInfo::new("127.0.0.1", port), handler.clone())
        .await
        .unwrap();

    for _ in 0..50 {
        if handler.closed.lock().await.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(*handler.closed.lock().await, Some(None));
    assert_eq!(conn.state().await, ConnectionState::Disconnected);
    conn.close().await.ok();
}

#[tokio::test]
async fn test_connect_refused() {
    // 绑定后立即释放，得到一个大概率无人监听的端口
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let (tx, _rx) = mpsc::unbounded_channel();
    let handler = Arc::new(EchoBackHandler {
        frames: tx,
        closed: Mutex::new(None),
    });

    let result = TcpConnector::default()
        .open(&PeerInfo::new("127.0.0.1", port), handler)
        .await;
    assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
}
