//! 对端连接管理
//!
//! 连接打开后读写分离：写半部由 [`FrameSink`] 持有并加锁，脚本线程与入站任务共用；
//! 读半部交给一个独立的入站任务，按到达顺序逐帧调用 [`InboundHandler`]。

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

use crate::{FrameCodec, PeerInfo, Result, TransportConfig, TransportError};

/// 连接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// 已连接
    Connected,
    /// 已断开（本端关闭或对端正常关闭）
    Disconnected,
    /// 读取失败
    Failed,
}

/// 帧发送端
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// 发送一个完整帧
    async fn send_frame(&self, frame: Bytes) -> Result<()>;
}

/// 入站帧处理器
///
/// 同一连接上的调用由入站任务串行发起，不会并发。
#[async_trait]
pub trait InboundHandler: Send + Sync {
    /// 收到一个完整帧；`reply` 用于回送响应
    async fn on_frame(&self, frame: Bytes, reply: Arc<dyn FrameSink>);

    /// 对端关闭或读取失败（本端主动关闭时不调用）
    async fn on_closed(&self, peer: &PeerInfo, reason: Option<String>);
}

/// 一个已打开的对端连接
#[async_trait]
pub trait PeerConnection: Send + Sync {
    /// 对端信息
    fn peer(&self) -> &PeerInfo;

    /// 发送端
    fn sink(&self) -> Arc<dyn FrameSink>;

    /// 当前状态
    async fn state(&self) -> ConnectionState;

    /// 关闭连接并等待入站任务结束
    async fn close(&mut self) -> Result<()>;
}

/// 连接工厂
#[async_trait]
pub trait Connector: Send + Sync {
    /// 打开到 `peer` 的连接，入站帧交给 `handler`
    async fn open(
        &self,
        peer: &PeerInfo,
        handler: Arc<dyn InboundHandler>,
    ) -> Result<Box<dyn PeerConnection>>;
}

/// TCP 连接工厂
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    config: Arc<TransportConfig>,
}

impl TcpConnector {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn open(
        &self,
        peer: &PeerInfo,
        handler: Arc<dyn InboundHandler>,
    ) -> Result<Box<dyn PeerConnection>> {
        info!("连接到对端: {}", peer);

        let stream = TcpStream::connect((peer.host.as_str(), peer.port))
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        stream.set_nodelay(self.config.tcp_nodelay)?;

        let (read_half, write_half) = stream.into_split();
        let codec = FrameCodec::new(self.config.max_frame_len);

        let sink = Arc::new(TcpFrameSink {
            peer: peer.clone(),
            writer: Mutex::new(Some(FramedWrite::new(write_half, codec.clone()))),
        });
        let state = Arc::new(Mutex::new(ConnectionState::Connected));

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let mut reader = FramedRead::new(read_half, codec);
        let reply: Arc<dyn FrameSink> = sink.clone();
        let task_state = Arc::clone(&state);
        let task_peer = peer.clone();

        let reader_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;

                    _ = &mut shutdown_rx => {
                        debug!("入站任务停止: {}", task_peer);
                        break;
                    }
                    next = reader.next() => match next {
                        Some(Ok(frame)) => {
                            handler.on_frame(frame.freeze(), Arc::clone(&reply)).await;
                        }
                        Some(Err(e)) => {
                            warn!("读取对端 {} 失败: {}", task_peer, e);
                            *task_state.lock().await = ConnectionState::Failed;
                            handler.on_closed(&task_peer, Some(e.to_string())).await;
                            break;
                        }
                        None => {
                            info!("对端 {} 关闭了连接", task_peer);
                            *task_state.lock().await = ConnectionState::Disconnected;
                            handler.on_closed(&task_peer, None).await;
                            break;
                        }
                    }
                }
            }
        });

        info!("成功连接到对端: {}", peer);

        Ok(Box::new(TcpConnection {
            peer: peer.clone(),
            sink,
            state,
            reader_shutdown: Some(shutdown_tx),
            reader_task: Some(reader_task),
        }))
    }
}

/// TCP 写半部
struct TcpFrameSink {
    peer: PeerInfo,
    writer: Mutex<Option<FramedWrite<OwnedWriteHalf, FrameCodec>>>,
}

impl TcpFrameSink {
    async fn shutdown(&self) -> Result<()> {
        let writer = self.writer.lock().await.take();
        match writer {
            Some(mut writer) => writer.close().await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FrameSink for TcpFrameSink {
    async fn send_frame(&self, frame: Bytes) -> Result<()> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(TransportError::Disconnected)?;

        debug!("发送 {} 字节到 {}", frame.len(), self.peer);
        writer.send(frame).await
    }
}

/// TCP 连接
pub struct TcpConnection {
    peer: PeerInfo,
    sink: Arc<TcpFrameSink>,
    state: Arc<Mutex<ConnectionState>>,
    reader_shutdown: Option<oneshot::Sender<()>>,
    reader_task: Option<JoinHandle<()>>,
}

#[async_trait]
impl PeerConnection for TcpConnection {
    fn peer(&self) -> &PeerInfo {
        &self.peer
    }

    fn sink(&self) -> Arc<dyn FrameSink> {
        self.sink.clone()
    }

    async fn state(&self) -> ConnectionState {
        *self.state.lock().await
    }

    async fn close(&mut self) -> Result<()> {
        info!("断开对端连接: {}", self.peer);

        if let Some(tx) = self.reader_shutdown.take() {
            let _ = tx.send(());
        }

        let result = self.sink.shutdown().await;

        if let Some(task) = self.reader_task.take() {
            if let Err(e) = task.await {
                warn!("入站任务异常结束: {}", e);
            }
        }

        *self.state.lock().await = ConnectionState::Disconnected;
        result
    }
}

impl Drop for TcpConnection {
    fn drop(&mut self) {
        if let Some(task) = self.reader_task.take() {
            task.abort();
        }
    }
}
