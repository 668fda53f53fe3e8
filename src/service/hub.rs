use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub type ConnectionId = u64;

/// 实时推送连接表
#[derive(Debug, Default)]
pub struct ConnectionHub {
    next_id: AtomicU64,
    connections: DashMap<ConnectionId, UnboundedSender<String>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记连接, 返回其 ID 与待发送帧的接收端
    pub fn register(&self) -> (ConnectionId, UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(id, tx);
        (id, rx)
    }

    pub fn unregister(&self, id: ConnectionId) {
        self.connections.remove(&id);
    }

    /// 推送给所有连接, 已关闭的连接顺带移除; 返回送达数
    pub fn broadcast(&self, frame: &str) -> usize {
        let mut closed = Vec::new();
        let mut delivered = 0;

        for conn in self.connections.iter() {
            if conn.value().send(frame.to_string()).is_ok() {
                delivered += 1;
            } else {
                closed.push(*conn.key());
            }
        }

        // 迭代期间持有分片读锁, 移除放在迭代之后
        for id in closed {
            self.connections.remove(&id);
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
