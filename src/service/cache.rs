use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// 默认过期时间 300 秒
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct CachedPayload {
    payload: Arc<str>,
    stored_at: Instant,
}

/// 进程内快照缓存: 单槽位, 保存序列化后的快照 JSON, 超时即失效
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    slot: RwLock<Option<CachedPayload>>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self) -> Option<Arc<str>> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|c| c.stored_at.elapsed() < self.ttl)
            .map(|c| Arc::clone(&c.payload))
    }

    /// 覆盖槽位并重新计时
    pub async fn set(&self, payload: impl Into<Arc<str>>) {
        *self.slot.write().await = Some(CachedPayload {
            payload: payload.into(),
            stored_at: Instant::now(),
        });
    }

    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
