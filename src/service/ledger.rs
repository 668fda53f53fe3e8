use crate::db::LedgerStore;
use crate::error::StoreError;
use crate::models::{NewEntry, ServerMessage, Snapshot};
use crate::service::cache::SnapshotCache;
use crate::service::hub::ConnectionHub;
use crate::service::snapshot::build_snapshot;
use bigdecimal::BigDecimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// 账本服务: 数据源 + 快照缓存 + 实时推送
pub struct LedgerService {
    store: Option<Arc<dyn LedgerStore>>,
    cache: SnapshotCache,
    hub: Arc<ConnectionHub>,
}

impl LedgerService {
    /// store 为 None 时降级运行 (只读缓存, 写请求被忽略)
    pub fn new(store: Option<Arc<dyn LedgerStore>>, cache_ttl: Duration) -> Self {
        Self {
            store,
            cache: SnapshotCache::new(cache_ttl),
            hub: Arc::new(ConnectionHub::new()),
        }
    }

    pub fn hub(&self) -> &Arc<ConnectionHub> {
        &self.hub
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// 数据源可用 (已配置且探测成功)
    pub async fn store_healthy(&self) -> bool {
        match self.store() {
            Some(store) => match store.ping().await {
                Ok(()) => true,
                Err(e) => {
                    error!("Ledger store ping failed: {}", e);
                    false
                }
            },
            None => false,
        }
    }

    fn store(&self) -> Option<&Arc<dyn LedgerStore>> {
        self.store.as_ref()
    }

    /// 从数据源读取并写入缓存, 返回快照和缓存内容
    async fn refresh(&self, store: &dyn LedgerStore) -> Result<(Snapshot, Arc<str>), StoreError> {
        let rows = store.read_rows().await?;
        let snapshot = build_snapshot(&rows);
        let payload: Arc<str> = serde_json::to_string(&snapshot)?.into();
        self.cache.set(Arc::clone(&payload)).await;
        Ok((snapshot, payload))
    }

    /// 当前快照 JSON: 先查缓存, 未命中回源; 无数据源且缓存为空时返回 None
    pub async fn cached_payload(&self) -> Option<Arc<str>> {
        if let Some(payload) = self.cache.get().await {
            return Some(payload);
        }

        let store = self.store()?;
        match self.refresh(store.as_ref()).await {
            Ok((_, payload)) => Some(payload),
            Err(e) => {
                error!("Snapshot reload failed: {}", e);
                None
            }
        }
    }

    /// 当前快照 (解码失败视为无数据)
    pub async fn snapshot(&self) -> Option<Snapshot> {
        let payload = self.cached_payload().await?;
        match Snapshot::from_json(&payload) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                error!("Cached snapshot is not decodable: {}", e);
                None
            }
        }
    }

    /// 同步: 回源刷新缓存并推送给所有连接, 返回周期数
    pub async fn sync(&self) -> Result<usize, StoreError> {
        let Some(store) = self.store() else {
            return Ok(0);
        };

        let (snapshot, _) = self.refresh(store.as_ref()).await?;
        if !self.hub.is_empty() {
            let frame = ServerMessage::Sync { data: &snapshot }.to_frame()?;
            self.hub.broadcast(&frame);
        }

        info!("✅ Sync: {} periods", snapshot.period_count());
        Ok(snapshot.period_count())
    }

    /// 写入后立即同步; 无数据源时返回 None
    pub async fn add_entry(&self, entry: &NewEntry) -> Option<Result<i64, StoreError>> {
        let store = self.store()?;
        Some(self.write_then_sync(store.push_row(entry).await).await)
    }

    pub async fn update_entry(
        &self,
        row_idx: i64,
        symbols: &str,
        amount: Option<&BigDecimal>,
    ) -> Option<Result<(), StoreError>> {
        let store = self.store()?;
        Some(self.write_then_sync(store.update_row(row_idx, symbols, amount).await).await)
    }

    pub async fn delete_entry(&self, row_idx: i64) -> Option<Result<(), StoreError>> {
        let store = self.store()?;
        Some(self.write_then_sync(store.delete_row(row_idx).await).await)
    }

    async fn write_then_sync<T>(&self, written: Result<T, StoreError>) -> Result<T, StoreError> {
        let value = written?;
        if let Err(e) = self.sync().await {
            // 写入已生效, 同步失败只影响推送, 下个周期会补上
            error!("Sync after write failed: {}", e);
            self.cache.invalidate().await;
        }
        Ok(value)
    }
}

/// 后台同步循环, 出错记录后继续; 由调用方 abort 取消
pub async fn run_sync_loop(ledger: Arc<LedgerService>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if let Err(e) = ledger.sync().await {
            error!("Sync error: {}", e);
        }
    }
}
