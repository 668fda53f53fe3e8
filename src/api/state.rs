use crate::service::{ClientRegistry, LedgerService};
use std::sync::Arc;

/// 共享状态：账本服务 + 客户登记簿 (登记簿加载失败时为 None)
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub registry: Option<Arc<ClientRegistry>>,
}

impl AppState {
    pub fn new(ledger: Arc<LedgerService>, registry: Option<Arc<ClientRegistry>>) -> Self {
        Self { ledger, registry }
    }
}
