use crate::error::AnalyticsError;
use crate::models::{ClientAnalytics, Snapshot};
use crate::service::{aggregator::fold_entries, ranking::rank_clients};
use tracing::{error, info, warn};

/// 客户分析 (纯函数): 所有周期的账目按顺序折叠 -> 排名 -> 汇总
pub fn client_analytics(snapshot: &Snapshot) -> ClientAnalytics {
    info!(
        "Processing clients analytics from {} periods, {} entries",
        snapshot.period_count(),
        snapshot.entry_count()
    );

    let clients = fold_entries(snapshot.entries());
    info!("Grouped into {} unique clients", clients.len());

    let analytics = rank_clients(clients);
    if let Some(stats) = &analytics.stats {
        info!(
            "✅ Clients analytics: {} clients, {} total revenue",
            stats.total_clients, stats.total_revenue
        );
    }
    analytics
}

/// 解码缓存快照后分析; 快照结构不合法时整体失败, 不返回部分结果
pub fn analyze_payload(payload: &str) -> Result<ClientAnalytics, AnalyticsError> {
    let snapshot = Snapshot::from_json(payload)?;
    if snapshot.is_empty() {
        return Ok(ClientAnalytics::empty());
    }
    Ok(client_analytics(&snapshot))
}

/// 对外入口: 永不失败, 失败以 error 字段返回
pub fn analytics_response(payload: Option<&str>) -> ClientAnalytics {
    let Some(payload) = payload else {
        warn!("No data in cache for clients analytics");
        return ClientAnalytics::empty();
    };

    match analyze_payload(payload) {
        Ok(analytics) => {
            if analytics.stats.is_none() {
                warn!("Snapshot is empty, no clients analytics");
            }
            analytics
        }
        Err(e) => {
            error!("Error in clients analytics: {:?}", e);
            ClientAnalytics::failed(e.to_string())
        }
    }
}
