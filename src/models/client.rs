use crate::models::amount;
use crate::models::sheet_date::SheetDate;
use bigdecimal::BigDecimal;
use serde::{Serialize, Serializer};

/// 客户的一笔交易
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientTransaction {
    pub date: SheetDate,
    #[serde(serialize_with = "amount::serialize")]
    pub amount: BigDecimal,
    #[serde(rename = "id")]
    pub row_reference: String,
}

/// 客户聚合记录 (单次分析内有效)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    #[serde(rename = "id")]
    pub key: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub is_nickname: bool,
    #[serde(serialize_with = "amount::serialize")]
    pub total_revenue: BigDecimal,
    pub transaction_count: usize,
    pub first_date: SheetDate,
    pub last_date: SheetDate,
    #[serde(rename = "avgTransaction", serialize_with = "amount::serialize")]
    pub average_transaction: BigDecimal,
    pub transactions: Vec<ClientTransaction>,
}

/// 全体客户汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub total_clients: usize,
    #[serde(serialize_with = "amount::serialize")]
    pub total_revenue: BigDecimal,
    #[serde(serialize_with = "amount::serialize")]
    pub avg_revenue_per_client: BigDecimal,
}

/// 客户分析响应: 失败时 clients 为空, stats 为 `{}`, 并带 error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientAnalytics {
    pub clients: Vec<ClientRecord>,
    #[serde(serialize_with = "stats_or_empty")]
    pub stats: Option<ClientStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClientAnalytics {
    /// 无数据 (快照不可用/为空)
    pub fn empty() -> Self {
        Self {
            clients: Vec::new(),
            stats: None,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::empty()
        }
    }
}

fn stats_or_empty<S: Serializer>(stats: &Option<ClientStats>, serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;
    match stats {
        Some(s) => s.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
