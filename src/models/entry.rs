use crate::models::amount;
use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// 账本表格行 (ledger_rows), 单元格保持原始文本
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct LedgerRow {
    pub row_idx: i64,             // 表格行号 (1 起)
    pub date_cell: String,        // A 列: 日期
    pub symbols_cell: Option<String>, // B 列: 客户名/昵称, None 表示该行不足两列
    pub amount_cell: Option<String>,  // C 列: 金额
    pub salary_cell: Option<String>,  // D 列: 工资
}

/// 行引用, 原样透传 (整数行号, 文本, 或其他任意 JSON 值)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowRef {
    Index(i64),
    Label(String),
    Other(serde_json::Value),
}

impl Default for RowRef {
    fn default() -> Self {
        RowRef::Label(String::new())
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRef::Index(i) => write!(f, "{}", i),
            RowRef::Label(s) => f.write_str(s),
            RowRef::Other(serde_json::Value::Null) => Ok(()),
            RowRef::Other(serde_json::Value::String(s)) => f.write_str(s),
            RowRef::Other(v) => write!(f, "{}", v),
        }
    }
}

/// 快照中的单条账目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub symbols: Option<String>,
    #[serde(default, with = "amount::lenient", skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigDecimal>,
    #[serde(default, with = "amount::lenient", skip_serializing_if = "Option::is_none")]
    pub salary: Option<BigDecimal>,
    #[serde(default)]
    pub row_idx: RowRef,
}

impl RawEntry {
    pub fn identity_text(&self) -> &str {
        self.symbols.as_deref().unwrap_or("")
    }
}

/// 账本快照: 周期 (YYYY-MM) -> 账目列表, 保持周期首次出现顺序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    periods: IndexMap<String, Vec<RawEntry>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解码缓存中的快照 JSON; 结构不合法 (非 周期->列表) 即报错
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn push(&mut self, period: impl Into<String>, entry: RawEntry) {
        self.periods.entry(period.into()).or_default().push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    pub fn entry_count(&self) -> usize {
        self.periods.values().map(Vec::len).sum()
    }

    pub fn period(&self, label: &str) -> Option<&[RawEntry]> {
        self.periods.get(label).map(Vec::as_slice)
    }

    /// 所有周期拼接后的账目, 周期内与周期间顺序均保持
    pub fn entries(&self) -> impl Iterator<Item = &RawEntry> {
        self.periods.values().flatten()
    }
}

impl FromIterator<(String, Vec<RawEntry>)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, Vec<RawEntry>)>>(iter: T) -> Self {
        Self {
            periods: iter.into_iter().collect(),
        }
    }
}

/// 新增账目请求 (WebSocket add_entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub date: String,
    #[serde(default)]
    pub symbols: String,
    #[serde(default, with = "amount::option")]
    pub amount: Option<BigDecimal>,
    #[serde(default, with = "amount::option")]
    pub salary: Option<BigDecimal>,
}

impl NewEntry {
    /// 转为表格行, 单元格按表格文本写入
    pub fn to_row(&self, row_idx: i64) -> LedgerRow {
        LedgerRow {
            row_idx,
            date_cell: self.date.trim().to_string(),
            symbols_cell: Some(self.symbols.clone()),
            amount_cell: self.amount.as_ref().map(|a| a.to_string()),
            salary_cell: self.salary.as_ref().map(|s| s.to_string()),
        }
    }
}
