use crate::models::sheet_date::SheetDate;
use crate::models::{ClientTransaction, RawEntry};
use crate::service::normalizer::{normalize_identity, ClientIdentity};
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;

/// 客户累加器 - 折叠阶段可变, 排名阶段后冻结为 ClientRecord
#[derive(Debug, Clone)]
pub struct ClientAccumulator {
    pub identity: ClientIdentity,
    pub total_revenue: BigDecimal,
    pub transaction_count: usize,
    /// 日历日期优先, 全部无法解析时为最小的原文日期
    pub first_date: SheetDate,
    pub last_date: SheetDate,
    /// 按折叠顺序追加
    pub transactions: Vec<ClientTransaction>,
}

impl ClientAccumulator {
    fn new(identity: ClientIdentity, date: &SheetDate) -> Self {
        Self {
            identity,
            total_revenue: BigDecimal::zero(),
            transaction_count: 0,
            first_date: date.clone(),
            last_date: date.clone(),
            transactions: Vec::new(),
        }
    }

    fn add(&mut self, date: SheetDate, amount: &BigDecimal, row_reference: String) {
        self.total_revenue += amount;
        self.transaction_count += 1;
        if date.starts_before(&self.first_date) {
            self.first_date = date.clone();
        }
        if date > self.last_date {
            self.last_date = date.clone();
        }
        self.transactions.push(ClientTransaction {
            date,
            amount: amount.clone(),
            row_reference,
        });
    }
}

/// 分组键 -> 累加器, 保持首次出现顺序 (排名并列时的确定性依据)
pub type ClientMap = IndexMap<String, ClientAccumulator>;

/// 按输入顺序把账目折叠进客户表
///
/// 缺身份/缺金额/金额为 0 的账目跳过; 日期无法解析时按原文参与分组。
pub fn fold_entries<'a, I>(entries: I) -> ClientMap
where
    I: IntoIterator<Item = &'a RawEntry>,
{
    let mut clients = ClientMap::new();
    let mut skipped = 0usize;

    for entry in entries {
        let Some(amount) = entry.amount.as_ref().filter(|a| !a.is_zero()) else {
            skipped += 1;
            continue;
        };
        let date = SheetDate::parse(&entry.date);
        let Some(identity) = normalize_identity(entry.identity_text(), &date.to_string()) else {
            skipped += 1;
            continue;
        };

        let client = clients
            .entry(identity.key.clone())
            .or_insert_with(|| ClientAccumulator::new(identity, &date));
        client.add(date, amount, entry.row_idx.to_string());
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} entries without identity or amount", skipped);
    }

    clients
}
