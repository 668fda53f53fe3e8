#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use salary_ledger_rust::error::StoreError;
use salary_ledger_rust::models::sheet_date::parse_sheet_date;
use salary_ledger_rust::models::{LedgerRow, NewEntry, RawEntry, RowRef, Snapshot};
use salary_ledger_rust::service::snapshot::insertion_row;
use salary_ledger_rust::LedgerStore;
use std::str::FromStr;
use std::sync::Mutex;

/// 内存账本 (测试用), 行号语义与 Postgres 实现一致
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<LedgerRow>>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<LedgerRow>) -> Self {
        Self { rows: Mutex::new(rows) }
    }

    pub fn rows(&self) -> Vec<LedgerRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn read_rows(&self) -> Result<Vec<LedgerRow>, StoreError> {
        Ok(self.rows())
    }

    async fn push_row(&self, entry: &NewEntry) -> Result<i64, StoreError> {
        let date = parse_sheet_date(&entry.date)
            .ok_or_else(|| StoreError::InvalidDate(entry.date.clone()))?;
        let mut rows = self.rows.lock().unwrap();
        let row_idx = insertion_row(&rows, date);
        for row in rows.iter_mut().filter(|r| r.row_idx >= row_idx) {
            row.row_idx += 1;
        }
        rows.push(entry.to_row(row_idx));
        rows.sort_by_key(|r| r.row_idx);
        Ok(row_idx)
    }

    async fn update_row(
        &self,
        row_idx: i64,
        symbols: &str,
        amount: Option<&BigDecimal>,
    ) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.row_idx == row_idx)
            .ok_or(StoreError::RowNotFound(row_idx))?;
        row.symbols_cell = Some(symbols.to_string());
        row.amount_cell = amount.map(|a| a.to_string());
        Ok(())
    }

    async fn delete_row(&self, row_idx: i64) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.row_idx != row_idx);
        if rows.len() == before {
            return Err(StoreError::RowNotFound(row_idx));
        }
        for row in rows.iter_mut().filter(|r| r.row_idx > row_idx) {
            row.row_idx -= 1;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub fn row(idx: i64, date: &str, symbols: &str, amount: &str) -> LedgerRow {
    LedgerRow {
        row_idx: idx,
        date_cell: date.to_string(),
        symbols_cell: Some(symbols.to_string()),
        amount_cell: Some(amount.to_string()),
        salary_cell: None,
    }
}

pub fn entry(date: &str, symbols: &str, amount: Option<&str>, row: i64) -> RawEntry {
    RawEntry {
        date: date.to_string(),
        symbols: Some(symbols.to_string()),
        amount: amount.map(|a| BigDecimal::from_str(a).unwrap()),
        salary: None,
        row_idx: RowRef::Index(row),
    }
}

/// 单周期快照
pub fn snapshot_of(entries: Vec<RawEntry>) -> Snapshot {
    std::iter::once(("2024-01".to_string(), entries)).collect()
}
