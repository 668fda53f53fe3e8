use crate::db::{pool, queries};
use crate::error::StoreError;
use crate::models::sheet_date::parse_sheet_date;
use crate::models::{LedgerRow, NewEntry};
use crate::service::snapshot::insertion_row;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::PgPool;

/// 账本数据源 (行语义与电子表格一致)
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// 全部行, 按行号升序
    async fn read_rows(&self) -> Result<Vec<LedgerRow>, StoreError>;

    /// 按日期顺序插入一行, 返回新行号
    async fn push_row(&self, entry: &NewEntry) -> Result<i64, StoreError>;

    async fn update_row(
        &self,
        row_idx: i64,
        symbols: &str,
        amount: Option<&BigDecimal>,
    ) -> Result<(), StoreError>;

    /// 删除一行, 后续行上移
    async fn delete_row(&self, row_idx: i64) -> Result<(), StoreError>;

    /// 健康探测
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Postgres 实现
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 建连接池并建表
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = pool::create_pool(database_url).await?;
        pool::ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn read_rows(&self) -> Result<Vec<LedgerRow>, StoreError> {
        Ok(queries::list_rows(&self.pool).await?)
    }

    async fn push_row(&self, entry: &NewEntry) -> Result<i64, StoreError> {
        let date = parse_sheet_date(&entry.date)
            .ok_or_else(|| StoreError::InvalidDate(entry.date.clone()))?;

        let mut tx = self.pool.begin().await?;
        queries::lock_rows(&mut *tx).await?;

        let rows = queries::list_rows(&mut *tx).await?;
        let row_idx = insertion_row(&rows, date);

        let shifted = queries::shift_down(&mut *tx, row_idx).await?;
        if shifted > 0 {
            queries::settle_shifted(&mut *tx).await?;
        }
        queries::insert_row(&mut *tx, &entry.to_row(row_idx)).await?;
        tx.commit().await?;

        tracing::info!("✅ Added row {} (shifted {} rows)", row_idx, shifted);
        Ok(row_idx)
    }

    async fn update_row(
        &self,
        row_idx: i64,
        symbols: &str,
        amount: Option<&BigDecimal>,
    ) -> Result<(), StoreError> {
        let affected =
            queries::update_cells(&self.pool, row_idx, symbols, amount.map(|a| a.to_string())).await?;
        if affected == 0 {
            return Err(StoreError::RowNotFound(row_idx));
        }
        tracing::info!("✅ Updated row {}", row_idx);
        Ok(())
    }

    async fn delete_row(&self, row_idx: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        queries::lock_rows(&mut *tx).await?;

        if queries::delete_row(&mut *tx, row_idx).await? == 0 {
            return Err(StoreError::RowNotFound(row_idx));
        }
        if queries::shift_up(&mut *tx, row_idx).await? > 0 {
            queries::settle_shifted(&mut *tx).await?;
        }
        tx.commit().await?;

        tracing::info!("✅ Deleted row {}", row_idx);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(queries::ping(&self.pool).await?)
    }
}
