use crate::models::LedgerRow;
use sqlx::PgExecutor;

/// 查询全部表格行 (按行号)
pub async fn list_rows<'e, E: PgExecutor<'e>>(exec: E) -> Result<Vec<LedgerRow>, sqlx::Error> {
    sqlx::query_as::<_, LedgerRow>(
        r#"
        SELECT row_idx, date_cell, symbols_cell, amount_cell, salary_cell
        FROM ledger_rows
        ORDER BY row_idx
        "#
    )
    .fetch_all(exec)
    .await
}

/// 锁表, 串行化会移动行号的写操作
pub async fn lock_rows<'e, E: PgExecutor<'e>>(exec: E) -> Result<(), sqlx::Error> {
    sqlx::query("LOCK TABLE ledger_rows IN EXCLUSIVE MODE")
        .execute(exec)
        .await?;
    Ok(())
}

/// 行号 >= from 的行整体下移一行
///
/// 主键不可延迟校验, 先取负再翻回, 避免中途行号冲突
pub async fn shift_down<'e, E: PgExecutor<'e>>(exec: E, from: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE ledger_rows SET row_idx = -(row_idx + 1)
        WHERE row_idx >= $1
        "#
    )
    .bind(from)
    .execute(exec)
    .await?;
    Ok(result.rows_affected())
}

/// 行号 > after 的行整体上移一行
pub async fn shift_up<'e, E: PgExecutor<'e>>(exec: E, after: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE ledger_rows SET row_idx = -(row_idx - 1)
        WHERE row_idx > $1
        "#
    )
    .bind(after)
    .execute(exec)
    .await?;
    Ok(result.rows_affected())
}

/// 翻回 shift_down/shift_up 留下的负行号
pub async fn settle_shifted<'e, E: PgExecutor<'e>>(exec: E) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE ledger_rows SET row_idx = -row_idx WHERE row_idx < 0")
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

pub async fn insert_row<'e, E: PgExecutor<'e>>(exec: E, row: &LedgerRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO ledger_rows (row_idx, date_cell, symbols_cell, amount_cell, salary_cell)
        VALUES ($1, $2, $3, $4, $5)
        "#
    )
    .bind(row.row_idx)
    .bind(&row.date_cell)
    .bind(&row.symbols_cell)
    .bind(&row.amount_cell)
    .bind(&row.salary_cell)
    .execute(exec)
    .await?;
    Ok(())
}

/// 更新 B/C 列, 返回影响行数
pub async fn update_cells<'e, E: PgExecutor<'e>>(
    exec: E,
    row_idx: i64,
    symbols: &str,
    amount: Option<String>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE ledger_rows
        SET symbols_cell = $2, amount_cell = $3
        WHERE row_idx = $1
        "#
    )
    .bind(row_idx)
    .bind(symbols)
    .bind(amount)
    .execute(exec)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_row<'e, E: PgExecutor<'e>>(exec: E, row_idx: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM ledger_rows WHERE row_idx = $1")
        .bind(row_idx)
        .execute(exec)
        .await?;
    Ok(result.rows_affected())
}

pub async fn ping<'e, E: PgExecutor<'e>>(exec: E) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(exec).await?;
    Ok(())
}
