use crate::models::amount::parse_decimal;
use crate::models::sheet_date::parse_sheet_date;
use crate::models::{LedgerRow, RawEntry, RowRef, Snapshot};
use chrono::{Datelike, NaiveDate};

/// 表头行数, 行号 <= HEADER_ROWS 的行不是数据
pub const HEADER_ROWS: i64 = 4;

/// 周期标签 YYYY-MM
pub fn period_label(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}

/// 表格行 -> 按周期分组的快照
///
/// 跳过表头行, 不足两列的行, 日期非 `DD.MM.YYYY` 的行, 以及金额和工资都无法解析的行。
/// 工资可解析时账目只带 salary, 否则带 amount。
pub fn build_snapshot(rows: &[LedgerRow]) -> Snapshot {
    let mut snapshot = Snapshot::new();

    for row in rows {
        if row.row_idx <= HEADER_ROWS {
            continue;
        }
        let Some(symbols) = row.symbols_cell.as_deref() else {
            continue;
        };
        let Some(date) = parse_sheet_date(&row.date_cell) else {
            continue;
        };

        let amount = row.amount_cell.as_deref().and_then(parse_decimal);
        let salary = row.salary_cell.as_deref().and_then(parse_decimal);
        if amount.is_none() && salary.is_none() {
            continue;
        }

        let (amount, salary) = match salary {
            Some(s) => (None, Some(s)),
            None => (amount, None),
        };

        snapshot.push(
            period_label(date),
            RawEntry {
                date: row.date_cell.trim().to_string(),
                symbols: Some(symbols.trim().to_string()),
                amount,
                salary,
                row_idx: RowRef::Index(row.row_idx),
            },
        );
    }

    snapshot
}

/// 新行插入位置: 紧跟在最后一个日期 <= 新日期的数据行之后
///
/// `rows` 按行号升序; 无法解析日期的行跳过, 遇到第一个更晚的日期即停止。
pub fn insertion_row(rows: &[LedgerRow], date: NaiveDate) -> i64 {
    let mut after = HEADER_ROWS;

    for row in rows.iter().filter(|r| r.row_idx > HEADER_ROWS) {
        match parse_sheet_date(&row.date_cell) {
            Some(d) if d <= date => after = row.row_idx,
            Some(_) => break,
            None => continue,
        }
    }

    after + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn row(idx: i64, date: &str, symbols: Option<&str>, amount: Option<&str>, salary: Option<&str>) -> LedgerRow {
        LedgerRow {
            row_idx: idx,
            date_cell: date.to_string(),
            symbols_cell: symbols.map(str::to_string),
            amount_cell: amount.map(str::to_string),
            salary_cell: salary.map(str::to_string),
        }
    }

    #[test]
    fn groups_rows_by_month_in_sheet_order() {
        let rows = vec![
            row(1, "Дата", Some("Кто"), Some("Сумма"), None),
            row(5, "28.02.2024", Some(" @bob "), Some("1500,5"), None),
            row(6, "01.03.2024", Some("Иван"), Some("700"), None),
            row(7, "29.02.2024", Some("МД"), Some("300"), None),
        ];
        let snapshot = build_snapshot(&rows);

        assert_eq!(snapshot.period_count(), 2);
        let feb = snapshot.period("2024-02").unwrap();
        assert_eq!(feb.len(), 2);
        assert_eq!(feb[0].symbols.as_deref(), Some("@bob"));
        assert_eq!(feb[0].amount, Some(BigDecimal::from_str("1500.5").unwrap()));
        assert_eq!(feb[0].row_idx, RowRef::Index(5));
        assert_eq!(feb[1].row_idx, RowRef::Index(7));
    }

    #[test]
    fn salary_rows_carry_salary_only() {
        let rows = vec![row(5, "01.03.2024", Some(""), Some("100"), Some("2000"))];
        let snapshot = build_snapshot(&rows);
        let entry = &snapshot.period("2024-03").unwrap()[0];
        assert_eq!(entry.amount, None);
        assert_eq!(entry.salary, Some(BigDecimal::from(2000)));
    }

    #[test]
    fn skips_invalid_rows() {
        let rows = vec![
            row(5, "1.3.2024", Some("a"), Some("1"), None),
            row(6, "01.03.2024", None, None, None),
            row(7, "01.03.2024", Some("a"), Some("x"), Some("")),
            row(8, "31.02.2024", Some("a"), Some("1"), None),
        ];
        assert!(build_snapshot(&rows).is_empty());
    }

    #[test]
    fn insertion_keeps_date_order() {
        let rows = vec![
            row(5, "01.03.2024", Some("a"), Some("1"), None),
            row(6, "итого", Some("a"), None, None),
            row(7, "03.03.2024", Some("b"), Some("1"), None),
            row(8, "05.03.2024", Some("c"), Some("1"), None),
        ];
        let d = |s| parse_sheet_date(s).unwrap();
        assert_eq!(insertion_row(&rows, d("03.03.2024")), 8);
        assert_eq!(insertion_row(&rows, d("02.03.2024")), 6);
        assert_eq!(insertion_row(&rows, d("28.02.2024")), 5);
        assert_eq!(insertion_row(&rows, d("10.03.2024")), 9);
        assert_eq!(insertion_row(&[], d("10.03.2024")), HEADER_ROWS + 1);
    }
}
