//! 表格日期 `DD.MM.YYYY`

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

pub const SHEET_DATE_FMT: &str = "%d.%m.%Y";

/// 严格校验 `DD.MM.YYYY` 形态 (定宽, 补零)
pub fn is_sheet_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[2] == b'.'
        && b[5] == b'.'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 2 || i == 5 || c.is_ascii_digit())
}

/// 形态合法且为真实日历日期才返回
pub fn parse_sheet_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if !is_sheet_date(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, SHEET_DATE_FMT).ok()
}

pub fn format_sheet_date(date: NaiveDate) -> String {
    date.format(SHEET_DATE_FMT).to_string()
}

/// 账目日期: 可解析时为日历日期, 否则保留原文
///
/// 排序: 原文日期 (按字符串) 排在所有日历日期之前。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SheetDate {
    Raw(String),
    Parsed(NaiveDate),
}

impl SheetDate {
    pub fn parse(text: &str) -> Self {
        match parse_sheet_date(text) {
            Some(date) => SheetDate::Parsed(date),
            None => SheetDate::Raw(text.to_string()),
        }
    }

    /// 区间起点比较: 日历日期优先于原文日期
    pub fn starts_before(&self, other: &SheetDate) -> bool {
        match (self, other) {
            (SheetDate::Parsed(_), SheetDate::Raw(_)) => true,
            (SheetDate::Raw(_), SheetDate::Parsed(_)) => false,
            _ => self < other,
        }
    }
}

impl fmt::Display for SheetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetDate::Parsed(date) => f.write_str(&format_sheet_date(*date)),
            SheetDate::Raw(text) => f.write_str(text),
        }
    }
}

impl Serialize for SheetDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unpadded_and_impossible_dates() {
        assert!(parse_sheet_date("1.3.2024").is_none());
        assert!(parse_sheet_date("32.01.2024").is_none());
        assert!(parse_sheet_date("2024-01-01").is_none());
        assert_eq!(
            parse_sheet_date(" 05.01.2024 "),
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn format_is_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_sheet_date(d), "01.03.2024");
    }

    #[test]
    fn unparsed_dates_keep_text_and_sort_first() {
        let raw = SheetDate::parse("2024-01-03");
        let parsed = SheetDate::parse("01.01.2024");
        assert_eq!(raw, SheetDate::Raw("2024-01-03".to_string()));
        assert_eq!(raw.to_string(), "2024-01-03");
        assert_eq!(parsed.to_string(), "01.01.2024");
        assert!(raw < parsed);
        assert!(parsed.starts_before(&raw));
        assert!(!raw.starts_before(&parsed));
        assert!(SheetDate::parse("").starts_before(&raw));
    }
}
