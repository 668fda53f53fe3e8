//! 金额编解码: 内部使用 BigDecimal 精确累加, 对外 JSON 为数字

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{de, de::IgnoredAny, ser, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

/// 线上金额: JSON 数字或文本, 其他值无法转换为金额
#[derive(Deserialize)]
#[serde(untagged)]
enum WireAmount {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl WireAmount {
    fn into_decimal(self) -> Result<BigDecimal, String> {
        match self {
            WireAmount::Number(n) if n.is_finite() => {
                // f64 的 Display 输出最短可还原表示, 如 1500.5 -> "1500.5"
                BigDecimal::from_str(&n.to_string()).map_err(|e| e.to_string())
            }
            WireAmount::Number(n) => Err(format!("non-finite amount: {}", n)),
            WireAmount::Text(s) => parse_decimal(&s).ok_or_else(|| format!("invalid amount: {:?}", s)),
            WireAmount::Other(_) => Err("amount must be a number or text".to_string()),
        }
    }
}

/// 解析表格单元格中的金额, 兼容逗号小数点 ("1500,5")
pub fn parse_decimal(cell: &str) -> Option<BigDecimal> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    BigDecimal::from_str(&cell.replace(',', ".")).ok()
}

/// 转为 JSON 数字
pub fn to_number(value: &BigDecimal) -> Option<f64> {
    value.to_f64().filter(|n| n.is_finite())
}

pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    let n = to_number(value)
        .ok_or_else(|| ser::Error::custom(format!("amount {} is out of range", value)))?;
    serializer.serialize_f64(n)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
    WireAmount::deserialize(deserializer)?
        .into_decimal()
        .map_err(de::Error::custom)
}

/// 可缺省金额 (缺失/null 即 None)
pub mod option {
    use super::WireAmount;
    use bigdecimal::BigDecimal;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<BigDecimal>, D::Error> {
        Option::<WireAmount>::deserialize(deserializer)?
            .map(WireAmount::into_decimal)
            .transpose()
            .map_err(de::Error::custom)
    }
}

/// 快照账目金额: 无法识别的值视为缺失 (该账目在分组时被丢弃), 不影响整个快照
pub mod lenient {
    use super::WireAmount;
    use bigdecimal::BigDecimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<BigDecimal>, serializer: S) -> Result<S::Ok, S::Error> {
        super::option::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<BigDecimal>, D::Error> {
        let wire = Option::<WireAmount>::deserialize(deserializer)?;
        Ok(wire.and_then(|w| match w.into_decimal() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!("Dropping entry amount: {}", e);
                None
            }
        }))
    }
}
