/// `@` 开头视为昵称
pub const HANDLE_PREFIX: char = '@';

/// 去空格后不超过该字符数视为短昵称 ("D M A" -> "DMA")
pub const SHORT_NICKNAME_MAX_CHARS: usize = 3;

/// 单条账目身份字段的归一化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// 分组键
    pub key: String,
    /// 空白折叠后的展示名
    pub display_name: String,
    pub is_nickname: bool,
}

/// 归一化身份文本, 空文本返回 None (调用方丢弃该账目)
///
/// 昵称 (`@` 开头或去空格后 <= 3 个字符) 跨日期合并, 键为去空格大写形式;
/// 其余视为姓名, 只在同一天内合并, 键为 `小写展示名_日期`。
pub fn normalize_identity(identity_text: &str, date: &str) -> Option<ClientIdentity> {
    let display_name = identity_text.split_whitespace().collect::<Vec<_>>().join(" ");
    if display_name.is_empty() {
        return None;
    }

    let compact: String = display_name.chars().filter(|c| *c != ' ').collect();
    let is_nickname =
        compact.starts_with(HANDLE_PREFIX) || compact.chars().count() <= SHORT_NICKNAME_MAX_CHARS;

    let key = if is_nickname {
        compact.to_uppercase()
    } else {
        format!("{}_{}", display_name.to_lowercase(), date)
    };

    Some(ClientIdentity {
        key,
        display_name,
        is_nickname,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_not_groupable() {
        assert_eq!(normalize_identity("", "01.03.2024"), None);
        assert_eq!(normalize_identity(" \t\n ", "01.03.2024"), None);
    }

    #[test]
    fn handle_groups_case_insensitively() {
        let a = normalize_identity("@bob", "01.03.2024").unwrap();
        let b = normalize_identity(" @BOB ", "09.04.2024").unwrap();
        assert!(a.is_nickname);
        assert_eq!(a.key, "@BOB");
        assert_eq!(a.key, b.key);
        assert_eq!(b.display_name, "@BOB");
    }

    #[test]
    fn spaced_short_token_is_nickname() {
        let id = normalize_identity("D  M A", "01.03.2024").unwrap();
        assert!(id.is_nickname);
        assert_eq!(id.key, "DMA");
        assert_eq!(id.display_name, "D M A");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 2 个西里尔字母 = 4 字节
        let id = normalize_identity("мд", "01.03.2024").unwrap();
        assert!(id.is_nickname);
        assert_eq!(id.key, "МД");

        let name = normalize_identity("Макс", "01.03.2024").unwrap();
        assert!(!name.is_nickname);
    }

    #[test]
    fn personal_name_is_scoped_to_day() {
        let id = normalize_identity("Иван   Петров", "01.03.2024").unwrap();
        assert!(!id.is_nickname);
        assert_eq!(id.display_name, "Иван Петров");
        assert_eq!(id.key, "иван петров_01.03.2024");

        let other_day = normalize_identity("Иван Петров", "02.03.2024").unwrap();
        assert_ne!(id.key, other_day.key);
    }
}
