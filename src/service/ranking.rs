use crate::models::{ClientAnalytics, ClientRecord, ClientStats};
use crate::service::aggregator::{ClientAccumulator, ClientMap};
use bigdecimal::{BigDecimal, Zero};

/// 除数为 0 时返回 0
fn average(total: &BigDecimal, count: usize) -> BigDecimal {
    if count == 0 {
        return BigDecimal::zero();
    }
    total / &BigDecimal::from(count as u64)
}

/// 冻结累加器: 计算平均单价, 交易按日期倒序 (稳定排序, 同日保持折叠顺序)
fn finalize(acc: ClientAccumulator) -> ClientRecord {
    let mut transactions = acc.transactions;
    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    ClientRecord {
        average_transaction: average(&acc.total_revenue, acc.transaction_count),
        key: acc.identity.key,
        display_name: acc.identity.display_name,
        is_nickname: acc.identity.is_nickname,
        total_revenue: acc.total_revenue,
        transaction_count: acc.transaction_count,
        first_date: acc.first_date,
        last_date: acc.last_date,
        transactions,
    }
}

/// 全体汇总
pub fn summarize(clients: &[ClientRecord]) -> ClientStats {
    let mut total_revenue = BigDecimal::zero();
    for client in clients {
        total_revenue += &client.total_revenue;
    }

    ClientStats {
        total_clients: clients.len(),
        avg_revenue_per_client: average(&total_revenue, clients.len()),
        total_revenue,
    }
}

/// 按总收入倒序排名 (稳定排序, 并列保持首次出现顺序) 并汇总
pub fn rank_clients(clients: ClientMap) -> ClientAnalytics {
    let mut ranked: Vec<ClientRecord> = clients.into_values().map(finalize).collect();
    ranked.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));

    let stats = summarize(&ranked);
    ClientAnalytics {
        clients: ranked,
        stats: Some(stats),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawEntry, RowRef};
    use crate::service::aggregator::fold_entries;
    use std::str::FromStr;

    fn entry(date: &str, symbols: &str, amount: &str, row: i64) -> RawEntry {
        RawEntry {
            date: date.to_string(),
            symbols: Some(symbols.to_string()),
            amount: Some(BigDecimal::from_str(amount).unwrap()),
            salary: None,
            row_idx: RowRef::Index(row),
        }
    }

    #[test]
    fn ranks_by_revenue_descending() {
        let entries = vec![
            entry("01.03.2024", "@a", "100", 1),
            entry("01.03.2024", "@b", "50", 2),
            entry("01.03.2024", "@c", "200", 3),
        ];
        let analytics = rank_clients(fold_entries(&entries));
        let revenues: Vec<_> = analytics.clients.iter().map(|c| c.total_revenue.to_string()).collect();
        assert_eq!(revenues, ["200", "100", "50"]);
    }

    #[test]
    fn ties_keep_first_occurrence_order() {
        let entries = vec![
            entry("01.03.2024", "@z", "10", 1),
            entry("01.03.2024", "@big", "99", 2),
            entry("01.03.2024", "@a", "10", 3),
            entry("02.03.2024", "@m", "10", 4),
        ];
        let analytics = rank_clients(fold_entries(&entries));
        let ids: Vec<_> = analytics.clients.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(ids, ["@BIG", "@Z", "@A", "@M"]);
    }

    #[test]
    fn transactions_sorted_newest_first_stable() {
        let entries = vec![
            entry("05.01.2024", "@q", "1", 10),
            entry("01.01.2024", "@q", "2", 11),
            entry("20.01.2024", "@q", "3", 12),
            entry("05.01.2024", "@q", "4", 13),
        ];
        let analytics = rank_clients(fold_entries(&entries));
        let ids: Vec<_> = analytics.clients[0]
            .transactions
            .iter()
            .map(|t| t.row_reference.as_str())
            .collect();
        assert_eq!(ids, ["12", "10", "13", "11"]);
    }

    #[test]
    fn averages_and_summary() {
        let entries = vec![
            entry("01.03.2024", "@a", "100", 1),
            entry("02.03.2024", "@a", "50", 2),
            entry("01.03.2024", "@b", "30", 3),
        ];
        let analytics = rank_clients(fold_entries(&entries));
        assert_eq!(analytics.clients[0].average_transaction, BigDecimal::from(75));

        let stats = analytics.stats.unwrap();
        assert_eq!(stats.total_clients, 2);
        assert_eq!(stats.total_revenue, BigDecimal::from(180));
        assert_eq!(stats.avg_revenue_per_client, BigDecimal::from(90));
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_clients, 0);
        assert!(stats.total_revenue.is_zero());
        assert!(stats.avg_revenue_per_client.is_zero());
    }
}
