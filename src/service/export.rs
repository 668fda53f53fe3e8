use crate::models::amount::to_number;
use crate::models::ClientAnalytics;

const HEADER: [&str; 8] = [
    "id",
    "name",
    "is_nickname",
    "total_revenue",
    "transaction_count",
    "avg_transaction",
    "first_date",
    "last_date",
];

/// 导出客户排名到 CSV (按排名顺序)
pub fn clients_to_csv(analytics: &ClientAnalytics) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for client in &analytics.clients {
        writer.write_record(&[
            client.key.clone(),
            client.display_name.clone(),
            client.is_nickname.to_string(),
            client.total_revenue.to_string(),
            client.transaction_count.to_string(),
            to_number(&client.average_transaction)
                .map(|n| format!("{:.2}", n))
                .unwrap_or_default(),
            client.first_date.to_string(),
            client.last_date.to_string(),
        ])?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawEntry, RowRef};
    use crate::service::analytics::client_analytics;
    use crate::models::Snapshot;
    use bigdecimal::BigDecimal;

    #[test]
    fn exports_ranked_rows() {
        let mut snapshot = Snapshot::new();
        for (symbols, amount, row) in [("@a", 10, 5), ("Иван Петров", 100, 6), ("@a", 5, 7)] {
            snapshot.push(
                "2024-03",
                RawEntry {
                    date: "01.03.2024".to_string(),
                    symbols: Some(symbols.to_string()),
                    amount: Some(BigDecimal::from(amount)),
                    salary: None,
                    row_idx: RowRef::Index(row),
                },
            );
        }

        let csv = String::from_utf8(clients_to_csv(&client_analytics(&snapshot)).unwrap()).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "id,name,is_nickname,total_revenue,transaction_count,avg_transaction,first_date,last_date");
        assert_eq!(lines[1], "иван петров_01.03.2024,Иван Петров,false,100,1,100.00,01.03.2024,01.03.2024");
        assert_eq!(lines[2], "@A,@a,true,15,2,7.50,01.03.2024,01.03.2024");
    }
}
