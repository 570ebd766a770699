use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Listing and search both return newest leads first
    pub const NEWEST_FIRST: [FilterOrderInfo; 1] = [FilterOrderInfo { column: "created_at", sort: SortDirection::Desc }];

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() { return String::new(); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_order_clause() {
        assert_eq!(FilterOrder::generate(&FilterOrder::NEWEST_FIRST), "ORDER BY \"created_at\" DESC");
        assert_eq!(FilterOrder::generate(&[]), "");
    }
}
