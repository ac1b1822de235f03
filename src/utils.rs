use std::collections::HashMap;

use chrono::{Local, NaiveDate};

use crate::models::Sale;

/// Trims and title-cases a flavor name: a letter is uppercased when the
/// preceding character is not a letter, lowercased otherwise. Matches how
/// names were normalized historically, so "chocolate chip" and
/// "CHOCOLATE CHIP" land on the same catalog entry.
pub fn normalize_flavor(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;

    for c in input.trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}

/// Figures derived from the sales log for the report page.
pub struct SalesSummary {
    pub today_sales: Vec<Sale>,
    pub total_sold_today: u32,
    /// Top flavors by all-time quantity, largest first, at most five.
    pub top_flavors: Vec<(String, u32)>,
}

pub fn summarize_sales(sales: &[Sale], today: NaiveDate) -> SalesSummary {
    let mut today_sales = Vec::new();
    let mut total_sold_today = 0;
    let mut flavor_totals: HashMap<String, u32> = HashMap::new();

    for sale in sales {
        if sale.sale_date == today {
            today_sales.push(sale.clone());
            total_sold_today += sale.quantity;
        }

        *flavor_totals.entry(sale.flavor.clone()).or_insert(0) += sale.quantity;
    }

    let mut top_flavors: Vec<(String, u32)> = flavor_totals.into_iter().collect();
    top_flavors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_flavors.truncate(5);

    SalesSummary {
        today_sales,
        total_sold_today,
        top_flavors,
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(flavor: &str, quantity: u32, date: &str) -> Sale {
        Sale {
            flavor: flavor.to_string(),
            quantity,
            sale_date: date.parse().unwrap(),
            timestamp: format!("{date}T12:00:00"),
        }
    }

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_flavor("  mango "), "Mango");
        assert_eq!(normalize_flavor("chocolate chip"), "Chocolate Chip");
        assert_eq!(normalize_flavor("VANILLA"), "Vanilla");
    }

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_flavor("black-current"), "Black-Current");
        assert_eq!(normalize_flavor("rocky road 2"), "Rocky Road 2");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_flavor(""), "");
        assert_eq!(normalize_flavor("   "), "");
    }

    #[test]
    fn test_summary_splits_today() {
        let sales = vec![
            sale("Vanilla", 3, "2024-06-02"),
            sale("Mango", 2, "2024-06-01"),
            sale("Vanilla", 1, "2024-06-02"),
        ];

        let summary = summarize_sales(&sales, "2024-06-02".parse().unwrap());

        assert_eq!(summary.today_sales.len(), 2);
        assert_eq!(summary.total_sold_today, 4);
    }

    #[test]
    fn test_summary_top_flavors() {
        let sales = vec![
            sale("Vanilla", 5, "2024-06-01"),
            sale("Mango", 9, "2024-06-01"),
            sale("Vanilla", 3, "2024-06-02"),
            sale("Pista", 1, "2024-06-02"),
        ];

        let summary = summarize_sales(&sales, "2024-06-02".parse().unwrap());

        assert_eq!(
            summary.top_flavors,
            vec![
                ("Mango".to_string(), 9),
                ("Vanilla".to_string(), 8),
                ("Pista".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_summary_caps_at_five() {
        let sales: Vec<Sale> = (0..8)
            .map(|i| sale(&format!("Flavor{i}"), i + 1, "2024-06-01"))
            .collect();

        let summary = summarize_sales(&sales, "2024-06-02".parse().unwrap());

        assert_eq!(summary.top_flavors.len(), 5);
        assert_eq!(summary.top_flavors[0].1, 8);
    }
}
