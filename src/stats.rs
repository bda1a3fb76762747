use crate::models::ListingRecord;
use crate::pipeline::cleaner::median;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

pub const TOP_ADDRESSES: usize = 10;
const PRICE_CUTOFF_QUANTILE: f64 = 0.95;

/// Headline numbers for one stored dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub total: usize,
    /// Truncated mean of the known prices
    pub mean_price: Option<i64>,
    pub median_price: Option<i64>,
    /// Prices at or above this are treated as outliers in distributions
    pub price_cutoff: Option<f64>,
    /// Most frequent neighbourhoods, most common first
    pub top_addresses: Vec<(String, usize)>,
}

impl MarketSummary {
    pub fn from_records(records: &[ListingRecord]) -> Self {
        let prices: Vec<Option<i64>> = records.iter().map(|r| r.price).collect();

        Self {
            total: records.len(),
            mean_price: mean(&prices),
            median_price: median(&prices),
            price_cutoff: quantile(&prices, PRICE_CUTOFF_QUANTILE),
            top_addresses: top_addresses(records, TOP_ADDRESSES),
        }
    }
}

impl fmt::Display for MarketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Listings: {}", self.total)?;
        match self.mean_price {
            Some(mean) => writeln!(f, "Mean price: {} FCFA", group_thousands(mean))?,
            None => writeln!(f, "Mean price: n/a")?,
        }
        if let Some(median) = self.median_price {
            writeln!(f, "Median price: {} FCFA", group_thousands(median))?;
        }
        if !self.top_addresses.is_empty() {
            writeln!(f, "Top neighbourhoods:")?;
            for (address, count) in &self.top_addresses {
                writeln!(f, "  {:>4}  {}", count, address)?;
            }
        }
        Ok(())
    }
}

fn mean(column: &[Option<i64>]) -> Option<i64> {
    let values: Vec<i128> = column.iter().flatten().map(|v| *v as i128).collect();
    if values.is_empty() {
        return None;
    }
    Some((values.iter().sum::<i128>() / values.len() as i128) as i64)
}

/// Linear-interpolated quantile of the known values
pub fn quantile(column: &[Option<i64>], q: f64) -> Option<f64> {
    let mut values: Vec<i64> = column.iter().flatten().copied().collect();
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let position = (values.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(values[lower] as f64 + (values[upper] - values[lower]) as f64 * weight)
}

/// Count addresses; ties keep first-seen order
pub fn top_addresses(records: &[ListingRecord], limit: usize) -> Vec<(String, usize)> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let address = record.address.as_str();
        let count = counts.entry(address).or_insert(0);
        if *count == 0 {
            first_seen.push(address);
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = first_seen
        .into_iter()
        .map(|address| (address.to_string(), counts[address]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// 1234567 -> "1,234,567"
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: &str, price: Option<i64>) -> ListingRecord {
        ListingRecord {
            details: "x".to_string(),
            price,
            address: address.to_string(),
            number_of_rooms: None,
            image_link: None,
        }
    }

    #[test]
    fn summary_of_stored_dataset() {
        let records = vec![
            record("Ngor", Some(100)),
            record("Almadies", Some(200)),
            record("Ngor", Some(301)),
            record("Yoff", None),
            record("Almadies", Some(400)),
            record("Ngor", Some(500)),
        ];

        let summary = MarketSummary::from_records(&records);

        assert_eq!(summary.total, 6);
        assert_eq!(summary.mean_price, Some(300));
        assert_eq!(summary.median_price, Some(301));
        assert_eq!(
            summary.top_addresses,
            vec![
                ("Ngor".to_string(), 3),
                ("Almadies".to_string(), 2),
                ("Yoff".to_string(), 1),
            ]
        );
    }

    #[test]
    fn quantile_interpolates() {
        let column: Vec<Option<i64>> = (1..=5).map(Some).collect();
        assert_eq!(quantile(&column, 0.5), Some(3.0));
        let cutoff = quantile(&column, 0.95).unwrap();
        assert!((cutoff - 4.8).abs() < 1e-9);
        assert_eq!(quantile(&[None], 0.95), None);
    }

    #[test]
    fn top_addresses_is_limited() {
        let records: Vec<ListingRecord> =
            (0..15).map(|i| record(&format!("Quartier {}", i), None)).collect();
        let top = top_addresses(&records, TOP_ADDRESSES);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0], ("Quartier 0".to_string(), 1));
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(150000), "150,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(12), "12");
        assert_eq!(group_thousands(-1000), "-1,000");
    }

    #[test]
    fn empty_dataset_has_no_prices() {
        let summary = MarketSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.mean_price, None);
        assert!(summary.to_string().contains("Mean price: n/a"));
    }
}
