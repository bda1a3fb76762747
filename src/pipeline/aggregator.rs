use crate::models::{ListingOutcome, RawListing, SkipReason};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Number of dropped listings per reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkipTally(BTreeMap<SkipReason, usize>);

impl SkipTally {
    pub fn record(&mut self, reason: SkipReason) {
        *self.0.entry(reason).or_insert(0) += 1;
    }

    pub fn get(&self, reason: SkipReason) -> usize {
        self.0.get(&reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SkipTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(reason, count)| format!("{}: {}", reason, count))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// Concatenate a batch onto an existing dataset, preserving order.
///
/// No key is used to detect duplicates; a listing linked twice is kept twice.
pub fn concat<T>(mut existing: Vec<T>, batch: Vec<T>) -> Vec<T> {
    existing.extend(batch);
    existing
}

/// Running dataset of one crawl
#[derive(Debug, Default)]
pub struct RecordAggregator {
    records: Vec<RawListing>,
    skipped: SkipTally,
}

impl RecordAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page worth of outcomes. Returns how many records it added.
    pub fn absorb(&mut self, outcomes: Vec<ListingOutcome>) -> usize {
        let mut batch = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                ListingOutcome::Extracted(listing) => batch.push(listing),
                ListingOutcome::Skipped(reason) => self.skipped.record(reason),
            }
        }

        let added = batch.len();
        self.records = concat(std::mem::take(&mut self.records), batch);
        added
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn skipped(&self) -> &SkipTally {
        &self.skipped
    }

    pub fn into_parts(self) -> (Vec<RawListing>, SkipTally) {
        (self.records, self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(details: &str) -> RawListing {
        RawListing {
            details: details.to_string(),
            price: "1".to_string(),
            address: "Dakar".to_string(),
            number_of_rooms: None,
            image_link: None,
        }
    }

    #[test]
    fn keeps_discovery_order_and_duplicates() {
        let mut aggregator = RecordAggregator::new();

        let added = aggregator.absorb(vec![
            ListingOutcome::Extracted(listing("a")),
            ListingOutcome::Skipped(SkipReason::MissingPrice),
            ListingOutcome::Extracted(listing("b")),
        ]);
        assert_eq!(added, 2);

        aggregator.absorb(vec![
            ListingOutcome::Extracted(listing("b")),
            ListingOutcome::Skipped(SkipReason::Fetch),
            ListingOutcome::Skipped(SkipReason::MissingPrice),
        ]);

        let (records, skipped) = aggregator.into_parts();
        let titles: Vec<&str> = records.iter().map(|r| r.details.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "b"]);
        assert_eq!(skipped.get(SkipReason::MissingPrice), 2);
        assert_eq!(skipped.get(SkipReason::Fetch), 1);
        assert_eq!(skipped.get(SkipReason::MissingTitle), 0);
        assert_eq!(skipped.total(), 3);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut aggregator = RecordAggregator::new();
        assert_eq!(aggregator.absorb(Vec::new()), 0);
        assert!(aggregator.is_empty());
        assert!(aggregator.skipped().is_empty());
        assert_eq!(aggregator.skipped().to_string(), "none");
    }

    #[test]
    fn concat_appends_batch_after_existing() {
        assert_eq!(concat(vec![1, 2], vec![2, 3]), vec![1, 2, 2, 3]);
    }
}
