use crate::models::{ListingRecord, RawListing};
use tracing::debug;

/// Coerce the numeric columns and fill their gaps with this batch's median.
///
/// `price` and `number_of_rooms` are handled independently. A column with no
/// valid value at all stays entirely `None`.
pub fn clean(raw: Vec<RawListing>) -> Vec<ListingRecord> {
    let mut prices: Vec<Option<i64>> = raw
        .iter()
        .map(|r| coerce(Some(r.price.as_str())))
        .collect();
    let mut rooms: Vec<Option<i64>> = raw
        .iter()
        .map(|r| coerce(r.number_of_rooms.as_deref()))
        .collect();

    if let Some(median) = fill_with_median(&mut prices) {
        debug!("Filled missing prices with batch median {}", median);
    }
    if let Some(median) = fill_with_median(&mut rooms) {
        debug!("Filled missing room counts with batch median {}", median);
    }

    raw.into_iter()
        .zip(prices)
        .zip(rooms)
        .map(|((listing, price), number_of_rooms)| ListingRecord {
            details: listing.details,
            price,
            address: listing.address,
            number_of_rooms,
            image_link: listing.image_link,
        })
        .collect()
}

/// Parse a raw cell as an integer; anything unparsable becomes `None`.
pub fn coerce(raw: Option<&str>) -> Option<i64> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }

    // "3.0" is still a whole number
    let value = text.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Median of the present values, truncated toward zero
pub fn median(column: &[Option<i64>]) -> Option<i64> {
    let mut values: Vec<i64> = column.iter().flatten().copied().collect();
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        let sum = values[mid - 1] as i128 + values[mid] as i128;
        Some((sum / 2) as i64)
    }
}

/// Replace every `None` with the column median. Returns the median used.
pub fn fill_with_median(column: &mut [Option<i64>]) -> Option<i64> {
    let median = median(column)?;
    for cell in column.iter_mut().filter(|cell| cell.is_none()) {
        *cell = Some(median);
    }
    Some(median)
}
