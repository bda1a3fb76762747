use crate::models::ListingRecord;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write records as UTF-8 CSV with a header row; `None` becomes an empty cell
pub fn write_csv<W: Write>(writer: W, records: &[ListingRecord]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv_writer.write_record(["details", "price", "address", "number_of_rooms", "image_link"])?;
    }
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(records: &[ListingRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, records)?;
    // csv only ever writes the UTF-8 we gave it
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn export_csv(path: &Path, records: &[ListingRecord]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(file, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_rows_in_order() {
        let records = vec![
            ListingRecord {
                details: "Villa, piscine".to_string(),
                price: Some(150000),
                address: "Almadies".to_string(),
                number_of_rooms: Some(4),
                image_link: Some("https://img/1.jpg".to_string()),
            },
            ListingRecord {
                details: "Studio".to_string(),
                price: None,
                address: "Plateau".to_string(),
                number_of_rooms: None,
                image_link: None,
            },
        ];

        let csv = to_csv_string(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "details,price,address,number_of_rooms,image_link",
                "\"Villa, piscine\",150000,Almadies,4,https://img/1.jpg",
                "Studio,,Plateau,,",
            ]
        );
    }

    #[test]
    fn empty_dataset_still_gets_a_header() {
        assert_eq!(
            to_csv_string(&[]).unwrap(),
            "details,price,address,number_of_rooms,image_link\n"
        );
    }
}
