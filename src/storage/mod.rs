use crate::models::{Category, ListingRecord};
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_DB_PATH: &str = "immobilier.db";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("invalid dataset name '{0}'")]
    InvalidName(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// SQLite file holding one table per dataset
///
/// Every call opens its own connection and closes it on return. There is no
/// locking across processes: concurrent saves of one name race and the last
/// commit wins.
#[derive(Debug, Clone)]
pub struct ListingStore {
    path: PathBuf,
}

impl ListingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the table `name` with `records`. Returns the row count written.
    ///
    /// Drop, create and inserts share one transaction, so readers see either
    /// the previous table or the complete new one.
    pub fn save(&self, name: &str, records: &[ListingRecord]) -> Result<usize, StorageError> {
        validate_name(name)?;

        let mut conn = Connection::open(&self.path)?;
        let tx = conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS \"{name}\";
             CREATE TABLE \"{name}\" (
                 details         TEXT,
                 price           INTEGER,
                 address         TEXT,
                 number_of_rooms INTEGER,
                 image_link      TEXT
             );"
        ))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO \"{name}\" (details, price, address, number_of_rooms, image_link)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ))?;
            for record in records {
                stmt.execute(params![
                    record.details,
                    record.price,
                    record.address,
                    record.number_of_rooms,
                    record.image_link,
                ])?;
            }
        }
        tx.commit()?;

        info!("Saved {} row(s) to table '{}'", records.len(), name);
        Ok(records.len())
    }

    pub fn save_category(
        &self,
        category: Category,
        records: &[ListingRecord],
    ) -> Result<usize, StorageError> {
        self.save(category.dataset_name(), records)
    }

    /// Read the whole table `name`, or `None` if it cannot be read for any reason
    pub fn load(&self, name: &str) -> Option<Vec<ListingRecord>> {
        match self.try_load(name) {
            Ok(records) => Some(records),
            Err(e) => {
                debug!("Dataset '{}' unavailable: {}", name, e);
                None
            }
        }
    }

    pub fn load_category(&self, category: Category) -> Option<Vec<ListingRecord>> {
        self.load(category.dataset_name())
    }

    fn try_load(&self, name: &str) -> Result<Vec<ListingRecord>, StorageError> {
        validate_name(name)?;

        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT details, price, address, number_of_rooms, image_link
             FROM \"{name}\" ORDER BY rowid"
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ListingRecord {
                    details: row.get(0)?,
                    price: row.get(1)?,
                    address: row.get(2)?,
                    number_of_rooms: row.get(3)?,
                    image_link: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass
fn validate_name(name: &str) -> Result<(), StorageError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && !name.to_ascii_lowercase().starts_with("sqlite_") {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(details: &str, price: Option<i64>) -> ListingRecord {
        ListingRecord {
            details: details.to_string(),
            price,
            address: "Sacré-Coeur".to_string(),
            number_of_rooms: Some(3),
            image_link: None,
        }
    }

    fn store() -> (TempDir, ListingStore) {
        let dir = TempDir::new().unwrap();
        let store = ListingStore::new(dir.path().join("immobilier.db"));
        (dir, store)
    }

    #[test]
    fn second_save_replaces_first() {
        let (_dir, store) = store();

        store
            .save("villas", &[record("old 1", Some(1)), record("old 2", Some(2))])
            .unwrap();
        store.save("villas", &[record("new", None)]).unwrap();

        assert_eq!(store.load("villas").unwrap(), vec![record("new", None)]);
    }

    #[test]
    fn rows_come_back_in_saved_order() {
        let (_dir, store) = store();
        let records: Vec<ListingRecord> =
            (0..5).map(|i| record(&format!("villa {}", i), Some(i))).collect();

        assert_eq!(store.save_category(Category::Villas, &records).unwrap(), 5);
        assert_eq!(store.load_category(Category::Villas).unwrap(), records);
    }

    #[test]
    fn datasets_are_independent() {
        let (_dir, store) = store();
        store.save("villas", &[record("v", Some(1))]).unwrap();
        store.save("appartements", &[record("a", Some(2))]).unwrap();

        assert_eq!(store.load("villas").unwrap()[0].details, "v");
        assert_eq!(store.load("appartements").unwrap()[0].details, "a");
    }

    #[test]
    fn never_saved_dataset_is_absent() {
        let (_dir, store) = store();
        assert!(store.load("villas").is_none());

        store.save("appartements", &[]).unwrap();
        assert!(store.load("villas").is_none());
        assert_eq!(store.load("appartements"), Some(Vec::new()));
    }

    #[test]
    fn malformed_names_are_rejected() {
        let (_dir, store) = store();
        assert!(matches!(
            store.save("villas; DROP TABLE x", &[]),
            Err(StorageError::InvalidName(_))
        ));
        assert!(store.save("", &[]).is_err());
        assert!(store.save("sqlite_master", &[]).is_err());
        assert!(store.load("bad name").is_none());
    }

    #[test]
    fn unreachable_store_fails_save() {
        let dir = TempDir::new().unwrap();
        let store = ListingStore::new(dir.path().join("missing").join("db.sqlite"));
        assert!(matches!(store.save("villas", &[]), Err(StorageError::Sqlite(_))));
        assert!(store.load("villas").is_none());
    }
}
