use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tokio::{fs, sync::Mutex};
use tracing::{debug, info, warn};

use crate::models::Customer;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing required user fields")]
    Validation,

    #[error("User not found")]
    NotFound,

    #[error("Error {action} file")]
    Io {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Invalid user JSON format")]
    Parse(#[from] serde_json::Error),
}

impl StoreError {
    fn reading(source: io::Error) -> Self {
        StoreError::Io {
            action: "reading",
            source,
        }
    }

    fn writing(source: io::Error) -> Self {
        StoreError::Io {
            action: "writing",
            source,
        }
    }
}

/// One pretty-printed JSON document holding every customer, in order.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the document as `[]` when it is missing.
    pub async fn ensure_exists(&self) -> Result<(), StoreError> {
        if fs::try_exists(&self.path).await.map_err(StoreError::reading)? {
            return Ok(());
        }

        info!("Creating empty store at {}", self.path.display());
        fs::write(&self.path, "[]").await.map_err(StoreError::writing)
    }

    /// Reads the whole document. An empty file is an empty collection.
    pub async fn load(&self) -> Result<Vec<Customer>, StoreError> {
        let data = fs::read_to_string(&self.path)
            .await
            .map_err(StoreError::reading)?;

        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&data)?)
    }

    /// Rewrites the whole document. Not atomic: a crash mid-write can truncate it.
    pub async fn save(&self, customers: &[Customer]) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(customers)?;
        fs::write(&self.path, data)
            .await
            .map_err(StoreError::writing)
    }
}

/// Create/read/update/delete over a [`JsonFileStore`].
///
/// Each operation loads the full document, changes it in memory and writes it
/// back in full. The mutex keeps those cycles from interleaving inside this
/// process; another process writing the same file can still lose updates.
#[derive(Debug)]
pub struct Records {
    store: JsonFileStore,
    lock: Mutex<()>,
}

impl Records {
    pub fn new(store: JsonFileStore) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    /// All customers, or a single placeholder record when there are none.
    pub async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        let _guard = self.lock.lock().await;
        let customers = self.store.load().await?;

        if customers.is_empty() {
            return Ok(vec![Customer::default()]);
        }

        Ok(customers)
    }

    /// Appends a customer. Duplicate phones are accepted.
    pub async fn create(&self, customer: Customer) -> Result<(), StoreError> {
        if customer.name.is_empty() || customer.phone.is_empty() {
            return Err(StoreError::Validation);
        }

        self.transact(|customers| {
            if customers.iter().any(|c| c.phone == customer.phone) {
                warn!("Adding a second customer with phone {}", customer.phone);
            }
            customers.push(customer);
            Ok(((), true))
        })
        .await
    }

    /// Replaces the first customer whose phone matches. The replacement may
    /// carry a different phone.
    pub async fn update(&self, phone: &str, customer: Customer) -> Result<(), StoreError> {
        self.transact(|customers| {
            let index = customers
                .iter()
                .position(|c| c.phone == phone)
                .ok_or(StoreError::NotFound)?;

            if customer.phone != phone {
                warn!("Customer {} is being re-keyed to {}", phone, customer.phone);
            }
            customers[index] = customer;
            Ok(((), true))
        })
        .await
    }

    /// Removes every customer with the phone, returning how many went.
    pub async fn delete(&self, phone: &str) -> Result<usize, StoreError> {
        self.transact(|customers| {
            let before = customers.len();
            customers.retain(|c| c.phone != phone);

            match before - customers.len() {
                0 => Err(StoreError::NotFound),
                removed => Ok((removed, true)),
            }
        })
        .await
    }

    /// Runs one read-modify-write cycle. The closure returns its result and
    /// whether the collection should be written back.
    pub async fn transact<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Vec<Customer>) -> Result<(T, bool), StoreError>,
    {
        let _guard = self.lock.lock().await;

        let mut customers = self.store.load().await?;
        let (value, dirty) = f(&mut customers)?;

        if dirty {
            self.store.save(&customers).await?;
            debug!("Persisted {} customers", customers.len());
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Medicine;
    use tempfile::TempDir;

    async fn records_with(customers: &[Customer]) -> (TempDir, Records) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("users.json"));
        store.save(customers).await.unwrap();
        (dir, Records::new(store))
    }

    fn amy() -> Customer {
        Customer::new("Amy Lee", "1234567890").with_medicine("Aspirin", 1.0)
    }

    fn bob() -> Customer {
        Customer::new("Bob Stone", "9998887770")
    }

    #[tokio::test]
    async fn list_empty_store_returns_placeholder() {
        let (_dir, records) = records_with(&[]).await;

        let customers = records.list().await.unwrap();

        assert_eq!(customers.len(), 1);
        assert!(customers[0].is_placeholder());
    }

    #[tokio::test]
    async fn empty_file_loads_as_empty_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "").unwrap();

        let customers = JsonFileStore::new(&path).load().await.unwrap();

        assert!(customers.is_empty());
    }

    #[tokio::test]
    async fn create_appends_one_record() {
        let (_dir, records) = records_with(&[bob()]).await;

        records.create(amy()).await.unwrap();

        let customers = records.list().await.unwrap();
        assert_eq!(customers, vec![bob(), amy()]);
    }

    #[tokio::test]
    async fn create_accepts_duplicate_phone() {
        let (_dir, records) = records_with(&[amy()]).await;

        records.create(amy()).await.unwrap();

        assert_eq!(records.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_without_name_or_phone_changes_nothing() {
        let (_dir, records) = records_with(&[bob()]).await;

        let nameless = Customer::new("", "1234567890");
        let phoneless = Customer::new("Amy Lee", "");

        assert!(matches!(
            records.create(nameless).await,
            Err(StoreError::Validation)
        ));
        assert!(matches!(
            records.create(phoneless).await,
            Err(StoreError::Validation)
        ));
        assert_eq!(records.store().load().await.unwrap(), vec![bob()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_all_persist() {
        let (_dir, records) = records_with(&[]).await;
        let records = std::sync::Arc::new(records);

        let mut creates = tokio::task::JoinSet::new();
        for i in 0..20 {
            let records = records.clone();
            creates.spawn(async move {
                let phone = format!("{:010}", i);
                records.create(Customer::new("Amy Lee", phone)).await
            });
        }
        while let Some(result) = creates.join_next().await {
            result.unwrap().unwrap();
        }

        let mut phones: Vec<String> = records
            .store()
            .load()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.phone)
            .collect();
        phones.sort();
        let expected: Vec<String> = (0..20).map(|i| format!("{:010}", i)).collect();
        assert_eq!(phones, expected);
    }

    #[tokio::test]
    async fn update_replaces_first_match_in_place() {
        let mut second_amy = amy();
        second_amy.address = Some("second".to_string());
        let (_dir, records) = records_with(&[amy(), bob(), second_amy.clone()]).await;

        let mut replacement = amy();
        replacement.email = Some("amy@example.com".to_string());
        records.update("1234567890", replacement.clone()).await.unwrap();

        let customers = records.store().load().await.unwrap();
        assert_eq!(customers, vec![replacement, bob(), second_amy]);
    }

    #[tokio::test]
    async fn update_may_change_phone() {
        let (_dir, records) = records_with(&[amy()]).await;

        let mut rekeyed = amy();
        rekeyed.phone = "5555555555".to_string();
        records.update("1234567890", rekeyed.clone()).await.unwrap();

        assert_eq!(records.store().load().await.unwrap(), vec![rekeyed]);
    }

    #[tokio::test]
    async fn update_unknown_phone_is_not_found() {
        let (_dir, records) = records_with(&[amy()]).await;

        let result = records.update("0000000000", bob()).await;

        assert!(matches!(result, Err(StoreError::NotFound)));
        assert_eq!(records.store().load().await.unwrap(), vec![amy()]);
    }

    #[tokio::test]
    async fn delete_removes_every_match() {
        let (_dir, records) = records_with(&[amy(), bob(), amy()]).await;

        let removed = records.delete("1234567890").await.unwrap();

        assert_eq!(removed, 2);
        assert_eq!(records.store().load().await.unwrap(), vec![bob()]);
    }

    #[tokio::test]
    async fn delete_unknown_phone_is_not_found() {
        let (_dir, records) = records_with(&[bob()]).await;

        let result = records.delete("1234567890").await;

        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn save_then_load_keeps_order_and_fields() {
        let mut full = amy();
        full.email = Some("amy@example.com".to_string());
        full.address = Some("1 Main St".to_string());
        full.medicines.push(Medicine {
            name: "Unknown".to_string(),
            days_left: None,
        });
        let (_dir, records) = records_with(&[full.clone(), bob()]).await;

        assert_eq!(records.store().load().await.unwrap(), vec![full, bob()]);
    }

    #[tokio::test]
    async fn corrupt_document_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{ not json").unwrap();
        let records = Records::new(JsonFileStore::new(&path));

        assert!(matches!(records.list().await, Err(StoreError::Parse(_))));
        assert!(matches!(
            records.create(amy()).await,
            Err(StoreError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_io_error_until_created() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("users.json"));

        assert!(matches!(store.load().await, Err(StoreError::Io { .. })));

        store.ensure_exists().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn document_is_pretty_printed() {
        let (_dir, records) = records_with(&[bob()]).await;

        let raw = std::fs::read_to_string(records.store().path()).unwrap();

        assert!(raw.contains("\n  {\n    \"name\": \"Bob Stone\""));
    }
}
