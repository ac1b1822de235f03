//! File-backed storage: two JSON documents under the data directory,
//! `inventory.json` (flavor -> count) and `sales.json` (array of sale
//! records). Each access reads or rewrites a document in full.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::StorageBackend;
use crate::{error::BackendError, models::Sale};

pub struct LocalBackend {
    inventory_path: PathBuf,
    sales_path: PathBuf,
    seed: Vec<String>,
}

impl LocalBackend {
    /// Opens the data directory, creating it and the two documents with
    /// default contents (every seed flavor at zero, empty sales log) on
    /// first run.
    pub fn init(data_dir: &Path, seed: &[&str]) -> Result<Self, BackendError> {
        fs::create_dir_all(data_dir)?;

        let backend = Self {
            inventory_path: data_dir.join("inventory.json"),
            sales_path: data_dir.join("sales.json"),
            seed: seed.iter().map(|f| f.to_string()).collect(),
        };

        if !backend.inventory_path.exists() {
            backend.save(&backend.inventory_path, &backend.default_inventory())?;
            info!("Initialized local inventory storage");
        }

        if !backend.sales_path.exists() {
            backend.save(&backend.sales_path, &Vec::<Sale>::new())?;
            info!("Initialized local sales storage");
        }

        Ok(backend)
    }

    fn default_inventory(&self) -> BTreeMap<String, u32> {
        self.seed.iter().map(|f| (f.clone(), 0)).collect()
    }

    fn read_inventory(&self) -> Result<BTreeMap<String, u32>, BackendError> {
        let raw = fs::read_to_string(&self.inventory_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn read_sales(&self) -> Result<Vec<Sale>, BackendError> {
        let raw = fs::read_to_string(&self.sales_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save<T: Serialize>(&self, path: &Path, data: &T) -> Result<(), BackendError> {
        fs::write(path, serde_json::to_string_pretty(data)?)?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn tag(&self) -> &'static str {
        "local"
    }

    async fn load_inventory(&self) -> Result<BTreeMap<String, u32>, BackendError> {
        self.read_inventory()
    }

    async fn write_count(&self, flavor: &str, count: u32) -> Result<(), BackendError> {
        // An unreadable document is replaced with the seed defaults rather
        // than blocking the write.
        let mut inventory = self.read_inventory().unwrap_or_else(|e| {
            warn!("Rebuilding inventory document: {e}");
            self.default_inventory()
        });

        inventory.insert(flavor.to_string(), count);
        self.save(&self.inventory_path, &inventory)
    }

    async fn append_sale(&self, sale: &Sale) -> Result<(), BackendError> {
        let mut sales = self.read_sales().unwrap_or_else(|e| {
            warn!("Rebuilding sales document: {e}");
            Vec::new()
        });

        sales.push(sale.clone());
        self.save(&self.sales_path, &sales)
    }

    async fn load_sales(&self) -> Result<Vec<Sale>, BackendError> {
        let mut sales = self.read_sales()?;
        // Newest first; a record without a timestamp deserializes to the
        // empty string and sorts to the end.
        sales.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(sales)
    }

    async fn probe(&self) -> Result<usize, BackendError> {
        Ok(self.read_inventory()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::init(dir.path(), &["Vanilla", "Mango"]).unwrap();

        let inventory = backend.load_inventory().await.unwrap();

        assert_eq!(inventory["Vanilla"], 0);
        assert_eq!(inventory["Mango"], 0);
        assert_eq!(backend.load_sales().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_init_keeps_existing_documents() {
        let dir = TempDir::new().unwrap();

        let backend = LocalBackend::init(dir.path(), &["Vanilla"]).unwrap();
        backend.write_count("Vanilla", 8).await.unwrap();

        let reopened = LocalBackend::init(dir.path(), &["Vanilla"]).unwrap();
        assert_eq!(reopened.load_inventory().await.unwrap()["Vanilla"], 8);
    }

    #[tokio::test]
    async fn test_inventory_round_trip() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::init(dir.path(), &[]).unwrap();

        backend.write_count("Vanilla", 5).await.unwrap();
        backend.write_count("Chocolate", 12).await.unwrap();
        backend.write_count("Vanilla", 7).await.unwrap();

        let inventory = backend.load_inventory().await.unwrap();

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory["Vanilla"], 7);
        assert_eq!(inventory["Chocolate"], 12);
    }

    #[tokio::test]
    async fn test_sales_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::init(dir.path(), &[]).unwrap();

        for (quantity, timestamp) in [
            (1, "2024-06-01T09:00:00"),
            (2, "2024-06-02T09:00:00"),
            (3, "2024-06-01T18:00:00"),
            (4, ""),
        ] {
            backend
                .append_sale(&Sale {
                    flavor: "Vanilla".to_string(),
                    quantity,
                    sale_date: "2024-06-01".parse().unwrap(),
                    timestamp: timestamp.to_string(),
                })
                .await
                .unwrap();
        }

        let sales = backend.load_sales().await.unwrap();
        let quantities: Vec<u32> = sales.iter().map(|s| s.quantity).collect();

        // The empty timestamp sorts below every real one, so the untimed
        // record lands at the end of the newest-first list.
        assert_eq!(quantities, vec![2, 3, 1, 4]);
    }

    #[tokio::test]
    async fn test_missing_timestamp_deserializes_empty() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::init(dir.path(), &[]).unwrap();

        fs::write(
            dir.path().join("sales.json"),
            r#"[{"flavor": "Mango", "quantity": 2, "sale_date": "2024-06-01"}]"#,
        )
        .unwrap();

        let sales = backend.load_sales().await.unwrap();

        assert_eq!(sales[0].timestamp, "");
    }

    #[tokio::test]
    async fn test_corrupt_inventory_rebuilt_on_write() {
        let dir = TempDir::new().unwrap();
        let backend = LocalBackend::init(dir.path(), &["Vanilla"]).unwrap();

        fs::write(dir.path().join("inventory.json"), "not json").unwrap();
        assert!(backend.load_inventory().await.is_err());

        backend.write_count("Mango", 3).await.unwrap();

        let inventory = backend.load_inventory().await.unwrap();
        assert_eq!(inventory["Mango"], 3);
        assert_eq!(inventory["Vanilla"], 0);
    }
}
