//! # Store
//!
//! Data-access layer for inventory counts and the sales log.
//!
//! Storage is abstracted behind the [`StorageBackend`] trait with two
//! implementations, picked once at startup:
//! - [`RemoteBackend`]: Supabase tables reached over PostgREST.
//! - [`LocalBackend`]: two JSON documents on disk, read and rewritten in
//!   full on every access.
//!
//! The [`Store`] facade owns the flavor catalog and applies the business
//! rules (stock never negative, sales never exceed stock, flavor names
//! normalized and deduplicated). Reads degrade to safe defaults when the
//! backend fails so pages always render; writes surface a [`StoreError`]
//! that distinguishes business rejections from backend failures.
//!
//! There is no caching and no locking: every operation re-reads from the
//! backend, and concurrent writers race with last-write-wins. Acceptable
//! for a single-location, low-traffic tool.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::error;

use crate::{
    error::{BackendError, StoreError},
    models::{LowStockItem, Sale},
    utils::normalize_flavor,
};

pub mod local;
pub mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// Flavors every fresh installation starts with.
pub const SEED_FLAVORS: [&str; 12] = [
    "Vanilla",
    "Chocolate",
    "Strawberry",
    "Mango",
    "Kulfi",
    "Butterscotch",
    "Pista",
    "Chocolate Chip",
    "Black Current",
    "Orange",
    "Coconut",
    "Cassata",
];

pub const LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Set,
    Add,
    Subtract,
}

/// Raw record access implemented by each backend. The business rules live
/// in [`Store`]; backends only move bytes.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn tag(&self) -> &'static str;

    /// Full scan of the inventory table / document.
    async fn load_inventory(&self) -> Result<BTreeMap<String, u32>, BackendError>;

    /// Persists the count for one flavor, creating the record if absent.
    async fn write_count(&self, flavor: &str, count: u32) -> Result<(), BackendError>;

    /// Appends one entry to the sales log.
    async fn append_sale(&self, sale: &Sale) -> Result<(), BackendError>;

    /// Sales newest-first. Remote caps at 100 rows server-side; local
    /// returns the whole log.
    async fn load_sales(&self) -> Result<Vec<Sale>, BackendError>;

    /// Cheap connectivity check for the diagnostics endpoint.
    async fn probe(&self) -> Result<usize, BackendError>;
}

pub struct Store {
    backend: Box<dyn StorageBackend>,
    catalog: Mutex<Vec<String>>,
}

impl Store {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            catalog: Mutex::new(SEED_FLAVORS.iter().map(|f| f.to_string()).collect()),
        }
    }

    pub fn backend_tag(&self) -> &'static str {
        self.backend.tag()
    }

    /// Current catalog, seed order plus any runtime additions.
    pub async fn catalog(&self) -> Vec<String> {
        self.catalog.lock().await.clone()
    }

    pub async fn probe(&self) -> Result<usize, BackendError> {
        self.backend.probe().await
    }

    /// Count for every flavor the backend knows. Never fails: a backend
    /// error is logged and every catalog flavor reads as zero, so the UI
    /// always has something to render.
    pub async fn get_inventory(&self) -> BTreeMap<String, u32> {
        match self.backend.load_inventory().await {
            Ok(inventory) => inventory,
            Err(e) => {
                error!("Error loading inventory: {e}");
                self.catalog
                    .lock()
                    .await
                    .iter()
                    .map(|f| (f.clone(), 0))
                    .collect()
            }
        }
    }

    /// Sorted union of the catalog and every flavor present in the backend,
    /// covering flavors added to the tables directly. Falls back to the
    /// catalog as-is when the backend is unreachable.
    pub async fn get_all_flavors(&self) -> Vec<String> {
        let catalog = self.catalog.lock().await.clone();

        match self.backend.load_inventory().await {
            Ok(inventory) => {
                let mut flavors: BTreeSet<String> = catalog.into_iter().collect();
                flavors.extend(inventory.into_keys());
                flavors.into_iter().collect()
            }
            Err(e) => {
                error!("Error getting flavors: {e}");
                catalog
            }
        }
    }

    /// Normalizes the name, creates it at count zero, and adds it to the
    /// catalog. The existence check runs against the current inventory
    /// snapshot; the read-then-check race is accepted.
    pub async fn add_flavor(&self, name: &str) -> Result<String, StoreError> {
        let flavor = normalize_flavor(name);

        if flavor.is_empty() {
            return Err(StoreError::EmptyFlavor);
        }

        if self.get_inventory().await.contains_key(&flavor) {
            return Err(StoreError::DuplicateFlavor(flavor));
        }

        self.backend.write_count(&flavor, 0).await.map_err(|e| {
            error!("Error adding new flavor: {e}");
            e
        })?;

        let mut catalog = self.catalog.lock().await;
        if !catalog.contains(&flavor) {
            catalog.push(flavor.clone());
            catalog.sort();
        }

        Ok(flavor)
    }

    /// Computes the new count from the current snapshot and writes it back.
    /// `Subtract` floors at zero, silently absorbing over-subtraction.
    /// Returns the count that was written.
    pub async fn update_inventory(
        &self,
        flavor: &str,
        amount: u32,
        mode: UpdateMode,
    ) -> Result<u32, StoreError> {
        let current = self
            .get_inventory()
            .await
            .get(flavor)
            .copied()
            .unwrap_or(0);

        let new_count = match mode {
            UpdateMode::Set => amount,
            UpdateMode::Add => current.saturating_add(amount),
            UpdateMode::Subtract => current.saturating_sub(amount),
        };

        self.backend
            .write_count(flavor, new_count)
            .await
            .map_err(|e| {
                error!("Error updating inventory: {e}");
                e
            })?;

        Ok(new_count)
    }

    /// Logs a sale and decrements stock. Rejected with no side effects when
    /// stock does not cover the quantity.
    ///
    /// The append and the decrement are two separate writes; a crash between
    /// them leaves a sale logged without the matching decrement. Accepted
    /// for this single-writer tool.
    pub async fn record_sale(&self, flavor: &str, quantity: u32) -> Result<(), StoreError> {
        if quantity == 0 {
            return Err(StoreError::ZeroQuantity);
        }

        let available = self
            .get_inventory()
            .await
            .get(flavor)
            .copied()
            .unwrap_or(0);

        if available < quantity {
            return Err(StoreError::InsufficientStock {
                flavor: flavor.to_string(),
                available,
                requested: quantity,
            });
        }

        let sale = Sale::now(flavor.to_string(), quantity);
        self.backend.append_sale(&sale).await.map_err(|e| {
            error!("Error recording sale: {e}");
            e
        })?;

        self.update_inventory(flavor, quantity, UpdateMode::Subtract)
            .await?;

        Ok(())
    }

    /// Sales newest-first. The day-range bound is accepted for compatibility
    /// with the report page but does not filter; the remote backend caps
    /// results at 100 rows regardless. Degrades to an empty list on failure.
    pub async fn get_sales_data(&self, _days: u32) -> Vec<Sale> {
        match self.backend.load_sales().await {
            Ok(sales) => sales,
            Err(e) => {
                error!("Error loading sales data: {e}");
                Vec::new()
            }
        }
    }

    /// Flavors whose count is below `threshold`. Pure view over
    /// [`get_inventory`](Store::get_inventory).
    pub async fn get_low_stock_items(&self, threshold: u32) -> Vec<LowStockItem> {
        self.get_inventory()
            .await
            .into_iter()
            .filter(|(_, count)| *count < threshold)
            .map(|(flavor, count)| LowStockItem { flavor, count })
            .collect()
    }
}
