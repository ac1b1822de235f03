use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// One entry in the append-only sales log. Never mutated after creation.
///
/// `timestamp` stays a plain ISO-8601 string: older logs can miss the field,
/// and sorting treats a missing value as the empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sale {
    pub flavor: String,
    pub quantity: u32,
    pub sale_date: NaiveDate,
    #[serde(default)]
    pub timestamp: String,
}

impl Sale {
    /// Builds a sale stamped with today's date and the current local time.
    pub fn now(flavor: String, quantity: u32) -> Self {
        let now = Local::now();
        Self {
            flavor,
            quantity,
            sale_date: now.date_naive(),
            timestamp: now.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }
}

/// Row projection read back from the remote `inventory` table.
#[derive(Debug, Deserialize)]
pub struct InventoryRow {
    pub flavor: String,
    pub count: u32,
}

/// A flavor sitting below the low-stock threshold.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LowStockItem {
    pub flavor: String,
    pub count: u32,
}

#[derive(Deserialize)]
pub struct StockForm {
    pub flavor: String,
    #[serde(default)]
    pub count: u32,
}

#[derive(Deserialize)]
pub struct SaleForm {
    pub flavor: String,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct FlavorForm {
    #[serde(default)]
    pub new_flavor: String,
}

#[derive(Deserialize)]
pub struct StockPayload {
    pub flavor: String,
    #[serde(default)]
    pub count: u32,
}

#[derive(Deserialize)]
pub struct SalePayload {
    pub flavor: String,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct ApiResult {
    pub success: bool,
    pub message: String,
}
