//! # Supabase
//!
//! Hosted table store reached over the PostgREST interface.
//!
//! ## Schema
//! - `inventory`: flavor (**string**, unique), count (**int**), updated_at (**timestamp**)
//! - `sales`: flavor (**string**), quantity (**int**), sale_date (**date**), timestamp (**timestamp**)
//!
//! Every request carries the project key both as `apikey` and as a bearer
//! token. Writes target single rows; the update-or-insert branch in
//! [`write_count`](RemoteBackend::write_count) checks row existence first,
//! so two concurrent writers can race at the row level (last write wins,
//! accepted).

use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use chrono::Local;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, Response,
};
use serde_json::{json, Value};

use super::StorageBackend;
use crate::{
    error::BackendError,
    models::{InventoryRow, Sale},
};

const INVENTORY_TABLE: &str = "inventory";
const SALES_TABLE: &str = "sales";

/// Server-side cap on sales rows fetched per report.
const SALES_LIMIT: u32 = 100;

pub struct RemoteBackend {
    client: Client,
    base_url: String,
}

impl RemoteBackend {
    pub fn new(url: &str, key: &str) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {key}"))?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    async fn select_flavor_rows(&self, flavor: &str) -> Result<Vec<Value>, BackendError> {
        let response = self
            .client
            .get(self.table_url(INVENTORY_TABLE))
            .query(&[
                ("select", "flavor".to_string()),
                ("flavor", format!("eq.{flavor}")),
            ])
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }
}

#[async_trait]
impl StorageBackend for RemoteBackend {
    fn tag(&self) -> &'static str {
        "supabase"
    }

    async fn load_inventory(&self) -> Result<BTreeMap<String, u32>, BackendError> {
        let response = self
            .client
            .get(self.table_url(INVENTORY_TABLE))
            .query(&[("select", "flavor,count")])
            .send()
            .await?;

        let rows: Vec<InventoryRow> = checked(response).await?.json().await?;

        Ok(rows.into_iter().map(|row| (row.flavor, row.count)).collect())
    }

    async fn write_count(&self, flavor: &str, count: u32) -> Result<(), BackendError> {
        let updated_at = Local::now().naive_local().to_string();

        let response = if self.select_flavor_rows(flavor).await?.is_empty() {
            self.client
                .post(self.table_url(INVENTORY_TABLE))
                .json(&json!({
                    "flavor": flavor,
                    "count": count,
                    "updated_at": updated_at,
                }))
                .send()
                .await?
        } else {
            self.client
                .patch(self.table_url(INVENTORY_TABLE))
                .query(&[("flavor", format!("eq.{flavor}"))])
                .json(&json!({
                    "count": count,
                    "updated_at": updated_at,
                }))
                .send()
                .await?
        };

        checked(response).await?;
        Ok(())
    }

    async fn append_sale(&self, sale: &Sale) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.table_url(SALES_TABLE))
            .json(sale)
            .send()
            .await?;

        checked(response).await?;
        Ok(())
    }

    async fn load_sales(&self) -> Result<Vec<Sale>, BackendError> {
        let response = self
            .client
            .get(self.table_url(SALES_TABLE))
            .query(&[
                ("select", "*".to_string()),
                ("order", "timestamp.desc".to_string()),
                ("limit", SALES_LIMIT.to_string()),
            ])
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }

    async fn probe(&self) -> Result<usize, BackendError> {
        let response = self
            .client
            .get(self.table_url(INVENTORY_TABLE))
            .query(&[("select", "flavor"), ("limit", "1")])
            .send()
            .await?;

        let rows: Vec<Value> = checked(response).await?.json().await?;
        Ok(rows.len())
    }
}

fn header_value(value: &str) -> Result<HeaderValue, BackendError> {
    HeaderValue::from_str(value)
        .map_err(|e| BackendError::Config(format!("invalid credential: {e}")))
}

async fn checked(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(BackendError::Status {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}
