mod memory;
#[cfg(test)]
mod mock;
mod spanner;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::models::{NewProduct, Product, ProductField, ProductSummary};

pub use memory::MemoryProductStore;
#[cfg(test)]
pub use mock::FailingStore;
pub use spanner::SpannerProductStore;

/// Persistence for the products table
///
/// Identifiers and prices arrive as caller-supplied text. Backends coerce them
/// with [`coerce_product`], [`parse_product_id`] and [`parse_price`] and report
/// anything that does not coerce as an ordinary store error.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every product, projected without its identifier
    async fn scan(&self) -> Result<Vec<ProductSummary>>;

    /// Point lookup, projected without its identifier
    async fn get(&self, product_id: &str) -> Result<Option<ProductSummary>>;

    /// Insert or overwrite the product keyed by `productId`; returns the record as stored
    async fn put(&self, payload: &NewProduct) -> Result<Product>;

    /// Set one attribute; returns `false` when no product has this id
    async fn update(&self, product_id: &str, field: ProductField, value: &str) -> Result<bool>;

    /// Delete unconditionally; absent ids are not an error
    async fn delete(&self, product_id: &str) -> Result<()>;

    /// Products in `category`, answered from the category index
    async fn query_by_category(&self, category: &str) -> Result<Vec<Product>>;

    async fn health_check(&self) -> Result<()>;
}

/// Build the store selected by `config`
pub async fn connect(config: &Config) -> Result<Arc<dyn ProductStore>> {
    match config.store_backend {
        StoreBackend::Spanner => {
            let spanner = config
                .spanner
                .as_ref()
                .context("Spanner backend selected without Spanner configuration")?;
            let store = SpannerProductStore::from_config(spanner, &config.products_table).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory products table '{}'", config.products_table);
            Ok(Arc::new(MemoryProductStore::new()))
        }
    }
}

/// Coerce a create payload into the record a backend stores
///
/// The returned product carries the canonical id text, so `"007"` comes back as `"7"`.
pub fn coerce_product(payload: &NewProduct) -> Result<(i64, Product)> {
    let product_id = required_text("productId", payload.product_id.as_ref())?;
    let id = parse_product_id(product_id)?;
    let product = Product {
        product_id: id.to_string(),
        product_name: required_text("productName", payload.product_name.as_ref())?.to_string(),
        product_category: required_text("productCategory", payload.product_category.as_ref())?
            .to_string(),
        product_price: parse_price(required_text("productPrice", payload.product_price.as_ref())?)?,
    };
    Ok((id, product))
}

fn required_text<'a>(field: &str, value: Option<&'a serde_json::Value>) -> Result<&'a str> {
    match value {
        None | Some(serde_json::Value::Null) => bail!("{} is required", field),
        Some(serde_json::Value::String(text)) => Ok(text),
        Some(other) => bail!("{} must be a string, got {}", field, other),
    }
}

pub fn parse_product_id(product_id: &str) -> Result<i64> {
    product_id
        .trim()
        .parse::<i64>()
        .with_context(|| format!("productId must be an integer, got '{}'", product_id))
}

/// Validate a price and return the text to store
pub fn parse_price(price: &str) -> Result<String> {
    let trimmed = price.trim();
    let value = trimmed
        .parse::<f64>()
        .with_context(|| format!("productPrice must be a number, got '{}'", price))?;
    if !value.is_finite() {
        bail!("productPrice must be a finite number, got '{}'", price);
    }
    Ok(trimmed.to_string())
}
