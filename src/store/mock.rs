use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::ProductStore;
use crate::models::{NewProduct, Product, ProductField, ProductSummary};

/// Store whose every call fails with the same message
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn scan(&self) -> Result<Vec<ProductSummary>> {
        Err(anyhow!(self.message.clone()))
    }

    async fn get(&self, _product_id: &str) -> Result<Option<ProductSummary>> {
        Err(anyhow!(self.message.clone()))
    }

    async fn put(&self, _payload: &NewProduct) -> Result<Product> {
        Err(anyhow!(self.message.clone()))
    }

    async fn update(&self, _product_id: &str, _field: ProductField, _value: &str) -> Result<bool> {
        Err(anyhow!(self.message.clone()))
    }

    async fn delete(&self, _product_id: &str) -> Result<()> {
        Err(anyhow!(self.message.clone()))
    }

    async fn query_by_category(&self, _category: &str) -> Result<Vec<Product>> {
        Err(anyhow!(self.message.clone()))
    }

    async fn health_check(&self) -> Result<()> {
        Err(anyhow!(self.message.clone()))
    }
}
