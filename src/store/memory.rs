use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;

use super::{coerce_product, parse_price, parse_product_id, ProductStore};
use crate::models::{NewProduct, Product, ProductField, ProductSummary};

#[derive(Default)]
struct Table {
    products: BTreeMap<i64, Product>,
    /// Secondary index: category -> product ids
    by_category: HashMap<String, BTreeSet<i64>>,
}

impl Table {
    fn index(&mut self, id: i64, category: &str) {
        self.by_category.entry(category.to_string()).or_default().insert(id);
    }

    fn unindex(&mut self, id: i64, category: &str) {
        if let Some(ids) = self.by_category.get_mut(category) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_category.remove(category);
            }
        }
    }
}

/// Process-local products table, used for development and tests
#[derive(Default)]
pub struct MemoryProductStore {
    table: RwLock<Table>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn scan(&self) -> Result<Vec<ProductSummary>> {
        let table = self.table.read().await;
        Ok(table.products.values().map(Product::summary).collect())
    }

    async fn get(&self, product_id: &str) -> Result<Option<ProductSummary>> {
        let id = parse_product_id(product_id)?;
        let table = self.table.read().await;
        Ok(table.products.get(&id).map(Product::summary))
    }

    async fn put(&self, payload: &NewProduct) -> Result<Product> {
        let (id, record) = coerce_product(payload)?;

        let mut table = self.table.write().await;
        if let Some(previous) = table.products.remove(&id) {
            table.unindex(id, &previous.product_category);
        }
        table.index(id, &record.product_category);
        table.products.insert(id, record.clone());

        tracing::debug!("Put product with id: {}", id);
        Ok(record)
    }

    async fn update(&self, product_id: &str, field: ProductField, value: &str) -> Result<bool> {
        let id = parse_product_id(product_id)?;
        let value = match field {
            ProductField::Price => parse_price(value)?,
            ProductField::Name | ProductField::Category => value.to_string(),
        };

        let mut table = self.table.write().await;
        let Some(product) = table.products.get_mut(&id) else {
            tracing::debug!("Product not found for update with id: {}", id);
            return Ok(false);
        };

        match field {
            ProductField::Name => product.product_name = value,
            ProductField::Price => product.product_price = value,
            ProductField::Category => {
                let previous = std::mem::replace(&mut product.product_category, value.clone());
                table.unindex(id, &previous);
                table.index(id, &value);
            }
        }

        tracing::debug!("Updated {} of product with id: {}", field, id);
        Ok(true)
    }

    async fn delete(&self, product_id: &str) -> Result<()> {
        let id = parse_product_id(product_id)?;
        let mut table = self.table.write().await;
        if let Some(previous) = table.products.remove(&id) {
            table.unindex(id, &previous.product_category);
            tracing::debug!("Deleted product with id: {}", id);
        }
        Ok(())
    }

    async fn query_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let table = self.table.read().await;
        let products = table
            .by_category
            .get(category)
            .into_iter()
            .flatten()
            .filter_map(|id| table.products.get(id).cloned())
            .collect();
        Ok(products)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str, category: &str, price: &str) -> Product {
        Product {
            product_id: id.to_string(),
            product_name: name.to_string(),
            product_category: category.to_string(),
            product_price: price.to_string(),
        }
    }

    fn payload(id: &str, name: &str, category: &str, price: &str) -> NewProduct {
        serde_json::from_value(serde_json::json!({
            "productId": id,
            "productName": name,
            "productCategory": category,
            "productPrice": price
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = MemoryProductStore::new();
        store.put(&payload("7", "Shirt", "Clothing", "5.99")).await.unwrap();

        let found = store.get("7").await.unwrap().unwrap();
        assert_eq!(found.product_name, "Shirt");
        assert_eq!(found.product_category, "Clothing");
        assert_eq!(found.product_price, "5.99");

        assert!(store.get("8").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_returns_canonical_record() {
        let store = MemoryProductStore::new();

        let stored = store.put(&payload("007", "Shirt", "Clothing", " 5.99")).await.unwrap();

        assert_eq!(stored, product("7", "Shirt", "Clothing", "5.99"));
        assert_eq!(store.query_by_category("Clothing").await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_put_overwrites_and_reindexes() {
        let store = MemoryProductStore::new();
        store.put(&payload("1", "Shorts", "Clothing", "30")).await.unwrap();
        store.put(&payload("1", "Shorts", "Sports", "25")).await.unwrap();

        assert_eq!(store.scan().await.unwrap().len(), 1);
        assert!(store.query_by_category("Clothing").await.unwrap().is_empty());
        let sports = store.query_by_category("Sports").await.unwrap();
        assert_eq!(sports, vec![product("1", "Shorts", "Sports", "25")]);
    }

    #[tokio::test]
    async fn test_put_rejects_malformed_numbers() {
        let store = MemoryProductStore::new();

        assert!(store.put(&payload("x", "Shirt", "Clothing", "5")).await.is_err());
        assert!(store.put(&payload("1", "Shirt", "Clothing", "five")).await.is_err());
        assert!(store.scan().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_single_field() {
        let store = MemoryProductStore::new();
        store.put(&payload("7", "Shirt", "Clothing", "5.99")).await.unwrap();

        assert!(store.update("7", ProductField::Price, "59.99").await.unwrap());

        let found = store.get("7").await.unwrap().unwrap();
        assert_eq!(found.product_price, "59.99");
        assert_eq!(found.product_name, "Shirt");
        assert_eq!(found.product_category, "Clothing");
    }

    #[tokio::test]
    async fn test_update_category_moves_index_entry() {
        let store = MemoryProductStore::new();
        store.put(&payload("7", "Shirt", "Clothing", "5.99")).await.unwrap();
        store.put(&payload("8", "Hat", "Clothing", "9")).await.unwrap();

        assert!(store.update("7", ProductField::Category, "Sale").await.unwrap());

        let clothing = store.query_by_category("Clothing").await.unwrap();
        assert_eq!(clothing.len(), 1);
        assert_eq!(clothing[0].product_id, "8");
        let sale = store.query_by_category("Sale").await.unwrap();
        assert_eq!(sale, vec![product("7", "Shirt", "Sale", "5.99")]);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let store = MemoryProductStore::new();

        assert!(!store.update("7", ProductField::Name, "Shirt").await.unwrap());
        assert!(store.get("7").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_bad_price() {
        let store = MemoryProductStore::new();
        store.put(&payload("7", "Shirt", "Clothing", "5.99")).await.unwrap();

        assert!(store.update("7", ProductField::Price, "a lot").await.is_err());
        assert_eq!(store.get("7").await.unwrap().unwrap().product_price, "5.99");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryProductStore::new();
        store.put(&payload("7", "Shirt", "Clothing", "5.99")).await.unwrap();

        store.delete("7").await.unwrap();
        store.delete("7").await.unwrap();

        assert!(store.get("7").await.unwrap().is_none());
        assert!(store.query_by_category("Clothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_projects_in_id_order() {
        let store = MemoryProductStore::new();
        store.put(&payload("2", "Hat", "Clothing", "9")).await.unwrap();
        store.put(&payload("1", "Ball", "Sports", "3")).await.unwrap();

        let names: Vec<String> = store
            .scan()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.product_name)
            .collect();
        assert_eq!(names, vec!["Ball", "Hat"]);
    }
}
