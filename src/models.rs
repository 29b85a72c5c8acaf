use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A complete product record, as accepted by create and returned by category queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub product_category: String,
    pub product_price: String,
}

impl Product {
    /// Project away the identifier
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            product_name: self.product_name.clone(),
            product_category: self.product_category.clone(),
            product_price: self.product_price.clone(),
        }
    }
}

/// Create payload as received, before the store coerces it into a [`Product`]
///
/// Fields stay raw JSON so that a missing or mistyped field is reported by the
/// store like any other rejected record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_id: Option<serde_json::Value>,
    pub product_name: Option<serde_json::Value>,
    pub product_category: Option<serde_json::Value>,
    pub product_price: Option<serde_json::Value>,
}

/// Product projection returned by list and get-by-id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub product_name: String,
    pub product_category: String,
    pub product_price: String,
}

/// Attributes a PATCH may change; the identifier is immutable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Category,
    Price,
}

impl ProductField {
    pub const ALL: [ProductField; 3] = [ProductField::Name, ProductField::Category, ProductField::Price];

    pub fn attribute(self) -> &'static str {
        match self {
            ProductField::Name => "productName",
            ProductField::Category => "productCategory",
            ProductField::Price => "productPrice",
        }
    }
}

impl FromStr for ProductField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductField::ALL
            .into_iter()
            .find(|field| field.attribute() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// Typed attribute value, e.g. `{"N": "59.99"}` or `{"S": "Shirt"}`
#[derive(Debug, Clone, PartialEq, Deserialize, utoipa::ToSchema)]
pub enum AttributeValue {
    S(String),
    N(String),
}

/// New value for the attribute named by `updateKey`
#[derive(Debug, Clone, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum UpdateValue {
    Typed(AttributeValue),
    Text(String),
    Number(f64),
}

impl UpdateValue {
    /// Text form handed to the store
    pub fn into_text(self) -> String {
        match self {
            UpdateValue::Typed(AttributeValue::S(s) | AttributeValue::N(s)) => s,
            UpdateValue::Text(s) => s,
            UpdateValue::Number(n) => n.to_string(),
        }
    }
}

/// Request body for PATCH /products/{productId}
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub update_key: String,
    pub update_value: UpdateValue,
}

/// Identifier echoed back by create
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProduct {
    pub product_id: String,
}

/// Response envelope for POST /products
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateResponse {
    pub data: CreatedProduct,
}

/// Response envelope for GET /products
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListResponse {
    pub data: Vec<ProductSummary>,
}

/// Response envelope for GET /products/{productId}
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct GetResponse {
    pub data: ProductSummary,
}

/// Response envelope for GET /products/categories/{categoryName}
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub data: Vec<Product>,
}

/// Store status reported by the health check
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub table: String,
}

/// Response envelope for GET /health
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub data: HealthStatus,
}
