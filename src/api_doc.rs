use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers;
use crate::models::{
    AttributeValue, CategoryResponse, CreateResponse, CreatedProduct, GetResponse,
    HealthResponse, HealthStatus, ListResponse, Product, ProductSummary, UpdateRequest,
    UpdateValue,
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "spanner-products-api",
        version = "1.0.0",
        description = "CRUD over a products table, backed by Google Cloud Spanner"
    ),
    paths(
        handlers::health::health_handler,
        handlers::list::list_handler,
        handlers::create::create_handler,
        handlers::get::get_handler,
        handlers::update::update_handler,
        handlers::delete::delete_handler,
        handlers::category::category_handler
    ),
    components(
        schemas(
            Product,
            ProductSummary,
            UpdateRequest,
            UpdateValue,
            AttributeValue,
            CreatedProduct,
            CreateResponse,
            ListResponse,
            GetResponse,
            CategoryResponse,
            HealthStatus,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "products", description = "Product catalog operations")
    )
)]
pub struct ApiDoc;
