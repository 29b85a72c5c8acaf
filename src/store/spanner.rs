use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use gcloud_gax::grpc::Code;
use gcloud_googleapis::spanner::admin::database::v1::{
    CreateDatabaseRequest, DatabaseDialect, GetDatabaseDdlRequest, GetDatabaseRequest,
    UpdateDatabaseDdlRequest,
};
use gcloud_googleapis::spanner::admin::instance::v1::{
    CreateInstanceRequest, GetInstanceRequest, Instance,
};
use gcloud_spanner::admin::client::Client as AdminClient;
use gcloud_spanner::admin::AdminClientConfig;
use gcloud_spanner::client::{Client, ClientConfig};
use gcloud_spanner::key::Key;
use gcloud_spanner::mutation::{delete, insert_or_update, update};
use gcloud_spanner::row::Row;
use gcloud_spanner::statement::Statement;
use std::sync::Arc;

use super::{coerce_product, parse_price, parse_product_id, ProductStore};
use crate::config::SpannerConfig;
use crate::models::{NewProduct, Product, ProductField, ProductSummary};

fn column(field: ProductField) -> &'static str {
    match field {
        ProductField::Name => "product_name",
        ProductField::Category => "product_category",
        ProductField::Price => "product_price",
    }
}

fn summary_from_row(row: &Row) -> Result<ProductSummary> {
    Ok(ProductSummary {
        product_name: row.column_by_name("product_name")?,
        product_category: row.column_by_name("product_category")?,
        product_price: row.column_by_name("product_price")?,
    })
}

fn product_from_row(row: &Row) -> Result<Product> {
    let product_id: i64 = row.column_by_name("product_id")?;
    Ok(Product {
        product_id: product_id.to_string(),
        product_name: row.column_by_name("product_name")?,
        product_category: row.column_by_name("product_category")?,
        product_price: row.column_by_name("product_price")?,
    })
}

/// Products table in Cloud Spanner, with a covering index on category
#[derive(Clone)]
pub struct SpannerProductStore {
    inner: Arc<Client>,
    table: String,
    category_index: String,
}

impl SpannerProductStore {
    /// Connect to the configured database
    ///
    /// The gcloud-spanner library picks up SPANNER_EMULATOR_HOST on its own
    /// and talks to the emulator when it is set. The instance, database,
    /// table and category index are created first if they are missing.
    pub async fn from_config(config: &SpannerConfig, table: &str) -> Result<Self> {
        let category_index = format!("{}_by_category", table);

        auto_provision(config, table, &category_index).await?;

        let database_path = format!(
            "projects/{}/instances/{}/databases/{}",
            config.project, config.instance, config.database
        );

        match &config.emulator_host {
            Some(host) => tracing::info!("Connecting to Spanner emulator at: {}", host),
            None => tracing::info!("Connecting to production Spanner"),
        }

        let client = Client::new(&database_path, ClientConfig::default())
            .await
            .context("Failed to create Spanner client")?;

        tracing::info!(
            "Successfully connected to Spanner database: {}",
            database_path
        );

        Ok(Self {
            inner: Arc::new(client),
            table: table.to_string(),
            category_index,
        })
    }

    async fn query_rows(&self, statement: Statement) -> Result<Vec<Row>> {
        let mut tx = self
            .inner
            .single()
            .await
            .context("Failed to create read transaction")?;

        let mut result_set = tx
            .query(statement)
            .await
            .context("Failed to query products from Spanner")?;

        let mut rows = Vec::new();
        while let Some(row) = result_set.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    fn lookup_statement(&self, columns: &str, id: i64) -> Statement {
        let mut statement = Statement::new(format!(
            "SELECT {} FROM {} WHERE product_id = @product_id",
            columns, self.table
        ));
        statement.add_param("product_id", &id);
        statement
    }
}

#[async_trait]
impl ProductStore for SpannerProductStore {
    async fn scan(&self) -> Result<Vec<ProductSummary>> {
        let statement = Statement::new(format!(
            "SELECT product_name, product_category, product_price FROM {}",
            self.table
        ));

        let rows = self.query_rows(statement).await?;
        let products = rows.iter().map(summary_from_row).collect::<Result<Vec<_>>>()?;

        tracing::debug!("Scanned {} products", products.len());
        Ok(products)
    }

    async fn get(&self, product_id: &str) -> Result<Option<ProductSummary>> {
        let id = parse_product_id(product_id)?;
        let statement =
            self.lookup_statement("product_name, product_category, product_price", id);

        match self.query_rows(statement).await?.first() {
            Some(row) => {
                tracing::debug!("Read product with id: {}", id);
                Ok(Some(summary_from_row(row)?))
            }
            None => {
                tracing::debug!("Product not found with id: {}", id);
                Ok(None)
            }
        }
    }

    async fn put(&self, payload: &NewProduct) -> Result<Product> {
        let (id, product) = coerce_product(payload)?;

        let mutation = insert_or_update(
            &self.table,
            &["product_id", "product_name", "product_category", "product_price"],
            &[
                &id,
                &product.product_name,
                &product.product_category,
                &product.product_price,
            ],
        );

        self.inner
            .apply(vec![mutation])
            .await
            .context("Failed to upsert product to Spanner")?;

        tracing::debug!("Upserted product with id: {}", id);
        Ok(product)
    }

    async fn update(&self, product_id: &str, field: ProductField, value: &str) -> Result<bool> {
        let id = parse_product_id(product_id)?;
        let value = match field {
            ProductField::Price => parse_price(value)?,
            ProductField::Name | ProductField::Category => value.to_string(),
        };

        let column_name = column(field);

        // Existence read and update commit atomically.
        let (_, exists) = self
            .inner
            .read_write_transaction(|tx| {
                let table = self.table.clone();
                let value = value.clone();
                Box::pin(async move {
                    let row = tx.read_row(&table, &["product_id"], Key::new(&id)).await?;
                    let exists = row.is_some();
                    if exists {
                        tx.buffer_write(vec![update(
                            &table,
                            &["product_id", column_name],
                            &[&id, &value],
                        )]);
                    }
                    Ok::<bool, gcloud_spanner::client::Error>(exists)
                })
            })
            .await
            .context("Failed to update product in Spanner")?;

        if exists {
            tracing::debug!("Updated {} of product with id: {}", field, id);
        } else {
            tracing::debug!("Product not found for update with id: {}", id);
        }
        Ok(exists)
    }

    async fn delete(&self, product_id: &str) -> Result<()> {
        let id = parse_product_id(product_id)?;

        self.inner
            .apply(vec![delete(&self.table, Key::new(&id))])
            .await
            .context("Failed to delete product from Spanner")?;

        tracing::debug!("Deleted product with id: {}", id);
        Ok(())
    }

    async fn query_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let mut statement = Statement::new(format!(
            "SELECT product_id, product_name, product_category, product_price \
             FROM {}@{{FORCE_INDEX={}}} WHERE product_category = @category",
            self.table, self.category_index
        ));
        statement.add_param("category", &category.to_string());

        let rows = self.query_rows(statement).await?;
        let products = rows.iter().map(product_from_row).collect::<Result<Vec<_>>>()?;

        tracing::debug!("Found {} products in category: {}", products.len(), category);
        Ok(products)
    }

    /// Run `SELECT 1` to prove the session pool can reach the database
    async fn health_check(&self) -> Result<()> {
        let rows = self
            .query_rows(Statement::new("SELECT 1"))
            .await
            .context("Failed to execute health check query")?;

        if rows.is_empty() {
            Err(anyhow::anyhow!("Health check query returned no results"))
        } else {
            tracing::debug!("Health check query succeeded");
            Ok(())
        }
    }
}

/// Create the instance, database, table and category index if they are missing
///
/// Lets the service start against a fresh emulator with no manual setup.
async fn auto_provision(config: &SpannerConfig, table: &str, category_index: &str) -> Result<()> {
    tracing::info!("Starting auto-provisioning checks...");

    let admin_client = AdminClient::new(AdminClientConfig::default())
        .await
        .context("Failed to create Spanner admin client")?;

    for resource in provisioning_plan(config) {
        ensure_exists(&admin_client, &resource).await?;
    }

    let database_path = format!(
        "projects/{}/instances/{}/databases/{}",
        config.project, config.instance, config.database
    );
    ensure_schema_exists(&admin_client, &database_path, table, category_index).await?;

    tracing::info!("Auto-provisioning complete");
    Ok(())
}

/// A Spanner container the service needs before it can create its schema
#[derive(Debug, PartialEq)]
enum Resource {
    Instance {
        parent: String,
        id: String,
        instance_config: String,
    },
    Database {
        parent: String,
        id: String,
    },
}

/// Instance then database; each is created only after its parent exists
fn provisioning_plan(config: &SpannerConfig) -> [Resource; 2] {
    let project = format!("projects/{}", config.project);
    let instance_config = match config.emulator_host {
        Some(_) => format!("{}/instanceConfigs/emulator-config", project),
        None => format!("{}/instanceConfigs/regional-us-central1", project),
    };
    let instance = format!("{}/instances/{}", project, config.instance);

    [
        Resource::Instance {
            parent: project,
            id: config.instance.clone(),
            instance_config,
        },
        Resource::Database {
            parent: instance,
            id: config.database.clone(),
        },
    ]
}

impl Resource {
    fn kind(&self) -> &'static str {
        match self {
            Resource::Instance { .. } => "instance",
            Resource::Database { .. } => "database",
        }
    }

    fn path(&self) -> String {
        match self {
            Resource::Instance { parent, id, .. } => format!("{}/instances/{}", parent, id),
            Resource::Database { parent, id } => format!("{}/databases/{}", parent, id),
        }
    }

    async fn exists(&self, admin_client: &AdminClient) -> Result<bool> {
        let name = self.path();
        let lookup = match self {
            Resource::Instance { .. } => admin_client
                .instance()
                .get_instance(GetInstanceRequest { name, field_mask: None }, None)
                .await
                .map(|_| ()),
            Resource::Database { .. } => admin_client
                .database()
                .get_database(GetDatabaseRequest { name }, None)
                .await
                .map(|_| ()),
        };

        match lookup {
            Ok(()) => Ok(true),
            Err(status) if status.code() == Code::NotFound => Ok(false),
            Err(status) => Err(anyhow!(
                "Failed to look up {} {}: {}",
                self.kind(),
                self.path(),
                status.message()
            )),
        }
    }

    async fn create(&self, admin_client: &AdminClient) -> Result<()> {
        match self {
            Resource::Instance {
                parent,
                id,
                instance_config,
            } => {
                let request = CreateInstanceRequest {
                    parent: parent.clone(),
                    instance_id: id.clone(),
                    instance: Some(Instance {
                        name: self.path(),
                        config: instance_config.clone(),
                        display_name: id.clone(),
                        node_count: 1,
                        ..Default::default()
                    }),
                };
                let mut operation = admin_client
                    .instance()
                    .create_instance(request, None)
                    .await
                    .context("Failed to start instance creation")?;
                operation.wait(None).await.context("Failed to create instance")?;
            }
            Resource::Database { parent, id } => {
                let request = CreateDatabaseRequest {
                    parent: parent.clone(),
                    create_statement: format!("CREATE DATABASE `{}`", id),
                    database_dialect: DatabaseDialect::GoogleStandardSql as i32,
                    ..Default::default()
                };
                let mut operation = admin_client
                    .database()
                    .create_database(request, None)
                    .await
                    .context("Failed to start database creation")?;
                operation.wait(None).await.context("Failed to create database")?;
            }
        }
        Ok(())
    }
}

async fn ensure_exists(admin_client: &AdminClient, resource: &Resource) -> Result<()> {
    let path = resource.path();
    if resource.exists(admin_client).await? {
        tracing::info!("Spanner {} already exists: {}", resource.kind(), path);
        return Ok(());
    }

    tracing::info!("Spanner {} not found, creating: {}", resource.kind(), path);
    resource.create(admin_client).await?;
    tracing::info!("Spanner {} created: {}", resource.kind(), path);
    Ok(())
}

fn products_table_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE {} (
    product_id INT64 NOT NULL,
    product_name STRING(MAX) NOT NULL,
    product_category STRING(MAX) NOT NULL,
    product_price STRING(64) NOT NULL,
) PRIMARY KEY (product_id)",
        table
    )
}

fn category_index_ddl(table: &str, category_index: &str) -> String {
    format!(
        "CREATE INDEX {} ON {}(product_category) STORING (product_name, product_price)",
        category_index, table
    )
}

fn ddl_defines(statements: &[String], kind: &str, name: &str) -> bool {
    let plain = format!("{} {} ", kind, name);
    let quoted = format!("{} `{}` ", kind, name);
    statements
        .iter()
        .any(|stmt| stmt.starts_with(&plain) || stmt.starts_with(&quoted))
}

/// Create the products table and its category index, whichever is missing
async fn ensure_schema_exists(
    admin_client: &AdminClient,
    database_path: &str,
    table: &str,
    category_index: &str,
) -> Result<()> {
    let get_ddl_request = GetDatabaseDdlRequest {
        database: database_path.to_string(),
    };

    let existing = admin_client
        .database()
        .get_database_ddl(get_ddl_request, None)
        .await
        .context("Failed to get database DDL")?
        .into_inner()
        .statements;

    let mut statements = Vec::new();
    if ddl_defines(&existing, "CREATE TABLE", table) {
        tracing::info!("Table '{}' already exists", table);
    } else {
        tracing::info!("Table '{}' not found, creating...", table);
        statements.push(products_table_ddl(table));
    }
    if ddl_defines(&existing, "CREATE INDEX", category_index) {
        tracing::info!("Index '{}' already exists", category_index);
    } else {
        tracing::info!("Index '{}' not found, creating...", category_index);
        statements.push(category_index_ddl(table, category_index));
    }

    if statements.is_empty() {
        return Ok(());
    }

    let update_request = UpdateDatabaseDdlRequest {
        database: database_path.to_string(),
        statements,
        operation_id: String::new(),
        proto_descriptors: vec![],
        throughput_mode: false,
    };

    let mut operation = admin_client
        .database()
        .update_database_ddl(update_request, None)
        .await
        .context("Failed to start schema creation")?;

    operation
        .wait(None)
        .await
        .context("Failed to create products schema")?;

    tracing::info!("Schema for '{}' created successfully", table);
    Ok(())
}
