//! REST client for the storefront catalog service.
//!
//! This client talks to the `/products` endpoints and is the transport behind
//! the server-authoritative catalog policy.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::Form;
use serde::Deserialize;
use std::time::Duration;

use storefront_core::catalog::CatalogApi;
use storefront_core::products::{NewProduct, Product, ProductId};
use storefront_core::CatalogError;

use crate::error::{CatalogClientError, Result};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;
const PRODUCTS_PATH: &str = "products";

/// Error body returned by the catalog service.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    detail: serde_json::Value,
}

/// Human-readable message for a non-success response body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(ApiErrorResponse {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ApiErrorResponse { detail }) => detail.to_string(),
        Err(_) => format!("Request failed: {}", body),
    }
}

/// Multipart fields for a create request. `description` is left out
/// entirely when there is none.
fn create_form_fields(product: &NewProduct) -> Vec<(&'static str, String)> {
    let mut fields = vec![("name", product.name.clone())];
    if let Some(description) = &product.description {
        fields.push(("description", description.clone()));
    }
    fields.push(("price", product.price.to_string()));
    fields.push(("stock", product.stock.to_string()));
    fields
}

/// Log line for a failed call, tagged with its retry class.
fn describe_failure(operation: &str, err: &CatalogClientError) -> String {
    format!(
        "[Catalog] {} failed ({:?}): {}",
        operation,
        err.retry_class(),
        err
    )
}

/// Log a failed call and convert it for the synchronizer. Not-found answers
/// are expected (stale ids) and only logged at debug level.
fn into_catalog_error(operation: &str, err: CatalogClientError) -> CatalogError {
    if err.is_not_found() {
        debug!("{}", describe_failure(operation, &err));
    } else {
        warn!("{}", describe_failure(operation, &err));
    }
    err.into()
}

/// Client for the storefront `/products` API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("[Catalog] API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("[Catalog] API response error ({}): {}", status, preview);
    }

    /// Create a new catalog client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the catalog service (e.g., "http://localhost:8000")
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(CatalogClientError::invalid_request("Catalog base URL is empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/{}", self.base_url, PRODUCTS_PATH)
    }

    fn product_url(&self, id: &ProductId) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            PRODUCTS_PATH,
            urlencoding::encode(id.as_str())
        )
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            return Err(CatalogClientError::api(
                status.as_u16(),
                api_error_message(&body),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "[Catalog] Failed to deserialize response. Body: {}, Error: {}",
                body,
                e
            );
            CatalogClientError::from(e)
        })
    }

    /// Check the status of a response whose body is not needed.
    async fn expect_success(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            return Err(CatalogClientError::api(
                status.as_u16(),
                api_error_message(&body),
            ));
        }
        Ok(())
    }

    /// List all products.
    ///
    /// GET /products
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let url = self.products_url();
        debug!("[Catalog] list_products URL: {}", url);

        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    /// Get a single product by id.
    ///
    /// GET /products/{id}
    pub async fn get_product(&self, id: &ProductId) -> Result<Product> {
        let response = self.client.get(self.product_url(id)).send().await?;
        Self::parse_response(response).await
    }

    /// Create a product from a multipart form.
    ///
    /// POST /products
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        debug!("[Catalog] Creating product: {:?}", product);

        let form = create_form_fields(product)
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        let response = self
            .client
            .post(self.products_url())
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Replace a product with the full object.
    ///
    /// PUT /products/{id}
    pub async fn update_product(&self, product: &Product) -> Result<Product> {
        let response = self
            .client
            .put(self.product_url(&product.id))
            .json(product)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Delete a product.
    ///
    /// DELETE /products/{id}
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        let response = self.client.delete(self.product_url(id)).send().await?;
        Self::expect_success(response).await
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn list_products(&self) -> storefront_core::Result<Vec<Product>> {
        CatalogClient::list_products(self)
            .await
            .map_err(|err| into_catalog_error("list_products", err))
    }

    async fn create_product(&self, product: &NewProduct) -> storefront_core::Result<Product> {
        CatalogClient::create_product(self, product)
            .await
            .map_err(|err| into_catalog_error("create_product", err))
    }

    async fn update_product(&self, product: &Product) -> storefront_core::Result<Product> {
        CatalogClient::update_product(self, product)
            .await
            .map_err(|err| into_catalog_error("update_product", err))
    }

    async fn delete_product(&self, id: &ProductId) -> storefront_core::Result<()> {
        CatalogClient::delete_product(self, id)
            .await
            .map_err(|err| into_catalog_error("delete_product", err))
    }
}
