//! Catalog endpoints.
//!
//! Create takes a multipart form (the admin UI posts `FormData`); update takes
//! the full product as JSON.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use storefront_core::products::{parse_price, parse_stock, NewProduct, Product, ProductId};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::products::ProductPayload;

/// Text fields of a create form, before coercion.
#[derive(Debug, Default)]
struct CreateProductForm {
    name: Option<String>,
    description: Option<String>,
    price: Option<String>,
    stock: Option<String>,
}

impl CreateProductForm {
    async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let slot = match name.as_str() {
                "name" => &mut form.name,
                "description" => &mut form.description,
                "price" => &mut form.price,
                "stock" => &mut form.stock,
                other => {
                    debug!("Ignoring unknown form field '{}'", other);
                    continue;
                }
            };
            *slot = Some(field.text().await?);
        }
        Ok(form)
    }

    fn into_new_product(self) -> ApiResult<NewProduct> {
        let name = self
            .name
            .ok_or_else(|| ApiError::Validation("Field required: name".to_string()))?;
        let price = self
            .price
            .ok_or_else(|| ApiError::Validation("Field required: price".to_string()))?;

        Ok(NewProduct {
            name,
            description: self.description,
            price: parse_price(&price)?,
            stock: parse_stock(self.stock.as_deref().unwrap_or_default())?,
        })
    }
}

async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.product_service.list().await)
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state.product_service.get(&ProductId::new(id)).await?;
    Ok(Json(product))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let input = CreateProductForm::read(multipart).await?.into_new_product()?;
    let created = state.product_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(payload) = payload?;
    let updated = state
        .product_service
        .update(&ProductId::new(id), payload.into())
        .await?;
    Ok(Json(updated))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.product_service.delete(&ProductId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
