use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use log::info;

use super::{success, AppState};
use crate::client::Command;
use crate::error::{ApiError, OrReport};
use crate::extract::{JsonBody, QueryParams};
use crate::types::{
    CartRequest, CollectionsQuery, CreateCollectionRequest, DeleteCollectionRequest,
    DeleteProductsRequest, EditRequest, ProductImageRequest, ProductQuery, ProductsQuery,
    RemoveProductImageRequest, VisibilityRequest,
};
use crate::validate::required;

pub async fn get_products(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<ProductsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let phone = required(
        query.phone,
        "Please send the contact number you wish to return the products.",
    )?;

    let result = state
        .client
        .execute(Command::GetProducts { phone, qnt: query.qnt })
        .await
        .or_report("Error on get products")?;
    Ok(success(result))
}

pub async fn get_product_by_id(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "Please send the contact number and productId.";
    let phone = required(query.phone, MISSING)?;
    let id = required(query.id, MISSING)?;

    let result = state
        .client
        .execute(Command::GetProductById { phone, id })
        .await
        .or_report("Error on get product")?;
    Ok(success(result))
}

pub async fn edit_product(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<EditRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "productId or options was not informed";
    let id = required(req.id, MISSING)?;
    let options = required(req.options, MISSING)?;

    info!("Editing product {}", id);
    let result = state
        .client
        .execute(Command::EditProduct { id, options })
        .await
        .or_report("Error on edit product.")?;
    Ok(success(result))
}

pub async fn delete_products(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<DeleteProductsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ids = required(req.id, "products Id was not informed")?;

    info!("Deleting {} product(s)", ids.len());
    let result = state
        .client
        .execute(Command::DeleteProducts { ids })
        .await
        .or_report("Error on delete product.")?;
    Ok(success(result))
}

pub async fn change_product_image(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ProductImageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "productId and base64 was not informed";
    let id = required(req.id, MISSING)?;
    let base64 = required(req.base64, MISSING)?;

    let result = state
        .client
        .execute(Command::ChangeProductImage { id, base64 })
        .await
        .or_report("Error on change product image.")?;
    Ok(success(result))
}

pub async fn add_product_image(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<ProductImageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "productId and base64 was not informed";
    let id = required(req.id, MISSING)?;
    let base64 = required(req.base64, MISSING)?;

    let result = state
        .client
        .execute(Command::AddProductImage { id, base64 })
        .await
        .or_report("Error on add product image.")?;
    Ok(success(result))
}

pub async fn remove_product_image(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RemoveProductImageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "productId and index image was not informed";
    let id = required(req.id, MISSING)?;
    let index = required(req.index, MISSING)?;

    let result = state
        .client
        .execute(Command::RemoveProductImage { id, index })
        .await
        .or_report("Error on remove product image.")?;
    Ok(success(result))
}

pub async fn get_collections(
    State(state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<CollectionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let phone = required(query.phone, "phone was not informed")?;

    let result = state
        .client
        .execute(Command::GetCollections {
            phone,
            qnt: query.qnt,
            max: query.max,
        })
        .await
        .or_report("Error on get collections.")?;
    Ok(success(result))
}

pub async fn create_collection(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateCollectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "name or products was not informed";
    let name = required(req.name, MISSING)?;
    let products = required(req.products, MISSING)?;

    info!("Creating collection {} with {} product(s)", name, products.len());
    let result = state
        .client
        .execute(Command::CreateCollection { name, products })
        .await
        .or_report("Error on create collection.")?;
    Ok(success(result))
}

pub async fn edit_collection(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<EditRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "id or options was not informed";
    let id = required(req.id, MISSING)?;
    let options = required(req.options, MISSING)?;

    let result = state
        .client
        .execute(Command::EditCollection { id, options })
        .await
        .or_report("Error on edit collection.")?;
    Ok(success(result))
}

pub async fn delete_collection(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<DeleteCollectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = required(req.id, "id was not informed")?;

    info!("Deleting collection {}", id);
    let result = state
        .client
        .execute(Command::DeleteCollection { id })
        .await
        .or_report("Error on delete collection.")?;
    Ok(success(result))
}

pub async fn set_product_visibility(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<VisibilityRequest>,
) -> Result<impl IntoResponse, ApiError> {
    const MISSING: &str = "product id or value (false, true) was not informed";
    let id = required(req.id, MISSING)?;
    let visible = required(req.value, MISSING)?;

    let result = state
        .client
        .execute(Command::SetProductVisibility { id, visible })
        .await
        .or_report("Error on set product visibility.")?;
    Ok(success(result))
}

pub async fn update_cart_enabled(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CartRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let enabled = required(req.enabled, "enabled (false, true) was not informed")?;

    let result = state
        .client
        .execute(Command::UpdateCartEnabled { enabled })
        .await
        .or_report("Error on set enabled cart.")?;
    Ok(success(result))
}
