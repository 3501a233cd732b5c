//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use bramble_core::{Price, ProductId};

use crate::db::products::SearchFilters;
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Product, ProductDraft, User};
use crate::pagination::{PageWindow, Paginated};
use crate::state::AppState;

/// Query parameters for the public product search.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub title: Option<String>,
    pub price_min: Option<Price>,
    pub price_max: Option<Price>,
    pub page: Option<i64>,
}

/// Fields for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub quantity: i32,
}

/// Fields for updating a product; omitted fields keep their value.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub price: Option<Price>,
    pub published: Option<bool>,
    pub quantity: Option<i32>,
}

/// Search published products, paginated.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Paginated<Product>>> {
    let filters = SearchFilters {
        title: query.title.clone(),
        price_min: query.price_min,
        price_max: query.price_max,
    };

    let repository = ProductRepository::new(state.pool());
    let count = repository.count_search(&filters).await?;
    let window = PageWindow::compute(query.page.unwrap_or(1), count);
    let products = repository
        .search(&filters, window.offset, window.limit)
        .await?;

    // Carry the active filters into the page links
    let mut preserved: Vec<(&str, String)> = Vec::new();
    if let Some(title) = &query.title {
        preserved.push(("title", title.clone()));
    }
    if let Some(price_min) = query.price_min {
        preserved.push(("priceMin", price_min.to_string()));
    }
    if let Some(price_max) = query.price_max {
        preserved.push(("priceMax", price_max.to_string()));
    }

    Ok(Json(Paginated::new(
        products, window, "/products", &preserved,
    )))
}

/// Create a product owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let draft = ProductDraft {
        title: body.title,
        price: body.price,
        published: body.published,
        quantity: body.quantity,
        user_id: user.id,
    };

    let product = ProductRepository::new(state.pool()).create(&draft).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Show a product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = fetch_product(&state, id).await?;

    Ok(Json(product))
}

/// Update a product; owner only.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdateProductRequest>,
) -> Result<StatusCode> {
    let mut product = fetch_product(&state, id).await?;
    authorize_owner(&user, &product)?;

    if let Some(title) = body.title {
        product.title = title;
    }
    if let Some(price) = body.price {
        product.price = price;
    }
    if let Some(published) = body.published {
        product.published = published;
    }
    if let Some(quantity) = body.quantity {
        product.quantity = quantity;
    }

    ProductRepository::new(state.pool()).update(&product).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product; owner only.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<StatusCode> {
    let product = fetch_product(&state, id).await?;
    authorize_owner(&user, &product)?;

    ProductRepository::new(state.pool())
        .delete(product.id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Load the path-referenced product or reject with 404.
async fn fetch_product(state: &AppState, id: i32) -> Result<Product> {
    ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("product not found".to_string()))
}

/// Products may only be changed by their owner.
fn authorize_owner(user: &User, product: &Product) -> Result<()> {
    if product.user_id != user.id {
        return Err(AppError::Forbidden(
            "you may only change your own products".to_string(),
        ));
    }
    Ok(())
}
