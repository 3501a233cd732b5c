//! Order route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use bramble_core::{OrderId, ProductId};

use crate::db::{OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::models::{Order, OrderItem, Placement, User};
use crate::pagination::{PageWindow, Paginated};
use crate::services::{OrderLine, OrderService};
use crate::state::AppState;

/// Pagination query for the order listing.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// One requested line of a checkout.
#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    /// Product ID.
    pub id: ProductId,
    pub quantity: i32,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub products: Vec<CheckoutItem>,
}

/// Detailed view: the order plus its lines.
#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: Order,
    pub placements: Vec<Placement>,
}

/// List the caller's orders, paginated.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Paginated<Order>>> {
    let repository = OrderRepository::new(state.pool());
    let count = repository.count_by_owner(user.id).await?;
    let window = PageWindow::compute(query.page.unwrap_or(1), count);
    let orders = repository
        .page_by_owner(user.id, window.offset, window.limit)
        .await?;

    Ok(Json(Paginated::new(orders, window, "/orders", &[])))
}

/// Check out: create an order with one placement per requested product.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let items: Vec<OrderItem> = body
        .products
        .iter()
        .map(|item| OrderItem {
            product_id: item.id,
            quantity: item.quantity,
        })
        .collect();

    let order = OrderService::new(state.pool())
        .create_order(user.id, &items)
        .await?;

    send_confirmation(&state, &user, &order).await;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Show one of the caller's orders with its lines.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<OrderDetailResponse>> {
    let repository = OrderRepository::new(state.pool());

    let order = repository
        .get_by_id(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

    if order.user_id != user.id {
        return Err(AppError::Forbidden(
            "you may only access your own orders".to_string(),
        ));
    }

    let placements = repository.placements_for(order.id).await?;

    Ok(Json(OrderDetailResponse { order, placements }))
}

/// Send the order-confirmation mail. Failures are logged, never surfaced:
/// the order is already committed.
async fn send_confirmation(state: &AppState, user: &User, order: &Order) {
    let Some(mailer) = state.mailer() else {
        return;
    };

    let lines = match order_lines(state, order).await {
        Ok(lines) => lines,
        Err(e) => {
            tracing::warn!(order_id = %order.id, error = %e, "could not load order lines for mail");
            return;
        }
    };

    if let Err(e) = mailer
        .send_order_confirmation(&user.email, order, &lines)
        .await
    {
        tracing::warn!(order_id = %order.id, error = %e, "order confirmation mail failed");
    }
}

/// Resolve an order's placements to mail lines with product titles.
async fn order_lines(state: &AppState, order: &Order) -> Result<Vec<OrderLine>> {
    let placements = OrderRepository::new(state.pool())
        .placements_for(order.id)
        .await?;

    let ids: Vec<ProductId> = placements.iter().map(|p| p.product_id).collect();
    let products = ProductRepository::new(state.pool()).get_many(&ids).await?;

    Ok(placements
        .iter()
        .filter_map(|placement| {
            products
                .iter()
                .find(|product| product.id == placement.product_id)
                .map(|product| OrderLine {
                    title: product.title.clone(),
                    quantity: placement.quantity,
                })
        })
        .collect())
}
