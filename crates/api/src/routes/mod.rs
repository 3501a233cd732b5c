//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (verifies database)
//!
//! # Auth
//! POST /tokens              - Issue an access token for email + password
//!
//! # Users
//! GET    /users             - List users
//! POST   /users             - Sign up
//! GET    /users/{id}        - Show own profile (auth, self only)
//! PUT    /users/{id}        - Update own profile (auth, self only)
//! DELETE /users/{id}        - Delete own account (auth, self only)
//!
//! # Products
//! GET    /products          - Search published products (title, priceMin,
//!                             priceMax, page)
//! POST   /products          - Create a product (auth)
//! GET    /products/{id}     - Show a product
//! PUT    /products/{id}     - Update a product (owner only)
//! DELETE /products/{id}     - Delete a product (owner only)
//!
//! # Orders
//! GET  /orders              - List own orders (auth, paginated)
//! POST /orders              - Check out (auth)
//! GET  /orders/{id}         - Show own order (auth, owner only)
//! ```

pub mod orders;
pub mod products;
pub mod tokens;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::destroy),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tokens", post(tokens::create))
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
}
