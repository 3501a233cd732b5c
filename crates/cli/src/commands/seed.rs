//! Seed the database with sample shop data.
//!
//! Each sample order gets its own buyer, a product owner with five published
//! products, and a checkout of two units of each product, so stock counters
//! and order totals land in realistic states.
//!
//! # Usage
//!
//! ```bash
//! bramble-cli seed --orders 10
//! ```

use rand::Rng;
use rand::distr::{Alphanumeric, SampleString};
use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;

use bramble_core::Price;

use bramble_api::db::ProductRepository;
use bramble_api::models::{OrderItem, ProductDraft, User};
use bramble_api::services::{AuthService, OrderService};

/// Units of each product put into a sample order.
const UNITS_PER_LINE: i32 = 2;

/// Products listed by each sample owner.
const PRODUCTS_PER_ORDER: usize = 5;

/// Create `orders` sample orders with their users and products.
///
/// # Errors
///
/// Returns an error if the database is unreachable or any write fails.
pub async fn run(orders: usize) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("BRAMBLE_DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| "BRAMBLE_DATABASE_URL not set")?;

    let pool = bramble_api::db::create_pool(&database_url).await?;

    for i in 0..orders {
        tracing::debug!("Inserting {} / {}", i + 1, orders);
        create_sample_order(&pool).await?;
    }

    tracing::info!("Seeded {} sample orders", orders);
    Ok(())
}

/// One buyer, one owner with five products, one checkout.
async fn create_sample_order(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let buyer = create_sample_user(pool).await?;
    let owner = create_sample_user(pool).await?;

    let products = ProductRepository::new(pool);

    let mut items = Vec::with_capacity(PRODUCTS_PER_ORDER);
    for _ in 0..PRODUCTS_PER_ORDER {
        // Scope the thread-local rng so it is not held across awaits
        let draft = {
            let mut rng = rand::rng();
            ProductDraft {
                title: Alphanumeric.sample_string(&mut rng, 8).to_lowercase(),
                price: Price::new(Decimal::from(rng.random_range(1..100))),
                published: rng.random_bool(0.5),
                quantity: rng.random_range(10..100),
                user_id: owner.id,
            }
        };
        let product = products.create(&draft).await?;
        items.push(OrderItem {
            product_id: product.id,
            quantity: UNITS_PER_LINE,
        });
    }

    OrderService::new(pool).create_order(buyer.id, &items).await?;

    Ok(())
}

/// Register a user with a random email; the email doubles as the password.
async fn create_sample_user(pool: &PgPool) -> Result<User, Box<dyn std::error::Error>> {
    let email = {
        let mut rng = rand::rng();
        format!(
            "{}@random.io",
            Alphanumeric.sample_string(&mut rng, 8).to_lowercase()
        )
    };

    let user = AuthService::new(pool).register(&email, &email).await?;

    Ok(user)
}
