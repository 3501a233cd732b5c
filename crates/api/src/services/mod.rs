//! Application services.
//!
//! - [`auth`] - Registration, login, profile updates, password hashing
//! - [`jwt`] - Access-token minting and verification
//! - [`mailer`] - Order-confirmation mail over SMTP
//! - [`orders`] - Checkout and the stock/total bookkeeping on placement
//!   changes

pub mod auth;
pub mod jwt;
pub mod mailer;
pub mod orders;

pub use auth::{AuthError, AuthService};
pub use jwt::{Claims, TokenError, TokenService};
pub use mailer::{Mailer, MailerError, OrderLine};
pub use orders::{OrderError, OrderService};
