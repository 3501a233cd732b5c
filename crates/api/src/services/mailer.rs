//! Order-confirmation mail over SMTP.
//!
//! The transport is optional: when no SMTP host is configured the
//! application runs without outgoing mail, and checkout treats send failures
//! as non-fatal.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use bramble_core::Email;

use crate::config::MailerConfig;
use crate::models::Order;

/// Errors that can occur when sending mail.
#[derive(Debug, Error)]
pub enum MailerError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build the message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// An address does not parse as a mailbox.
    #[error("invalid mail address: {0}")]
    InvalidAddress(String),
}

/// One line of an order as it appears in the confirmation mail.
#[derive(Debug, Clone)]
pub struct OrderLine {
    /// Product title.
    pub title: String,
    /// Units ordered.
    pub quantity: i32,
}

/// Sends transactional mail for the shop.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    /// Create a mailer from SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns `MailerError::Smtp` if the relay cannot be configured.
    pub fn new(config: &MailerConfig) -> Result<Self, MailerError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the order-confirmation mail for a freshly created order.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if the message cannot be built or sent.
    pub async fn send_order_confirmation(
        &self,
        to: &Email,
        order: &Order,
        lines: &[OrderLine],
    ) -> Result<(), MailerError> {
        let from: Mailbox = self
            .from_address
            .parse()
            .map_err(|_| MailerError::InvalidAddress(self.from_address.clone()))?;
        let to_mailbox: Mailbox = to
            .as_str()
            .parse()
            .map_err(|_| MailerError::InvalidAddress(to.to_string()))?;

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject("Thanks for your order")
            .header(ContentType::TEXT_PLAIN)
            .body(confirmation_body(order, lines))?;

        self.transport.send(message).await?;
        tracing::info!(to = %to, order_id = %order.id, "sent order confirmation");

        Ok(())
    }
}

/// Plain-text body listing the order's lines and total.
fn confirmation_body(order: &Order, lines: &[OrderLine]) -> String {
    let mut body = String::from("Details of products:\n");
    for line in lines {
        body.push_str(&format!("- {} x {}\n", line.quantity, line.title));
    }
    body.push_str(&format!("\nTOTAL: {}\n", order.total));
    body
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bramble_core::{OrderId, UserId};
    use chrono::Utc;

    #[test]
    fn test_confirmation_body() {
        let now = Utc::now();
        let order = Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            total: "10".parse().unwrap(),
            created_at: now,
            updated_at: now,
        };
        let lines = vec![
            OrderLine {
                title: "TV".to_string(),
                quantity: 2,
            },
            OrderLine {
                title: "Chair".to_string(),
                quantity: 1,
            },
        ];

        let body = confirmation_body(&order, &lines);
        assert!(body.contains("- 2 x TV"));
        assert!(body.contains("- 1 x Chair"));
        assert!(body.contains("TOTAL: 10"));
    }
}
