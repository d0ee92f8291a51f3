// keyhaus-core/src/notifier/mod.rs

use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use keyhaus_common::Error;
use keyhaus_common::models::{Reward, User};

/// Best-effort admin email on successful redemption. Every failure path
/// logs and returns; a committed redemption is never unwound because
/// mail bounced.
pub struct RedemptionNotifier {
    admin_email: Option<String>,
    from_email: String,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl RedemptionNotifier {
    pub fn new(
        admin_email: Option<String>,
        from_email: String,
        smtp_relay: Option<String>,
    ) -> Self {
        let transport = match smtp_relay.as_deref() {
            Some(host) => match AsyncSmtpTransport::<Tokio1Executor>::relay(host) {
                Ok(builder) => Some(builder.build()),
                Err(e) => {
                    warn!("Invalid SMTP relay '{}': {e}. Notifications disabled.", host);
                    None
                }
            },
            // Local MTA, no TLS.
            None => Some(
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("localhost").build(),
            ),
        };

        Self {
            admin_email,
            from_email,
            transport,
        }
    }

    pub async fn notify_redemption(&self, user: &User, reward: &Reward) {
        let Some(admin_email) = &self.admin_email else {
            warn!("ADMIN_EMAIL not configured. Skipping redemption notification email.");
            return;
        };
        let Some(transport) = &self.transport else {
            return;
        };

        let subject = format!(
            "[Discord Rewards] New Redemption: {} redeemed {}",
            user.username, reward.name
        );
        let body = format!(
            "A user has redeemed a product.\n\n\
             User: {} (Discord ID: {})\n\
             Product: {}\n\
             Key Cost: {} keys\n\
             Remaining Balance: {} keys\n",
            user.username, user.discord_id, reward.name, reward.key_cost, user.key_balance
        );

        let message = match build_message(&self.from_email, admin_email, &subject, &body) {
            Ok(m) => m,
            Err(e) => {
                warn!("Could not build redemption notification email: {e}");
                return;
            }
        };

        match transport.send(message).await {
            Ok(_) => info!("Sent redemption notification to {}", admin_email),
            Err(e) => warn!("Failed to send redemption notification email: {e}"),
        }
    }
}

fn build_message(from: &str, to: &str, subject: &str, body: &str) -> Result<Message, Error> {
    let from: Mailbox = from
        .parse()
        .map_err(|e| Error::Notification(format!("bad sender address: {e}")))?;
    let to: Mailbox = to
        .parse()
        .map_err(|e| Error::Notification(format!("bad recipient address: {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .body(body.to_string())
        .map_err(|e| Error::Notification(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            user_id: Uuid::new_v4(),
            discord_id: "123456789".to_string(),
            username: "kayla".to_string(),
            avatar_url: None,
            key_balance: 60,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_reward() -> Reward {
        Reward {
            reward_id: 1,
            category_id: None,
            name: "Steam Key".to_string(),
            image_url: None,
            key_cost: 40,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn unconfigured_notifier_is_a_no_op() {
        let notifier = RedemptionNotifier::new(None, "noreply@localhost".to_string(), None);
        // Must return quietly, not error or panic.
        notifier
            .notify_redemption(&sample_user(), &sample_reward())
            .await;
    }

    #[test]
    fn message_builds_with_valid_addresses() {
        let msg = build_message(
            "noreply@localhost",
            "admin@example.com",
            "subject",
            "body",
        );
        assert!(msg.is_ok());
    }

    #[test]
    fn bad_addresses_are_reported() {
        assert!(build_message("not-an-address", "admin@example.com", "s", "b").is_err());
        assert!(build_message("noreply@localhost", "also not one", "s", "b").is_err());
    }
}
