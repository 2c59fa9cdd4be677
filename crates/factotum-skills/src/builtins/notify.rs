//! Notification skills
//!
//! `send_email` delivers free-form mail; `send_notification` renders one of
//! the fixed business templates first. Both go through a shared [`Mailer`]
//! which either logs the mail (mock mode) or posts it to a delivery webhook.

use crate::error::{Error, Result};
use crate::registry::{optional_str, required_str, Skill, SkillDefinition, SkillParams};
use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Maximum characters of mail content echoed back in the payload
const CONTENT_PREVIEW_CHARS: usize = 100;

/// Default subject when the planner omits one
const DEFAULT_SUBJECT: &str = "System notification";

/// Mail delivery mode
#[derive(Debug, Clone)]
pub enum MailerMode {
    /// Log the mail and pretend it was sent (development/tests)
    Mock,
    /// POST the mail as JSON to a delivery webhook
    Webhook {
        /// Webhook endpoint URL
        url: String,
    },
}

/// Mailer configuration
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Delivery mode
    pub mode: MailerMode,
    /// Sender display name
    pub from_name: String,
}

impl MailerConfig {
    /// Mock-mode configuration
    #[must_use]
    pub fn mock() -> Self {
        Self {
            mode: MailerMode::Mock,
            from_name: "Factotum Assistant".to_string(),
        }
    }

    /// Webhook-mode configuration
    #[must_use]
    pub fn webhook(url: impl Into<String>) -> Self {
        Self {
            mode: MailerMode::Webhook { url: url.into() },
            from_name: "Factotum Assistant".to_string(),
        }
    }
}

/// Shared mail transport
pub struct Mailer {
    config: MailerConfig,
    client: Client,
}

impl Mailer {
    /// Create a mailer from configuration
    pub fn new(config: MailerConfig) -> Result<Self> {
        let client = Client::new();
        Ok(Self { config, client })
    }

    /// Deliver one mail, returning the payload envelope.
    pub async fn send(&self, to: &str, subject: &str, content: &str) -> Value {
        let preview: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();

        match &self.config.mode {
            MailerMode::Mock => {
                info!(to = %to, subject = %subject, "[mock] mail sent");
                json!({
                    "success": true,
                    "sent": true,
                    "mode": "mock",
                    "to": to,
                    "subject": subject,
                    "content": preview,
                    "message_id": format!("mock-{}", Uuid::new_v4().simple()),
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                })
            }
            MailerMode::Webhook { url } => {
                debug!(to = %to, url = %url, "Posting mail to delivery webhook");
                let body = json!({
                    "to": to,
                    "subject": subject,
                    "content": content,
                    "from_name": self.config.from_name,
                });
                match self.client.post(url).json(&body).send().await {
                    Ok(response) if response.status().is_success() => json!({
                        "success": true,
                        "sent": true,
                        "mode": "webhook",
                        "to": to,
                        "subject": subject,
                        "content": preview,
                        "timestamp": chrono::Utc::now().to_rfc3339(),
                    }),
                    Ok(response) => {
                        warn!(status = %response.status(), "Mail webhook rejected the request");
                        json!({
                            "success": false,
                            "to": to,
                            "error": format!("mail webhook error: {}", response.status().as_u16()),
                        })
                    }
                    Err(e) => {
                        warn!(error = %e, "Mail webhook unreachable");
                        json!({
                            "success": false,
                            "to": to,
                            "error": "cannot reach mail webhook",
                        })
                    }
                }
            }
        }
    }
}

/// Free-form e-mail skill
pub struct SendEmailSkill {
    definition: SkillDefinition,
    mailer: std::sync::Arc<Mailer>,
}

impl SendEmailSkill {
    /// Create the skill over a shared mailer
    #[must_use]
    pub fn new(mailer: std::sync::Arc<Mailer>) -> Self {
        Self {
            definition: SkillDefinition::new("send_email", "send an e-mail")
                .with_parameter("to", "recipient address")
                .with_parameter("subject", "mail subject")
                .with_parameter("content", "mail body"),
            mailer,
        }
    }
}

#[async_trait::async_trait]
impl Skill for SendEmailSkill {
    fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    async fn invoke(&self, params: SkillParams) -> Result<Value> {
        let to = required_str(&params, "to")?;
        let content = required_str(&params, "content")?;
        let subject = optional_str(&params, "subject").unwrap_or(DEFAULT_SUBJECT);
        Ok(self.mailer.send(to, subject, content).await)
    }
}

/// One notification template: subject plus body with `{placeholder}` slots
struct Template {
    name: &'static str,
    subject: &'static str,
    body: &'static str,
}

/// The fixed business notification templates.
///
/// Placeholders are filled from the step's `context` object; slots without a
/// matching context key are left verbatim so a sparse planner context still
/// produces a deliverable mail.
const TEMPLATES: &[Template] = &[
    Template {
        name: "order_shipped",
        subject: "Your order has shipped",
        body: "Dear customer,\n\nGood news: order {order_id} has shipped.\n\
               Carrier: {carrier}\nTracking number: {tracking}\nEstimated arrival: {eta}\n\n\
               Thank you for your business.",
    },
    Template {
        name: "order_delay",
        subject: "Order delivery delay notice",
        body: "Dear customer,\n\nWe are sorry: order {order_id} is delayed.\n\
               Reason: {reason}\nNew estimated arrival: {new_eta}\n\n\
               We apologize for the inconvenience.",
    },
    Template {
        name: "out_of_stock",
        subject: "Product out of stock notice",
        body: "Dear customer,\n\nProduct {product_name} is currently out of stock.\n\
               Expected restock: {restock_eta}\n\n\
               We will notify you as soon as it is available again.",
    },
];

/// Fill `{key}` slots in a template body from a context object.
fn render(body: &str, context: &Map<String, Value>) -> String {
    let mut rendered = body.to_string();
    for (key, value) in context {
        let slot = format!("{{{}}}", key);
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        rendered = rendered.replace(&slot, &text);
    }
    rendered
}

/// Templated notification skill
pub struct SendNotificationSkill {
    definition: SkillDefinition,
    mailer: std::sync::Arc<Mailer>,
}

impl SendNotificationSkill {
    /// Create the skill over a shared mailer
    #[must_use]
    pub fn new(mailer: std::sync::Arc<Mailer>) -> Self {
        Self {
            definition: SkillDefinition::new(
                "send_notification",
                "send a templated notification e-mail",
            )
            .with_parameter("to", "recipient address")
            .with_parameter(
                "template",
                "template name: order_shipped, order_delay, or out_of_stock",
            )
            .with_parameter("context", "object with template data"),
            mailer,
        }
    }
}

#[async_trait::async_trait]
impl Skill for SendNotificationSkill {
    fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    async fn invoke(&self, params: SkillParams) -> Result<Value> {
        let to = required_str(&params, "to")?;
        let template_name = required_str(&params, "template")?;

        let empty = Map::new();
        let context = match params.get("context") {
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(Error::InvalidInput(format!(
                    "context must be an object, got: {}",
                    other
                )))
            }
            None => &empty,
        };

        let Some(template) = TEMPLATES.iter().find(|t| t.name == template_name) else {
            return Ok(json!({
                "success": false,
                "error": format!("unknown template: {}", template_name),
            }));
        };

        let content = render(template.body, context);
        let mut payload = self.mailer.send(to, template.subject, &content).await;
        if let Value::Object(ref mut map) = payload {
            map.insert(
                "template".to_string(),
                Value::String(template_name.to_string()),
            );
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn mock_mailer() -> Arc<Mailer> {
        Arc::new(Mailer::new(MailerConfig::mock()).unwrap())
    }

    #[tokio::test]
    async fn test_send_email_mock_mode() {
        let skill = SendEmailSkill::new(mock_mailer());

        let mut params = SkillParams::new();
        params.insert("to".to_string(), json!("a@b.com"));
        params.insert("content".to_string(), json!("hello"));

        let payload = skill.invoke(params).await.unwrap();
        assert_eq!(payload["success"], true);
        assert_eq!(payload["to"], "a@b.com");
        assert_eq!(payload["subject"], DEFAULT_SUBJECT);
        assert!(payload["message_id"].as_str().unwrap().starts_with("mock-"));
    }

    #[tokio::test]
    async fn test_send_notification_renders_template() {
        let skill = SendNotificationSkill::new(mock_mailer());

        let mut params = SkillParams::new();
        params.insert("to".to_string(), json!("a@b.com"));
        params.insert("template".to_string(), json!("order_shipped"));
        params.insert(
            "context".to_string(),
            json!({"order_id": "12345", "tracking": "SF1234567890"}),
        );

        let payload = skill.invoke(params).await.unwrap();
        assert_eq!(payload["success"], true);
        assert_eq!(payload["subject"], "Your order has shipped");
        let content = payload["content"].as_str().unwrap();
        assert!(content.contains("12345"));
        // Unfilled slots stay verbatim.
        assert!(content.contains("{carrier}"));
    }

    #[tokio::test]
    async fn test_send_notification_unknown_template() {
        let skill = SendNotificationSkill::new(mock_mailer());

        let mut params = SkillParams::new();
        params.insert("to".to_string(), json!("a@b.com"));
        params.insert("template".to_string(), json!("no_such_template"));

        let payload = skill.invoke(params).await.unwrap();
        assert_eq!(payload["success"], false);
        assert!(payload["error"]
            .as_str()
            .unwrap()
            .contains("no_such_template"));
    }

    #[test]
    fn test_render_non_string_values() {
        let mut context = Map::new();
        context.insert("order_id".to_string(), json!(12345));
        assert_eq!(render("order {order_id}", &context), "order 12345");
    }
}
