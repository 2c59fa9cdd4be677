//! HTTP-backed lookup skills
//!
//! Order, inventory, and logistics lookups against the internal business
//! APIs. Transport problems (timeouts, refused connections, non-2xx other
//! than 404) are reported inside the payload envelope with
//! `"success": false` so that a flaky backend degrades one step instead of
//! faulting the whole plan.

use crate::error::{Error, Result};
use crate::registry::{required_str, Skill, SkillDefinition, SkillParams};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Default HTTP request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the backend API skills
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the business API, e.g. `http://localhost:9000`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl BackendConfig {
    /// Create a configuration for the given base URL
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))
    }
}

/// Fetch one resource and wrap it in the success envelope.
///
/// `id_field`/`id_value` are echoed into every outcome so downstream steps
/// can reference them even when the lookup failed.
async fn lookup(
    client: &Client,
    url: &str,
    id_field: &str,
    id_value: &str,
    not_found_error: &str,
) -> Value {
    debug!(url = %url, "Backend lookup");

    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            warn!(url = %url, "Backend request timed out");
            return json!({
                "success": false,
                id_field: id_value,
                "error": "request timeout",
                "status": "timeout",
            });
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Backend request failed");
            return json!({
                "success": false,
                id_field: id_value,
                "error": "cannot reach backend API",
                "status": "connection_failed",
            });
        }
    };

    let status = response.status();
    if status.as_u16() == 404 {
        return json!({
            "success": false,
            id_field: id_value,
            "error": not_found_error,
            "status": "not_found",
        });
    }
    if !status.is_success() {
        return json!({
            "success": false,
            id_field: id_value,
            "error": format!("api error: {}", status.as_u16()),
            "status": "lookup_failed",
        });
    }

    match response.json::<Value>().await {
        Ok(Value::Object(mut data)) => {
            data.insert("success".to_string(), Value::Bool(true));
            data.insert(id_field.to_string(), Value::String(id_value.to_string()));
            Value::Object(data)
        }
        Ok(other) => json!({
            "success": true,
            id_field: id_value,
            "data": other,
        }),
        Err(e) => json!({
            "success": false,
            id_field: id_value,
            "error": format!("invalid backend response: {}", e),
            "status": "lookup_failed",
        }),
    }
}

/// Order lookup against `GET {base}/api/orders/{order_id}`
pub struct OrderLookupSkill {
    definition: SkillDefinition,
    client: Client,
    base_url: String,
}

impl OrderLookupSkill {
    /// Create the skill from backend configuration
    pub fn new(config: BackendConfig) -> Result<Self> {
        Ok(Self {
            definition: SkillDefinition::new("get_order", "look up an order")
                .with_parameter("order_id", "order number"),
            client: config.client()?,
            base_url: config.base_url,
        })
    }
}

#[async_trait::async_trait]
impl Skill for OrderLookupSkill {
    fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    async fn invoke(&self, params: SkillParams) -> Result<Value> {
        let order_id = required_str(&params, "order_id")?;
        let url = format!("{}/api/orders/{}", self.base_url, order_id);
        Ok(lookup(&self.client, &url, "order_id", order_id, "order not found").await)
    }
}

/// Inventory lookup against `GET {base}/api/inventory/{product_id}`
pub struct InventoryLookupSkill {
    definition: SkillDefinition,
    client: Client,
    base_url: String,
}

impl InventoryLookupSkill {
    /// Create the skill from backend configuration
    pub fn new(config: BackendConfig) -> Result<Self> {
        Ok(Self {
            definition: SkillDefinition::new("query_inventory", "look up product stock")
                .with_parameter("product_id", "product id (a single letter or digit)"),
            client: config.client()?,
            base_url: config.base_url,
        })
    }
}

#[async_trait::async_trait]
impl Skill for InventoryLookupSkill {
    fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    async fn invoke(&self, params: SkillParams) -> Result<Value> {
        let product_id = required_str(&params, "product_id")?;
        let url = format!("{}/api/inventory/{}", self.base_url, product_id);
        Ok(lookup(&self.client, &url, "product_id", product_id, "product not found").await)
    }
}

/// Logistics lookup against `GET {base}/api/logistics/{tracking_number}`
pub struct LogisticsLookupSkill {
    definition: SkillDefinition,
    client: Client,
    base_url: String,
}

impl LogisticsLookupSkill {
    /// Create the skill from backend configuration
    pub fn new(config: BackendConfig) -> Result<Self> {
        Ok(Self {
            definition: SkillDefinition::new("query_logistics", "look up shipment status")
                .with_parameter("tracking_number", "tracking number"),
            client: config.client()?,
            base_url: config.base_url,
        })
    }
}

#[async_trait::async_trait]
impl Skill for LogisticsLookupSkill {
    fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    async fn invoke(&self, params: SkillParams) -> Result<Value> {
        let tracking = required_str(&params, "tracking_number")?;
        let url = format!("{}/api/logistics/{}", self.base_url, tracking);
        Ok(lookup(&self.client, &url, "tracking", tracking, "shipment not found").await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_strips_trailing_slash() {
        let config = BackendConfig::new("http://localhost:9000/");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[tokio::test]
    async fn test_missing_param_is_a_fault() {
        let skill = OrderLookupSkill::new(BackendConfig::new("http://localhost:9")).unwrap();
        let err = skill.invoke(SkillParams::new()).await.unwrap_err();
        assert!(err.to_string().contains("order_id"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_degrades_to_envelope() {
        // Port 9 (discard) is not listening; the connect error must come back
        // inside the payload, not as an Err.
        let config =
            BackendConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_millis(200));
        let skill = OrderLookupSkill::new(config).unwrap();

        let mut params = SkillParams::new();
        params.insert("order_id".to_string(), serde_json::json!("12345"));

        let payload = skill.invoke(params).await.unwrap();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["order_id"], "12345");
    }
}
