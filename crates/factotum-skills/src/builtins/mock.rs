//! In-memory mock backend skills
//!
//! Fixture-backed counterparts of the HTTP lookup skills, for development
//! and tests. Payload shapes (field names, envelope convention) match the
//! real backend so plans behave identically against either set.

use crate::registry::{required_str, Skill, SkillDefinition, SkillParams};
use crate::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared fixture store behind the mock skills
pub struct MockBackend {
    orders: Mutex<HashMap<String, Value>>,
    inventory: HashMap<String, Value>,
    logistics: HashMap<String, Value>,
}

impl MockBackend {
    /// Create a backend with the standard demo fixtures.
    #[must_use]
    pub fn with_fixtures() -> Self {
        let mut orders = HashMap::new();
        orders.insert(
            "12345".to_string(),
            json!({
                "order_id": "12345",
                "status": "shipped",
                "tracking": "SF1234567890",
                "customer_email": "customer@example.com",
                "create_time": "2025-01-20 10:30:00",
                "amount": 299.00,
                "products": ["Product A x 2", "Product B x 1"],
            }),
        );
        orders.insert(
            "999".to_string(),
            json!({
                "order_id": "999",
                "status": "delayed",
                "tracking": "YT9876543210",
                "customer_email": "delayed@example.com",
                "create_time": "2025-01-15 14:20:00",
                "amount": 599.00,
                "delay_reason": "bad weather",
                "products": ["Product C x 1"],
            }),
        );
        orders.insert(
            "888".to_string(),
            json!({
                "order_id": "888",
                "status": "pending",
                "tracking": null,
                "customer_email": "pending@example.com",
                "create_time": "2025-01-26 16:45:00",
                "amount": 159.00,
                "products": ["Product D x 3"],
            }),
        );

        let mut inventory = HashMap::new();
        inventory.insert(
            "A".to_string(),
            json!({
                "product_id": "A",
                "product_name": "Product A",
                "stock": 100,
                "warehouse": "south",
                "threshold": 20,
                "status": "in_stock",
            }),
        );
        inventory.insert(
            "B".to_string(),
            json!({
                "product_id": "B",
                "product_name": "Product B",
                "stock": 15,
                "warehouse": "east",
                "threshold": 20,
                "status": "low_stock",
            }),
        );
        inventory.insert(
            "C".to_string(),
            json!({
                "product_id": "C",
                "product_name": "Product C",
                "stock": 0,
                "warehouse": "north",
                "threshold": 10,
                "status": "out_of_stock",
            }),
        );
        inventory.insert(
            "D".to_string(),
            json!({
                "product_id": "D",
                "product_name": "Product D",
                "stock": 500,
                "warehouse": "west",
                "threshold": 50,
                "status": "in_stock",
            }),
        );

        let mut logistics = HashMap::new();
        logistics.insert(
            "SF1234567890".to_string(),
            json!({
                "tracking": "SF1234567890",
                "carrier": "SF Express",
                "status": "in_transit",
                "current_location": "regional hub",
                "eta": "2025-01-28",
            }),
        );
        logistics.insert(
            "YT9876543210".to_string(),
            json!({
                "tracking": "YT9876543210",
                "carrier": "YTO Express",
                "status": "delayed",
                "current_location": "origin depot",
                "eta": "2025-02-02",
            }),
        );

        Self {
            orders: Mutex::new(orders),
            inventory,
            logistics,
        }
    }

    fn order(&self, order_id: &str) -> Option<Value> {
        self.orders
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(order_id)
            .cloned()
    }

    fn set_order_status(&self, order_id: &str, status: &str) -> Option<(String, String)> {
        let mut orders = self.orders.lock().unwrap_or_else(|e| e.into_inner());
        let order = orders.get_mut(order_id)?;
        let old_status = order["status"].as_str().unwrap_or("unknown").to_string();
        order["status"] = Value::String(status.to_string());
        Some((old_status, status.to_string()))
    }
}

/// Mock `get_order`
pub struct MockOrderSkill {
    definition: SkillDefinition,
    backend: Arc<MockBackend>,
}

impl MockOrderSkill {
    /// Create the skill over a shared fixture store
    #[must_use]
    pub fn new(backend: Arc<MockBackend>) -> Self {
        Self {
            definition: SkillDefinition::new("get_order", "look up an order")
                .with_parameter("order_id", "order number"),
            backend,
        }
    }
}

#[async_trait::async_trait]
impl Skill for MockOrderSkill {
    fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    async fn invoke(&self, params: SkillParams) -> Result<Value> {
        let order_id = required_str(&params, "order_id")?;
        Ok(match self.backend.order(order_id) {
            Some(mut order) => {
                order["success"] = Value::Bool(true);
                order
            }
            None => json!({
                "success": false,
                "order_id": order_id,
                "error": "order not found",
                "status": "not_found",
            }),
        })
    }
}

/// Mock `query_inventory`
pub struct MockInventorySkill {
    definition: SkillDefinition,
    backend: Arc<MockBackend>,
}

impl MockInventorySkill {
    /// Create the skill over a shared fixture store
    #[must_use]
    pub fn new(backend: Arc<MockBackend>) -> Self {
        Self {
            definition: SkillDefinition::new("query_inventory", "look up product stock")
                .with_parameter("product_id", "product id (a single letter or digit)"),
            backend,
        }
    }
}

#[async_trait::async_trait]
impl Skill for MockInventorySkill {
    fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    async fn invoke(&self, params: SkillParams) -> Result<Value> {
        let product_id = required_str(&params, "product_id")?;
        Ok(match self.backend.inventory.get(product_id) {
            Some(inventory) => {
                let mut payload = inventory.clone();
                payload["success"] = Value::Bool(true);
                payload
            }
            None => json!({
                "success": false,
                "product_id": product_id,
                "error": "product not found",
                "stock": 0,
                "status": "not_found",
            }),
        })
    }
}

/// Mock `query_logistics`
pub struct MockLogisticsSkill {
    definition: SkillDefinition,
    backend: Arc<MockBackend>,
}

impl MockLogisticsSkill {
    /// Create the skill over a shared fixture store
    #[must_use]
    pub fn new(backend: Arc<MockBackend>) -> Self {
        Self {
            definition: SkillDefinition::new("query_logistics", "look up shipment status")
                .with_parameter("tracking_number", "tracking number"),
            backend,
        }
    }
}

#[async_trait::async_trait]
impl Skill for MockLogisticsSkill {
    fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    async fn invoke(&self, params: SkillParams) -> Result<Value> {
        let tracking = required_str(&params, "tracking_number")?;
        Ok(match self.backend.logistics.get(tracking) {
            Some(shipment) => {
                let mut payload = shipment.clone();
                payload["success"] = Value::Bool(true);
                payload
            }
            None => json!({
                "success": false,
                "tracking": tracking,
                "error": "shipment not found",
                "status": "not_found",
            }),
        })
    }
}

/// Mock `update_order_status`
pub struct MockUpdateOrderStatusSkill {
    definition: SkillDefinition,
    backend: Arc<MockBackend>,
}

impl MockUpdateOrderStatusSkill {
    /// Create the skill over a shared fixture store
    #[must_use]
    pub fn new(backend: Arc<MockBackend>) -> Self {
        Self {
            definition: SkillDefinition::new("update_order_status", "update an order's status")
                .with_parameter("order_id", "order number")
                .with_parameter("status", "new status"),
            backend,
        }
    }
}

#[async_trait::async_trait]
impl Skill for MockUpdateOrderStatusSkill {
    fn definition(&self) -> &SkillDefinition {
        &self.definition
    }

    async fn invoke(&self, params: SkillParams) -> Result<Value> {
        let order_id = required_str(&params, "order_id")?;
        let status = required_str(&params, "status")?;
        Ok(match self.backend.set_order_status(order_id, status) {
            Some((old_status, new_status)) => json!({
                "success": true,
                "order_id": order_id,
                "old_status": old_status,
                "new_status": new_status,
                "updated_at": chrono::Utc::now().to_rfc3339(),
            }),
            None => json!({
                "success": false,
                "order_id": order_id,
                "error": "order not found",
            }),
        })
    }
}
