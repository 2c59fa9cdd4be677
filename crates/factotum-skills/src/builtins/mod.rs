//! Built-in skills
//!
//! Two interchangeable sets share the same names and parameter specs:
//! HTTP-backed skills that call the internal business APIs, and in-memory
//! mock skills for development and tests. Which set gets registered is the
//! assembly layer's decision; the engine never branches on it.

pub mod backend;
pub mod mock;
pub mod notify;

use crate::error::Result;
use crate::registry::SkillRegistry;
use std::sync::Arc;

pub use backend::{BackendConfig, InventoryLookupSkill, LogisticsLookupSkill, OrderLookupSkill};
pub use mock::{MockBackend, MockInventorySkill, MockLogisticsSkill, MockOrderSkill, MockUpdateOrderStatusSkill};
pub use notify::{Mailer, MailerConfig, MailerMode, SendEmailSkill, SendNotificationSkill};

/// Register the HTTP-backed skill set plus notifications.
pub fn register_backend_skills(
    registry: &mut SkillRegistry,
    backend: &BackendConfig,
    mailer: &MailerConfig,
) -> Result<()> {
    let mailer = Arc::new(Mailer::new(mailer.clone())?);

    registry.register(Arc::new(OrderLookupSkill::new(backend.clone())?))?;
    registry.register(Arc::new(InventoryLookupSkill::new(backend.clone())?))?;
    registry.register(Arc::new(LogisticsLookupSkill::new(backend.clone())?))?;
    registry.register(Arc::new(SendEmailSkill::new(Arc::clone(&mailer))))?;
    registry.register(Arc::new(SendNotificationSkill::new(mailer)))?;
    Ok(())
}

/// Register the in-memory mock skill set plus mock-mode notifications.
pub fn register_mock_skills(registry: &mut SkillRegistry) -> Result<()> {
    let backend = Arc::new(MockBackend::with_fixtures());
    let mailer = Arc::new(Mailer::new(MailerConfig::mock())?);

    registry.register(Arc::new(MockOrderSkill::new(Arc::clone(&backend))))?;
    registry.register(Arc::new(MockInventorySkill::new(Arc::clone(&backend))))?;
    registry.register(Arc::new(MockLogisticsSkill::new(Arc::clone(&backend))))?;
    registry.register(Arc::new(SendEmailSkill::new(Arc::clone(&mailer))))?;
    registry.register(Arc::new(SendNotificationSkill::new(mailer)))?;
    registry.register(Arc::new(MockUpdateOrderStatusSkill::new(backend)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_registry_assembles() {
        let mut registry = SkillRegistry::new();
        register_mock_skills(&mut registry).unwrap();

        assert!(registry.has("get_order"));
        assert!(registry.has("query_inventory"));
        assert!(registry.has("query_logistics"));
        assert!(registry.has("send_email"));
        assert!(registry.has("send_notification"));
        assert!(registry.has("update_order_status"));
    }

    #[test]
    fn test_catalogue_mentions_every_skill() {
        let mut registry = SkillRegistry::new();
        register_mock_skills(&mut registry).unwrap();

        let catalogue = registry.describe();
        for name in registry.names() {
            assert!(catalogue.contains(name), "catalogue missing {}", name);
        }
    }
}
