//! Test doubles for the notification and inventory boundaries.
//!
//! Shared between this crate's unit tests and the integration tests; also
//! handy for downstream consumers exercising scheduler wiring.

use async_trait::async_trait;

use larder_core::content::NotificationCategory;

use crate::actions::InventoryStore;
use crate::notifier::{ActionDef, NotificationRequest, Notifier, NotifyError};

/// Records every call instead of talking to an OS surface.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub deny_permission: bool,
    pub fail_permission: bool,
    pub fail_schedule: bool,

    pub requests: Vec<NotificationRequest>,
    pub registered: Vec<(NotificationCategory, Vec<ActionDef>)>,
    pub cancel_count: usize,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn request_permission(&mut self) -> Result<bool, NotifyError> {
        if self.fail_permission {
            return Err(NotifyError::PermissionDenied);
        }
        Ok(!self.deny_permission)
    }

    async fn register_category(
        &mut self,
        category: NotificationCategory,
        actions: Vec<ActionDef>,
    ) -> Result<(), NotifyError> {
        self.registered.push((category, actions));
        Ok(())
    }

    async fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotifyError> {
        if self.fail_schedule {
            return Err(NotifyError::Scheduling("backend rejected request".to_string()));
        }
        self.requests.push(request);
        Ok(())
    }

    async fn cancel_all(&mut self) -> Result<(), NotifyError> {
        self.cancel_count += 1;
        self.requests.clear();
        Ok(())
    }
}

/// In-memory inventory mutation recorder.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub quantities: Vec<(String, f64)>,
    pub used: Vec<String>,
    pub extended: Vec<(String, i64)>,
    pub deleted: Vec<String>,
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn update_quantity(&mut self, item_id: &str, quantity: f64) -> anyhow::Result<()> {
        self.quantities.push((item_id.to_string(), quantity));
        Ok(())
    }

    async fn mark_used(&mut self, item_id: &str) -> anyhow::Result<()> {
        self.used.push(item_id.to_string());
        Ok(())
    }

    async fn extend_expiry(&mut self, item_id: &str, days: i64) -> anyhow::Result<()> {
        self.extended.push((item_id.to_string(), days));
        Ok(())
    }

    async fn delete(&mut self, item_id: &str) -> anyhow::Result<()> {
        self.deleted.push(item_id.to_string());
        Ok(())
    }
}
