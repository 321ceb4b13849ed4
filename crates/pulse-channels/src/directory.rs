//! Contact routing lookup — the seam to the identity/tenancy layer.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ChannelError;

/// Resolves a tenant's contact routing info.
///
/// The identity layer that owns this data is an external collaborator; the
/// senders only depend on this interface.
#[async_trait]
pub trait ContactDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// The tenant's SMS-capable phone number, if one is on file.
    async fn phone_number(&self, business_id: Uuid) -> Result<Option<String>, ChannelError>;
}

/// Fixed in-memory directory for tests and local development.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    phones: Mutex<HashMap<Uuid, String>>,
}

impl StaticDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a phone number on file for a tenant.
    pub fn set_phone(&self, business_id: Uuid, phone: impl Into<String>) {
        self.phones
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(business_id, phone.into());
    }
}

#[async_trait]
impl ContactDirectory for StaticDirectory {
    async fn phone_number(&self, business_id: Uuid) -> Result<Option<String>, ChannelError> {
        Ok(self
            .phones
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&business_id)
            .cloned())
    }
}
