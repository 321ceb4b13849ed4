//! # pulse-entity
//!
//! Notification domain entities: the persisted row model and the closed
//! enumerations (type, channel, priority, status) with their wire strings
//! and the status state machine.

mod text;

pub mod notification;

pub use notification::channel::Channel;
pub use notification::kind::NotificationType;
pub use notification::model::Notification;
pub use notification::priority::Priority;
pub use notification::status::NotificationStatus;
pub use text::ParseEnumError;
