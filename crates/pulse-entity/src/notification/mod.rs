//! Notification domain entities.

pub mod channel;
pub mod kind;
pub mod model;
pub mod priority;
pub mod status;

pub use channel::Channel;
pub use kind::NotificationType;
pub use model::Notification;
pub use priority::Priority;
pub use status::NotificationStatus;
