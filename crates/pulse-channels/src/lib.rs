//! # pulse-channels
//!
//! The channel sender capability and its four implementations. Each sender
//! honors the same contract: attempt one delivery, report success or a
//! distinguishable failure, never panic the dispatch.

pub mod directory;
pub mod email;
pub mod error;
pub mod in_app;
pub mod push;
pub mod sender;
pub mod sms;

pub use directory::{ContactDirectory, StaticDirectory};
pub use email::EmailSender;
pub use error::ChannelError;
pub use in_app::InAppSender;
pub use push::PushSender;
pub use sender::{ChannelRegistry, ChannelSender, Delivery, DeliveryContext};
pub use sms::SmsSender;
