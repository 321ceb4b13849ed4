//! # pulse-api
//!
//! HTTP API layer for Pulse built on Axum.
//!
//! Provides the notification REST endpoints, WebSocket upgrade for the
//! live toast stream, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
