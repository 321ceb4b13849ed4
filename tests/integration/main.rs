//! End-to-end tests against the full router, backed by the in-memory store.

mod helpers;
mod notification_test;
