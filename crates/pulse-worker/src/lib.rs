//! Background maintenance jobs: retention purge and scheduled redelivery.

pub mod scheduler;

pub use scheduler::CronScheduler;
