//! Typed client for the slot booking API and the page-level booking flow
//! built on top of it (date picker rules, slot selection, confirm + refresh).

pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod forms;
pub mod models;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use flow::BookingFlow;
