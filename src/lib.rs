pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use db::{LedgerStore, PgLedgerStore};
pub use service::{ClientRegistry, LedgerService};
