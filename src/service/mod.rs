pub mod aggregator;
pub mod analytics;
pub mod cache;
pub mod export;
pub mod hub;
pub mod ledger;
pub mod normalizer;
pub mod ranking;
pub mod registry;
pub mod snapshot;

pub use analytics::{analytics_response, analyze_payload, client_analytics};
pub use cache::SnapshotCache;
pub use hub::ConnectionHub;
pub use ledger::{run_sync_loop, LedgerService};
pub use registry::ClientRegistry;
