pub mod amount;
pub mod client;
pub mod entry;
pub mod message;
pub mod registry;
pub mod sheet_date;

pub use client::{ClientAnalytics, ClientRecord, ClientStats, ClientTransaction};
pub use entry::{LedgerRow, NewEntry, RawEntry, RowRef, Snapshot};
pub use message::{ClientMessage, ServerMessage};
pub use registry::RegisteredClient;
