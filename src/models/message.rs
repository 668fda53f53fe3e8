use crate::models::{amount, NewEntry, Snapshot};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 客户端 -> 服务端 (按 type 区分)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
    AddEntry {
        data: NewEntry,
    },
    UpdateEntry {
        idx: i64,
        #[serde(default)]
        symbols: String,
        #[serde(default, with = "amount::option")]
        amount: Option<BigDecimal>,
    },
    DeleteEntry {
        idx: i64,
    },
}

/// 服务端 -> 客户端
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage<'a> {
    Init {
        data: &'a Snapshot,
    },
    Sync {
        data: &'a Snapshot,
    },
    Pong,
    EntryAdded {
        row_idx: i64,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    EntryUpdated {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    EntryDeleted {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ServerMessage<'_> {
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
