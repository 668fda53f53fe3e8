use crate::api::AppState;
use crate::models::{ClientMessage, ServerMessage, Snapshot};
use crate::service::LedgerService;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tracing::{debug, error, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// 初始帧: 当前快照 (不可用时为空对象)
pub async fn init_frame(ledger: &LedgerService) -> Result<String, serde_json::Error> {
    let snapshot = ledger.snapshot().await.unwrap_or_default();
    ServerMessage::Init { data: &snapshot }.to_frame()
}

/// 处理一条客户端消息, 返回需要回复的帧
///
/// 无法解析的消息和无数据源时的写请求不回复
pub async fn handle_message(ledger: &LedgerService, text: &str) -> Option<String> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(m) => m,
        Err(e) => {
            debug!("Ignoring WS message: {}", e);
            return None;
        }
    };

    let reply = match message {
        ClientMessage::Ping => ServerMessage::Pong,
        ClientMessage::AddEntry { data } => match ledger.add_entry(&data).await? {
            Ok(row_idx) => ServerMessage::EntryAdded { row_idx, success: true, error: None },
            Err(e) => {
                error!("Add entry failed: {}", e);
                ServerMessage::EntryAdded { row_idx: -1, success: false, error: Some(e.to_string()) }
            }
        },
        ClientMessage::UpdateEntry { idx, symbols, amount } => {
            let result = ledger.update_entry(idx, &symbols, amount.as_ref()).await?;
            ServerMessage::EntryUpdated {
                success: result.is_ok(),
                error: result.err().map(|e| e.to_string()),
            }
        }
        ClientMessage::DeleteEntry { idx } => {
            let result = ledger.delete_entry(idx).await?;
            ServerMessage::EntryDeleted {
                success: result.is_ok(),
                error: result.err().map(|e| e.to_string()),
            }
        }
    };

    match reply.to_frame() {
        Ok(frame) => Some(frame),
        Err(e) => {
            error!("WS reply encoding failed: {}", e);
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let hub = state.ledger.hub().clone();
    let (id, mut outbound) = hub.register();
    let (mut sender, mut receiver) = socket.split();
    info!("WS connected. Total: {}", hub.len());

    let init = match init_frame(&state.ledger).await {
        Ok(frame) => frame,
        Err(e) => {
            error!("WS init encoding failed: {}", e);
            ServerMessage::Init { data: &Snapshot::new() }.to_frame().unwrap_or_default()
        }
    };

    if sender.send(Message::Text(init)).await.is_ok() {
        loop {
            tokio::select! {
                frame = outbound.recv() => {
                    let Some(frame) = frame else { break };
                    if sender.send(Message::Text(frame)).await.is_err() {
                        break;
                    }
                }
                incoming = receiver.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_message(&state.ledger, &text).await {
                            if sender.send(Message::Text(reply)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WS error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    hub.unregister(id);
    info!("WS disconnected. Remaining: {}", hub.len());
}
