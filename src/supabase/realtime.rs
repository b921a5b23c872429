use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};
use uuid::Uuid;

use crate::config::SupabaseConfig;
use crate::error::SupabaseError;

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
pub const JOIN_TIMEOUT: Duration = Duration::from_secs(10);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Which table changes wake a subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub table: String,
    pub filter: Option<String>,
}

impl ChangeFilter {
    pub fn doctor_queue(doctor_id: Uuid) -> Self {
        ChangeFilter {
            table: "appointments".to_string(),
            filter: Some(format!("doctor_id=eq.{}", doctor_id)),
        }
    }

    pub fn user_appointments(user_id: Uuid) -> Self {
        ChangeFilter {
            table: "appointments".to_string(),
            filter: Some(format!("user_id=eq.{}", user_id)),
        }
    }
}

/// "Something changed"; carries no row data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeNotice;

#[derive(Debug, PartialEq)]
pub(crate) enum Frame {
    Change,
    Joined,
    Rejected(String),
    Closed,
    Other,
}

#[derive(Clone)]
pub struct RealtimeClient {
    ws_url: String,
    heartbeat: Duration,
}

impl RealtimeClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        RealtimeClient {
            ws_url: websocket_url(&config.url, &config.anon_key),
            heartbeat: HEARTBEAT_INTERVAL,
        }
    }

    #[cfg(test)]
    pub fn with_heartbeat(mut self, every: Duration) -> Self {
        self.heartbeat = every;
        self
    }

    /// Opens a channel and waits for the join to be acknowledged.
    pub async fn subscribe(
        &self,
        channel: &str,
        filter: ChangeFilter,
        access_token: Option<&str>,
    ) -> Result<Subscription, SupabaseError> {
        let (mut socket, _) = connect_async(self.ws_url.as_str()).await?;
        let topic = format!("realtime:{}", channel);

        let join = join_message(&topic, &filter, access_token, 1);
        socket.send(Message::Text(join.to_string().into())).await?;

        match tokio::time::timeout(JOIN_TIMEOUT, await_join(&mut socket, &topic)).await {
            Ok(result) => result?,
            Err(_) => return Err(SupabaseError::ChannelRejected("join timed out".to_string())),
        }
        log::info!("subscribed to {} ({:?})", topic, filter.filter);

        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(run_channel(socket, topic, tx, self.heartbeat));
        Ok(Subscription { notices: rx, task })
    }
}

pub struct Subscription {
    notices: mpsc::Receiver<ChangeNotice>,
    task: JoinHandle<()>,
}

impl Subscription {
    /// Next change notice; `None` once the channel has closed.
    pub async fn recv(&mut self) -> Option<ChangeNotice> {
        self.notices.recv().await
    }

    /// Leaves the channel and waits for the socket task to finish.
    pub async fn unsubscribe(self) {
        let Subscription { notices, task } = self;
        drop(notices);
        let _ = task.await;
    }
}

async fn await_join(socket: &mut Socket, topic: &str) -> Result<(), SupabaseError> {
    while let Some(message) = socket.next().await {
        if let Message::Text(text) = message? {
            match classify_frame(topic, text.as_str()) {
                Frame::Joined => return Ok(()),
                Frame::Rejected(reason) => return Err(SupabaseError::ChannelRejected(reason)),
                Frame::Closed => break,
                _ => {}
            }
        }
    }
    Err(SupabaseError::ChannelRejected(
        "connection closed before join".to_string(),
    ))
}

async fn run_channel(
    socket: Socket,
    topic: String,
    tx: mpsc::Sender<ChangeNotice>,
    heartbeat_every: Duration,
) {
    let (mut sink, mut source) = socket.split();
    // First tick completes immediately
    let mut heartbeat = tokio::time::interval(heartbeat_every);
    heartbeat.tick().await;
    let mut reference: u64 = 1;

    loop {
        tokio::select! {
            // Keep the server from timing the socket out
            _ = heartbeat.tick() => {
                reference += 1;
                let beat = heartbeat_message(reference).to_string();
                if sink.send(Message::Text(beat.into())).await.is_err() {
                    break;
                }
            }
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => match classify_frame(&topic, text.as_str()) {
                    // A queued notice already forces a full re-fetch, so extras are dropped
                    Frame::Change => match tx.try_send(ChangeNotice) {
                        Ok(()) | Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Closed(_)) => break,
                    },
                    Frame::Rejected(reason) => {
                        log::warn!("{} rejected: {}", topic, reason);
                        break;
                    }
                    Frame::Closed => break,
                    _ => {}
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    log::warn!("{} socket error: {}", topic, e);
                    break;
                }
            },
            // Subscriber dropped its receiver
            _ = tx.closed() => break,
        }
    }

    // Leave the topic, then close the socket
    reference += 1;
    let leave = json!({"topic": topic, "event": "phx_leave", "payload": {}, "ref": reference.to_string()});
    let _ = sink.send(Message::Text(leave.to_string().into())).await;
    let _ = sink.close().await;
    log::info!("left {}", topic);
}

pub(crate) fn websocket_url(base_url: &str, api_key: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/realtime/v1/websocket?apikey={}&vsn=1.0.0", base, api_key)
}

pub(crate) fn join_message(
    topic: &str,
    filter: &ChangeFilter,
    access_token: Option<&str>,
    reference: u64,
) -> Value {
    let mut change = json!({"event": "*", "schema": "public", "table": filter.table});
    if let Some(f) = &filter.filter {
        change["filter"] = Value::String(f.clone());
    }
    let mut payload = json!({
        "config": {
            "broadcast": {"ack": false, "self": false},
            "presence": {"key": ""},
            "postgres_changes": [change],
        }
    });
    if let Some(token) = access_token {
        payload["access_token"] = Value::String(token.to_string());
    }
    json!({
        "topic": topic,
        "event": "phx_join",
        "payload": payload,
        "ref": reference.to_string(),
        "join_ref": reference.to_string(),
    })
}

pub(crate) fn heartbeat_message(reference: u64) -> Value {
    json!({"topic": "phoenix", "event": "heartbeat", "payload": {}, "ref": reference.to_string()})
}

pub(crate) fn classify_frame(topic: &str, text: &str) -> Frame {
    let Ok(frame) = serde_json::from_str::<Value>(text) else {
        return Frame::Other;
    };
    if frame.get("topic").and_then(Value::as_str) != Some(topic) {
        return Frame::Other;
    }
    let payload = frame.get("payload").cloned().unwrap_or(Value::Null);
    let status = payload.get("status").and_then(Value::as_str);

    match frame.get("event").and_then(Value::as_str) {
        Some("postgres_changes") => Frame::Change,
        Some("phx_reply") => match status {
            Some("ok") => Frame::Joined,
            _ => Frame::Rejected(reason(&payload)),
        },
        Some("system") if status == Some("error") => Frame::Rejected(reason(&payload)),
        Some("phx_close") | Some("phx_error") => Frame::Closed,
        _ => Frame::Other,
    }
}

fn reason(payload: &Value) -> String {
    payload
        .pointer("/response/reason")
        .or_else(|| payload.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| payload.to_string())
}
