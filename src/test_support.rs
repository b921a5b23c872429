//! In-process stand-in for the hosted backend: REST tables, the booking
//! procedure, password auth and a Phoenix-style realtime socket.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::SupabaseConfig;
use crate::models::AppointmentStatus;
use crate::supabase::SupabaseClient;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const PATIENT_TOKEN: &str = "patient-token";
pub const PASSWORD: &str = "secret";
pub const ADMIN_EMAIL: &str = "admin@hospital.com";
pub const PATIENT_EMAIL: &str = "priya@example.com";

#[derive(Clone)]
struct FakeState {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    changes: broadcast::Sender<()>,
    signed_out: Arc<Mutex<Vec<String>>>,
    frames: Arc<Mutex<Vec<Value>>>,
}

pub struct FakeBackend {
    pub url: String,
    pub admin_id: Uuid,
    pub patient_id: Uuid,
    state: FakeState,
}

impl FakeBackend {
    /// Seeds three doctors (Adams and Baker active, Cole inactive), an admin and a patient.
    pub async fn start() -> Self {
        let admin_id = Uuid::new_v4();
        let patient_id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        let doctor = |name: &str, specialization: &str, active: bool| {
            json!({
                "id": Uuid::new_v4().to_string(),
                "name": name,
                "specialization": specialization,
                "start_time": "09:00:00",
                "end_time": "17:00:00",
                "is_active": active,
                "created_at": now,
            })
        };

        let mut tables = HashMap::new();
        tables.insert(
            "doctors".to_string(),
            vec![
                doctor("Dr. Baker", "Dermatologist", true),
                doctor("Dr. Cole", "Dentist", false),
                doctor("Dr. Adams", "Cardiologist", true),
            ],
        );
        tables.insert("appointments".to_string(), Vec::new());
        tables.insert(
            "auth_users".to_string(),
            vec![
                json!({"id": admin_id.to_string(), "email": ADMIN_EMAIL, "password": PASSWORD,
                       "token": ADMIN_TOKEN, "user_metadata": {"name": "Asha Admin"}}),
                json!({"id": patient_id.to_string(), "email": PATIENT_EMAIL, "password": PASSWORD,
                       "token": PATIENT_TOKEN, "user_metadata": {"name": "Priya", "phone": "555-0000"}}),
            ],
        );
        tables.insert(
            "user_roles".to_string(),
            vec![
                json!({"user_id": admin_id.to_string(), "roles": {"role_name": "admin"}}),
                json!({"user_id": patient_id.to_string(), "roles": {"role_name": "public_user"}}),
            ],
        );
        tables.insert(
            "public_users".to_string(),
            vec![json!({"id": patient_id.to_string(), "name": "Priya Nair", "phone": "555-0101"})],
        );

        let (changes, _) = broadcast::channel(64);
        let state = FakeState {
            tables: Arc::new(Mutex::new(tables)),
            changes,
            signed_out: Arc::new(Mutex::new(Vec::new())),
            frames: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/realtime/v1/websocket", get(realtime))
            .fallback(rest)
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeBackend {
            url: format!("http://{}", addr),
            admin_id,
            patient_id,
            state,
        }
    }

    pub fn config(&self) -> SupabaseConfig {
        SupabaseConfig {
            url: self.url.clone(),
            anon_key: "anon-key".to_string(),
        }
    }

    pub fn client(&self) -> SupabaseClient {
        SupabaseClient::new(&self.config())
    }

    pub fn doctor_id(&self, name: &str) -> Uuid {
        let tables = self.state.tables.lock().unwrap();
        tables["doctors"]
            .iter()
            .find(|d| d["name"] == name)
            .and_then(|d| d["id"].as_str())
            .and_then(|id| id.parse().ok())
            .unwrap()
    }

    /// Adds a patient appointment for today.
    pub fn add_appointment(&self, doctor_id: Uuid, token: i64, status: AppointmentStatus) -> Uuid {
        self.add_appointment_on(doctor_id, token, status, Utc::now().date_naive())
    }

    pub fn add_appointment_on(
        &self,
        doctor_id: Uuid,
        token: i64,
        status: AppointmentStatus,
        date: NaiveDate,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let mut tables = self.state.tables.lock().unwrap();
        tables.get_mut("appointments").unwrap().push(json!({
            "id": id.to_string(),
            "doctor_id": doctor_id.to_string(),
            "user_id": self.patient_id.to_string(),
            "token_number": token,
            "status": status.as_str(),
            "appointment_date": date.to_string(),
            "created_at": Utc::now().to_rfc3339(),
            "patient_name": format!("Patient {}", token),
        }));
        id
    }

    pub fn status_of(&self, appointment_id: Uuid) -> AppointmentStatus {
        let tables = self.state.tables.lock().unwrap();
        let row = tables["appointments"]
            .iter()
            .find(|a| a["id"] == appointment_id.to_string())
            .unwrap();
        serde_json::from_value(row["status"].clone()).unwrap()
    }

    /// Changes a row the way another client would, then emits a change event.
    pub fn set_status(&self, appointment_id: Uuid, status: AppointmentStatus) {
        {
            let mut tables = self.state.tables.lock().unwrap();
            for row in tables.get_mut("appointments").unwrap().iter_mut() {
                if row["id"] == appointment_id.to_string() {
                    row["status"] = json!(status.as_str());
                }
            }
        }
        let _ = self.state.changes.send(());
    }

    pub fn signed_out_tokens(&self) -> Vec<String> {
        self.state.signed_out.lock().unwrap().clone()
    }

    /// Frames received on the realtime socket, in arrival order.
    pub fn realtime_frames(&self) -> Vec<Value> {
        self.state.frames.lock().unwrap().clone()
    }

    /// Polls `check` until it holds, failing the test after five seconds.
    pub async fn wait_until<F: Fn(&FakeBackend) -> bool>(&self, check: F) {
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(5);
        while !check(self) {
            assert!(tokio::time::Instant::now() < deadline, "condition not met in time");
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

fn error(status: u16, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    (status, Json(json!({"message": message}))).into_response()
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

fn compare(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        _ => text(a).cmp(&text(b)),
    }
}

fn row_matches(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, condition)| {
        let actual = text(&row[column.as_str()]);
        if let Some(expected) = condition.strip_prefix("eq.") {
            actual == expected
        } else if let Some(expected) = condition.strip_prefix("neq.") {
            actual != expected
        } else {
            true
        }
    })
}

fn user_by_token(state: &FakeState, token: &str) -> Option<Value> {
    let tables = state.tables.lock().unwrap();
    tables["auth_users"]
        .iter()
        .find(|u| u["token"] == token)
        .cloned()
}

fn public_user(user: &Value) -> Value {
    json!({"id": user["id"], "email": user["email"], "user_metadata": user["user_metadata"]})
}

fn session(user: &Value) -> Value {
    json!({
        "access_token": user["token"],
        "refresh_token": "refresh",
        "expires_in": 3600,
        "token_type": "bearer",
        "user": public_user(user),
    })
}

async fn rest(
    State(state): State<FakeState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let params: Vec<(String, String)> = Query::<Vec<(String, String)>>::try_from_uri(&uri)
        .map(|Query(p)| p)
        .unwrap_or_default();
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("")
        .to_string();
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

    match (method.as_str(), uri.path()) {
        ("POST", "/auth/v1/token") => {
            let tables = state.tables.lock().unwrap();
            let found = tables["auth_users"]
                .iter()
                .find(|u| u["email"] == body["email"] && u["password"] == body["password"]);
            match found {
                Some(user) => Json(session(user)).into_response(),
                None => (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "invalid_grant", "error_description": "Invalid login credentials"})),
                )
                    .into_response(),
            }
        }
        ("POST", "/auth/v1/signup") => {
            let id = Uuid::new_v4();
            let user = json!({
                "id": id.to_string(),
                "email": body["email"],
                "password": body["password"],
                "token": format!("token-{}", id),
                "user_metadata": body["data"],
            });
            let mut tables = state.tables.lock().unwrap();
            tables.get_mut("auth_users").unwrap().push(user.clone());
            tables
                .get_mut("user_roles")
                .unwrap()
                .push(json!({"user_id": id.to_string(), "roles": {"role_name": "public_user"}}));
            Json(session(&user)).into_response()
        }
        ("POST", "/auth/v1/logout") => {
            state.signed_out.lock().unwrap().push(bearer);
            StatusCode::NO_CONTENT.into_response()
        }
        ("GET", "/auth/v1/user") => match user_by_token(&state, &bearer) {
            Some(user) => Json(public_user(&user)).into_response(),
            None => error(401, "invalid JWT"),
        },
        ("POST", "/rest/v1/rpc/book_appointment") => book(&state, &bearer, &body),
        (_, path) => match path.strip_prefix("/rest/v1/") {
            Some(table) => table_request(&state, method, table, &params, &headers, body),
            None => StatusCode::NOT_FOUND.into_response(),
        },
    }
}

fn book(state: &FakeState, bearer: &str, body: &Value) -> Response {
    let Some(user) = user_by_token(state, bearer) else {
        return error(401, "not authenticated");
    };
    let today = Utc::now().date_naive().to_string();
    let doctor_id = text(&body["doctor_id_param"]);
    let token = {
        let mut tables = state.tables.lock().unwrap();
        let active = tables["doctors"]
            .iter()
            .any(|d| d["id"] == doctor_id && d["is_active"] == true);
        if !active {
            return error(400, "Doctor is not available for booking");
        }
        let token = tables["appointments"]
            .iter()
            .filter(|a| a["doctor_id"] == doctor_id && a["appointment_date"] == today)
            .filter_map(|a| a["token_number"].as_i64())
            .max()
            .unwrap_or(0)
            + 1;
        tables.get_mut("appointments").unwrap().push(json!({
            "id": Uuid::new_v4().to_string(),
            "doctor_id": doctor_id,
            "user_id": user["id"],
            "token_number": token,
            "status": "WAITING",
            "appointment_date": today,
            "created_at": Utc::now().to_rfc3339(),
            "patient_name": body["patient_name_param"],
            "patient_phone": body["patient_phone_param"],
        }));
        token
    };
    let _ = state.changes.send(());
    Json(json!({"token_number": token})).into_response()
}

fn table_request(
    state: &FakeState,
    method: Method,
    table: &str,
    params: &[(String, String)],
    headers: &HeaderMap,
    body: Value,
) -> Response {
    let filters: Vec<(String, String)> = params
        .iter()
        .filter(|(k, _)| k != "select" && k != "order")
        .cloned()
        .collect();
    let select = params
        .iter()
        .find(|(k, _)| k == "select")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();
    let order = params
        .iter()
        .find(|(k, _)| k == "order")
        .map(|(_, v)| v.clone());

    let mut tables = state.tables.lock().unwrap();
    let Some(rows) = tables.get(table).cloned() else {
        return error(404, "relation does not exist");
    };

    match method.as_str() {
        "GET" | "HEAD" => {
            let mut rows: Vec<Value> = rows.into_iter().filter(|r| row_matches(r, &filters)).collect();
            if let Some(order) = order {
                let keys: Vec<(String, bool)> = order
                    .split(',')
                    .filter_map(|part| part.rsplit_once('.'))
                    .map(|(col, dir)| (col.to_string(), dir != "desc"))
                    .collect();
                rows.sort_by(|a, b| {
                    keys.iter()
                        .map(|(col, asc)| {
                            let ord = compare(&a[col.as_str()], &b[col.as_str()]);
                            if *asc { ord } else { ord.reverse() }
                        })
                        .find(|o| o.is_ne())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            if select.contains("doctors(") {
                let doctors = tables["doctors"].clone();
                for row in rows.iter_mut() {
                    let joined = doctors
                        .iter()
                        .find(|d| d["id"] == row["doctor_id"])
                        .cloned()
                        .unwrap_or(Value::Null);
                    row["doctors"] = joined;
                }
            }

            if method == Method::HEAD {
                let range = if rows.is_empty() {
                    "*/0".to_string()
                } else {
                    format!("0-{}/{}", rows.len() - 1, rows.len())
                };
                return (StatusCode::OK, [("content-range", range)]).into_response();
            }

            let single = headers
                .get("accept")
                .and_then(|v| v.to_str().ok())
                .map(|v| v.contains("vnd.pgrst.object"))
                .unwrap_or(false);
            if single {
                if rows.len() == 1 {
                    return Json(rows.remove(0)).into_response();
                }
                return error(406, "JSON object requested, multiple (or no) rows returned");
            }
            Json(rows).into_response()
        }
        "POST" => {
            let new_rows = body.as_array().cloned().unwrap_or_default();
            let target = tables.get_mut(table).unwrap();
            for mut row in new_rows {
                row["id"] = json!(Uuid::new_v4().to_string());
                row["created_at"] = json!(Utc::now().to_rfc3339());
                if table == "doctors" && row.get("is_active").is_none() {
                    row["is_active"] = json!(true);
                }
                target.push(row);
            }
            StatusCode::CREATED.into_response()
        }
        "PATCH" => {
            let target = tables.get_mut(table).unwrap();
            for row in target.iter_mut().filter(|r| row_matches(r, &filters)) {
                if let (Some(row), Some(patch)) = (row.as_object_mut(), body.as_object()) {
                    for (k, v) in patch {
                        row.insert(k.clone(), v.clone());
                    }
                }
            }
            drop(tables);
            if table == "appointments" {
                let _ = state.changes.send(());
            }
            StatusCode::NO_CONTENT.into_response()
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn realtime(State(state): State<FakeState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| phoenix(socket, state))
}

async fn phoenix(mut socket: WebSocket, state: FakeState) {
    let mut changes = state.changes.subscribe();
    let mut topics: Vec<String> = Vec::new();

    loop {
        tokio::select! {
            msg = socket.recv() => match msg {
                Some(Ok(Message::Text(text))) => {
                    let Ok(frame) = serde_json::from_str::<Value>(text.as_str()) else { continue };
                    let topic = frame["topic"].as_str().unwrap_or("").to_string();
                    state.frames.lock().unwrap().push(frame.clone());
                    match frame["event"].as_str() {
                        Some("phx_join") => topics.push(topic.clone()),
                        Some("phx_leave") => topics.retain(|t| t != &topic),
                        _ => {}
                    }
                    let reply = json!({"topic": topic, "event": "phx_reply",
                                       "payload": {"status": "ok", "response": {}}, "ref": frame["ref"]});
                    if socket.send(Message::Text(reply.to_string().into())).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            changed = changes.recv() => {
                if let Err(broadcast::error::RecvError::Closed) = changed {
                    break;
                }
                for topic in &topics {
                    let frame = json!({"topic": topic, "event": "postgres_changes",
                                       "payload": {"data": {"type": "UPDATE"}}, "ref": null});
                    if socket.send(Message::Text(frame.to_string().into())).await.is_err() {
                        return;
                    }
                }
            }
        }
    }
}
