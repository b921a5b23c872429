use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::api::extract::{AdminUser, CurrentUser};
use crate::models::api::StatusResponse;
use crate::models::appointments::AppointmentResponse;
use crate::models::AppState;
use crate::services::appointment_service::my_appointments;
use crate::services::queue_service::load_queue_page;
use crate::supabase::ChangeFilter;

/// What a live socket keeps re-rendering.
#[derive(Debug, Clone, Copy)]
enum LiveView {
    Queue { doctor_id: Uuid },
    MyAppointments,
}

impl LiveView {
    fn channel(&self, session: &CurrentUser) -> String {
        match self {
            LiveView::Queue { doctor_id } => format!("queue_changes:{}", doctor_id),
            LiveView::MyAppointments => format!("appointments_changes:{}", session.user.id),
        }
    }

    fn filter(&self, session: &CurrentUser) -> ChangeFilter {
        match self {
            LiveView::Queue { doctor_id } => ChangeFilter::doctor_queue(*doctor_id),
            LiveView::MyAppointments => ChangeFilter::user_appointments(session.user.id),
        }
    }

    /// Full re-fetch; nothing is applied incrementally.
    async fn render(&self, state: &AppState, session: &CurrentUser) -> String {
        let rendered = match self {
            LiveView::Queue { doctor_id } => {
                let page = load_queue_page(
                    &state.supabase,
                    *doctor_id,
                    &session.access_token,
                    state.config.minutes_per_patient,
                )
                .await;
                serde_json::to_string(&page)
            }
            LiveView::MyAppointments => {
                let appointments =
                    my_appointments(&state.supabase, session.user.id, &session.access_token)
                        .await
                        .unwrap_or_else(|e| {
                            log::error!("error fetching appointments: {}", e);
                            Vec::new()
                        });
                let items: Vec<AppointmentResponse> =
                    appointments.iter().map(AppointmentResponse::from).collect();
                serde_json::to_string(&items)
            }
        };
        rendered.unwrap_or_else(|e| {
            log::error!("failed to encode live view: {}", e);
            String::from("null")
        })
    }
}

pub async fn queue_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    AdminUser(admin): AdminUser,
) -> Response {
    ws.on_upgrade(move |socket| stream_updates(socket, state, LiveView::Queue { doctor_id }, admin))
}

pub async fn my_appointments_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    session: CurrentUser,
) -> Response {
    ws.on_upgrade(move |socket| stream_updates(socket, state, LiveView::MyAppointments, session))
}

async fn stream_updates(
    socket: WebSocket,
    state: Arc<AppState>,
    view: LiveView,
    session: CurrentUser,
) {
    let (mut sender, mut receiver) = socket.split();
    // Subscribe to sign-outs first
    let mut auth_events = state.auth_events.subscribe();

    // Join the realtime channel before taking the snapshot
    let subscription = state
        .realtime
        .subscribe(
            &view.channel(&session),
            view.filter(&session),
            Some(&session.access_token),
        )
        .await;

    let snapshot = view.render(&state, &session).await;
    if sender.send(Message::Text(snapshot.into())).await.is_err() {
        return;
    }

    let mut subscription = match subscription {
        Ok(subscription) => subscription,
        Err(e) => {
            log::error!("live updates unavailable for {}: {}", session.user.id, e);
            let notice = StatusResponse::error("live updates unavailable");
            if let Ok(text) = serde_json::to_string(&notice) {
                let _ = sender.send(Message::Text(text.into())).await;
            }
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
    };

    // Drain client frames until it hangs up
    let mut socket_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(Message::Text(text)) => log::debug!("ignoring client message: {}", text.as_str()),
                _ => (),
            }
        }
    });

    // Re-render on every change notice, stop on sign-out
    let user_id = session.user.id;
    let mut push_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                notice = subscription.recv() => {
                    if notice.is_none() {
                        log::warn!("realtime channel closed for {}", user_id);
                        break;
                    }
                    let rendered = view.render(&state, &session).await;
                    if let Err(e) = sender.send(Message::Text(rendered.into())).await {
                        log::info!("client went away: {}", e);
                        break;
                    }
                }
                event = auth_events.recv() => match event {
                    Ok(event) if event.is_sign_out_of(user_id) => {
                        log::info!("closing live view for signed out user {}", user_id);
                        break;
                    }
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                },
            }
        }
        let _ = sender.send(Message::Close(None)).await;
        subscription.unsubscribe().await;
    });

    // Whichever side finishes first ends the other
    tokio::select! {
        _ = &mut socket_task => push_task.abort(),
        _ = &mut push_task => socket_task.abort(),
    }
}
