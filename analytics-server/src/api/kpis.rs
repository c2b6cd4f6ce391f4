//! KPI WebSocket endpoint and REST ingest
//!
//! Each text frame is one JSON command; the reply goes back on the same
//! connection. A malformed or unknown command gets an error reply and
//! the connection stays open.

use axum::Json;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use shared::error::{ApiResponse, AppError};
use shared::models::analytics::DailyKpis;
use shared::ws::{KpiCommand, WsReply};

use super::ApiResult;
use crate::db::{self, BucketUnit};
use crate::error::ServiceResult;
use crate::report;
use crate::state::AppState;

/// GET /ws/kpis
pub async fn ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| session(socket, state))
}

async fn session(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    while let Some(Ok(msg)) = stream.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let reply = match serde_json::from_str::<KpiCommand>(&text) {
            Ok(cmd) => dispatch(&state, cmd).await,
            Err(e) => WsReply::error(format!("Invalid command: {e}")).to_text(),
        };
        if sink.send(Message::Text(reply.into())).await.is_err() {
            break;
        }
    }
}

async fn dispatch(state: &AppState, cmd: KpiCommand) -> String {
    let result: ServiceResult<String> = async {
        Ok(match cmd {
            KpiCommand::Daily {
                start_date,
                end_date,
            } => reply(
                "daily",
                db::kpis::daily(&state.pool, start_date, end_date).await?,
            ),
            KpiCommand::Weekly { year } => reply(
                "weekly",
                db::kpis::buckets(&state.pool, BucketUnit::Week, Some(year)).await?,
            ),
            KpiCommand::Monthly { year } => reply(
                "monthly",
                db::kpis::buckets(&state.pool, BucketUnit::Month, Some(year)).await?,
            ),
            KpiCommand::Yearly => reply(
                "yearly",
                db::kpis::buckets(&state.pool, BucketUnit::Year, None).await?,
            ),
            KpiCommand::MonthlyRevenue { year } => {
                let rows = db::kpis::monthly_rows(&state.pool, year).await?;
                reply("monthly_revenue", report::monthly_report(year, &rows))
            }
        })
    }
    .await;

    result.unwrap_or_else(|e| {
        let app: AppError = e.into();
        WsReply::error(app.message).to_text()
    })
}

fn reply<T: Serialize>(action: &str, data: T) -> String {
    WsReply::ok(action, data).to_text()
}

/// POST /api/v1/kpis — upsert the row for a date
pub async fn ingest(
    State(state): State<AppState>,
    Json(payload): Json<DailyKpis>,
) -> ApiResult<DailyKpis> {
    let saved = db::kpis::upsert(&state.pool, &payload).await?;
    Ok(Json(ApiResponse::success(saved)))
}
