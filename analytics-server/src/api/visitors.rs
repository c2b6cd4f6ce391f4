//! Visitor analytics WebSocket endpoint and REST ingest
//!
//! Period totals are broken down by traffic source; growth actions
//! compare a period to the one immediately before it.

use axum::Json;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::{Duration, NaiveDate};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use shared::error::{ApiResponse, AppError};
use shared::models::analytics::{VisitorEvent, VisitorEventUpsert, VisitorGrowth};
use shared::ws::{VisitorCommand, WsReply};
use std::collections::BTreeMap;

use super::ApiResult;
use crate::db;
use crate::error::ServiceResult;
use crate::report;
use crate::state::AppState;

/// Per-source totals for one period, with its bounds echoed back
#[derive(Debug, Serialize)]
struct VisitorPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_visitors: i64,
    media: BTreeMap<String, i64>,
}

/// GET /ws/visitor-events
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
        let reply = match serde_json::from_str::<VisitorCommand>(&text) {
            Ok(cmd) => dispatch(&state, cmd).await,
            Err(e) => WsReply::error(format!("Invalid command: {e}")).to_text(),
        };
        if sink.send(Message::Text(reply.into())).await.is_err() {
            break;
        }
    }
}

async fn dispatch(state: &AppState, cmd: VisitorCommand) -> String {
    let result: ServiceResult<String> = async {
        Ok(match cmd {
            VisitorCommand::Daily { date } => reply(
                "daily",
                period_totals(state, date, date).await?,
            ),
            VisitorCommand::Weekly {
                start_date,
                end_date,
            } => {
                if end_date < start_date {
                    return Err(
                        AppError::validation("end_date must not precede start_date").into()
                    );
                }
                reply("weekly", period_totals(state, start_date, end_date).await?)
            }
            VisitorCommand::Monthly { year, month } => {
                let (start, end) = report::month_bounds(year, month)
                    .ok_or_else(|| AppError::validation("Invalid month"))?;
                reply("monthly", period_totals(state, start, end).await?)
            }
            VisitorCommand::Yearly { year } => {
                let (start, end) = report::year_bounds(year)
                    .ok_or_else(|| AppError::validation("Invalid year"))?;
                reply("yearly", period_totals(state, start, end).await?)
            }
            VisitorCommand::GrowthDaily { date } => {
                let prev = date - Duration::days(1);
                reply(
                    "growth_daily",
                    growth(state, (date, date), (prev, prev)).await?,
                )
            }
            VisitorCommand::GrowthWeekly { start_date } => {
                let end = start_date + Duration::days(6);
                let prev_start = start_date - Duration::days(7);
                let prev_end = start_date - Duration::days(1);
                reply(
                    "growth_weekly",
                    growth(state, (start_date, end), (prev_start, prev_end)).await?,
                )
            }
            VisitorCommand::GrowthMonthly { year, month } => {
                let current = report::month_bounds(year, month)
                    .ok_or_else(|| AppError::validation("Invalid month"))?;
                let (py, pm) = report::previous_month(year, month);
                let previous = report::month_bounds(py, pm)
                    .ok_or_else(|| AppError::validation("Invalid month"))?;
                reply("growth_monthly", growth(state, current, previous).await?)
            }
            VisitorCommand::GrowthYearly { year } => {
                let current = report::year_bounds(year)
                    .ok_or_else(|| AppError::validation("Invalid year"))?;
                let previous = report::year_bounds(year - 1)
                    .ok_or_else(|| AppError::validation("Invalid year"))?;
                reply("growth_yearly", growth(state, current, previous).await?)
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

async fn period_totals(
    state: &AppState,
    start: NaiveDate,
    end: NaiveDate,
) -> ServiceResult<VisitorPeriod> {
    let totals = db::visitors::totals(&state.pool, start, end).await?;
    let media: BTreeMap<String, i64> = totals.into_iter().map(|t| (t.source, t.visitors)).collect();
    Ok(VisitorPeriod {
        start_date: start,
        end_date: end,
        total_visitors: media.values().sum(),
        media,
    })
}

async fn growth(
    state: &AppState,
    current: (NaiveDate, NaiveDate),
    previous: (NaiveDate, NaiveDate),
) -> ServiceResult<VisitorGrowth> {
    let now = period_totals(state, current.0, current.1).await?;
    let before = period_totals(state, previous.0, previous.1).await?;
    Ok(VisitorGrowth {
        total_visitors: now.total_visitors,
        growth_percent: report::growth_percent(
            now.total_visitors as f64,
            before.total_visitors as f64,
        ),
        media: now.media,
    })
}

/// POST /api/v1/visitor-events — increment or overwrite a (source, date) row
pub async fn ingest(
    State(state): State<AppState>,
    Json(payload): Json<VisitorEventUpsert>,
) -> ApiResult<VisitorEvent> {
    if payload.visitors < 0 {
        return Err(AppError::validation("visitors must be non-negative"));
    }
    let saved = db::visitors::upsert(&state.pool, &payload).await?;
    Ok(Json(ApiResponse::success(saved)))
}
