//! User-location analytics WebSocket endpoint and REST ingest

use axum::Json;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use chrono::Duration;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use shared::error::{ApiResponse, AppError};
use shared::models::analytics::{LocationPeriodStats, UserLocationStat};
use shared::ws::{LocationCommand, WsReply};

use super::ApiResult;
use crate::db;
use crate::error::ServiceResult;
use crate::report;
use crate::state::AppState;

/// GET /ws/user-location-stats
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
        let reply = match serde_json::from_str::<LocationCommand>(&text) {
            Ok(cmd) => dispatch(&state, cmd).await,
            Err(e) => WsReply::error(format!("Invalid command: {e}")).to_text(),
        };
        if sink.send(Message::Text(reply.into())).await.is_err() {
            break;
        }
    }
}

async fn dispatch(state: &AppState, cmd: LocationCommand) -> String {
    let result: ServiceResult<String> = async {
        Ok(match cmd {
            LocationCommand::Daily { date } => {
                let locations = db::locations::totals(&state.pool, date, date).await?;
                reply(
                    "daily",
                    LocationPeriodStats {
                        date: Some(date),
                        ..stats(locations)
                    },
                )
            }
            LocationCommand::Weekly { date } => {
                let start = report::week_start(date);
                let end = start + Duration::days(6);
                let locations = db::locations::totals(&state.pool, start, end).await?;
                reply(
                    "weekly",
                    LocationPeriodStats {
                        start_date: Some(start),
                        end_date: Some(end),
                        ..stats(locations)
                    },
                )
            }
            LocationCommand::Monthly { year, month } => {
                let (start, end) = report::month_bounds(year, month)
                    .ok_or_else(|| AppError::validation("Invalid month"))?;
                let locations = db::locations::totals(&state.pool, start, end).await?;
                reply(
                    "monthly",
                    LocationPeriodStats {
                        month: Some(report::month_name(month).to_string()),
                        year: Some(year),
                        ..stats(locations)
                    },
                )
            }
            LocationCommand::Yearly { year } => {
                let (start, end) = report::year_bounds(year)
                    .ok_or_else(|| AppError::validation("Invalid year"))?;
                let locations = db::locations::totals(&state.pool, start, end).await?;
                reply(
                    "yearly",
                    LocationPeriodStats {
                        year: Some(year),
                        ..stats(locations)
                    },
                )
            }
            LocationCommand::CountryDistribution { date } => {
                let locations = db::locations::totals(&state.pool, date, date).await?;
                reply(
                    "country_distribution",
                    report::country_distribution(&locations),
                )
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

fn stats(locations: Vec<shared::models::analytics::LocationTotal>) -> LocationPeriodStats {
    LocationPeriodStats {
        date: None,
        start_date: None,
        end_date: None,
        month: None,
        year: None,
        locations,
    }
}

/// POST /api/v1/user-location-stats — upsert a (country, state, date) row
pub async fn ingest(
    State(state): State<AppState>,
    Json(payload): Json<UserLocationStat>,
) -> ApiResult<UserLocationStat> {
    if payload.users < 0 {
        return Err(AppError::validation("users must be non-negative"));
    }
    if payload.country.trim().is_empty() {
        return Err(AppError::validation("country must not be empty"));
    }
    let saved = db::locations::upsert(&state.pool, &payload).await?;
    Ok(Json(ApiResponse::success(saved)))
}
