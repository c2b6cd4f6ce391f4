//! WebSocket command and reply types for the analytics API
//!
//! Each inbound JSON message carries an `action` tag and is decoded once
//! into a tagged command enum, matched exhaustively by the handler.
//! Missing required parameters fail decoding and produce an error reply
//! on the same connection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Commands accepted on `/ws/kpis`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum KpiCommand {
    Daily {
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    },
    Weekly {
        year: i32,
    },
    Monthly {
        year: i32,
    },
    Yearly,
    MonthlyRevenue {
        year: i32,
    },
}

/// Commands accepted on `/ws/visitor-events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VisitorCommand {
    Daily { date: NaiveDate },
    Weekly { start_date: NaiveDate, end_date: NaiveDate },
    Monthly { year: i32, month: u32 },
    Yearly { year: i32 },
    GrowthDaily { date: NaiveDate },
    GrowthWeekly { start_date: NaiveDate },
    GrowthMonthly { year: i32, month: u32 },
    GrowthYearly { year: i32 },
}

/// Commands accepted on `/ws/user-location-stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LocationCommand {
    Daily { date: NaiveDate },
    Weekly { date: NaiveDate },
    Monthly { year: i32, month: u32 },
    Yearly { year: i32 },
    CountryDistribution { date: NaiveDate },
}

/// Reply envelope sent back on the socket: `{success, action, data}` on
/// success, `{success: false, message}` on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsReply<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> WsReply<T> {
    /// Success reply for a handled action
    pub fn ok(action: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            action: Some(action.into()),
            data: Some(data),
            message: None,
        }
    }

    /// Serialize to the JSON text sent on the socket
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize ws reply");
            r#"{"success":false,"message":"Internal server error"}"#.to_string()
        })
    }
}

impl WsReply<()> {
    /// Error reply; the connection stays open
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            action: None,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tagged_visitor_command() {
        let cmd: VisitorCommand =
            serde_json::from_str(r#"{"action":"growth_daily","date":"2024-01-01"}"#).unwrap();
        assert_eq!(
            cmd,
            VisitorCommand::GrowthDaily {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            }
        );
    }

    #[test]
    fn missing_required_parameter_fails_decoding() {
        // weekly requires a year
        let res: Result<KpiCommand, _> = serde_json::from_str(r#"{"action":"weekly"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_action_fails_decoding() {
        let res: Result<LocationCommand, _> = serde_json::from_str(r#"{"action":"hourly"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn reply_envelope_shape() {
        let ok = WsReply::ok("daily", serde_json::json!([1]));
        let json: serde_json::Value = serde_json::from_str(&ok.to_text()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["action"], "daily");
        assert_eq!(json["data"], serde_json::json!([1]));

        let err = WsReply::error("Missing 'year' parameter");
        let json: serde_json::Value = serde_json::from_str(&err.to_text()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Missing 'year' parameter");
        assert!(json.get("data").is_none());
    }
}
