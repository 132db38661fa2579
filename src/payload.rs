use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::checksum;
use crate::stats::GameStats;

/// Request body for `POST /submit-result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub wallet_address: String,
    pub game_stats: GameStats,
    pub anti_cheat_hash: String,
    /// Wall-clock submission time, milliseconds since the epoch.
    pub timestamp: i64,
}

/// Response body for `POST /submit-result`.
///
/// A 2xx carries `success`/`message`/`data`; a 400 carries `error`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<ReceiptData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptData {
    #[serde(default)]
    pub receipt_id: Option<String>,
}

/// Assemble the request body for one game result.
pub fn build(address: &str, stats: &GameStats) -> SubmissionPayload {
    SubmissionPayload {
        wallet_address: address.to_string(),
        game_stats: stats.clone(),
        anti_cheat_hash: checksum::anti_cheat_hash(address, stats),
        timestamp: Utc::now().timestamp_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_stats() -> GameStats {
        GameStats {
            wpm: 55,
            accuracy: 97,
            time: 60,
            correct_chars: 300,
            incorrect_chars: 9,
            progress_data: Vec::new(),
        }
    }

    #[test]
    fn payload_carries_matching_hash() {
        let address = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";
        let stats = test_stats();
        let payload = build(address, &stats);
        assert_eq!(payload.wallet_address, address);
        assert_eq!(payload.game_stats, stats);
        assert_eq!(
            payload.anti_cheat_hash,
            checksum::anti_cheat_hash(address, &stats)
        );
        assert!(payload.timestamp > 0);
    }

    #[test]
    fn payload_serializes_with_wire_field_names() {
        let payload = build("0xabc", &test_stats());
        let json = serde_json::to_value(&payload).expect("serialize payload");
        let obj = json.as_object().expect("object");
        assert!(obj.contains_key("walletAddress"));
        assert!(obj.contains_key("gameStats"));
        assert!(obj.contains_key("antiCheatHash"));
        assert!(obj.contains_key("timestamp"));
        assert!(obj["gameStats"].as_object().expect("stats").contains_key("correctChars"));
    }

    #[test]
    fn response_parses_success_body() {
        let resp: SubmitResponse = serde_json::from_str(
            r#"{"success":true,"message":"Result submitted","data":{"receiptId":"r-123"}}"#,
        )
        .expect("parse response");
        assert!(resp.success);
        assert_eq!(resp.message.as_deref(), Some("Result submitted"));
        assert_eq!(
            resp.data.and_then(|d| d.receipt_id).as_deref(),
            Some("r-123")
        );
    }

    #[test]
    fn response_parses_error_body() {
        let resp: SubmitResponse =
            serde_json::from_str(r#"{"error":"bad payload"}"#).expect("parse response");
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("bad payload"));
        assert!(resp.data.is_none());
    }
}
