use serde::Serialize;

/// One line of machine-readable output per completed submission attempt.
/// Logs go to stderr; these go to stdout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEvent {
    pub timestamp: String,
    /// Masked account address.
    pub address: String,
    pub game: u32,
    pub total_games: u32,
    pub wpm: u32,
    pub accuracy: u32,
    pub time: u32,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_id: Option<String>,
}

/// Emit a submission event as a single JSON line to stdout.
pub fn report_submission(event: &SubmissionEvent) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_compactly() {
        let event = SubmissionEvent {
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            address: "0x7E5F******395Bdf".to_string(),
            game: 1,
            total_games: 3,
            wpm: 55,
            accuracy: 97,
            time: 60,
            outcome: "accepted",
            message: Some("Result submitted".to_string()),
            receipt_id: Some("r-42".to_string()),
        };
        let json = serde_json::to_value(&event).expect("serialize event");
        let obj = json.as_object().expect("object");
        assert_eq!(obj["totalGames"], 3);
        assert_eq!(obj["receiptId"], "r-42");
        assert_eq!(obj["outcome"], "accepted");
    }

    #[test]
    fn absent_fields_are_omitted() {
        let event = SubmissionEvent {
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            address: "0x7E5F******395Bdf".to_string(),
            game: 2,
            total_games: 3,
            wpm: 40,
            accuracy: 90,
            time: 30,
            outcome: "no-result",
            message: None,
            receipt_id: None,
        };
        let json = serde_json::to_value(&event).expect("serialize event");
        let obj = json.as_object().expect("object");
        assert!(!obj.contains_key("message"));
        assert!(!obj.contains_key("receiptId"));
    }
}
