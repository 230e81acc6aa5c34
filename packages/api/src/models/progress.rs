use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/public/quest-progress`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestProgressUpdate {
    pub guest_id: String,
    pub quest_id: String,
    pub unit_progress: Value,
}

/// Progress recorded against a guest id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestProgress {
    pub guest_id: String,
    #[serde(default, deserialize_with = "super::de::null_as_default")]
    pub quest_id: String,
    #[serde(default)]
    pub unit_progress: Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_active: Option<String>,
}

/// Body of `POST /api/public/transfer-progress`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    pub guest_id: String,
}

/// Generic acknowledgement. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_body_shape() {
        let update = GuestProgressUpdate {
            guest_id: "g-1".to_string(),
            quest_id: "intro".to_string(),
            unit_progress: json!({ "step": 2 }),
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "guest_id": "g-1", "quest_id": "intro", "unit_progress": { "step": 2 } })
        );
    }

    #[test]
    fn test_progress_tolerates_sparse_body() {
        let progress: GuestProgress =
            serde_json::from_value(json!({ "guest_id": "g-1", "quest_id": null })).unwrap();
        assert_eq!(progress.quest_id, "");
        assert_eq!(progress.unit_progress, Value::Null);
        assert_eq!(progress.last_active, None);
    }

    #[test]
    fn test_ack_ignores_unknown_fields() {
        let ack: Ack = serde_json::from_value(json!({
            "status": "success",
            "message": "Progress saved",
            "transferred": 3
        }))
        .unwrap();
        assert_eq!(ack.status.as_deref(), Some("success"));

        let empty: Ack = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, Ack::default());
    }
}
