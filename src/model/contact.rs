use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved contact: `owner_id` keeps `target_user_id` in their address book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub owner_id: String,
    pub target_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request body for `POST /contacts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveContactRequest {
    pub owner_id: String,
    pub target_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_omits_missing_card() {
        let req = SaveContactRequest {
            owner_id: "me".to_string(),
            target_user_id: "you".to_string(),
            card_id: None,
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"ownerId":"me","targetUserId":"you"}"#
        );
    }
}
