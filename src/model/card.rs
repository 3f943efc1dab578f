use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's digital business card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCard {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BusinessCard {
    /// "Title at Company", or whichever half is present
    pub fn display_subtitle(&self) -> Option<String> {
        match (non_empty(&self.title), non_empty(&self.company)) {
            (Some(title), Some(company)) => Some(format!("{} at {}", title, company)),
            (Some(title), None) => Some(title.to_string()),
            (None, Some(company)) => Some(company.to_string()),
            (None, None) => None,
        }
    }

    /// Percentage of the optional profile fields that are filled in
    pub fn completeness(&self) -> f64 {
        let fields = [
            &self.title,
            &self.company,
            &self.email,
            &self.phone,
            &self.website,
            &self.bio,
            &self.avatar_url,
        ];
        let filled = fields.iter().filter(|f| non_empty(f).is_some()).count();
        filled as f64 * 100.0 / fields.len() as f64
    }

    /// Tags with surrounding whitespace removed, blanks dropped
    pub fn visible_tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Request body for `POST /business-cards`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessCard {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Request body for `PATCH /business-cards/{id}`; only present fields change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
}

#[cfg(test)]
pub(crate) fn sample_card() -> BusinessCard {
    BusinessCard {
        id: "card-1".to_string(),
        user_id: "user-2".to_string(),
        name: "Ada Lovelace".to_string(),
        title: Some("Engineer".to_string()),
        company: Some("Analytical Co".to_string()),
        email: Some("ada@example.com".to_string()),
        phone: None,
        website: None,
        bio: None,
        avatar_url: None,
        tags: vec!["math".to_string(), "  ".to_string(), " rust ".to_string()],
        is_primary: true,
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_wire_format() {
        let json = r#"{
            "id": "c1",
            "userId": "u1",
            "name": "Grace",
            "avatarUrl": "https://cdn/avatar.png",
            "isPrimary": true,
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let card: BusinessCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.user_id, "u1");
        assert_eq!(card.avatar_url.as_deref(), Some("https://cdn/avatar.png"));
        assert!(card.is_primary);
        assert!(card.tags.is_empty());
        assert!(card.created_at.is_some());

        let out = serde_json::to_value(&card).unwrap();
        assert!(out.get("title").is_none());
        assert_eq!(out["userId"], "u1");
    }

    #[test]
    fn test_display_subtitle() {
        let mut card = sample_card();
        assert_eq!(card.display_subtitle().as_deref(), Some("Engineer at Analytical Co"));
        card.company = Some("   ".to_string());
        assert_eq!(card.display_subtitle().as_deref(), Some("Engineer"));
        card.title = None;
        assert_eq!(card.display_subtitle(), None);
    }

    #[test]
    fn test_completeness_and_tags() {
        let card = sample_card();
        // title, company, email out of seven
        let expected = 3.0 * 100.0 / 7.0;
        assert!((card.completeness() - expected).abs() < 1e-9);
        assert_eq!(card.visible_tags().collect::<Vec<_>>(), vec!["math", "rust"]);
    }

    #[test]
    fn test_update_body_only_sends_changes() {
        let body = UpdateBusinessCard {
            title: Some("CTO".to_string()),
            is_primary: Some(false),
            ..Default::default()
        };
        let out = serde_json::to_string(&body).unwrap();
        assert_eq!(out, r#"{"title":"CTO","isPrimary":false}"#);
    }
}
