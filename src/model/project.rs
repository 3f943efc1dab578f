use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::card::BusinessCard;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Forming,
    Active,
    Paused,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Forming,
        ProjectStatus::Active,
        ProjectStatus::Paused,
        ProjectStatus::Completed,
        ProjectStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Forming => "forming",
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectMemberRole {
    Owner,
    Admin,
    Member,
    Pending,
    Invited,
}

impl ProjectMemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectMemberRole::Owner => "owner",
            ProjectMemberRole::Admin => "admin",
            ProjectMemberRole::Member => "member",
            ProjectMemberRole::Pending => "pending",
            ProjectMemberRole::Invited => "invited",
        }
    }

    /// Pending requests and open invitations don't count as membership yet
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ProjectMemberRole::Owner | ProjectMemberRole::Admin | ProjectMemberRole::Member
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub owner_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub user_id: String,
    pub role: ProjectMemberRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<BusinessCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
}

impl ProjectMember {
    /// Name from the attached card, falling back to the user id
    pub fn display_name(&self) -> &str {
        self.card
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(&self.user_id)
    }
}

/// A project together with its member list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(default)]
    pub members: Vec<ProjectMember>,
}

impl ProjectDetail {
    pub fn active_members(&self) -> impl Iterator<Item = &ProjectMember> {
        self.members.iter().filter(|m| m.role.is_active())
    }

    #[cfg(test)]
    pub fn owner(&self) -> Option<&ProjectMember> {
        self.members
            .iter()
            .find(|m| m.role == ProjectMemberRole::Owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_role_spelling() {
        for status in ProjectStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        let role: ProjectMemberRole = serde_json::from_str("\"invited\"").unwrap();
        assert_eq!(role, ProjectMemberRole::Invited);
        assert!(serde_json::from_str::<ProjectStatus>("\"deleted\"").is_err());
    }

    #[test]
    fn test_detail_flattens_project() {
        let json = r#"{
            "id": "p1",
            "name": "Rust meetup",
            "status": "forming",
            "ownerId": "u1",
            "members": [
                {"userId": "u1", "role": "owner"},
                {"userId": "u2", "role": "pending"},
                {"userId": "u3", "role": "member",
                 "card": {"id": "c3", "userId": "u3", "name": "Linus"}},
                {"userId": "u4", "role": "invited"}
            ]
        }"#;
        let detail: ProjectDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.project.status, ProjectStatus::Forming);
        assert_eq!(detail.project.owner_id, "u1");

        let active: Vec<&str> = detail.active_members().map(|m| m.display_name()).collect();
        assert_eq!(active, vec!["u1", "Linus"]);
        assert_eq!(detail.owner().map(|m| m.user_id.as_str()), Some("u1"));
    }
}
