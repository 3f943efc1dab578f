//! REST client for the Picaton backend.

#[cfg(test)]
pub mod fake;

use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;
use crate::model::{
    BusinessCard, Contact, CreateBusinessCard, Project, ProjectDetail, SaveContactRequest,
    UpdateBusinessCard,
};

/// Longest response body kept in a [`ApiError::Status`] message
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid API URL {url:?}: {reason}")]
    BadUrl { url: String, reason: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Saved-contact endpoints
#[allow(async_fn_in_trait)]
pub trait ContactApi {
    async fn save_contact(
        &self,
        owner_id: &str,
        target_user_id: &str,
        card_id: Option<&str>,
    ) -> ApiResult<Contact>;

    async fn delete_contact(&self, contact_id: &str) -> ApiResult<()>;

    async fn find_contact(&self, owner_id: &str, target_user_id: &str)
        -> ApiResult<Option<Contact>>;
}

/// Business card endpoints
#[allow(async_fn_in_trait)]
pub trait CardApi {
    async fn list_cards(&self, user_id: &str) -> ApiResult<Vec<BusinessCard>>;
    async fn get_card(&self, card_id: &str) -> ApiResult<BusinessCard>;
    async fn create_card(&self, card: &CreateBusinessCard) -> ApiResult<BusinessCard>;
    async fn update_card(
        &self,
        card_id: &str,
        changes: &UpdateBusinessCard,
    ) -> ApiResult<BusinessCard>;
}

/// Read access to projects
#[allow(async_fn_in_trait)]
pub trait ProjectApi {
    async fn list_projects(&self, user_id: &str) -> ApiResult<Vec<Project>>;
    async fn get_project(&self, project_id: &str) -> ApiResult<ProjectDetail>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> ApiResult<Self> {
        let bad_url = |reason: String| ApiError::BadUrl {
            url: base_url.to_string(),
            reason,
        };
        let base = Url::parse(base_url).map_err(|e| bad_url(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(bad_url("not a hierarchical URL".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("picaton/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn from_config(config: &AppConfig) -> ApiResult<Self> {
        Self::new(
            &config.api_url,
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Endpoint URL below the base; each segment is percent-encoded
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, path: &[&str]) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and return the body of a successful response
    async fn send(&self, builder: RequestBuilder) -> ApiResult<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let mut body = body.trim().to_string();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(ApiError::Status { status, body });
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &[&str],
        query: &[(&str, &str)],
    ) -> ApiResult<T> {
        let body = self.send(self.request(Method::GET, path).query(query)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &[&str],
        payload: &B,
    ) -> ApiResult<T> {
        let body = self.send(self.request(method, path).json(payload)).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ContactApi for ApiClient {
    async fn save_contact(
        &self,
        owner_id: &str,
        target_user_id: &str,
        card_id: Option<&str>,
    ) -> ApiResult<Contact> {
        let request = SaveContactRequest {
            owner_id: owner_id.to_string(),
            target_user_id: target_user_id.to_string(),
            card_id: card_id.map(str::to_string),
        };
        self.send_json(Method::POST, &["contacts"], &request).await
    }

    async fn delete_contact(&self, contact_id: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, &["contacts", contact_id]))
            .await?;
        Ok(())
    }

    async fn find_contact(
        &self,
        owner_id: &str,
        target_user_id: &str,
    ) -> ApiResult<Option<Contact>> {
        let contacts: Vec<Contact> = self
            .get_json(
                &["contacts"],
                &[("ownerId", owner_id), ("targetUserId", target_user_id)],
            )
            .await?;
        Ok(contacts.into_iter().next())
    }
}

impl CardApi for ApiClient {
    async fn list_cards(&self, user_id: &str) -> ApiResult<Vec<BusinessCard>> {
        self.get_json(&["business-cards"], &[("userId", user_id)]).await
    }

    async fn get_card(&self, card_id: &str) -> ApiResult<BusinessCard> {
        self.get_json(&["business-cards", card_id], &[]).await
    }

    async fn create_card(&self, card: &CreateBusinessCard) -> ApiResult<BusinessCard> {
        self.send_json(Method::POST, &["business-cards"], card).await
    }

    async fn update_card(
        &self,
        card_id: &str,
        changes: &UpdateBusinessCard,
    ) -> ApiResult<BusinessCard> {
        self.send_json(Method::PATCH, &["business-cards", card_id], changes)
            .await
    }
}

impl ProjectApi for ApiClient {
    async fn list_projects(&self, user_id: &str) -> ApiResult<Vec<Project>> {
        self.get_json(&["projects"], &[("userId", user_id)]).await
    }

    async fn get_project(&self, project_id: &str) -> ApiResult<ProjectDetail> {
        self.get_json(&["projects", project_id], &[]).await
    }
}
