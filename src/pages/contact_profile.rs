//! Another user's business card, with save/delete contact actions.
//!
//! API failures are logged and recorded in `last_error`; the page state
//! only changes once a call has succeeded.

use crate::api::{ApiResult, CardApi, ContactApi};
use crate::model::{BusinessCard, Contact};

#[derive(Debug, Clone)]
pub struct ContactProfile {
    pub owner_id: String,
    pub target_user_id: String,
    pub card: Option<BusinessCard>,
    pub contact: Option<Contact>,
    pub loaded: bool,
    pub last_error: Option<String>,
}

impl ContactProfile {
    pub fn new(owner_id: impl Into<String>, target_user_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            target_user_id: target_user_id.into(),
            card: None,
            contact: None,
            loaded: false,
            last_error: None,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.contact.is_some()
    }

    pub fn is_own_profile(&self) -> bool {
        self.owner_id == self.target_user_id
    }

    /// Fetch the existing contact and the card to show. A saved contact
    /// pins the card that was saved; otherwise the primary card is shown.
    pub async fn load<A: ContactApi + CardApi>(&mut self, api: &A) {
        let contact = if self.is_own_profile() {
            None
        } else {
            match api.find_contact(&self.owner_id, &self.target_user_id).await {
                Ok(contact) => contact,
                Err(e) => {
                    tracing::error!("Failed to look up contact {}: {}", self.target_user_id, e);
                    self.last_error = Some(format!("Could not load contact: {}", e));
                    return;
                }
            }
        };

        let pinned = contact.as_ref().and_then(|c| c.card_id.clone());
        let card = match pinned {
            Some(card_id) => match api.get_card(&card_id).await {
                Ok(card) => Ok(Some(card)),
                Err(e) => {
                    // Saved card may have been deleted since
                    tracing::warn!("Saved card {} unavailable: {}", card_id, e);
                    self.primary_card(api).await
                }
            },
            None => self.primary_card(api).await,
        };

        match card {
            Ok(card) => {
                self.card = card;
                self.contact = contact;
                self.loaded = true;
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("Failed to load cards for {}: {}", self.target_user_id, e);
                self.last_error = Some(format!("Could not load card: {}", e));
            }
        }
    }

    async fn primary_card<A: CardApi>(&self, api: &A) -> ApiResult<Option<BusinessCard>> {
        api.list_cards(&self.target_user_id)
            .await
            .map(super::pick_primary)
    }

    /// Save the shown user as a contact. Returns true if the state changed.
    pub async fn save_contact<A: ContactApi>(&mut self, api: &A) -> bool {
        if self.is_saved() {
            return false;
        }
        if self.is_own_profile() {
            self.last_error = Some("This is your own card".to_string());
            return false;
        }

        let card_id = self.card.as_ref().map(|c| c.id.as_str());
        match api
            .save_contact(&self.owner_id, &self.target_user_id, card_id)
            .await
        {
            Ok(contact) => {
                tracing::info!("Saved contact {} ({})", self.target_user_id, contact.id);
                self.contact = Some(contact);
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::error!("Failed to save contact {}: {}", self.target_user_id, e);
                self.last_error = Some(format!("Could not save contact: {}", e));
                false
            }
        }
    }

    /// Remove the saved contact. Returns true if the state changed.
    pub async fn delete_contact<A: ContactApi>(&mut self, api: &A) -> bool {
        let contact_id = match &self.contact {
            Some(contact) => contact.id.clone(),
            None => return false,
        };

        match api.delete_contact(&contact_id).await {
            Ok(()) => {
                tracing::info!("Deleted contact {}", contact_id);
                self.contact = None;
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::error!("Failed to delete contact {}: {}", contact_id, e);
                self.last_error = Some(format!("Could not delete contact: {}", e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::model::card::sample_card;

    fn api_with_card() -> FakeApi {
        let api = FakeApi::default();
        api.cards.borrow_mut().push(sample_card());
        api
    }

    #[tokio::test]
    async fn test_load_shows_primary_card() {
        let api = api_with_card();
        let mut secondary = sample_card();
        secondary.id = "card-0".to_string();
        secondary.is_primary = false;
        api.cards.borrow_mut().insert(0, secondary);

        let mut page = ContactProfile::new("me", "user-2");
        page.load(&api).await;

        assert!(page.loaded);
        assert_eq!(page.card.as_ref().map(|c| c.id.as_str()), Some("card-1"));
        assert!(!page.is_saved());
    }

    #[tokio::test]
    async fn test_save_then_delete() {
        let api = api_with_card();
        let mut page = ContactProfile::new("me", "user-2");
        page.load(&api).await;

        assert!(page.save_contact(&api).await);
        let contact = page.contact.clone().unwrap();
        assert_eq!(contact.card_id.as_deref(), Some("card-1"));
        assert!(!page.save_contact(&api).await, "second save is a no-op");

        assert!(page.delete_contact(&api).await);
        assert!(!page.is_saved());
        assert!(api.contacts.borrow().is_empty());
        assert!(!page.delete_contact(&api).await);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_alone() {
        let api = api_with_card();
        let mut page = ContactProfile::new("me", "user-2");
        page.load(&api).await;

        api.fail.set(true);
        assert!(!page.save_contact(&api).await);
        assert!(!page.is_saved());
        assert!(page.last_error.as_deref().unwrap().contains("backend down"));
        assert!(page.card.is_some());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_contact() {
        let api = api_with_card();
        let mut page = ContactProfile::new("me", "user-2");
        page.load(&api).await;
        page.save_contact(&api).await;

        api.fail.set(true);
        assert!(!page.delete_contact(&api).await);
        assert!(page.is_saved());
        assert_eq!(api.contacts.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_existing_contact_pins_saved_card() {
        let api = api_with_card();
        let mut other = sample_card();
        other.id = "card-old".to_string();
        other.is_primary = false;
        api.cards.borrow_mut().push(other);
        api.contacts.borrow_mut().push(Contact {
            id: "contact-7".to_string(),
            owner_id: "me".to_string(),
            target_user_id: "user-2".to_string(),
            card_id: Some("card-old".to_string()),
            created_at: None,
        });

        let mut page = ContactProfile::new("me", "user-2");
        page.load(&api).await;

        assert!(page.is_saved());
        assert_eq!(page.card.as_ref().map(|c| c.id.as_str()), Some("card-old"));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_page_unloaded() {
        let api = FakeApi::failing();
        let mut page = ContactProfile::new("me", "user-2");
        page.load(&api).await;

        assert!(!page.loaded);
        assert!(page.card.is_none());
        assert!(page.last_error.is_some());
    }

    #[tokio::test]
    async fn test_own_profile_cannot_be_saved() {
        let api = FakeApi::default();
        let mut page = ContactProfile::new("me", "me");
        assert!(!page.save_contact(&api).await);
        assert!(api.calls().is_empty());
    }
}
