//! In-memory backend for page tests.

use reqwest::StatusCode;
use std::cell::{Cell, RefCell};

use super::{ApiError, ApiResult, CardApi, ContactApi, ProjectApi};
use crate::model::{
    BusinessCard, Contact, CreateBusinessCard, Project, ProjectDetail, UpdateBusinessCard,
};

#[derive(Default)]
pub struct FakeApi {
    pub cards: RefCell<Vec<BusinessCard>>,
    pub contacts: RefCell<Vec<Contact>>,
    pub projects: Vec<ProjectDetail>,
    pub fail: Cell<bool>,
    pub calls: RefCell<Vec<String>>,
    pub next_id: Cell<u32>,
}

impl FakeApi {
    pub fn failing() -> Self {
        let api = Self::default();
        api.fail.set(true);
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.borrow_mut().push(call);
        if self.fail.get() {
            return Err(ApiError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: "backend down".to_string(),
            });
        }
        Ok(())
    }

    fn fresh_id(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{}-{}", prefix, id)
    }

    fn not_found() -> ApiError {
        ApiError::Status {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        }
    }
}

impl ContactApi for FakeApi {
    async fn save_contact(
        &self,
        owner_id: &str,
        target_user_id: &str,
        card_id: Option<&str>,
    ) -> ApiResult<Contact> {
        self.record(format!("save_contact {} {}", owner_id, target_user_id))?;
        let contact = Contact {
            id: self.fresh_id("contact"),
            owner_id: owner_id.to_string(),
            target_user_id: target_user_id.to_string(),
            card_id: card_id.map(str::to_string),
            created_at: None,
        };
        self.contacts.borrow_mut().push(contact.clone());
        Ok(contact)
    }

    async fn delete_contact(&self, contact_id: &str) -> ApiResult<()> {
        self.record(format!("delete_contact {}", contact_id))?;
        self.contacts.borrow_mut().retain(|c| c.id != contact_id);
        Ok(())
    }

    async fn find_contact(
        &self,
        owner_id: &str,
        target_user_id: &str,
    ) -> ApiResult<Option<Contact>> {
        self.record(format!("find_contact {} {}", owner_id, target_user_id))?;
        Ok(self
            .contacts
            .borrow()
            .iter()
            .find(|c| c.owner_id == owner_id && c.target_user_id == target_user_id)
            .cloned())
    }
}

impl CardApi for FakeApi {
    async fn list_cards(&self, user_id: &str) -> ApiResult<Vec<BusinessCard>> {
        self.record(format!("list_cards {}", user_id))?;
        Ok(self
            .cards
            .borrow()
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_card(&self, card_id: &str) -> ApiResult<BusinessCard> {
        self.record(format!("get_card {}", card_id))?;
        self.cards
            .borrow()
            .iter()
            .find(|c| c.id == card_id)
            .cloned()
            .ok_or_else(Self::not_found)
    }

    async fn create_card(&self, card: &CreateBusinessCard) -> ApiResult<BusinessCard> {
        self.record(format!("create_card {}", card.name))?;
        let created = BusinessCard {
            id: self.fresh_id("card"),
            user_id: "me".to_string(),
            name: card.name.clone(),
            title: card.title.clone(),
            company: card.company.clone(),
            email: card.email.clone(),
            phone: card.phone.clone(),
            website: card.website.clone(),
            bio: card.bio.clone(),
            avatar_url: None,
            tags: card.tags.clone(),
            is_primary: card.is_primary,
            created_at: None,
            updated_at: None,
        };
        self.cards.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn update_card(
        &self,
        card_id: &str,
        changes: &UpdateBusinessCard,
    ) -> ApiResult<BusinessCard> {
        self.record(format!("update_card {}", card_id))?;
        let mut cards = self.cards.borrow_mut();
        let card = cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or_else(Self::not_found)?;
        if let Some(name) = &changes.name {
            card.name = name.clone();
        }
        for (field, change) in [
            (&mut card.title, &changes.title),
            (&mut card.company, &changes.company),
            (&mut card.email, &changes.email),
            (&mut card.phone, &changes.phone),
            (&mut card.website, &changes.website),
        ] {
            if change.is_some() {
                *field = change.clone();
            }
        }
        Ok(card.clone())
    }
}

impl ProjectApi for FakeApi {
    async fn list_projects(&self, user_id: &str) -> ApiResult<Vec<Project>> {
        self.record(format!("list_projects {}", user_id))?;
        Ok(self.projects.iter().map(|d| d.project.clone()).collect())
    }

    async fn get_project(&self, project_id: &str) -> ApiResult<ProjectDetail> {
        self.record(format!("get_project {}", project_id))?;
        self.projects
            .iter()
            .find(|d| d.project.id == project_id)
            .cloned()
            .ok_or_else(Self::not_found)
    }
}
