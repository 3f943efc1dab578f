//! Editing the signed-in user's own primary card.

use crate::api::CardApi;
use crate::model::{BusinessCard, CreateBusinessCard, UpdateBusinessCard};
use crate::ui::components::{InputKind, TextInput};

pub const NAME: usize = 0;
pub const TITLE: usize = 1;
pub const COMPANY: usize = 2;
pub const EMAIL: usize = 3;
pub const PHONE: usize = 4;
pub const WEBSITE: usize = 5;

#[derive(Debug, Clone)]
pub struct MyCardPage {
    /// Card as last returned by the server
    pub card: Option<BusinessCard>,
    pub fields: Vec<TextInput>,
    pub focused: usize,
    pub editing: bool,
    pub loaded: bool,
    pub last_error: Option<String>,
}

impl Default for MyCardPage {
    fn default() -> Self {
        Self {
            card: None,
            fields: vec![
                TextInput::new("Name").placeholder("Full name").max_len(80).required(),
                TextInput::new("Title").placeholder("e.g. Product Designer").max_len(80),
                TextInput::new("Company").max_len(80),
                TextInput::new("Email")
                    .placeholder("name@company.com")
                    .kind(InputKind::Email),
                TextInput::new("Phone").kind(InputKind::Phone).max_len(32),
                TextInput::new("Website")
                    .placeholder("https://")
                    .kind(InputKind::Url),
            ],
            focused: NAME,
            editing: false,
            loaded: false,
            last_error: None,
        }
    }
}

impl MyCardPage {
    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.checked_sub(1).unwrap_or(self.fields.len() - 1);
    }

    pub fn focused_field(&mut self) -> &mut TextInput {
        &mut self.fields[self.focused]
    }

    fn value(&self, index: usize) -> Option<String> {
        self.fields[index].trimmed().map(str::to_string)
    }

    /// Copy a card into the form. Server values are kept whole; `max_len`
    /// only limits what is typed.
    pub fn fill(&mut self, card: &BusinessCard) {
        for (field, value) in self.fields.iter_mut().zip(card_values(card)) {
            field.value = value.unwrap_or_default().to_string();
        }
    }

    pub async fn load<A: CardApi>(&mut self, api: &A, user_id: &str) {
        match api.list_cards(user_id).await {
            Ok(cards) => {
                self.card = super::pick_primary(cards);
                if let Some(card) = self.card.clone() {
                    self.fill(&card);
                }
                self.loaded = true;
                self.last_error = None;
            }
            Err(e) => {
                tracing::error!("Failed to load own cards: {}", e);
                self.last_error = Some(format!("Could not load your card: {}", e));
            }
        }
    }

    /// First failing field, if any. Values the server already holds are
    /// not checked again.
    pub fn validate(&self) -> Result<(), String> {
        let stored = self.card.as_ref().map(card_values);
        for (i, field) in self.fields.iter().enumerate() {
            if stored.is_some_and(|values| is_unchanged(field, values[i])) {
                continue;
            }
            field.validate().map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    /// Fields that differ from the stored card
    pub fn changes(&self, card: &BusinessCard) -> UpdateBusinessCard {
        let stored = card_values(card);
        let changed = |index: usize| {
            if is_unchanged(&self.fields[index], stored[index]) {
                None
            } else {
                // Clearing a field is sent as an empty string
                Some(self.value(index).unwrap_or_default())
            }
        };

        UpdateBusinessCard {
            name: changed(NAME),
            title: changed(TITLE),
            company: changed(COMPANY),
            email: changed(EMAIL),
            phone: changed(PHONE),
            website: changed(WEBSITE),
            ..Default::default()
        }
    }

    /// Create the card, or update the existing one with changed fields.
    /// Returns true when the server accepted a change.
    pub async fn save<A: CardApi>(&mut self, api: &A) -> bool {
        // Without a successful load we can't tell create from update
        if !self.loaded {
            self.last_error = Some("Card not loaded yet, press r to reload".to_string());
            return false;
        }
        if let Err(message) = self.validate() {
            self.last_error = Some(message);
            return false;
        }

        let result = match &self.card {
            Some(card) => {
                let changes = self.changes(card);
                if changes == UpdateBusinessCard::default() {
                    self.last_error = Some("Nothing to save".to_string());
                    return false;
                }
                api.update_card(&card.id, &changes).await
            }
            None => {
                let body = CreateBusinessCard {
                    name: self.value(NAME).unwrap_or_default(),
                    title: self.value(TITLE),
                    company: self.value(COMPANY),
                    email: self.value(EMAIL),
                    phone: self.value(PHONE),
                    website: self.value(WEBSITE),
                    is_primary: true,
                    ..Default::default()
                };
                api.create_card(&body).await
            }
        };

        match result {
            Ok(card) => {
                tracing::info!("Saved business card {}", card.id);
                self.fill(&card);
                self.card = Some(card);
                self.editing = false;
                self.last_error = None;
                true
            }
            Err(e) => {
                tracing::error!("Failed to save business card: {}", e);
                self.last_error = Some(format!("Could not save card: {}", e));
                false
            }
        }
    }
}

/// Card values in form field order
fn card_values(card: &BusinessCard) -> [Option<&str>; 6] {
    [
        Some(card.name.as_str()),
        card.title.as_deref(),
        card.company.as_deref(),
        card.email.as_deref(),
        card.phone.as_deref(),
        card.website.as_deref(),
    ]
}

fn is_unchanged(field: &TextInput, stored: Option<&str>) -> bool {
    field.trimmed() == stored.map(str::trim).filter(|s| !s.is_empty())
}
