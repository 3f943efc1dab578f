//! Page state and the API calls behind each page.

pub mod contact_profile;
pub mod my_card;
pub mod projects;

pub use contact_profile::ContactProfile;
pub use my_card::MyCardPage;
pub use projects::ProjectsPage;

use crate::model::BusinessCard;

/// The card to show for a user: the primary one, else the first
pub(crate) fn pick_primary(cards: Vec<BusinessCard>) -> Option<BusinessCard> {
    let mut fallback = None;
    for card in cards {
        if card.is_primary {
            return Some(card);
        }
        fallback.get_or_insert(card);
    }
    fallback
}
