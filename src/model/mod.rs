//! Wire shapes shared with the Picaton backend.
//!
//! These are plain records. The backend owns and mutates them; the client
//! only serializes and deserializes.

pub mod card;
pub mod contact;
pub mod project;

pub use card::{BusinessCard, CreateBusinessCard, UpdateBusinessCard};
pub use contact::{Contact, SaveContactRequest};
pub use project::{Project, ProjectDetail, ProjectMemberRole, ProjectStatus};
