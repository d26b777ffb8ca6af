//! Contact Aggregate
//!
//! Contact-form intake and the admin inquiry listing.

pub mod api;
pub mod entity;
pub mod repository;

pub use api::{contacts_router, ContactsState};
pub use entity::Contact;
pub use repository::ContactRepository;
