//! Contact API
//!
//! Public contact-form intake plus the gated admin listing. Intake is the
//! only unauthenticated write in the system and never consults the
//! authorization engine.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::contact::entity::Contact;
use crate::contact::repository::ContactRepository;
use crate::role::entity::permissions;
use crate::shared::authorization_service::AuthorizationService;
use crate::shared::error::PortalError;
use crate::shared::middleware::Authenticated;

/// Contact form submission
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    pub message: String,
}

impl ContactRequest {
    fn validate(&self) -> Result<(), PortalError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name is required");
        }
        if !is_plausible_email(&self.email) {
            errors.push("email must be a valid address");
        }
        if self.message.trim().is_empty() {
            errors.push("message is required");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PortalError::validation(errors.join("; ")))
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// Contact submission response
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    pub contact: Contact,
}

/// Contact list response
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactListResponse {
    pub contacts: Vec<Contact>,
}

/// Contact service state
#[derive(Clone)]
pub struct ContactsState {
    pub contact_repo: Arc<ContactRepository>,
    pub authz: Arc<AuthorizationService>,
}

/// Submit a contact inquiry
#[utoipa::path(
    post,
    path = "/contact",
    tag = "contact",
    operation_id = "postContact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Inquiry stored", body = ContactResponse),
        (status = 400, description = "Validation error")
    )
)]
pub async fn submit_contact(
    State(state): State<ContactsState>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, PortalError> {
    req.validate()?;

    let contact = state
        .contact_repo
        .insert(
            req.name.trim(),
            req.email.trim(),
            req.company.as_deref().map(str::trim).filter(|c| !c.is_empty()),
            req.message.trim(),
        )
        .await?;

    tracing::info!(email = %contact.email, "Contact inquiry received");

    Ok(Json(ContactResponse {
        success: true,
        contact,
    }))
}

/// List submitted inquiries
#[utoipa::path(
    get,
    path = "/admin/contacts",
    tag = "contact",
    operation_id = "getAdminContacts",
    responses(
        (status = 200, description = "Submitted inquiries, newest first", body = ContactListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing view_forms")
    )
)]
pub async fn list_contacts(
    State(state): State<ContactsState>,
    auth: Authenticated,
) -> Result<Json<ContactListResponse>, PortalError> {
    state.authz.require_permission(&auth.user_id, permissions::VIEW_FORMS).await?;

    let contacts = state.contact_repo.find_all().await?;
    Ok(Json(ContactListResponse { contacts }))
}

/// Create the contact router (mounted under /api)
pub fn contacts_router(state: ContactsState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(submit_contact))
        .routes(routes!(list_contacts))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: name.to_string(),
            email: email.to_string(),
            company: None,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_submission() {
        assert!(request("Ada", "ada@example.com", "Hello").validate().is_ok());
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert!(request("", "ada@example.com", "Hello").validate().is_err());
        assert!(request("Ada", "ada@example.com", "  ").validate().is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_plausible_email("a@b.co"));
        assert!(!is_plausible_email("not-an-email"));
        assert!(!is_plausible_email("@b.co"));
        assert!(!is_plausible_email("a@bco"));
        assert!(!is_plausible_email("a@.co"));
    }
}
