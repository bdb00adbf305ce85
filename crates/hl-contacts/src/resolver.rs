//! Contact resolver
//!
//! Typed front for the six contact operations. Every call acquires a
//! transport from the [`ClientProvider`] and forwards the cancellation token;
//! transport errors propagate unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use hl_core::{
    CancellationToken, ClientProvider, Contact, ContactResponse, DeleteContactResponse, Error,
    HighLevelConfig, Result, SearchContactsRequest, SearchContactsResponse, UpdateContactRequest,
    UpdateContactResponse, UpsertContactRequest, UpsertContactResponse,
};

use crate::envelope::EmailLookup;

/// HighLevel contact operations
///
/// `Ok(None)` means the call succeeded without a usable payload. Failures and
/// cancellation are reported as `Err`.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// Create or update a contact, matched on email/phone within its location.
    ///
    /// The email is lower-cased in place before it is sent.
    async fn upsert(
        &self,
        api_key: &str,
        contact: &mut UpsertContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpsertContactResponse>>;

    /// Search contacts; filters are forwarded verbatim
    async fn search(
        &self,
        api_key: &str,
        filters: &SearchContactsRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<SearchContactsResponse>>;

    /// Fetch a contact by ID. Unknown IDs yield `None`.
    async fn get_by_id(
        &self,
        api_key: &str,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ContactResponse>>;

    /// Resolve a contact by email within a location, keeping the reason a
    /// lookup came back empty. A search body that does not decode is
    /// `Malformed`.
    async fn lookup_by_email(
        &self,
        api_key: &str,
        email: &str,
        location_id: &str,
        cancel: &CancellationToken,
    ) -> Result<EmailLookup>;

    /// Resolve a contact by email within a location.
    ///
    /// No payload, no collection, an empty collection and a malformed first
    /// entry all yield `None`.
    async fn get_by_email(
        &self,
        api_key: &str,
        email: &str,
        location_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Contact>> {
        Ok(self
            .lookup_by_email(api_key, email, location_id, cancel)
            .await?
            .into_contact())
    }

    /// Update a contact by ID. The email is lower-cased in place.
    async fn update(
        &self,
        api_key: &str,
        contact_id: &str,
        update: &mut UpdateContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpdateContactResponse>>;

    /// Delete a contact by ID
    async fn delete(
        &self,
        api_key: &str,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<DeleteContactResponse>>;
}

/// Default [`ContactsApi`] implementation
pub struct ContactsUtil {
    provider: Arc<dyn ClientProvider>,
    log: bool,
}

impl ContactsUtil {
    /// Create a resolver; the logging flag is read from `config` once
    pub fn new(provider: Arc<dyn ClientProvider>, config: &HighLevelConfig) -> Self {
        Self {
            provider,
            log: config.log_enabled,
        }
    }

    /// Whether per call diagnostics are emitted
    pub fn log_enabled(&self) -> bool {
        self.log
    }
}

#[async_trait]
impl ContactsApi for ContactsUtil {
    async fn upsert(
        &self,
        api_key: &str,
        contact: &mut UpsertContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpsertContactResponse>> {
        contact.normalize_email();

        if self.log {
            debug!(
                "Upserting contact ({}) to HighLevel location ({})...",
                contact.email.as_deref().unwrap_or_default(),
                contact.location_id
            );
        }

        let client = self.provider.acquire(api_key, cancel).await?;
        client.upsert_contact(contact, cancel).await
    }

    async fn search(
        &self,
        api_key: &str,
        filters: &SearchContactsRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<SearchContactsResponse>> {
        if self.log {
            debug!("Searching for contacts in HighLevel...");
        }

        let client = self.provider.acquire(api_key, cancel).await?;
        client.search_contacts(filters, cancel).await
    }

    async fn get_by_id(
        &self,
        api_key: &str,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ContactResponse>> {
        if self.log {
            debug!("Getting contact from HighLevel with ID ({})...", contact_id);
        }

        let client = self.provider.acquire(api_key, cancel).await?;
        client.get_contact(contact_id, cancel).await
    }

    async fn lookup_by_email(
        &self,
        api_key: &str,
        email: &str,
        location_id: &str,
        cancel: &CancellationToken,
    ) -> Result<EmailLookup> {
        let email = email.to_lowercase();

        if self.log {
            debug!(
                "Getting contact from HighLevel with email ({}) in location ({})...",
                email, location_id
            );
        }

        let filters = SearchContactsRequest::for_email(&email, location_id);
        let response = match self.search(api_key, &filters, cancel).await {
            Ok(response) => response,
            // Undecodable search bodies are a miss, not a failure
            Err(Error::Json(e)) => {
                if self.log {
                    debug!("Undecodable contacts payload while resolving ({}): {}", email, e);
                }
                return Ok(EmailLookup::Malformed);
            }
            Err(e) => return Err(e),
        };

        let lookup = EmailLookup::from_response(response.as_ref());
        if self.log && matches!(lookup, EmailLookup::Malformed) {
            debug!("Unexpected contacts payload while resolving ({})", email);
        }

        Ok(lookup)
    }

    async fn update(
        &self,
        api_key: &str,
        contact_id: &str,
        update: &mut UpdateContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpdateContactResponse>> {
        update.normalize_email();

        if self.log {
            debug!("Updating contact ({}) in HighLevel...", contact_id);
        }

        let client = self.provider.acquire(api_key, cancel).await?;
        client.update_contact(contact_id, update, cancel).await
    }

    async fn delete(
        &self,
        api_key: &str,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<DeleteContactResponse>> {
        if self.log {
            warn!("Deleting contact ({}) from HighLevel...", contact_id);
        }

        let client = self.provider.acquire(api_key, cancel).await?;
        client.delete_contact(contact_id, cancel).await
    }
}
