//! hl-contacts: typed HighLevel contacts API
//!
//! Wraps the HighLevel contact endpoints behind [`ContactsApi`] and adds the
//! one capability the remote API lacks: resolving a contact by email.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hl_contacts::{CancellationToken, HighLevelConfig, HighLevelServices};
//!
//! let services = HighLevelServices::new(HighLevelConfig::load()?);
//! let contacts = services.contacts_singleton();
//!
//! let cancel = CancellationToken::new();
//! if let Some(contact) = contacts
//!     .get_by_email("pit-...", "Jane@Example.com", "loc-1", &cancel)
//!     .await?
//! {
//!     println!("found {}", contact.id);
//! }
//! ```

pub mod envelope;
pub mod registrar;
pub mod resolver;

pub use envelope::EmailLookup;
pub use registrar::HighLevelServices;
pub use resolver::{ContactsApi, ContactsUtil};

pub use hl_core::{
    CancellationToken, ClientProvider, Contact, ContactResponse, ContactsTransport,
    DeleteContactResponse, Error, HighLevelConfig, Result, SearchContactsRequest,
    SearchContactsResponse, UpdateContactRequest, UpdateContactResponse, UpsertContactRequest,
    UpsertContactResponse,
};

/// Re-export the commonly used types
pub mod prelude {
    pub use super::{
        CancellationToken, Contact, ContactsApi, ContactsUtil, EmailLookup, HighLevelConfig,
        HighLevelServices,
    };
}
