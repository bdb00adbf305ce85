//! hl-core: HighLevel API core library
//!
//! Configuration, error types, cancellation, the contact wire models and the
//! HTTP transport used by the higher level HighLevel crates.

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;

pub use cancel::CancellationToken;
pub use client::{ContactsTransport, HighLevelClient};
pub use config::HighLevelConfig;
pub use error::{Error, Result};
pub use models::{
    Contact, ContactResponse, DeleteContactResponse, SearchContactsRequest,
    SearchContactsResponse, UpdateContactRequest, UpdateContactResponse, UpsertContactRequest,
    UpsertContactResponse,
};
pub use provider::{ClientProvider, HighLevelClientProvider};
