//! Search response unpacking
//!
//! The search endpoint returns `contacts` as an untyped value. Resolving a
//! single contact from it has several distinct "no match" shapes; they are
//! kept apart here and only collapsed by [`EmailLookup::into_contact`].

use hl_core::{Contact, SearchContactsResponse};
use serde_json::Value;

/// Outcome of resolving a contact by email
#[derive(Debug, Clone, PartialEq)]
pub enum EmailLookup {
    /// The search call produced no payload
    NoResponse,
    /// The payload has no `contacts` entry
    MissingCollection,
    /// `contacts` is not a list, or its first entry is not a contact
    Malformed,
    /// `contacts` is an empty list
    Empty,
    /// First contact of the result list
    Found(Contact),
}

impl EmailLookup {
    /// Classify an optional search payload
    pub fn from_response(response: Option<&SearchContactsResponse>) -> Self {
        match response {
            Some(response) => first_contact(response),
            None => EmailLookup::NoResponse,
        }
    }

    /// The contact, if one was found. Every other outcome is `None`.
    pub fn into_contact(self) -> Option<Contact> {
        match self {
            EmailLookup::Found(contact) => Some(contact),
            _ => None,
        }
    }

    /// Whether a contact was found
    pub fn is_found(&self) -> bool {
        matches!(self, EmailLookup::Found(_))
    }
}

/// Resolve the first entry of the contacts collection.
///
/// Only the first element is inspected, matching the `limit = 1` filter.
pub fn first_contact(response: &SearchContactsResponse) -> EmailLookup {
    let Some(contacts) = response.contacts.as_ref() else {
        return EmailLookup::MissingCollection;
    };

    let first = match contacts {
        Value::Null => return EmailLookup::MissingCollection,
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return EmailLookup::Empty,
        },
        _ => return EmailLookup::Malformed,
    };

    match serde_json::from_value::<Contact>(first.clone()) {
        Ok(contact) => EmailLookup::Found(contact),
        Err(_) => EmailLookup::Malformed,
    }
}
