//! HighLevel REST client
//!
//! Talks to the v2 contacts endpoints with a bearer token. Responses are
//! decoded into the typed models; "not found" and empty bodies become `None`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::cancel::CancellationToken;
use crate::config::HighLevelConfig;
use crate::error::{Error, Result};
use crate::models::*;

/// Remote contact operations, one per HTTP endpoint
#[async_trait]
pub trait ContactsTransport: Send + Sync {
    /// `POST /contacts/upsert`
    async fn upsert_contact(
        &self,
        request: &UpsertContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpsertContactResponse>>;

    /// `POST /contacts/search`
    async fn search_contacts(
        &self,
        request: &SearchContactsRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<SearchContactsResponse>>;

    /// `GET /contacts/{id}`
    async fn get_contact(
        &self,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ContactResponse>>;

    /// `PUT /contacts/{id}`
    async fn update_contact(
        &self,
        contact_id: &str,
        request: &UpdateContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpdateContactResponse>>;

    /// `DELETE /contacts/{id}`
    async fn delete_contact(
        &self,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<DeleteContactResponse>>;
}

/// HighLevel API client bound to one API key
#[derive(Clone)]
pub struct HighLevelClient {
    client: Client,
    base_url: Url,
    api_key: String,
    api_version: String,
}

impl HighLevelClient {
    /// Create a new client for `api_key`
    pub fn new(config: &HighLevelConfig, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config("HighLevel API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(Error::Http)?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|e| {
            Error::Config(format!("Invalid base URL {}: {}", config.base_url, e))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            api_version: config.api_version.clone(),
        })
    }

    /// API base URL this client talks to
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL; segments are percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of a single contact; IDs that would resolve to another path are rejected
    fn contact_endpoint(&self, contact_id: &str) -> Result<Url> {
        if matches!(contact_id.trim(), "" | "." | "..") {
            return Err(Error::InvalidContactId(contact_id.to_string()));
        }
        Ok(self.endpoint(&["contacts", contact_id]))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("HighLevel request: {} {}", method, url);

        self.client
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header("Version", &self.api_version)
            .header("Accept", "application/json")
    }

    /// Send the request, racing it against the cancellation token
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Option<T>> {
        cancel.run(Self::send(request)).await
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<Option<T>> {
        let response = request.send().await.map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        decode_response(status, &body)
    }
}

/// Map an HTTP status and body onto the layer's result contract
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<Option<T>> {
    if status == StatusCode::NOT_FOUND {
        debug!("HighLevel returned 404, treating as no result");
        return Ok(None);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        warn!("HighLevel rejected credentials: {}", status);
        return Err(Error::Unauthorized(format!("{}: {}", status, body)));
    }

    if !status.is_success() {
        warn!("HighLevel API error: {}", status);
        return Err(Error::Api {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let body = body.trim();
    if status == StatusCode::NO_CONTENT || body.is_empty() || body == "null" {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str(body)?))
}

#[async_trait]
impl ContactsTransport for HighLevelClient {
    async fn upsert_contact(
        &self,
        request: &UpsertContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpsertContactResponse>> {
        let url = self.endpoint(&["contacts", "upsert"]);
        self.execute(self.request(Method::POST, url).json(request), cancel)
            .await
    }

    async fn search_contacts(
        &self,
        request: &SearchContactsRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<SearchContactsResponse>> {
        let url = self.endpoint(&["contacts", "search"]);
        self.execute(self.request(Method::POST, url).json(request), cancel)
            .await
    }

    async fn get_contact(
        &self,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ContactResponse>> {
        let url = self.contact_endpoint(contact_id)?;
        self.execute(self.request(Method::GET, url), cancel).await
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        request: &UpdateContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpdateContactResponse>> {
        let url = self.contact_endpoint(contact_id)?;
        self.execute(self.request(Method::PUT, url).json(request), cancel)
            .await
    }

    async fn delete_contact(
        &self,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<DeleteContactResponse>> {
        let url = self.contact_endpoint(contact_id)?;
        self.execute(self.request(Method::DELETE, url), cancel).await
    }
}
