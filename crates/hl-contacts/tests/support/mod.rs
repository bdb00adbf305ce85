//! In-memory transport and provider used by the resolver tests

#![allow(dead_code)]

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hl_contacts::{
    CancellationToken, ClientProvider, ContactResponse, ContactsTransport, DeleteContactResponse,
    Result, SearchContactsRequest, SearchContactsResponse, UpdateContactRequest,
    UpdateContactResponse, UpsertContactRequest, UpsertContactResponse,
};
use serde_json::{Value, json};

/// A request seen by the fake transport
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upsert(UpsertContactRequest),
    Search(SearchContactsRequest),
    Get(String),
    Update(String, UpdateContactRequest),
    Delete(String),
}

/// Transport answering from canned payloads
#[derive(Default)]
pub struct FakeTransport {
    pub calls: Mutex<Vec<Call>>,
    pub search_response: Mutex<Option<SearchContactsResponse>>,
    /// Never answer; only cancellation ends a call
    pub hang: bool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }

    pub fn with_search_response(response: Option<SearchContactsResponse>) -> Self {
        Self {
            search_response: Mutex::new(response),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn answer<T>(&self, call: Call, cancel: &CancellationToken, value: Option<T>) -> Result<Option<T>> {
        self.calls.lock().unwrap().push(call);

        let hang = self.hang;
        cancel
            .run(async move {
                if hang {
                    std::future::pending::<()>().await;
                }
                Ok(value)
            })
            .await
    }
}

pub fn contact_json(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "locationId": "loc-1",
        "email": email,
    })
}

#[async_trait]
impl ContactsTransport for FakeTransport {
    async fn upsert_contact(
        &self,
        request: &UpsertContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpsertContactResponse>> {
        let response = serde_json::from_value(json!({
            "new": true,
            "contact": contact_json("c-1", request.email.as_deref().unwrap_or_default()),
        }))?;
        self.answer(Call::Upsert(request.clone()), cancel, Some(response))
            .await
    }

    async fn search_contacts(
        &self,
        request: &SearchContactsRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<SearchContactsResponse>> {
        let response = self.search_response.lock().unwrap().clone();
        self.answer(Call::Search(request.clone()), cancel, response)
            .await
    }

    async fn get_contact(
        &self,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ContactResponse>> {
        let response = match contact_id {
            "c-42" => Some(serde_json::from_value(json!({
                "contact": contact_json("c-42", "jane@example.com")
            }))?),
            _ => None,
        };
        self.answer(Call::Get(contact_id.to_string()), cancel, response)
            .await
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        request: &UpdateContactRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<UpdateContactResponse>> {
        let response = UpdateContactResponse {
            succeeded: true,
            contact: None,
        };
        self.answer(
            Call::Update(contact_id.to_string(), request.clone()),
            cancel,
            Some(response),
        )
        .await
    }

    async fn delete_contact(
        &self,
        contact_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<DeleteContactResponse>> {
        let response = DeleteContactResponse { succeeded: true };
        self.answer(Call::Delete(contact_id.to_string()), cancel, Some(response))
            .await
    }
}

/// Provider handing out one shared fake transport
pub struct FakeProvider {
    pub transport: Arc<FakeTransport>,
    pub acquired: AtomicUsize,
    pub keys: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(transport: FakeTransport) -> Arc<Self> {
        Arc::new(Self {
            transport: Arc::new(transport),
            acquired: AtomicUsize::new(0),
            keys: Mutex::new(Vec::new()),
        })
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientProvider for FakeProvider {
    async fn acquire(
        &self,
        api_key: &str,
        cancel: &CancellationToken,
    ) -> Result<Arc<dyn ContactsTransport>> {
        if cancel.is_cancelled() {
            return Err(hl_contacts::Error::Cancelled);
        }

        self.acquired.fetch_add(1, Ordering::SeqCst);
        self.keys.lock().unwrap().push(api_key.to_string());

        let transport: Arc<dyn ContactsTransport> = self.transport.clone();
        Ok(transport)
    }
}

/// Shared buffer collecting formatted log output
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Lines mentioning the contacts layer (transport lines excluded)
    pub fn resolver_lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains("hl_contacts::resolver"))
            .map(str::to_string)
            .collect()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install a thread-local subscriber writing plain text into a buffer
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_target(true)
        .finish();

    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
