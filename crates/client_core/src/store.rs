//! Access to the remote contact collection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Contact, ContactDraft, ContactId},
    error::ApiError,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::StoreError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const API_PATH_SEGMENTS: [&str; 2] = ["api", "contacts"];

/// CRUD over the contact resource collection. Every failure comes back as a
/// `StoreError`; implementations neither cache nor retry.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError>;
    async fn get(&self, id: &ContactId) -> Result<Contact, StoreError>;
    async fn create(&self, draft: &ContactDraft) -> Result<Contact, StoreError>;
    async fn update(&self, id: &ContactId, draft: &ContactDraft) -> Result<Contact, StoreError>;
    async fn delete(&self, id: &ContactId) -> Result<(), StoreError>;
}

pub struct HttpContactStore {
    http: Client,
    collection_url: Url,
}

impl HttpContactStore {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, StoreError> {
        let base =
            Url::parse(base_url).map_err(|_| StoreError::InvalidBaseUrl(base_url.to_string()))?;
        let mut collection_url = base.clone();
        collection_url
            .path_segments_mut()
            .map_err(|_| StoreError::InvalidBaseUrl(base_url.to_string()))?
            .pop_if_empty()
            .extend(API_PATH_SEGMENTS);

        let http = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            http,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn item_url(&self, id: &ContactId) -> Result<Url, StoreError> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidBaseUrl(self.collection_url.to_string()))?
            .push(&id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl ContactStore for HttpContactStore {
    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        debug!(url = %self.collection_url, "store: listing contacts");
        let response = self.http.get(self.collection_url.clone()).send().await;
        let contacts: Vec<Contact> = ensure_success(response, "contact collection")
            .await?
            .json()
            .await?;
        debug!(count = contacts.len(), "store: listed contacts");
        Ok(contacts)
    }

    async fn get(&self, id: &ContactId) -> Result<Contact, StoreError> {
        let url = self.item_url(id)?;
        debug!(%url, "store: fetching contact");
        let response = self.http.get(url).send().await;
        let contact = ensure_success(response, &id.to_string())
            .await?
            .json()
            .await?;
        Ok(contact)
    }

    async fn create(&self, draft: &ContactDraft) -> Result<Contact, StoreError> {
        debug!(url = %self.collection_url, "store: creating contact");
        let response = self
            .http
            .post(self.collection_url.clone())
            .json(draft)
            .send()
            .await;
        let contact: Contact = ensure_success(response, "contact collection")
            .await?
            .json()
            .await?;
        info!(contact_id = %contact.id, "store: contact created");
        Ok(contact)
    }

    async fn update(&self, id: &ContactId, draft: &ContactDraft) -> Result<Contact, StoreError> {
        let url = self.item_url(id)?;
        debug!(%url, "store: updating contact");
        let response = self.http.put(url).json(draft).send().await;
        let mut contact: Contact = ensure_success(response, &id.to_string())
            .await?
            .json()
            .await?;
        if &contact.id != id {
            warn!(
                requested = %id,
                returned = %contact.id,
                "store: server changed contact id on update; keeping requested id"
            );
            contact.id = id.clone();
        }
        info!(contact_id = %id, "store: contact updated");
        Ok(contact)
    }

    async fn delete(&self, id: &ContactId) -> Result<(), StoreError> {
        let url = self.item_url(id)?;
        debug!(%url, "store: deleting contact");
        let response = self.http.delete(url).send().await;
        ensure_success(response, &id.to_string()).await?;
        info!(contact_id = %id, "store: contact deleted");
        Ok(())
    }
}

async fn ensure_success(
    response: reqwest::Result<Response>,
    target: &str,
) -> Result<Response, StoreError> {
    let response = response.map_err(|err| {
        warn!(%target, error = %err, "store: request failed");
        StoreError::from(err)
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    warn!(%target, status = status.as_u16(), %message, "store: non-success status");
    Err(match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(target.to_string()),
        status if status.is_client_error() => StoreError::Validation(message),
        status => StoreError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
        return api_error.message;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}
