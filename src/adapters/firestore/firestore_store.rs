//! Firestore REST implementation of the `ChatStore` port.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::config::FirestoreConfig;
use crate::domain::chat::{ChatDocument, ChatMessage};
use crate::ports::{ChatStore, ChatStoreError};

use super::value;

/// Firestore-backed chat store.
pub struct FirestoreChatStore {
    config: FirestoreConfig,
    http_client: reqwest::Client,
}

/// A document as returned by the REST API.
#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    /// Full resource name; the document id is the last path segment.
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    next_page_token: Option<String>,
}

impl FirestoreChatStore {
    pub fn new(config: FirestoreConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn chat_url(&self, chat_id: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/chats/{}",
            self.config.base_url, self.config.project_id, chat_id
        )
    }

    fn messages_url(&self, chat_id: &str) -> String {
        format!("{}/messages", self.chat_url(chat_id))
    }

    async fn check_status(
        chat_id: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ChatStoreError> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ChatStoreError::NotFound(chat_id.to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(%status, error = %error_text, "Firestore call failed");
            return Err(ChatStoreError::Provider(format!(
                "{}: {}",
                status, error_text
            )));
        }
        Ok(response)
    }
}

/// Last path segment of a document resource name.
fn document_id(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

fn decode_chat(chat_id: &str, fields: &Map<String, Value>) -> ChatDocument {
    ChatDocument {
        id: chat_id.to_string(),
        participants: fields
            .get("participants")
            .and_then(value::as_string_array)
            .unwrap_or_default(),
        participants_key: fields
            .get("participantsKey")
            .and_then(|v| value::as_string(v))
            .map(str::to_string),
    }
}

fn decode_message(document: &FirestoreDocument) -> ChatMessage {
    ChatMessage {
        id: document_id(&document.name),
        // Missing sender decodes as empty; the audit flags it.
        sender_id: document
            .fields
            .get("senderId")
            .and_then(|v| value::as_string(v))
            .unwrap_or_default()
            .to_string(),
    }
}

#[async_trait]
impl ChatStore for FirestoreChatStore {
    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatDocument>, ChatStoreError> {
        let response = self
            .http_client
            .get(self.chat_url(chat_id))
            .bearer_auth(self.config.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| ChatStoreError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check_status(chat_id, response).await?;

        let document: FirestoreDocument = response
            .json()
            .await
            .map_err(|e| ChatStoreError::Decode(e.to_string()))?;

        Ok(Some(decode_chat(chat_id, &document.fields)))
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>, ChatStoreError> {
        let mut messages = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http_client
                .get(self.messages_url(chat_id))
                .bearer_auth(self.config.access_token.expose_secret());
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| ChatStoreError::Network(e.to_string()))?;
            let response = Self::check_status(chat_id, response).await?;

            let page: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|e| ChatStoreError::Decode(e.to_string()))?;

            messages.extend(page.documents.iter().map(decode_message));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(messages)
    }

    async fn update_participants(
        &self,
        chat_id: &str,
        participants: &[String],
        participants_key: &str,
    ) -> Result<(), ChatStoreError> {
        let body = json!({
            "fields": {
                "participants": value::string_array_value(participants),
                "participantsKey": value::string_value(participants_key),
            }
        });

        let response = self
            .http_client
            .patch(self.chat_url(chat_id))
            .bearer_auth(self.config.access_token.expose_secret())
            .query(&[
                ("updateMask.fieldPaths", "participants"),
                ("updateMask.fieldPaths", "participantsKey"),
            ])
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatStoreError::Network(e.to_string()))?;

        Self::check_status(chat_id, response).await?;
        tracing::info!(chat_id, "chat participant fields overwritten");
        Ok(())
    }
}
