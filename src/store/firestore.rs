// src/store/firestore.rs - Firestore REST v1 backend
use super::{Document, DocumentStore, Fields, SortOrder, StoreError, StoreFuture, StoreResult};
use crate::auth::Credential;
use crate::core::config::StoreConfig;
use futures::FutureExt;
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const API_BASE: &str = "https://firestore.googleapis.com/v1";

/// Requests carry the project API key and, once bound to a signed-in
/// caller through [`DocumentStore::as_caller`], the caller's ID token as a
/// bearer credential so security rules see `request.auth`.
#[derive(Clone)]
pub struct FirestoreStore {
    client: reqwest::Client,
    documents_url: String,
    api_key: String,
    bearer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RunQueryRow {
    #[serde(default)]
    document: Option<RestDocument>,
}

impl FirestoreStore {
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        if config.project_id.is_empty() {
            return Err(StoreError::Unavailable(
                "firestore project_id is not configured".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            documents_url: format!(
                "{}/projects/{}/databases/{}/documents",
                API_BASE, config.project_id, config.database
            ),
            api_key: config.api_key.clone(),
            bearer: None,
        })
    }

    fn key_query(&self) -> Vec<(&'static str, String)> {
        if self.api_key.is_empty() {
            Vec::new()
        } else {
            vec![("key", self.api_key.clone())]
        }
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let builder = self.client.request(method, url).query(&self.key_query());
        match &self.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: reqwest::Response) -> StoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(String::from))
            .unwrap_or_else(|| status.to_string());

        Err(match status.as_u16() {
            401 | 403 => StoreError::PermissionDenied(message),
            404 => StoreError::Unavailable(format!("not found: {}", message)),
            _ => StoreError::Unavailable(message),
        })
    }

    async fn run_query(
        &self,
        collection: &str,
        order_by: &str,
        order: SortOrder,
    ) -> StoreResult<Vec<Document>> {
        let direction = match order {
            SortOrder::Ascending => "ASCENDING",
            SortOrder::Descending => "DESCENDING",
        };
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection }],
                "orderBy": [{ "field": { "fieldPath": order_by }, "direction": direction }]
            }
        });

        let response = self
            .request(Method::POST, format!("{}:runQuery", self.documents_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let rows: Vec<RunQueryRow> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;

        rows.into_iter()
            .filter_map(|row| row.document)
            .map(from_rest_document)
            .collect()
    }

    async fn create_document(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        let response = self
            .request(Method::POST, format!("{}/{}", self.documents_url, collection))
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let created: RestDocument = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;

        Ok(document_id(&created.name).to_string())
    }

    async fn patch_document(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        let mut query = vec![("currentDocument.exists", "true".to_string())];
        query.extend(fields.keys().map(|k| ("updateMask.fieldPaths", k.clone())));

        let response = self
            .request(
                Method::PATCH,
                format!("{}/{}/{}", self.documents_url, collection, id),
            )
            .query(&query)
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match Self::check(response).await {
            Ok(_) => Ok(()),
            Err(StoreError::Unavailable(msg)) if msg.starts_with("not found") => {
                Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
        let response = self
            .request(
                Method::DELETE,
                format!("{}/{}/{}", self.documents_url, collection, id),
            )
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Self::check(response).await.map(|_| ())
    }
}

impl DocumentStore for FirestoreStore {
    fn name(&self) -> &'static str {
        "firestore"
    }

    fn query_ordered<'a>(
        &'a self,
        collection: &'a str,
        order_by: &'a str,
        order: SortOrder,
    ) -> StoreFuture<'a, Vec<Document>> {
        self.run_query(collection, order_by, order).boxed()
    }

    fn create<'a>(&'a self, collection: &'a str, fields: Fields) -> StoreFuture<'a, String> {
        self.create_document(collection, fields).boxed()
    }

    fn update<'a>(
        &'a self,
        collection: &'a str,
        id: &'a str,
        fields: Fields,
    ) -> StoreFuture<'a, ()> {
        self.patch_document(collection, id, fields).boxed()
    }

    fn delete<'a>(&'a self, collection: &'a str, id: &'a str) -> StoreFuture<'a, ()> {
        self.delete_document(collection, id).boxed()
    }

    fn as_caller(&self, credential: &Credential) -> Option<Arc<dyn DocumentStore>> {
        Some(Arc::new(Self {
            bearer: Some(credential.token().to_string()),
            ..self.clone()
        }))
    }
}

fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn from_rest_document(doc: RestDocument) -> StoreResult<Document> {
    let fields = doc
        .fields
        .iter()
        .map(|(k, v)| decode_value(v).map(|v| (k.clone(), v)))
        .collect::<StoreResult<Fields>>()?;

    Ok(Document {
        id: document_id(&doc.name).to_string(),
        fields,
    })
}

fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

/// JSON value → Firestore typed value. RFC 3339 strings become timestamps so
/// `createdAt` orders chronologically on the server.
fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) if chrono::DateTime::parse_from_rfc3339(s).is_ok() => {
            json!({ "timestampValue": s })
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

fn decode_value(value: &Value) -> StoreResult<Value> {
    let Some((kind, inner)) = value.as_object().and_then(|m| m.iter().next()) else {
        return Err(StoreError::InvalidDocument(format!(
            "untyped firestore value: {}",
            value
        )));
    };

    Ok(match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => inner.clone(),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "doubleValue" => inner.clone(),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner["values"]
                .as_array()
                .map(|values| values.iter().map(decode_value).collect::<StoreResult<Vec<Value>>>())
                .transpose()?
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner["fields"]
                .as_object()
                .map(|fields| {
                    fields
                        .iter()
                        .map(|(k, v)| decode_value(v).map(|v| (k.clone(), v)))
                        .collect::<StoreResult<Fields>>()
                })
                .transpose()?
                .unwrap_or_default(),
        ),
        other => {
            return Err(StoreError::InvalidDocument(format!(
                "unsupported firestore value type '{}'",
                other
            )))
        }
    })
}
