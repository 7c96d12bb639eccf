use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header},
};
use serde::Serialize;
use sonic_rs::JsonValueTrait;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AppError, Result};

/// A flat string payload decoded from a JSON object or a form body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Payload {
    fields: BTreeMap<String, String>,
    /// Keys whose JSON value was `false` or `0`.
    #[serde(skip)]
    falsy: BTreeSet<String>,
}

impl Payload {
    /// Decodes `body` according to the request's `Content-Type`.
    ///
    /// JSON bodies must be objects; `null` members are dropped and non-string
    /// members keep their JSON text. Unknown content types yield an empty
    /// payload.
    pub fn from_body(headers: &HeaderMap, body: &[u8]) -> Result<Self> {
        if body.is_empty() {
            return Ok(Self::default());
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .unwrap_or_default();

        if content_type == "application/json" || content_type.ends_with("+json") {
            Self::from_json(body)
        } else if content_type == "application/x-www-form-urlencoded" {
            Ok(Self::from_form(body))
        } else {
            tracing::debug!("Ignoring body with content type {:?}", content_type);
            Ok(Self::default())
        }
    }

    /// Decodes a URL-encoded query string or form body. Repeated keys keep
    /// the last value.
    pub fn from_form(input: &[u8]) -> Self {
        Self {
            fields: url::form_urlencoded::parse(input)
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            falsy: BTreeSet::new(),
        }
    }

    /// Decodes the query string of a request URI, if any.
    pub fn from_query(query: Option<&str>) -> Self {
        query
            .map(|q| Self::from_form(q.as_bytes()))
            .unwrap_or_default()
    }

    /// Decodes a JSON object.
    pub fn from_json(input: &[u8]) -> Result<Self> {
        let object: BTreeMap<String, sonic_rs::Value> = sonic_rs::from_slice(input)
            .map_err(|e| AppError::MalformedPayload(format!("expected a JSON object: {}", e)))?;

        let mut payload = Self::default();
        for (key, value) in object {
            if value.is_null() {
                continue;
            }
            if value.as_bool() == Some(false) || (value.is_number() && value.as_f64() == Some(0.0)) {
                payload.falsy.insert(key.clone());
            }
            let text = match value.as_str() {
                Some(s) => s.to_string(),
                None => sonic_rs::to_string(&value)
                    .map_err(|e| AppError::MalformedPayload(e.to_string()))?,
            };
            payload.fields.insert(key, text);
        }

        Ok(payload)
    }

    /// Returns the value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Whether `key` is absent, empty, or was JSON `false` or `0`.
    pub fn is_falsy(&self, key: &str) -> bool {
        match self.get(key) {
            None => true,
            Some(value) => value.is_empty() || self.falsy.contains(key),
        }
    }

    /// Returns the value of `key` unless it is falsy.
    pub fn get_truthy(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|_| !self.is_falsy(key))
    }

    /// Returns a payload holding the entries of `self` overlaid by `other`.
    pub fn merged_with(&self, other: &Payload) -> Payload {
        let mut merged = self.clone();
        for (key, value) in &other.fields {
            merged.falsy.remove(key);
            merged.fields.insert(key.clone(), value.clone());
        }
        merged.falsy.extend(other.falsy.iter().cloned());
        merged
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the payload holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Payload {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            falsy: BTreeSet::new(),
        }
    }
}

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let headers = req.headers().clone();
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::MalformedPayload(e.to_string()))?;

        Payload::from_body(&headers, &body)
    }
}
