use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::crypto::token::generate_session_token;
use crate::models::session::{CheckoutSession, PaymentFields};

/// An in-memory store of checkout sessions keyed by opaque token.
///
/// Entries are immutable once created. They disappear when the sweeper runs
/// after their expiry, and lookups already report them as absent in between.
/// Clones share the same mapping.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, CheckoutSession>>>,
    ttl: chrono::Duration,
}

impl SessionStore {
    /// Creates a new, empty `SessionStore` whose sessions live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Stores `fields` under a fresh token and returns the token.
    pub async fn create(&self, fields: PaymentFields) -> String {
        self.create_at(fields, Utc::now()).await
    }

    /// Stores `fields` as if created at `now`.
    pub async fn create_at(&self, fields: PaymentFields, now: DateTime<Utc>) -> String {
        let session = CheckoutSession {
            fields,
            expires_at: now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
        };

        let mut sessions = self.sessions.write().await;
        loop {
            let token = generate_session_token();
            if let Entry::Vacant(slot) = sessions.entry(token.clone()) {
                slot.insert(session);
                return token;
            }
            tracing::warn!("⚠️  Session token collision, regenerating");
        }
    }

    /// Returns the fields stored under `token`, unless absent or expired.
    pub async fn get(&self, token: &str) -> Option<PaymentFields> {
        self.get_at(token, Utc::now()).await
    }

    /// Looks up `token` as of `now`.
    pub async fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<PaymentFields> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if !session.is_expired_at(now) => {
                    return Some(session.fields.clone());
                }
                Some(_) => {}
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions
            .get(token)
            .is_some_and(|session| session.is_expired_at(now))
        {
            sessions.remove(token);
            tracing::debug!("⏰ Expired checkout session dropped on lookup");
        }
        None
    }

    /// Removes every expired session and returns how many were removed.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(Utc::now()).await
    }

    /// Removes every session expired as of `now`.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        before - sessions.len()
    }

    /// Returns the number of stored sessions, expired-but-unswept included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
