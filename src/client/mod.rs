//! Remote list client abstraction.
//!
//! `RemoteListClient` is the single seam between the reconciliation
//! engine and the hosted list store: connect, exact-match query, create,
//! full-field update, disconnect. The engine only ever sees this trait;
//! `RestListClient` is the HTTP implementation, tests substitute an
//! in-memory one.

use async_trait::async_trait;

pub mod error;
pub mod rest;
pub mod types;

pub use error::ClientError;
pub use rest::RestListClient;
pub use types::{FieldSet, FieldValue, MatchPredicate, RemoteRecord};

/// Unified interface to a remote hosted list store.
///
/// Object-safe and designed to be used as `Arc<dyn RemoteListClient>`.
/// All methods take `&self`; implementations manage their own interior
/// session state.
#[async_trait]
pub trait RemoteListClient: Send + Sync + 'static {
    /// Establish a session against the site.
    ///
    /// Must verify the credentials eagerly: a connect that returns `Ok`
    /// means subsequent calls are expected to be authorized.
    ///
    /// # Returns
    ///
    /// - `Err(ClientError::Authentication)` if the store rejected the
    ///   credentials
    /// - `Err(ClientError::Network)` / `Timeout` on transport failure
    async fn connect(&self, site_url: &str) -> Result<(), ClientError>;

    /// Site URL of the currently established session, if any.
    async fn current_session(&self) -> Option<String>;

    /// Fetch the records matching an identity predicate.
    ///
    /// One call, no paging. Zero results is a valid answer, not an
    /// error; more than one is passed through unfiltered.
    async fn query(
        &self,
        list_name: &str,
        predicate: &MatchPredicate,
    ) -> Result<Vec<RemoteRecord>, ClientError>;

    /// Create a record carrying the given field set.
    ///
    /// Returns the stored record with its server-assigned identifiers.
    async fn create(&self, list_name: &str, fields: &FieldSet) -> Result<RemoteRecord, ClientError>;

    /// Replace a record's fields with the given full field set.
    ///
    /// Returns `Ok(false)` when the record no longer exists; the caller
    /// decides whether that is a failure.
    async fn update(
        &self,
        list_name: &str,
        record_id: i64,
        fields: &FieldSet,
    ) -> Result<bool, ClientError>;

    /// Release the session. Idempotent; never required to fail.
    async fn disconnect(&self) -> Result<(), ClientError>;
}
