//! Record matcher: locates existing remote records for a row.

use crate::client::{ClientError, MatchPredicate, RemoteListClient, RemoteRecord};
use crate::config::SyncConfig;

/// Builds the identity predicate and queries the remote store.
pub struct RecordMatcher {
    list_name: String,
    primary_field: String,
    secondary_field: String,
}

impl RecordMatcher {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            list_name: config.remote.list_name.clone(),
            primary_field: config.identity.primary_field.clone(),
            secondary_field: config.identity.secondary_field.clone(),
        }
    }

    /// Query for records matching the identity pair.
    ///
    /// One call, no paging: zero results signals the create path, more
    /// than one is anomalous data and is passed through unmodified for the
    /// engine to process record by record.
    pub async fn find(
        &self,
        client: &dyn RemoteListClient,
        primary_value: &str,
        secondary_value: &str,
    ) -> Result<Vec<RemoteRecord>, ClientError> {
        let predicate = MatchPredicate {
            primary_field: self.primary_field.clone(),
            primary_value: primary_value.to_string(),
            secondary_field: self.secondary_field.clone(),
            secondary_value: secondary_value.to_string(),
        };

        let records = client.query(&self.list_name, &predicate).await?;

        if records.len() > 1 {
            // Identity pairs are expected to be unique; duplicates are a
            // data-integrity concern, not a supported feature.
            tracing::warn!(
                primary = %primary_value,
                secondary = %secondary_value,
                matches = records.len(),
                "Identity pair matched multiple records"
            );
        }

        Ok(records)
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }
}
