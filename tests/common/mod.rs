//! Shared test utilities for listsync integration tests.
//!
//! Provides an in-memory remote list client with call recording and
//! failure injection, plus config and row builders to reduce duplication
//! across test files.

#![allow(dead_code)]

use async_trait::async_trait;
use listsync::client::{
    ClientError, FieldSet, FieldValue, MatchPredicate, RemoteListClient, RemoteRecord,
};
use listsync::config::{IdentityConfig, RemoteConfig, SyncConfig};
use listsync::source::RawRow;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

pub const TEST_SITE: &str = "https://lists.example.com/sites/assets";
pub const TEST_LIST: &str = "Asset Inventory";

/// One recorded client call, in invocation order.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientCall {
    Connect(String),
    Query(String),
    Create { list: String, fields: FieldSet },
    Update { list: String, id: i64, fields: FieldSet },
    Disconnect,
}

/// In-memory remote list store with call recording.
#[derive(Default)]
pub struct InMemoryListClient {
    records: Mutex<Vec<RemoteRecord>>,
    next_id: AtomicI64,
    session: Mutex<Option<String>>,
    calls: Mutex<Vec<ClientCall>>,
    fail_create: AtomicBool,
    fail_update: AtomicBool,
}

impl InMemoryListClient {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Self::default()
        }
    }

    /// Insert a record directly into the store, bypassing the client API.
    pub fn seed_record(&self, fields: FieldSet) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().push(RemoteRecord {
            id,
            unique_id: format!("seed-{}", id),
            fields,
        });
        id
    }

    /// Every subsequent create call fails.
    pub fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Every subsequent update call fails.
    pub fn fail_updates(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<RemoteRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<ClientCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Field sets sent through update calls, in order.
    pub fn update_payloads(&self) -> Vec<FieldSet> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ClientCall::Update { fields, .. } => Some(fields),
                _ => None,
            })
            .collect()
    }

    /// Field sets sent through create calls, in order.
    pub fn create_payloads(&self) -> Vec<FieldSet> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ClientCall::Create { fields, .. } => Some(fields),
                _ => None,
            })
            .collect()
    }

    pub fn update_call_count(&self) -> usize {
        self.update_payloads().len()
    }

    fn record_call(&self, call: ClientCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteListClient for InMemoryListClient {
    async fn connect(&self, site_url: &str) -> Result<(), ClientError> {
        self.record_call(ClientCall::Connect(site_url.to_string()));
        *self.session.lock().unwrap() = Some(site_url.to_string());
        Ok(())
    }

    async fn current_session(&self) -> Option<String> {
        self.session.lock().unwrap().clone()
    }

    async fn query(
        &self,
        _list_name: &str,
        predicate: &MatchPredicate,
    ) -> Result<Vec<RemoteRecord>, ClientError> {
        self.record_call(ClientCall::Query(predicate.to_filter_string()));
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| predicate.matches(r))
            .cloned()
            .collect())
    }

    async fn create(&self, list_name: &str, fields: &FieldSet) -> Result<RemoteRecord, ClientError> {
        self.record_call(ClientCall::Create {
            list: list_name.to_string(),
            fields: fields.clone(),
        });
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(ClientError::Upstream {
                status: 500,
                message: "injected create failure".into(),
            });
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = RemoteRecord {
            id,
            unique_id: format!("created-{}", id),
            fields: fields.clone(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        list_name: &str,
        record_id: i64,
        fields: &FieldSet,
    ) -> Result<bool, ClientError> {
        self.record_call(ClientCall::Update {
            list: list_name.to_string(),
            id: record_id,
            fields: fields.clone(),
        });
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ClientError::Upstream {
                status: 500,
                message: "injected update failure".into(),
            });
        }
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == record_id) {
            Some(record) => {
                for (field, value) in fields {
                    record.fields.insert(field.clone(), value.clone());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn disconnect(&self) -> Result<(), ClientError> {
        self.record_call(ClientCall::Disconnect);
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}

// =============================================================================
// Config & Row Builders
// =============================================================================

/// Standard asset-inventory config used across the scenario tests.
pub fn make_config() -> SyncConfig {
    let mut config = SyncConfig {
        remote: RemoteConfig {
            site_url: TEST_SITE.to_string(),
            list_name: TEST_LIST.to_string(),
        },
        identity: IdentityConfig {
            primary_field: "Title".to_string(),
            secondary_field: "SerialNumber".to_string(),
        },
        ..SyncConfig::default()
    };
    config.rules.ownership_change_field = "CurrentOwnerId".to_string();
    config.rules.stale_flag_field = "OmniSynced".to_string();

    for (field, column) in [
        ("Title", "AssetTag"),
        ("SerialNumber", "SerialNumber"),
        ("Status", "Status"),
        ("CurrentOwnerId", "OwnerId"),
        ("WarrantyEndDate", "WarrantyEnd"),
        ("OmniSynced", ""),
    ] {
        config.mappings.insert(field.to_string(), column.to_string());
    }
    config
}

/// Build a raw CSV row from (column, value) pairs.
pub fn make_row(pairs: &[(&str, &str)]) -> RawRow {
    RawRow::from_pairs(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
}

/// A field set from (field, value) pairs of text values.
pub fn text_fields(pairs: &[(&str, &str)]) -> FieldSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), FieldValue::Text(v.to_string())))
        .collect()
}
