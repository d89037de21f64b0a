//! Listsync - CSV-to-remote-list reconciliation tool
//!
//! This library provides the core functionality for synchronizing rows of
//! a tabular CSV export with records in a remote hosted list-store through
//! a declarative field-mapping configuration.

pub mod cli;
pub mod client;
pub mod config;
pub mod engine;
pub mod logging;
pub mod source;
