//! Poynt Bridge Sync - adapter and push layer between a host commerce
//! platform and the Poynt payments service.
//!
//! # Architecture
//!
//! Data flows through four layers, leaf to root:
//!
//! - [`adapters`] - stateless bidirectional mapping between host commerce
//!   records and the vendor-neutral entities in `poynt-bridge-core`
//! - [`datastore`] - facades over the host platform's metadata storage,
//!   marshaling entity state through the adapters
//! - [`poynt`] - authenticated HTTP client and payload types for the
//!   remote payments API
//! - [`jobs`] - background-job producers that read pending work, build
//!   remote payloads, call the client, and record terminal job state
//!
//! The host platform itself (order records, metadata persistence, the job
//! queue, options storage) is an external collaborator reached through the
//! traits in [`host`]; an in-memory implementation backs the binary
//! scaffold and the tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod adapters;
pub mod config;
pub mod datastore;
pub mod error;
pub mod host;
pub mod jobs;
pub mod poynt;
pub mod routes;
pub mod state;
