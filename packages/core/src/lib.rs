//! Boundary validation for the Flatfile REST API.
//!
//! This crate holds the pieces every API payload is checked against before
//! it becomes a typed value: the structural [`schema`] engine, the branded
//! resource [`ids`], and event [`topic`]s. The record shapes themselves live
//! in `flatfile-api`; the HTTP pipeline in `flatfile-client`.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`schema`] | [`Decode`] trait, [`Record`] and [`Variants`] builders, path-tagged [`Failure`]s |
//! | [`ids`] | One identifier newtype per resource, e.g. [`UserId`], [`EventId`] |
//! | [`topic`] | [`EventTopic`] = [`TopicDomain`] `:` [`TopicAction`] |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use flatfile_core::{decode, EnvironmentId};
//!
//! let id: EnvironmentId = decode(&serde_json::json!("dev_env_abcd1234"))?;
//! assert!(decode::<EnvironmentId>(&serde_json::json!("dev_sp_abcd1234")).is_err());
//! ```

pub mod ids;
pub mod schema;
pub mod topic;

pub use ids::{
    AccountId, AgentId, DocumentId, EnvironmentId, EventId, FileId, IdError, JobId, SheetId,
    SpaceConfigId, SpaceId, UserId, VersionId, WorkbookId,
};
pub use schema::{decode, literal, Decode, DecodeErrors, Decoded, Failure, Path, Record, Variants};
pub use topic::{EventTopic, TopicAction, TopicDomain};
