//! Branded identifiers for API resources.
//!
//! Every resource has its own identifier type. All of them are strings of
//! the form `<env>_<tag>_<suffix>`, where `<env>` is `dev` or `us`, `<tag>`
//! names the resource and `<suffix>` is a fixed-length run of ASCII letters
//! and digits (16 characters for events, 8 for everything else).
//!
//! Values can only be obtained through validation ([`UserId::parse`],
//! [`FromStr`](std::str::FromStr), or [`Decode`]), so a held identifier
//! always matches its pattern, and a [`SpaceId`] can never be passed where a
//! [`WorkbookId`] is expected.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::schema::{mismatch, Decode, Decoded, Path};

/// Returned when a string is not a valid identifier of the requested kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{value:?} is not a valid {kind} (expected {pattern})")]
pub struct IdError {
    pub kind: &'static str,
    pub pattern: &'static str,
    pub value: String,
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $tag:literal, $len:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Anchored pattern every value of this type matches.
            pub const PATTERN: &'static str =
                concat!("^(?:dev|us)_", $tag, "_[A-Za-z0-9]{", $len, "}$");

            /// Validate `value` as an identifier of this kind.
            pub fn parse(value: impl Into<String>) -> Result<Self, IdError> {
                static RE: LazyLock<Regex> = LazyLock::new(|| {
                    Regex::new($name::PATTERN).expect("invalid identifier regex")
                });

                let value = value.into();
                if RE.is_match(&value) {
                    Ok(Self(value))
                } else {
                    Err(IdError {
                        kind: stringify!($name),
                        pattern: Self::PATTERN,
                        value,
                    })
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Decode for $name {
            fn shape() -> String {
                stringify!($name).into()
            }

            fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
                value
                    .as_str()
                    .and_then(|s| Self::parse(s).ok())
                    .ok_or_else(|| mismatch(path, Self::shape(), value))
            }
        }
    };
}

identifier!(
    /// `dev_usr_…` / `us_usr_…`
    UserId, "usr", 8
);
identifier!(
    /// `dev_acc_…` / `us_acc_…`
    AccountId, "acc", 8
);
identifier!(
    /// `dev_env_…` / `us_env_…`
    EnvironmentId, "env", 8
);
identifier!(
    /// `dev_ag_…` / `us_ag_…`
    AgentId, "ag", 8
);
identifier!(
    /// `dev_evt_…` / `us_evt_…`, with a 16-character suffix.
    EventId, "evt", 16
);
identifier!(
    /// `dev_sp_…` / `us_sp_…`
    SpaceId, "sp", 8
);
identifier!(
    /// `dev_sc_…` / `us_sc_…`
    SpaceConfigId, "sc", 8
);
identifier!(
    /// `dev_dc_…` / `us_dc_…`
    DocumentId, "dc", 8
);
identifier!(
    /// `dev_wb_…` / `us_wb_…`
    WorkbookId, "wb", 8
);
identifier!(
    /// `dev_sh_…` / `us_sh_…`
    SheetId, "sh", 8
);
identifier!(
    /// `dev_fl_…` / `us_fl_…`
    FileId, "fl", 8
);
identifier!(
    /// `dev_jb_…` / `us_jb_…`
    JobId, "jb", 8
);
identifier!(
    /// `dev_vr_…` / `us_vr_…`
    VersionId, "vr", 8
);
