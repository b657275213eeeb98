//! Event topics: `<domain>:<action>` strings such as `records:created`.
//!
//! Every combination of [`TopicDomain`] and [`TopicAction`] is accepted,
//! including pairs the platform never emits (e.g. `user:started`).

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::schema::{mismatch, Decode, Decoded, Path};

/// The subject area half of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicDomain {
    Space,
    Workbook,
    User,
    Upload,
    Job,
    Records,
    File,
}

impl TopicDomain {
    pub const ALL: [TopicDomain; 7] = [
        TopicDomain::Space,
        TopicDomain::Workbook,
        TopicDomain::User,
        TopicDomain::Upload,
        TopicDomain::Job,
        TopicDomain::Records,
        TopicDomain::File,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TopicDomain::Space => "space",
            TopicDomain::Workbook => "workbook",
            TopicDomain::User => "user",
            TopicDomain::Upload => "upload",
            TopicDomain::Job => "job",
            TopicDomain::Records => "records",
            TopicDomain::File => "file",
        }
    }
}

impl std::fmt::Display for TopicDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a [`TopicDomain`] from its lowercase wire-format string.
impl std::str::FromStr for TopicDomain {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TopicDomain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown topic domain {:?}; expected one of: \
                     space, workbook, user, upload, job, records, file",
                    s
                )
            })
    }
}

/// The verb half of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicAction {
    Added,
    Removed,
    Online,
    Offline,
    Started,
    Failed,
    Completed,
    Waiting,
    Updated,
    Created,
}

impl TopicAction {
    pub const ALL: [TopicAction; 10] = [
        TopicAction::Added,
        TopicAction::Removed,
        TopicAction::Online,
        TopicAction::Offline,
        TopicAction::Started,
        TopicAction::Failed,
        TopicAction::Completed,
        TopicAction::Waiting,
        TopicAction::Updated,
        TopicAction::Created,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TopicAction::Added => "added",
            TopicAction::Removed => "removed",
            TopicAction::Online => "online",
            TopicAction::Offline => "offline",
            TopicAction::Started => "started",
            TopicAction::Failed => "failed",
            TopicAction::Completed => "completed",
            TopicAction::Waiting => "waiting",
            TopicAction::Updated => "updated",
            TopicAction::Created => "created",
        }
    }
}

impl std::fmt::Display for TopicAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a [`TopicAction`] from its lowercase wire-format string.
impl std::str::FromStr for TopicAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TopicAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown topic action {:?}; expected one of: added, removed, online, \
                     offline, started, failed, completed, waiting, updated, created",
                    s
                )
            })
    }
}

/// An event topic. Serialises as `"<domain>:<action>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventTopic {
    pub domain: TopicDomain,
    pub action: TopicAction,
}

impl EventTopic {
    pub const fn new(domain: TopicDomain, action: TopicAction) -> Self {
        Self { domain, action }
    }
}

impl std::fmt::Display for EventTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.domain, self.action)
    }
}

impl std::str::FromStr for EventTopic {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (domain, action) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid event topic {:?}: expected <domain>:<action>", s))?;
        Ok(Self {
            domain: domain.parse()?,
            action: action.parse()?,
        })
    }
}

impl Serialize for EventTopic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Decode for EventTopic {
    fn shape() -> String {
        "EventTopic".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        value
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| mismatch(path, Self::shape(), value))
    }
}
