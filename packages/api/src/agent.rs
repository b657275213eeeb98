//! Agents: `GET/POST environments/{id}/agents`.
//!
//! An agent is a piece of code the platform runs in response to events on
//! the topics it subscribes to.

use flatfile_core::{literal, AgentId, Decode, Decoded, EventTopic, Path, Record};
use serde::Serialize;
use serde_json::Value;

/// Language an agent's source is written in. Only `js` exists.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    #[default]
    Js,
}

impl Decode for Compiler {
    fn shape() -> String {
        "\"js\"".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        literal(value, path, &[("js", Compiler::Js)])
    }
}

/// A deployed agent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<EventTopic>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler: Option<Compiler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Decode for Agent {
    fn shape() -> String {
        "Agent".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "Agent")?;
        let id = record.required("id");
        let topics = record.optional("topics");
        let compiler = record.optional("compiler");
        let source = record.optional("source");
        record.finish(|| {
            Some(Agent {
                id: id?,
                topics: topics?,
                compiler: compiler?,
                source: source?,
            })
        })
    }
}

/// Request body for `POST environments/{id}/agents`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AgentInput {
    pub topics: Vec<EventTopic>,
    pub compiler: Compiler,
    pub source: String,
}

impl Decode for AgentInput {
    fn shape() -> String {
        "AgentInput".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "AgentInput")?;
        let topics = record.required("topics");
        let compiler = record.required("compiler");
        let source = record.required("source");
        record.finish(|| {
            Some(AgentInput {
                topics: topics?,
                compiler: compiler?,
                source: source?,
            })
        })
    }
}
