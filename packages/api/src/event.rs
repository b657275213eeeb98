//! Events: `GET environments/{id}/events`.

use flatfile_core::{
    literal, AccountId, Decode, Decoded, EnvironmentId, EventId, EventTopic, FileId, JobId, Path,
    Record, SheetId, SpaceId, UserId, VersionId, WorkbookId,
};
use serde::Serialize;
use serde_json::Value;

/// The resource family an event belongs to.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventDomain {
    File,
    Space,
    Workbook,
    Job,
}

const EVENT_DOMAINS: [(&str, EventDomain); 4] = [
    ("file", EventDomain::File),
    ("space", EventDomain::Space),
    ("workbook", EventDomain::Workbook),
    ("job", EventDomain::Job),
];

impl Decode for EventDomain {
    fn shape() -> String {
        flatfile_core::schema::literal_shape(&["file", "space", "workbook", "job"])
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        literal(value, path, &EVENT_DOMAINS)
    }
}

/// Identifiers of the resources an event concerns.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    pub account_id: AccountId,
    pub environment_id: EnvironmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_id: Option<SpaceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbook_id: Option<WorkbookId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<SheetId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<VersionId>,
    /// Optional and nullable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_slug: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<FileId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preceding_event_id: Option<EventId>,
}

impl Decode for EventContext {
    fn shape() -> String {
        "EventContext".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "EventContext")?;
        let account_id = record.required("accountId");
        let environment_id = record.required("environmentId");
        let space_id = record.optional("spaceId");
        let workbook_id = record.optional("workbookId");
        let sheet_id = record.optional("sheetId");
        let version_id = record.optional("versionId");
        let sheet_slug = record.optional("sheetSlug");
        let job_id = record.optional("jobId");
        let file_id = record.optional("fileId");
        let preceding_event_id = record.optional("precedingEventId");
        record.finish(|| {
            Some(EventContext {
                account_id: account_id?,
                environment_id: environment_id?,
                space_id: space_id?,
                workbook_id: workbook_id?,
                sheet_id: sheet_id?,
                version_id: version_id?,
                sheet_slug: sheet_slug?,
                job_id: job_id?,
                file_id: file_id?,
                preceding_event_id: preceding_event_id?,
            })
        })
    }
}

/// Progress of a long-running job, all members optional.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Progress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

impl Decode for Progress {
    fn shape() -> String {
        "Progress".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "Progress")?;
        let current = record.optional("current");
        let total = record.optional("total");
        let percent = record.optional("percent");
        record.finish(|| {
            Some(Progress {
                current: current?,
                total: total?,
                percent: percent?,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct EventAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
}

impl Decode for EventAttributes {
    fn shape() -> String {
        "EventAttributes".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "EventAttributes")?;
        let progress = record.optional("progress");
        record.finish(|| Some(EventAttributes { progress: progress? }))
    }
}

/// An event emitted by the platform.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub domain: EventDomain,
    pub topic: EventTopic,
    pub context: EventContext,
    /// Topic-specific body; not validated further. An absent `payload`
    /// decodes as `null`.
    pub payload: Value,
    /// Required but nullable: `null` until someone acknowledges the event.
    pub acknowledged_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<EventAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged_by: Option<UserId>,
}

impl Decode for Event {
    fn shape() -> String {
        "Event".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "Event")?;
        let id = record.required("id");
        let domain = record.required("domain");
        let topic = record.required("topic");
        let context = record.required("context");
        let payload = record.optional("payload");
        let acknowledged_at = record.required("acknowledgedAt");
        let attributes = record.optional("attributes");
        let callback_url = record.optional("callbackUrl");
        let data_url = record.optional("dataUrl");
        let created_at = record.optional("createdAt");
        let acknowledged_by = record.optional("acknowledgedBy");
        record.finish(|| {
            Some(Event {
                id: id?,
                domain: domain?,
                topic: topic?,
                context: context?,
                payload: payload?.unwrap_or(Value::Null),
                acknowledged_at: acknowledged_at?,
                attributes: attributes?,
                callback_url: callback_url?,
                data_url: data_url?,
                created_at: created_at?,
                acknowledged_by: acknowledged_by?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatfile_core::decode;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "us_evt_0123456789abcdef",
            "domain": "workbook",
            "topic": "records:created",
            "context": {
                "accountId": "us_acc_abcd1234",
                "environmentId": "us_env_abcd1234",
                "workbookId": "us_wb_abcd1234",
                "sheetSlug": null
            },
            "payload": { "recordIds": [1, 2, 3] },
            "acknowledgedAt": null,
            "attributes": { "progress": { "current": 5, "total": 10, "percent": 50 } },
            "createdAt": "2026-10-18T09:00:00Z"
        })
    }

    #[test]
    fn decodes_full_event() {
        let event: Event = decode(&sample()).unwrap();
        assert_eq!(event.domain, EventDomain::Workbook);
        assert_eq!(event.acknowledged_at, None);
        assert_eq!(event.context.sheet_slug, Some(None));
        assert_eq!(event.context.space_id, None);
        assert_eq!(event.payload["recordIds"][2], json!(3));
        let progress = event.attributes.clone().and_then(|a| a.progress).unwrap();
        assert_eq!(progress.percent, Some(50.0));

        let back: Event = decode(&serde_json::to_value(&event).unwrap()).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn acknowledged_at_is_required_even_though_nullable() {
        let mut json = sample();
        json.as_object_mut().unwrap().remove("acknowledgedAt");
        let err = decode::<Event>(&json).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert_eq!(err.failures()[0].path.to_string(), "acknowledgedAt");
        assert_eq!(err.failures()[0].expected, "string | null");
    }

    #[test]
    fn missing_payload_decodes_as_null() {
        let mut json = sample();
        json.as_object_mut().unwrap().remove("payload");
        let event: Event = decode(&json).unwrap();
        assert_eq!(event.payload, Value::Null);

        json["payload"] = Value::Null;
        assert_eq!(decode::<Event>(&json).unwrap().payload, Value::Null);
    }

    #[test]
    fn event_domain_is_narrower_than_topic_domain() {
        let mut json = sample();
        json["domain"] = json!("records");
        let err = decode::<Event>(&json).unwrap_err();
        assert!(err.has_failure_at("domain"));
    }

    #[test]
    fn short_event_id_rejected() {
        let mut json = sample();
        json["id"] = json!("us_evt_abcd1234");
        json["context"]["precedingEventId"] = json!("us_evt_abcd1234");
        let err = decode::<Event>(&json).unwrap_err();
        let paths: Vec<String> = err.failures().iter().map(|f| f.path.to_string()).collect();
        assert_eq!(paths, vec!["id", "context.precedingEventId"]);
    }
}
