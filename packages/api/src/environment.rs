//! Environments: `GET environments`, `POST environments`.

use flatfile_core::{AccountId, Decode, Decoded, EnvironmentId, Path, Record};
use serde::Serialize;
use serde_json::Value;

/// An environment (e.g. a development or production workspace).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
    pub is_prod: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<AccountId>,
}

impl Decode for Environment {
    fn shape() -> String {
        "Environment".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "Environment")?;
        let id = record.required("id");
        let name = record.required("name");
        let is_prod = record.required("isProd");
        let account_id = record.optional("accountId");
        record.finish(|| {
            Some(Environment {
                id: id?,
                name: name?,
                is_prod: is_prod?,
                account_id: account_id?,
            })
        })
    }
}

/// Request body for `POST environments`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentRequest {
    pub name: String,
    pub is_prod: bool,
}
