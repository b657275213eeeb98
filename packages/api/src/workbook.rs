//! Workbooks: `GET workbooks?spaceId=…`, `POST workbooks`.

use flatfile_core::{Decode, Decoded, EnvironmentId, Path, Record, SpaceId, WorkbookId};
use serde::Serialize;
use serde_json::Value;

use crate::sheet::{Sheet, SheetInput};

/// A workbook and the sheets it contains.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub id: WorkbookId,
    pub name: String,
    pub labels: Vec<String>,
    pub space_id: SpaceId,
    pub environment_id: EnvironmentId,
    pub sheets: Vec<Sheet>,
}

impl Decode for Workbook {
    fn shape() -> String {
        "Workbook".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "Workbook")?;
        let id = record.required("id");
        let name = record.required("name");
        let labels = record.required("labels");
        let space_id = record.required("spaceId");
        let environment_id = record.required("environmentId");
        let sheets = record.required("sheets");
        record.finish(|| {
            Some(Workbook {
                id: id?,
                name: name?,
                labels: labels?,
                space_id: space_id?,
                environment_id: environment_id?,
                sheets: sheets?,
            })
        })
    }
}

/// Request body for `POST workbooks`.
///
/// Also decodable, so a workbook definition read from a file is validated
/// before it is sent.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkbookInput {
    pub name: String,
    pub space_id: SpaceId,
    pub environment_id: EnvironmentId,
    pub sheets: Vec<SheetInput>,
}

impl Decode for WorkbookInput {
    fn shape() -> String {
        "WorkbookInput".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "WorkbookInput")?;
        let name = record.required("name");
        let space_id = record.required("spaceId");
        let environment_id = record.required("environmentId");
        let sheets = record.required("sheets");
        record.finish(|| {
            Some(WorkbookInput {
                name: name?,
                space_id: space_id?,
                environment_id: environment_id?,
                sheets: sheets?,
            })
        })
    }
}

/// Query parameters for `GET workbooks`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkbooksQuery {
    pub space_id: SpaceId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Field;
    use flatfile_core::decode;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": "us_wb_abcd1234",
            "name": "Onboarding",
            "labels": ["primary"],
            "spaceId": "us_sp_abcd1234",
            "environmentId": "us_env_abcd1234",
            "sheets": [{
                "id": "us_sh_abcd1234",
                "name": "Contacts",
                "config": {
                    "name": "Contacts",
                    "slug": "contacts",
                    "fields": [
                        { "type": "string", "key": "firstName", "label": "First name" },
                        { "type": "number", "key": "age" }
                    ]
                }
            }]
        })
    }

    #[test]
    fn decodes_nested_sheets() {
        let wb: Workbook = decode(&sample()).unwrap();
        assert_eq!(wb.sheets.len(), 1);
        assert!(matches!(wb.sheets[0].config.fields[1], Field::Number(_)));

        let back: Workbook = decode(&serde_json::to_value(&wb).unwrap()).unwrap();
        assert_eq!(back, wb);
    }

    #[test]
    fn deep_failure_paths() {
        let mut json = sample();
        json["sheets"][0]["config"]["fields"][1]["type"] = json!("integer");
        json["labels"] = json!(["primary", 3]);
        let err = decode::<Workbook>(&json).unwrap_err();
        let paths: Vec<String> = err.failures().iter().map(|f| f.path.to_string()).collect();
        assert_eq!(paths, vec!["labels[1]", "sheets[0].config.fields[1].type"]);
    }

    #[test]
    fn input_decodes_from_definition() {
        let input: WorkbookInput = decode(&json!({
            "name": "Onboarding",
            "spaceId": "us_sp_abcd1234",
            "environmentId": "us_env_abcd1234",
            "sheets": [{ "name": "Contacts", "fields": [{ "type": "string", "key": "email" }] }]
        }))
        .unwrap();
        assert_eq!(input.sheets[0].fields[0].key(), "email");

        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body["spaceId"], json!("us_sp_abcd1234"));
        assert_eq!(body["sheets"][0]["fields"][0]["type"], json!("string"));
    }
}
