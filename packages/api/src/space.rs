//! Spaces: `GET spaces`, `POST spaces`.

use flatfile_core::{
    Decode, Decoded, DocumentId, EnvironmentId, Path, Record, SpaceConfigId, SpaceId, UserId,
    Variants, WorkbookId,
};
use serde::Serialize;
use serde_json::Value;

/// One entry of a space's sidebar, tagged by `type`.
///
/// Variant order: `workbook`, `document`, `link`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarConfig {
    Workbook {
        #[serde(rename = "workbookId")]
        workbook_id: WorkbookId,
    },
    Document {
        #[serde(rename = "documentId")]
        document_id: DocumentId,
    },
    Link { href: String, title: String },
}

impl Decode for SidebarConfig {
    fn shape() -> String {
        "SidebarConfig".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        Variants::new(value, path, "type", "SidebarConfig")
            .variant("workbook", |v, p| {
                let mut record = Record::new(v, p, "WorkbookSidebarConfig")?;
                let workbook_id = record.required("workbookId");
                record.finish(|| {
                    Some(SidebarConfig::Workbook {
                        workbook_id: workbook_id?,
                    })
                })
            })
            .variant("document", |v, p| {
                let mut record = Record::new(v, p, "DocumentSidebarConfig")?;
                let document_id = record.required("documentId");
                record.finish(|| {
                    Some(SidebarConfig::Document {
                        document_id: document_id?,
                    })
                })
            })
            .variant("link", |v, p| {
                let mut record = Record::new(v, p, "LinkSidebarConfig")?;
                let href = record.required("href");
                let title = record.required("title");
                record.finish(|| {
                    Some(SidebarConfig::Link {
                        href: href?,
                        title: title?,
                    })
                })
            })
            .finish()
    }
}

/// A space: the container users collaborate in.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: SpaceId,
    pub space_config_id: SpaceConfigId,
    pub environment_id: EnvironmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbooks_count: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_workbook_id: Option<WorkbookId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<f64>,
    /// Optional and nullable: `None` when absent, `Some(None)` when `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_configs: Option<Option<Vec<SidebarConfig>>>,
}

impl Decode for Space {
    fn shape() -> String {
        "Space".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "Space")?;
        let id = record.required("id");
        let space_config_id = record.required("spaceConfigId");
        let environment_id = record.required("environmentId");
        let workbooks_count = record.optional("workbooksCount");
        let created_by_user_id = record.optional("createdByUserId");
        let created_by_user_name = record.optional("createdByUserName");
        let guest_link = record.optional("guestLink");
        let primary_workbook_id = record.optional("primaryWorkbookId");
        let name = record.optional("name");
        let display_order = record.optional("displayOrder");
        let sidebar_configs = record.optional("sidebarConfigs");
        record.finish(|| {
            Some(Space {
                id: id?,
                space_config_id: space_config_id?,
                environment_id: environment_id?,
                workbooks_count: workbooks_count?,
                created_by_user_id: created_by_user_id?,
                created_by_user_name: created_by_user_name?,
                guest_link: guest_link?,
                primary_workbook_id: primary_workbook_id?,
                name: name?,
                display_order: display_order?,
                sidebar_configs: sidebar_configs?,
            })
        })
    }
}

/// Request body for `POST spaces`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    pub space_config_id: SpaceConfigId,
    pub environment_id: EnvironmentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_workbook_id: Option<WorkbookId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
