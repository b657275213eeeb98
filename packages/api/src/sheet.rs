//! Sheets and their field definitions.
//!
//! A sheet's schema is a list of [`Field`]s, a union tagged by `type`.
//! Every field shares the [`FieldBase`] members; `enum` and `reference`
//! fields add a `config` object and an `is_array` flag.

use flatfile_core::{literal, Decode, Decoded, Path, Record, SheetId, Variants};
use serde::Serialize;
use serde_json::Value;

/// Kind of a field [`Constraint`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintKind {
    Required,
    Unique,
}

const CONSTRAINT_KINDS: [(&str, ConstraintKind); 2] = [
    ("required", ConstraintKind::Required),
    ("unique", ConstraintKind::Unique),
];

impl Decode for ConstraintKind {
    fn shape() -> String {
        flatfile_core::schema::literal_shape(&["required", "unique"])
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        literal(value, path, &CONSTRAINT_KINDS)
    }
}

/// `{ "type": "required" }` or `{ "type": "unique" }`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Constraint {
    #[serde(rename = "type")]
    pub kind: ConstraintKind,
}

impl Decode for Constraint {
    fn shape() -> String {
        "Constraint".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "Constraint")?;
        let kind = record.required("type");
        record.finish(|| Some(Constraint { kind: kind? }))
    }
}

/// Members shared by every field variant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldBase {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<Constraint>>,
}

impl FieldBase {
    /// A base with only the required `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            description: None,
            constraints: None,
        }
    }

    fn read(record: &mut Record<'_>) -> Option<Self> {
        let key = record.required("key");
        let label = record.optional("label");
        let description = record.optional("description");
        let constraints = record.optional("constraints");
        Some(FieldBase {
            key: key?,
            label: label?,
            description: description?,
            constraints: constraints?,
        })
    }
}

/// One choice of an `enum` field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnumOption {
    pub value: String,
    pub label: String,
}

impl Decode for EnumOption {
    fn shape() -> String {
        "EnumOption".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "EnumOption")?;
        let option_value = record.required("value");
        let label = record.required("label");
        record.finish(|| {
            Some(EnumOption {
                value: option_value?,
                label: label?,
            })
        })
    }
}

/// `config` of an `enum` field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnumConfig {
    pub options: Vec<EnumOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_custom: Option<bool>,
}

impl Decode for EnumConfig {
    fn shape() -> String {
        "EnumConfig".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "EnumConfig")?;
        let options = record.required("options");
        let allow_custom = record.optional("allow_custom");
        record.finish(|| {
            Some(EnumConfig {
                options: options?,
                allow_custom: allow_custom?,
            })
        })
    }
}

/// Cardinality of a `reference` field.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Relationship {
    HasOne,
    HasMany,
}

const RELATIONSHIPS: [(&str, Relationship); 2] = [
    ("has-one", Relationship::HasOne),
    ("has-many", Relationship::HasMany),
];

impl Decode for Relationship {
    fn shape() -> String {
        flatfile_core::schema::literal_shape(&["has-one", "has-many"])
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        literal(value, path, &RELATIONSHIPS)
    }
}

/// `config` of a `reference` field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReferenceConfig {
    /// Slug of the referenced sheet. Sent as `ref`.
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Relationship>,
}

impl Decode for ReferenceConfig {
    fn shape() -> String {
        "ReferenceConfig".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "ReferenceConfig")?;
        let reference = record.required("ref");
        let key = record.optional("key");
        let relationship = record.optional("relationship");
        record.finish(|| {
            Some(ReferenceConfig {
                reference: reference?,
                key: key?,
                relationship: relationship?,
            })
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnumField {
    #[serde(flatten)]
    pub base: FieldBase,
    pub config: EnumConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_array: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReferenceField {
    #[serde(flatten)]
    pub base: FieldBase,
    pub config: ReferenceConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_array: Option<bool>,
}

/// A sheet field, tagged by `type`.
///
/// Variant order: `string`, `date`, `boolean`, `number`, `enum`,
/// `reference`. The first variant whose literal equals `type` is selected.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Field {
    String(FieldBase),
    Date(FieldBase),
    Boolean(FieldBase),
    Number(FieldBase),
    Enum(EnumField),
    Reference(ReferenceField),
}

impl Field {
    pub fn base(&self) -> &FieldBase {
        match self {
            Field::String(base) | Field::Date(base) | Field::Boolean(base) | Field::Number(base) => {
                base
            }
            Field::Enum(field) => &field.base,
            Field::Reference(field) => &field.base,
        }
    }

    pub fn key(&self) -> &str {
        &self.base().key
    }
}

impl Decode for Field {
    fn shape() -> String {
        "Field".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        Variants::new(value, path, "type", "Field")
            .variant("string", |v, p| plain_field(v, p, "StringField").map(Field::String))
            .variant("date", |v, p| plain_field(v, p, "DateField").map(Field::Date))
            .variant("boolean", |v, p| plain_field(v, p, "BooleanField").map(Field::Boolean))
            .variant("number", |v, p| plain_field(v, p, "NumberField").map(Field::Number))
            .variant("enum", |v, p| {
                let mut record = Record::new(v, p, "EnumField")?;
                let base = FieldBase::read(&mut record);
                let config = record.required("config");
                let is_array = record.optional("is_array");
                record.finish(|| {
                    Some(Field::Enum(EnumField {
                        base: base?,
                        config: config?,
                        is_array: is_array?,
                    }))
                })
            })
            .variant("reference", |v, p| {
                let mut record = Record::new(v, p, "ReferenceField")?;
                let base = FieldBase::read(&mut record);
                let config = record.required("config");
                let is_array = record.optional("is_array");
                record.finish(|| {
                    Some(Field::Reference(ReferenceField {
                        base: base?,
                        config: config?,
                        is_array: is_array?,
                    }))
                })
            })
            .finish()
    }
}

fn plain_field(value: &Value, path: &Path, shape: &str) -> Decoded<FieldBase> {
    let mut record = Record::new(value, path, shape)?;
    let base = FieldBase::read(&mut record);
    record.finish(|| base)
}

/// Schema of a sheet.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SheetConfig {
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Decode for SheetConfig {
    fn shape() -> String {
        "SheetConfig".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "SheetConfig")?;
        let name = record.required("name");
        let fields = record.required("fields");
        let description = record.optional("description");
        let slug = record.optional("slug");
        record.finish(|| {
            Some(SheetConfig {
                name: name?,
                fields: fields?,
                description: description?,
                slug: slug?,
            })
        })
    }
}

/// A sheet inside a workbook.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Sheet {
    pub id: SheetId,
    pub name: String,
    pub config: SheetConfig,
}

impl Decode for Sheet {
    fn shape() -> String {
        "Sheet".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "Sheet")?;
        let id = record.required("id");
        let name = record.required("name");
        let config = record.required("config");
        record.finish(|| {
            Some(Sheet {
                id: id?,
                name: name?,
                config: config?,
            })
        })
    }
}

/// A sheet as submitted when creating a workbook.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SheetInput {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Decode for SheetInput {
    fn shape() -> String {
        "SheetInput".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let mut record = Record::new(value, path, "SheetInput")?;
        let name = record.required("name");
        let fields = record.required("fields");
        record.finish(|| {
            Some(SheetInput {
                name: name?,
                fields: fields?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatfile_core::decode;
    use serde_json::json;

    #[test]
    fn plain_variants() {
        for (tag, expect) in [
            ("string", "String"),
            ("date", "Date"),
            ("boolean", "Boolean"),
            ("number", "Number"),
        ] {
            let field: Field = decode(&json!({ "type": tag, "key": "k" })).unwrap();
            assert!(format!("{field:?}").starts_with(expect));
            assert_eq!(field.key(), "k");
        }
    }

    #[test]
    fn enum_discriminant_selects_enum_variant() {
        // Carries every member a plain field needs, but `type` picks `enum`.
        let field: Field = decode(&json!({
            "type": "enum",
            "key": "status",
            "label": "Status",
            "config": { "options": [{ "value": "open", "label": "Open" }], "allow_custom": false },
            "is_array": true
        }))
        .unwrap();
        match field {
            Field::Enum(f) => {
                assert_eq!(f.config.options.len(), 1);
                assert_eq!(f.config.allow_custom, Some(false));
                assert_eq!(f.is_array, Some(true));
            }
            other => panic!("expected enum field, got {other:?}"),
        }
    }

    #[test]
    fn selected_variant_failures_are_reported_without_fallback() {
        let err = decode::<Field>(&json!({ "type": "enum", "key": "status" })).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert!(err.has_failure_at("config"));
        assert_eq!(err.failures()[0].expected, "EnumConfig");
    }

    #[test]
    fn unknown_field_type() {
        let err = decode::<Field>(&json!({ "type": "currency", "key": "amount" })).unwrap_err();
        let failure = &err.failures()[0];
        assert_eq!(failure.path.to_string(), "type");
        assert_eq!(
            failure.expected,
            r#""string" | "date" | "boolean" | "number" | "enum" | "reference""#
        );
    }

    #[test]
    fn reference_field() {
        let field: Field = decode(&json!({
            "type": "reference",
            "key": "owner",
            "constraints": [{ "type": "required" }],
            "config": { "ref": "contacts", "key": "email", "relationship": "has-one" }
        }))
        .unwrap();
        let Field::Reference(f) = &field else {
            panic!("expected reference field");
        };
        assert_eq!(f.config.reference, "contacts");
        assert_eq!(f.config.relationship, Some(Relationship::HasOne));
        assert_eq!(
            f.base.constraints,
            Some(vec![Constraint {
                kind: ConstraintKind::Required
            }])
        );

        let back: Field = decode(&serde_json::to_value(&field).unwrap()).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn bad_relationship_and_constraint_collected_together() {
        let err = decode::<Field>(&json!({
            "type": "reference",
            "key": "owner",
            "constraints": [{ "type": "optional" }],
            "config": { "ref": "contacts", "relationship": "many" }
        }))
        .unwrap_err();
        let paths: Vec<String> = err.failures().iter().map(|f| f.path.to_string()).collect();
        assert_eq!(paths, vec!["constraints[0].type", "config.relationship"]);
    }

    #[test]
    fn field_serialises_with_type_tag() {
        let field = Field::Enum(EnumField {
            base: FieldBase::new("status"),
            config: EnumConfig {
                options: vec![EnumOption {
                    value: "open".into(),
                    label: "Open".into(),
                }],
                allow_custom: None,
            },
            is_array: None,
        });
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            json!({
                "type": "enum",
                "key": "status",
                "config": { "options": [{ "value": "open", "label": "Open" }] }
            })
        );
    }

    #[test]
    fn sheet_roundtrip() {
        let sheet = Sheet {
            id: SheetId::parse("dev_sh_abcd1234").unwrap(),
            name: "Contacts".into(),
            config: SheetConfig {
                name: "Contacts".into(),
                fields: vec![Field::String(FieldBase::new("email")), Field::Date(FieldBase::new("dob"))],
                description: None,
                slug: Some("contacts".into()),
            },
        };
        let back: Sheet = decode(&serde_json::to_value(&sheet).unwrap()).unwrap();
        assert_eq!(back, sheet);
    }
}
