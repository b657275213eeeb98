//! Structural decoding of untyped JSON into typed values.
//!
//! Every shape the API exchanges implements [`Decode`]. Decoding is total:
//! a record checks every declared field and an array checks every element,
//! so a single pass reports every problem in the value. Failures are
//! collected in traversal order (record fields in declaration order, array
//! elements by index) and each one carries the [`Path`] to the offending
//! value, the shape that was expected there, and the value actually found.
//!
//! Shapes are composed from a small set of building blocks:
//!
//! | Building block | Used for |
//! |----------------|----------|
//! | [`Record`] | required fields intersected with optional fields |
//! | [`Variants`] | unions tagged by a discriminant field (first match wins) |
//! | [`literal`] | closed sets of string literals |
//! | `Vec<T>` | arrays |
//! | `Option<T>` | nullable values (`null` decodes to `None`) |
//!
//! Optional fields are not nullable: an optional key may be absent, but if
//! present its value must decode as the field's shape. A field that is both
//! optional and nullable is read with [`Record::optional`] as `Option<T>`,
//! giving `Option<Option<T>>`.

use std::fmt;

use serde_json::{Map, Value};

/// Result of decoding one value: the typed value or every failure found in it.
pub type Decoded<T> = Result<T, Vec<Failure>>;

/// One step from a parent value into a child value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// An object member.
    Key(String),
    /// An array element.
    Index(usize),
}

/// Location of a value inside the document being decoded.
///
/// Renders as `data.sheets[0].config.name`; the document root renders as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The path of the member `key` of the value at this path.
    pub fn key(&self, key: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Key(key.to_string()));
        Self(segments)
    }

    /// The path of element `index` of the array at this path.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// Where in the document the failure occurred.
    pub path: Path,
    /// Name of the shape expected at `path`.
    pub expected: String,
    /// The value found at `path`; `None` when the key was absent.
    pub actual: Option<Value>,
}

impl Failure {
    pub fn new(path: Path, expected: impl Into<String>, actual: Option<Value>) -> Self {
        Self {
            path,
            expected: expected.into(),
            actual,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.actual {
            Some(value) => write!(f, "{}: expected {}, found {}", self.path, self.expected, value),
            None => write!(f, "{}: expected {}, found nothing", self.path, self.expected),
        }
    }
}

/// The complete, non-empty list of failures from decoding one document.
///
/// Displays as one failure per line.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeErrors(Vec<Failure>);

impl DecodeErrors {
    pub fn failures(&self) -> &[Failure] {
        &self.0
    }

    pub fn into_failures(self) -> Vec<Failure> {
        self.0
    }

    /// Each failure rendered as `path: expected <shape>, found <value>`.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// Whether any failure is located exactly at `path` (e.g. `"data.id"`).
    pub fn has_failure_at(&self, path: &str) -> bool {
        self.0.iter().any(|failure| failure.path.to_string() == path)
    }
}

impl fmt::Display for DecodeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for DecodeErrors {}

/// A shape that can be validated and decoded from untyped JSON.
pub trait Decode: Sized {
    /// Human-readable name of the shape, used as `expected` in failures.
    fn shape() -> String;

    /// Decode `value`, located at `path` within the document.
    fn decode_at(value: &Value, path: &Path) -> Decoded<Self>;
}

/// Decode a whole document as `T`.
pub fn decode<T: Decode>(value: &Value) -> Result<T, DecodeErrors> {
    T::decode_at(value, &Path::root()).map_err(DecodeErrors)
}

/// A single failure saying the value at `path` is not of shape `expected`.
pub fn mismatch(path: &Path, expected: impl Into<String>, value: &Value) -> Vec<Failure> {
    vec![Failure::new(path.clone(), expected, Some(value.clone()))]
}

/// Decode one of a closed set of string literals.
///
/// `choices` pairs each accepted literal with the value it decodes to.
pub fn literal<T: Copy>(value: &Value, path: &Path, choices: &[(&str, T)]) -> Decoded<T> {
    value
        .as_str()
        .and_then(|s| choices.iter().find(|(lit, _)| *lit == s))
        .map(|(_, decoded)| *decoded)
        .ok_or_else(|| {
            let literals: Vec<&str> = choices.iter().map(|(lit, _)| *lit).collect();
            mismatch(path, literal_shape(&literals), value)
        })
}

/// `"a" | "b" | "c"`
pub fn literal_shape(literals: &[&str]) -> String {
    literals
        .iter()
        .map(|lit| format!("{lit:?}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

// --- primitives --------------------------------------------------------------

impl Decode for String {
    fn shape() -> String {
        "string".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch(path, Self::shape(), value))
    }
}

impl Decode for bool {
    fn shape() -> String {
        "boolean".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        value
            .as_bool()
            .ok_or_else(|| mismatch(path, Self::shape(), value))
    }
}

impl Decode for f64 {
    fn shape() -> String {
        "number".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        value
            .as_f64()
            .ok_or_else(|| mismatch(path, Self::shape(), value))
    }
}

impl Decode for u64 {
    fn shape() -> String {
        "non-negative integer".into()
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        value
            .as_u64()
            .ok_or_else(|| mismatch(path, Self::shape(), value))
    }
}

/// Any JSON value is accepted as-is.
impl Decode for Value {
    fn shape() -> String {
        "unknown".into()
    }

    fn decode_at(value: &Value, _path: &Path) -> Decoded<Self> {
        Ok(value.clone())
    }
}

// --- combinators -------------------------------------------------------------

impl<T: Decode> Decode for Vec<T> {
    fn shape() -> String {
        format!("Array<{}>", T::shape())
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        let items = value
            .as_array()
            .ok_or_else(|| mismatch(path, Self::shape(), value))?;

        let mut decoded = Vec::with_capacity(items.len());
        let mut failures = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match T::decode_at(item, &path.index(i)) {
                Ok(v) => decoded.push(v),
                Err(f) => failures.extend(f),
            }
        }

        if failures.is_empty() {
            Ok(decoded)
        } else {
            Err(failures)
        }
    }
}

/// Nullable: `null` decodes to `None`, anything else must decode as `T`.
///
/// A mismatch at the value itself names the nullable shape (`T | null`);
/// failures nested inside it keep their own shapes.
impl<T: Decode> Decode for Option<T> {
    fn shape() -> String {
        format!("{} | null", T::shape())
    }

    fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::decode_at(value, path).map(Some).map_err(|failures| {
            failures
                .into_iter()
                .map(|mut failure| {
                    if failure.path == *path {
                        failure.expected = Self::shape();
                    }
                    failure
                })
                .collect()
        })
    }
}

/// Field-by-field decoder for an object shape.
///
/// Each `required`/`optional` call decodes one member and records its
/// failures; [`Record::finish`] returns every collected failure, or builds
/// the typed value when there were none.
///
/// ```rust,ignore
/// let mut record = Record::new(value, path, "Environment")?;
/// let id = record.required("id");
/// let name = record.required("name");
/// let account_id = record.optional("accountId");
/// record.finish(|| Some(Environment { id: id?, name: name?, account_id: account_id? }))
/// ```
pub struct Record<'a> {
    fields: &'a Map<String, Value>,
    path: &'a Path,
    failures: Vec<Failure>,
}

impl<'a> Record<'a> {
    /// Begin decoding `value` as the object shape called `shape`.
    ///
    /// Fails immediately if `value` is not a JSON object.
    pub fn new(value: &'a Value, path: &'a Path, shape: &str) -> Decoded<Self> {
        let fields = value
            .as_object()
            .ok_or_else(|| mismatch(path, shape, value))?;
        Ok(Self {
            fields,
            path,
            failures: Vec::new(),
        })
    }

    /// Decode a member that must be present.
    pub fn required<T: Decode>(&mut self, key: &str) -> Option<T> {
        let path = self.path.key(key);
        match self.fields.get(key) {
            Some(value) => self.collect(T::decode_at(value, &path)),
            None => {
                self.failures.push(Failure::new(path, T::shape(), None));
                None
            }
        }
    }

    /// Decode a member that may be absent. Absent decodes to `Some(None)`;
    /// the outer `None` signals a recorded failure.
    pub fn optional<T: Decode>(&mut self, key: &str) -> Option<Option<T>> {
        match self.fields.get(key) {
            Some(value) => {
                let path = self.path.key(key);
                self.collect(T::decode_at(value, &path)).map(Some)
            }
            None => Some(None),
        }
    }

    /// Record failures produced by a nested decoder that reads the same
    /// object (e.g. a shared base shape).
    pub fn collect<T>(&mut self, decoded: Decoded<T>) -> Option<T> {
        match decoded {
            Ok(value) => Some(value),
            Err(failures) => {
                self.failures.extend(failures);
                None
            }
        }
    }

    /// Path of the object being decoded.
    pub fn path(&self) -> &Path {
        self.path
    }

    /// Return every failure collected so far, or the value built by `build`.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Decoded<T> {
        if !self.failures.is_empty() {
            return Err(self.failures);
        }
        build().ok_or_else(|| vec![Failure::new(self.path.clone(), "complete record", None)])
    }
}

/// Decoder for a union tagged by a discriminant member.
///
/// Variants are tried in the order they are declared; the first variant
/// whose literal equals the discriminant is selected and its result, success
/// or failure, is returned. A discriminant that matches no variant yields one
/// failure at `<path>.<discriminant>` listing every allowed literal.
pub struct Variants<'a, T> {
    value: &'a Value,
    path: &'a Path,
    discriminant: &'static str,
    shape: &'static str,
    tags: Vec<&'static str>,
    selected: Option<Decoded<T>>,
}

impl<'a, T> Variants<'a, T> {
    pub fn new(value: &'a Value, path: &'a Path, discriminant: &'static str, shape: &'static str) -> Self {
        Self {
            value,
            path,
            discriminant,
            shape,
            tags: Vec::new(),
            selected: None,
        }
    }

    /// Declare a variant selected when the discriminant equals `tag`.
    pub fn variant(mut self, tag: &'static str, decode: impl FnOnce(&Value, &Path) -> Decoded<T>) -> Self {
        self.tags.push(tag);
        if self.selected.is_none() && self.tag() == Some(tag) {
            self.selected = Some(decode(self.value, self.path));
        }
        self
    }

    pub fn finish(self) -> Decoded<T> {
        if let Some(decoded) = self.selected {
            return decoded;
        }
        if !self.value.is_object() {
            return Err(mismatch(self.path, self.shape, self.value));
        }
        Err(vec![Failure::new(
            self.path.key(self.discriminant),
            literal_shape(&self.tags),
            self.value.get(self.discriminant).cloned(),
        )])
    }

    fn tag(&self) -> Option<&str> {
        self.value.get(self.discriminant).and_then(Value::as_str)
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Pet {
        name: String,
        age: u64,
        nickname: Option<String>,
        owner: Option<Option<String>>,
    }

    impl Decode for Pet {
        fn shape() -> String {
            "Pet".into()
        }

        fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
            let mut record = Record::new(value, path, "Pet")?;
            let name = record.required("name");
            let age = record.required("age");
            let nickname = record.optional("nickname");
            let owner = record.optional("owner");
            record.finish(|| {
                Some(Pet {
                    name: name?,
                    age: age?,
                    nickname: nickname?,
                    owner: owner?,
                })
            })
        }
    }

    #[derive(Debug, PartialEq)]
    enum Shape {
        Circle(f64),
        Square(f64),
    }

    impl Decode for Shape {
        fn shape() -> String {
            "Shape".into()
        }

        fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
            Variants::new(value, path, "kind", "Shape")
                .variant("circle", |v, p| {
                    let mut r = Record::new(v, p, "Circle")?;
                    let radius = r.required("radius");
                    r.finish(|| Some(Shape::Circle(radius?)))
                })
                .variant("square", |v, p| {
                    let mut r = Record::new(v, p, "Square")?;
                    let side = r.required("side");
                    r.finish(|| Some(Shape::Square(side?)))
                })
                .finish()
        }
    }

    #[test]
    fn path_rendering() {
        assert_eq!(Path::root().to_string(), "$");
        let p = Path::root().key("data").key("sheets").index(2).key("name");
        assert_eq!(p.to_string(), "data.sheets[2].name");
        assert_eq!(Path::root().index(0).key("id").to_string(), "[0].id");
    }

    #[test]
    fn record_with_all_fields() {
        let pet: Pet = decode(&json!({
            "name": "Rex", "age": 3, "nickname": "R", "owner": null
        }))
        .unwrap();
        assert_eq!(pet.nickname.as_deref(), Some("R"));
        assert_eq!(pet.owner, Some(None));
    }

    #[test]
    fn absent_optional_is_not_null() {
        let pet: Pet = decode(&json!({ "name": "Rex", "age": 3 })).unwrap();
        assert_eq!(pet.nickname, None);
        assert_eq!(pet.owner, None);
    }

    #[test]
    fn null_for_optional_non_nullable_fails() {
        let err = decode::<Pet>(&json!({ "name": "Rex", "age": 3, "nickname": null })).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert!(err.has_failure_at("nickname"));
    }

    #[test]
    fn missing_required_field_names_that_field() {
        let err = decode::<Pet>(&json!({ "age": 3 })).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        let failure = &err.failures()[0];
        assert_eq!(failure.path.to_string(), "name");
        assert_eq!(failure.expected, "string");
        assert_eq!(failure.actual, None);
        assert_eq!(err.to_string(), "name: expected string, found nothing");
    }

    #[test]
    fn all_failures_collected_in_declaration_order() {
        let err = decode::<Pet>(&json!({ "name": 7, "age": "old", "nickname": false })).unwrap_err();
        let paths: Vec<String> = err.failures().iter().map(|f| f.path.to_string()).collect();
        assert_eq!(paths, vec!["name", "age", "nickname"]);
    }

    #[test]
    fn non_object_record_fails_at_its_path() {
        let err = decode::<Pet>(&json!([1, 2])).unwrap_err();
        assert_eq!(err.failures()[0].path, Path::root());
        assert_eq!(err.failures()[0].expected, "Pet");
    }

    #[test]
    fn array_reports_every_bad_element() {
        let err = decode::<Vec<String>>(&json!(["a", 1, "c", true])).unwrap_err();
        let paths: Vec<String> = err.failures().iter().map(|f| f.path.to_string()).collect();
        assert_eq!(paths, vec!["[1]", "[3]"]);
    }

    #[test]
    fn nullable_accepts_null_and_value() {
        assert_eq!(decode::<Option<String>>(&json!(null)).unwrap(), None);
        assert_eq!(decode::<Option<String>>(&json!("x")).unwrap(), Some("x".into()));
        let err = decode::<Option<String>>(&json!(1)).unwrap_err();
        assert_eq!(err.failures()[0].expected, "string | null");
    }

    #[test]
    fn nullable_field_names_same_shape_when_absent_or_wrong() {
        #[derive(Debug)]
        struct Ack {
            at: Option<String>,
        }

        impl Decode for Ack {
            fn shape() -> String {
                "Ack".into()
            }

            fn decode_at(value: &Value, path: &Path) -> Decoded<Self> {
                let mut record = Record::new(value, path, "Ack")?;
                let at = record.required("at");
                record.finish(|| Some(Ack { at: at? }))
            }
        }

        let absent = decode::<Ack>(&json!({})).unwrap_err();
        let wrong = decode::<Ack>(&json!({ "at": 5 })).unwrap_err();
        assert_eq!(absent.failures()[0].expected, "string | null");
        assert_eq!(wrong.failures()[0].expected, "string | null");
        assert_eq!(wrong.to_string(), "at: expected string | null, found 5");
        assert!(decode::<Ack>(&json!({ "at": null })).unwrap().at.is_none());
    }

    #[test]
    fn nullable_record_keeps_nested_failure_shapes() {
        let err = decode::<Option<Pet>>(&json!({ "name": "Rex", "age": "old" })).unwrap_err();
        assert_eq!(err.failures()[0].path.to_string(), "age");
        assert_eq!(err.failures()[0].expected, "non-negative integer");

        let err = decode::<Option<Pet>>(&json!(7)).unwrap_err();
        assert_eq!(err.failures()[0].expected, "Pet | null");
    }

    #[test]
    fn tagged_union_selects_by_discriminant() {
        assert_eq!(
            decode::<Shape>(&json!({ "kind": "square", "side": 2.0 })).unwrap(),
            Shape::Square(2.0)
        );
        assert_eq!(
            decode::<Shape>(&json!({ "kind": "circle", "radius": 1.5, "side": 9 })).unwrap(),
            Shape::Circle(1.5)
        );
    }

    #[test]
    fn tagged_union_reports_selected_variant_failures() {
        let err = decode::<Shape>(&json!({ "kind": "circle", "side": 2.0 })).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        assert!(err.has_failure_at("radius"));
    }

    #[test]
    fn unknown_discriminant_lists_allowed_literals() {
        let err = decode::<Shape>(&json!({ "kind": "triangle" })).unwrap_err();
        assert_eq!(err.failures().len(), 1);
        let failure = &err.failures()[0];
        assert_eq!(failure.path.to_string(), "kind");
        assert_eq!(failure.expected, r#""circle" | "square""#);
        assert_eq!(failure.actual, Some(json!("triangle")));

        let err = decode::<Shape>(&json!({ "radius": 1 })).unwrap_err();
        assert_eq!(err.failures()[0].actual, None);
    }

    #[test]
    fn literal_set() {
        let choices = [("has-one", 1u8), ("has-many", 2u8)];
        assert_eq!(literal(&json!("has-many"), &Path::root(), &choices), Ok(2));
        let err = literal(&json!("many"), &Path::root(), &choices).unwrap_err();
        assert_eq!(err[0].expected, r#""has-one" | "has-many""#);
    }
}
