//! Declarative parameter schemas and the generic validation routine.
//!
//! A schema is an ordered list of named, typed fields with required
//! flags, interpreted by [`ParamSchema::validate`] — no reflection, no
//! derive magic. Validation rejects missing required fields, wrong
//! types, and unknown fields, and reports every violation at once so
//! the caller can correct input in a single round trip.

use serde_json::{json, Map, Value};
use thiserror::Error;

/// Type of a schema field, checked against the raw JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// JSON string.
    String,
    /// JSON number representable as `i64`.
    Integer,
    /// Any JSON number.
    Float,
    /// JSON boolean.
    Boolean,
    /// JSON object.
    Object,
    /// JSON array.
    Array,
}

impl FieldType {
    /// Wire/display name of the type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Returns `true` if the value conforms to this type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.as_i64().is_some() || value.as_u64().is_some(),
            Self::Float => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }

    fn name_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, typed field in a command's parameter schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    field_type: FieldType,
    required: bool,
    description: String,
}

impl FieldSpec {
    /// Creates a required field.
    #[must_use]
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            description: String::new(),
        }
    }

    /// Creates an optional field.
    #[must_use]
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(name, field_type)
        }
    }

    /// Attaches a human-readable description for discovery output.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field type.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Whether the field must be present.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Field description (may be empty).
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Ordered set of fields describing a command's parameters.
///
/// Field order is preserved for deterministic discovery output.
///
/// # Example
///
/// ```
/// use relay_command::{FieldType, ParamSchema};
/// use serde_json::json;
///
/// let schema = ParamSchema::new()
///     .field_required("text", FieldType::String)
///     .field_optional("repeat", FieldType::Integer);
///
/// let params = schema.validate(&json!({"text": "hi"})).unwrap();
/// assert_eq!(params.str("text"), Some("hi"));
/// assert!(params.i64("repeat").is_none());
///
/// assert!(schema.validate(&json!({"text": 7})).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    fields: Vec<FieldSpec>,
}

impl ParamSchema {
    /// Creates an empty schema (commands taking no parameters).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field spec.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Shorthand for appending a required field.
    #[must_use]
    pub fn field_required(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(FieldSpec::required(name, field_type))
    }

    /// Shorthand for appending an optional field.
    #[must_use]
    pub fn field_optional(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(FieldSpec::optional(name, field_type))
    }

    /// The fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validates a raw payload against this schema.
    ///
    /// Collects every violation rather than stopping at the first:
    /// missing required fields, type mismatches, and unknown fields.
    /// The payload itself must be a JSON object (`null` is treated as
    /// an empty object, matching the transport's "params optional"
    /// behavior).
    ///
    /// # Errors
    ///
    /// Returns [`ParamViolations`] listing each field and its
    /// violation.
    pub fn validate(&self, raw: &Value) -> Result<Params, ParamViolations> {
        let empty = Map::new();
        let object = match raw {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(ParamViolations(vec![Violation {
                    field: String::new(),
                    detail: format!(
                        "parameters must be an object, got {}",
                        FieldType::name_of(other)
                    ),
                }]))
            }
        };

        let mut violations = Vec::new();
        let mut validated = Map::new();

        for spec in &self.fields {
            match object.get(spec.name()) {
                Some(value) if spec.field_type().matches(value) => {
                    validated.insert(spec.name().to_string(), value.clone());
                }
                Some(value) => violations.push(Violation {
                    field: spec.name().to_string(),
                    detail: format!(
                        "expected {}, got {}",
                        spec.field_type(),
                        FieldType::name_of(value)
                    ),
                }),
                None if spec.is_required() => violations.push(Violation {
                    field: spec.name().to_string(),
                    detail: "required field is missing".to_string(),
                }),
                None => {}
            }
        }

        for name in object.keys() {
            if !self.fields.iter().any(|spec| spec.name() == name) {
                violations.push(Violation {
                    field: name.clone(),
                    detail: "unknown field".to_string(),
                });
            }
        }

        if violations.is_empty() {
            Ok(Params(validated))
        } else {
            Err(ParamViolations(violations))
        }
    }
}

/// Validated parameters handed to a [`crate::Runnable`].
///
/// Only fields present in the schema survive validation, so typed
/// accessors on required fields are guaranteed to succeed.
#[derive(Debug, Clone, Default)]
pub struct Params(Map<String, Value>);

impl Params {
    /// Raw access to a validated field.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String field accessor.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Integer field accessor.
    #[must_use]
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    /// Float field accessor.
    #[must_use]
    pub fn f64(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    /// Boolean field accessor.
    #[must_use]
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    /// Consumes into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// A single field violation: which field, and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Offending field name (empty for payload-level violations).
    pub field: String,
    /// Human-readable description of the violation.
    pub detail: String,
}

/// All violations found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid parameters: {}", self.summary())]
pub struct ParamViolations(Vec<Violation>);

impl ParamViolations {
    /// The individual violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Structured payload for the terminal `invalid_parameters` event,
    /// shaped `[{"field": ..., "detail": ...}, ...]`.
    #[must_use]
    pub fn to_data(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|v| json!({"field": v.field, "detail": v.detail}))
                .collect(),
        )
    }

    fn summary(&self) -> String {
        self.0
            .iter()
            .map(|v| {
                if v.field.is_empty() {
                    v.detail.clone()
                } else {
                    format!("{}: {}", v.field, v.detail)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ParamSchema {
        ParamSchema::new()
            .field(FieldSpec::required("text", FieldType::String).with_description("message text"))
            .field_required("count", FieldType::Integer)
            .field_optional("verbose", FieldType::Boolean)
    }

    #[test]
    fn valid_payload_passes() {
        let params = schema()
            .validate(&json!({"text": "hi", "count": 3, "verbose": true}))
            .expect("valid");

        assert_eq!(params.str("text"), Some("hi"));
        assert_eq!(params.i64("count"), Some(3));
        assert_eq!(params.bool("verbose"), Some(true));
    }

    #[test]
    fn optional_field_may_be_absent() {
        let params = schema()
            .validate(&json!({"text": "hi", "count": 1}))
            .expect("valid");
        assert!(params.bool("verbose").is_none());
    }

    #[test]
    fn missing_required_field_reported() {
        let err = schema().validate(&json!({"count": 1})).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field, "text");
        assert!(err.violations()[0].detail.contains("missing"));
    }

    #[test]
    fn wrong_type_names_field_and_types() {
        let err = schema()
            .validate(&json!({"text": "hi", "count": "abc"}))
            .unwrap_err();

        assert_eq!(err.violations()[0].field, "count");
        assert!(err.violations()[0].detail.contains("expected integer"));
        assert!(err.violations()[0].detail.contains("got string"));
    }

    #[test]
    fn unknown_field_rejected() {
        let err = schema()
            .validate(&json!({"text": "hi", "count": 1, "extra": 9}))
            .unwrap_err();

        assert_eq!(err.violations()[0].field, "extra");
        assert_eq!(err.violations()[0].detail, "unknown field");
    }

    #[test]
    fn multiple_violations_collected() {
        let err = schema()
            .validate(&json!({"count": "abc", "extra": 1}))
            .unwrap_err();

        let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert!(fields.contains(&"text")); // missing
        assert!(fields.contains(&"count")); // wrong type
        assert!(fields.contains(&"extra")); // unknown
    }

    #[test]
    fn non_object_payload_rejected() {
        let err = schema().validate(&json!([1, 2, 3])).unwrap_err();
        assert!(err.violations()[0].detail.contains("must be an object"));
    }

    #[test]
    fn null_payload_is_empty_object() {
        let empty = ParamSchema::new();
        assert!(empty.validate(&Value::Null).is_ok());

        // Still fails required fields.
        assert!(schema().validate(&Value::Null).is_err());
    }

    #[test]
    fn integer_rejects_float() {
        let s = ParamSchema::new().field_required("count", FieldType::Integer);
        assert!(s.validate(&json!({"count": 1.5})).is_err());
        assert!(s.validate(&json!({"count": 2})).is_ok());
    }

    #[test]
    fn float_accepts_any_number() {
        let s = ParamSchema::new().field_required("ratio", FieldType::Float);
        assert!(s.validate(&json!({"ratio": 1.5})).is_ok());
        assert!(s.validate(&json!({"ratio": 2})).is_ok());
    }

    #[test]
    fn violations_data_payload_shape() {
        let err = schema().validate(&json!({"count": "abc"})).unwrap_err();
        let data = err.to_data();

        let entries = data.as_array().expect("array");
        assert!(entries
            .iter()
            .any(|e| e["field"] == json!("count") && e["detail"].as_str().is_some()));
    }

    #[test]
    fn display_lists_violations() {
        let err = schema().validate(&json!({})).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("invalid parameters"));
        assert!(text.contains("text"));
        assert!(text.contains("count"));
    }

    #[test]
    fn field_order_preserved_for_discovery() {
        let s = schema();
        let names: Vec<_> = s.fields().iter().map(FieldSpec::name).collect();
        assert_eq!(names, ["text", "count", "verbose"]);
    }
}
