//! Derived argument validators
//!
//! Each catalog action carries a JSON-Schema-like input description. Instead
//! of generating types, the description is compiled into a data-driven
//! [`ArgsValidator`] (field list + kind + required set) evaluated against the
//! argument map at call time. The original schema JSON is kept verbatim as
//! the proxy's externally-visible schema.

use crate::{HubError, Result};
use serde_json::{Map, Value, json};

/// Supported primitive kinds for action input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Number,
    Array,
    Boolean,
    String,
    Null,
}

impl FieldKind {
    /// Map a JSON schema `type` string to a kind
    ///
    /// Unsupported kinds are a fatal construction error, not a soft fallback.
    pub fn from_type_name(name: &str) -> Result<Self> {
        match name {
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "array" => Ok(Self::Array),
            "boolean" => Ok(Self::Boolean),
            "string" => Ok(Self::String),
            "null" => Ok(Self::Null),
            other => Err(HubError::Schema(format!("Unsupported field type '{other}'"))),
        }
    }

    /// Kind-appropriate zero value, used as the default for optional fields
    pub fn zero_value(self) -> Value {
        match self {
            Self::Integer => json!(0),
            Self::Number => json!(0.0),
            Self::Array => json!([]),
            Self::Boolean => json!(false),
            Self::String => json!(""),
            Self::Null => Value::Null,
        }
    }

    /// Check that a value structurally matches this kind
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Array => value.is_array(),
            Self::Boolean => value.is_boolean(),
            Self::String => value.is_string(),
            Self::Null => value.is_null(),
        }
    }
}

/// One declared input field
#[derive(Debug, Clone)]
struct FieldSpec {
    name: String,
    kind: FieldKind,
    required: bool,
}

/// Argument validator synthesized from an action's input schema
///
/// Validation is permissive about undeclared fields: anything beyond the
/// schema passes through untouched. Declared-but-absent optional fields are
/// filled with the kind-appropriate zero value so an action can be called
/// with partial arguments.
#[derive(Debug, Clone)]
pub struct ArgsValidator {
    fields: Vec<FieldSpec>,
    raw_schema: Value,
}

impl ArgsValidator {
    /// Build a validator from a catalog input schema
    ///
    /// Expects `properties` mapping field names to `{"type": ...}` entries
    /// and an optional `required` list of field names. A missing or
    /// malformed entry aborts construction of the action.
    pub fn from_schema(schema: &Value) -> Result<Self> {
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| HubError::Schema("Schema has no 'properties' object".to_string()))?;

        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut fields = Vec::with_capacity(properties.len());
        for (name, descriptor) in properties {
            let type_name = descriptor
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    HubError::Schema(format!("Field '{name}' has no 'type' string"))
                })?;

            fields.push(FieldSpec {
                name: name.clone(),
                kind: FieldKind::from_type_name(type_name)?,
                required: required.contains(&name.as_str()),
            });
        }

        Ok(Self {
            fields,
            raw_schema: schema.clone(),
        })
    }

    /// The original schema JSON, verbatim
    ///
    /// This is the proxy's externally-visible schema; downstream consumers
    /// see exactly what the catalog supplied, not a re-derived shape.
    pub fn raw_schema(&self) -> &Value {
        &self.raw_schema
    }

    /// Validate an argument map and fill defaults
    ///
    /// Fails with [`HubError::Validation`] when a required field is absent
    /// or a declared field has the wrong kind; this happens before any
    /// network call. Returns the completed map.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut filled = args.clone();

        for field in &self.fields {
            match args.get(&field.name) {
                Some(value) => {
                    if !field.kind.matches(value) {
                        return Err(HubError::Validation(format!(
                            "Field '{}' has wrong type (expected {:?})",
                            field.name, field.kind
                        )));
                    }
                }
                None if field.required => {
                    return Err(HubError::Validation(format!(
                        "Missing required field '{}'",
                        field.name
                    )));
                }
                None => {
                    filled.insert(field.name.clone(), field.kind.zero_value());
                }
            }
        }

        Ok(filled)
    }
}
