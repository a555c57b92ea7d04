//! JSON Schema (draft 2020-12) derived from contract field metadata.
//!
//! Schemas are structural only. Cross-field rules such as the weight-sum
//! invariant are listed under `x-invariants` and in the description; consumers
//! that pre-validate must implement them separately.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use super::fields::{FieldDefault, FieldShape, FieldSpec};
use super::numeric::DECIMAL_PATTERN;
use super::vocabulary::{DimensionName, Vocabulary};
use super::Contract;

pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";


pub fn schema_for<T: Contract>() -> Value {
    let mut definitions = Map::new();
    let mut properties = Map::new();
    let mut required = Vec::new();

    for spec in T::fields() {
        properties.insert(spec.name.to_string(), property(&spec, &mut definitions));
        if spec.required {
            required.push(Value::from(spec.name));
        }
    }

    let mut description = T::DESCRIPTION.to_string();
    if !T::INVARIANTS.is_empty() {
        description.push_str(" Business rules not expressible in this schema: ");
        description.push_str(&T::INVARIANTS.join("; "));
        description.push('.');
    }

    let mut schema = Map::new();
    schema.insert("$schema".into(), json!(DRAFT_2020_12));
    schema.insert("title".into(), json!(T::ENTITY));
    schema.insert("description".into(), json!(description));
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    schema.insert("required".into(), Value::Array(required));
    if !T::INVARIANTS.is_empty() {
        schema.insert("x-invariants".into(), json!(T::INVARIANTS));
    }
    if !definitions.is_empty() {
        schema.insert("$defs".into(), Value::Object(definitions));
    }
    Value::Object(schema)
}

fn property(spec: &FieldSpec, definitions: &mut Map<String, Value>) -> Value {
    let mut inner = shape_schema(spec.shape, definitions);
    if matches!(spec.default, Some(FieldDefault::Null)) {
        inner = json!({ "anyOf": [inner, { "type": "null" }] });
    }

    let Value::Object(mut property) = inner else {
        return inner;
    };
    property.insert("title".into(), json!(title_case(spec.name)));
    if let Some(description) = spec.description {
        property.insert("description".into(), json!(description));
    }
    if let Some(default) = spec.default {
        property.insert("default".into(), default_value(default));
    }
    Value::Object(property)
}

fn shape_schema(shape: FieldShape, definitions: &mut Map<String, Value>) -> Value {
    match shape {
        FieldShape::Text { min_len, max_len } => {
            let mut schema = Map::new();
            schema.insert("type".into(), json!("string"));
            if let Some(min) = min_len {
                schema.insert("minLength".into(), json!(min));
            }
            if let Some(max) = max_len {
                schema.insert("maxLength".into(), json!(max));
            }
            Value::Object(schema)
        }
        FieldShape::Decimal { .. } | FieldShape::Score => {
            let (minimum, maximum) = shape.decimal_bounds();
            decimal_schema(minimum, maximum)
        }
        FieldShape::Enumeration { name, values } => {
            definitions
                .entry(name.to_string())
                .or_insert_with(|| json!({ "title": name, "type": "string", "enum": values }));
            json!({ "$ref": format!("#/$defs/{name}") })
        }
        FieldShape::Pattern { pattern, .. } => json!({ "type": "string", "pattern": pattern }),
        FieldShape::Date => json!({ "type": "string", "format": "date" }),
        FieldShape::DateTime => json!({ "type": "string", "format": "date-time" }),
        FieldShape::TextList => json!({ "type": "array", "items": { "type": "string" } }),
        FieldShape::Count => json!({ "type": "integer", "minimum": 0 }),
        FieldShape::DimensionMap { minimum, maximum } => {
            let dimension = shape_schema(FieldShape::member_of::<DimensionName>(), definitions);
            json!({
                "type": "object",
                "propertyNames": dimension,
                "additionalProperties": decimal_schema(minimum, maximum),
                "required": DimensionName::VALUES,
            })
        }
    }
}

fn decimal_schema(minimum: Option<Decimal>, maximum: Option<Decimal>) -> Value {
    let mut number = Map::new();
    number.insert("type".into(), json!("number"));
    if let Some(min) = minimum {
        number.insert("minimum".into(), number_value(min));
    }
    if let Some(max) = maximum {
        number.insert("maximum".into(), number_value(max));
    }
    json!({
        "anyOf": [
            Value::Object(number),
            { "type": "string", "pattern": DECIMAL_PATTERN },
        ]
    })
}

fn number_value(value: Decimal) -> Value {
    if value.fract().is_zero() {
        if let Some(whole) = value.to_i64() {
            return json!(whole);
        }
    }
    value.to_f64().map(Value::from).unwrap_or(Value::Null)
}

fn default_value(default: FieldDefault) -> Value {
    match default {
        FieldDefault::Null => Value::Null,
        FieldDefault::Text(text) => json!(text),
        FieldDefault::Integer(number) => json!(number),
        FieldDefault::EmptyList => json!([]),
    }
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
