//! The JSON codec: a `serde_json::Value` tree shaped to match the reference
//! community tooling's `.json` export, so files round-trip with that ecosystem.

use serde_json::{Map, Value as Json};

use crate::error::Error;
use crate::field_type::FieldType;
use crate::label::Label;
use crate::language::LanguageId;
use crate::value::{normalize_string_value, Document, LocString, MagicTag, ResRef, Struct, Value, SENTINEL};

/// Converts `doc` to its JSON representation.
pub fn to_json(doc: &Document) -> Json {
    let mut root = Map::new();
    root.insert("__data_type".into(), Json::String(doc.magic_tag.as_str().unwrap_or("????").to_string()));
    for (label, value) in doc.root.iter() {
        root.insert(label.to_string(), field_to_json(value));
    }
    Json::Object(root)
}

fn field_to_json(value: &Value) -> Json {
    let ty = value.field_type();
    match value {
        Value::Struct(inner) => named_struct_to_json(inner),
        Value::List(items) => {
            let mut obj = Map::new();
            obj.insert("type".into(), Json::String(ty.json_tag().into()));
            obj.insert("value".into(), Json::Array(items.iter().map(list_member_to_json).collect()));
            Json::Object(obj)
        }
        Value::CExoLocString(loc) => {
            let mut obj = Map::new();
            obj.insert("type".into(), Json::String(ty.json_tag().into()));
            obj.insert("value".into(), Json::Object(locstring_to_json(loc)));
            Json::Object(obj)
        }
        Value::Void(blob) => {
            use base64::Engine;
            let mut obj = Map::new();
            obj.insert("type".into(), Json::String(ty.json_tag().into()));
            obj.insert("value64".into(), Json::String(base64::engine::general_purpose::STANDARD.encode(blob)));
            Json::Object(obj)
        }
        _ => {
            let mut obj = Map::new();
            obj.insert("type".into(), Json::String(ty.json_tag().into()));
            obj.insert("value".into(), leaf_to_json(value));
            Json::Object(obj)
        }
    }
}

fn leaf_to_json(value: &Value) -> Json {
    match value {
        Value::Byte(v) => Json::from(*v),
        Value::Char(v) => Json::from(*v),
        Value::Word(v) => Json::from(*v),
        Value::Short(v) => Json::from(*v),
        Value::Dword(v) => Json::from(*v),
        Value::Int(v) => Json::from(*v),
        Value::Dword64(v) => Json::from(*v),
        Value::Int64(v) => Json::from(*v),
        Value::Float(v) => serde_json::Number::from_f64(*v as f64).map(Json::Number).unwrap_or(Json::Null),
        Value::Double(v) => serde_json::Number::from_f64(*v).map(Json::Number).unwrap_or(Json::Null),
        Value::ResRef(r) => Json::String(r.as_str().to_string()),
        Value::CExoString(s) => Json::String(s.clone()),
        _ => unreachable!("leaf_to_json called on a node value"),
    }
}

/// The shape for a struct field as a *named* struct: `{"type":"struct","__struct_id":id,"value":{"__struct_id":id,...}}`.
fn named_struct_to_json(s: &Struct) -> Json {
    let mut fields = Map::new();
    fields.insert("__struct_id".into(), Json::from(s.struct_id));
    for (label, value) in s.iter() {
        fields.insert(label.to_string(), field_to_json(value));
    }
    let mut obj = Map::new();
    obj.insert("type".into(), Json::String("struct".into()));
    obj.insert("__struct_id".into(), Json::from(s.struct_id));
    obj.insert("value".into(), Json::Object(fields));
    Json::Object(obj)
}

/// The shape for a struct as a *list member*: `{"__struct_id":id,...fields}` directly, no "type"/"value" wrapper.
fn list_member_to_json(s: &Struct) -> Json {
    let mut fields = Map::new();
    fields.insert("__struct_id".into(), Json::from(s.struct_id));
    for (label, value) in s.iter() {
        fields.insert(label.to_string(), field_to_json(value));
    }
    Json::Object(fields)
}

fn locstring_to_json(loc: &LocString) -> Map<String, Json> {
    let mut obj = Map::new();
    if loc.strref != SENTINEL {
        obj.insert("id".into(), Json::from(loc.strref));
    }
    for (language_id, text) in &loc.entries {
        obj.insert(language_id.0.to_string(), Json::String(text.clone()));
    }
    obj
}

/// Parses a JSON document back into a [`Document`].
///
/// # Errors
/// Returns [`Error::MalformedText`] for any missing/mistyped key, unknown type
/// tag, or unknown language id.
pub fn from_json(json: &Json) -> Result<Document, Error> {
    let root = json.as_object().ok_or_else(|| Error::malformed_json_path("$", "root must be a JSON object"))?;
    let magic_tag = root
        .get("__data_type")
        .and_then(Json::as_str)
        .ok_or_else(|| Error::malformed_json_path("$.__data_type", "missing or not a string"))?;

    let mut out = Struct::new(SENTINEL);
    for (name, field) in root {
        if name == "__data_type" {
            continue;
        }
        let label: Label = name.parse().map_err(|_| Error::malformed_json_path(format!("$.{name}"), "label is too long"))?;
        let value = json_field_to_value(&format!("$.{name}"), field)?;
        out.insert(label, value).map_err(|e| Error::malformed_json_path(format!("$.{name}"), e.to_string()))?;
    }
    Ok(Document::new(MagicTag::new(magic_tag), out))
}

fn json_field_to_value(path: &str, field: &Json) -> Result<Value, Error> {
    let obj = field.as_object().ok_or_else(|| Error::malformed_json_path(path, "field must be a JSON object"))?;
    let json_type = obj.get("type").and_then(Json::as_str).ok_or_else(|| Error::malformed_json_path(path, "missing \"type\""))?;
    let ty = FieldType::from_json_tag(json_type).map_err(|_| Error::malformed_json_path(path, format!("unknown type {json_type:?}")))?;

    Ok(match ty {
        FieldType::Struct => {
            let struct_id = obj.get("__struct_id").and_then(Json::as_u64).unwrap_or(SENTINEL as u64) as u32;
            let fields = obj.get("value").and_then(Json::as_object).ok_or_else(|| Error::malformed_json_path(path, "missing \"value\""))?;
            Value::Struct(json_struct_fields(path, struct_id, fields)?)
        }
        FieldType::List => {
            let items = obj.get("value").and_then(Json::as_array).ok_or_else(|| Error::malformed_json_path(path, "missing \"value\" array"))?;
            let mut structs = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                let fields = item.as_object().ok_or_else(|| Error::malformed_json_path(&item_path, "list member must be an object"))?;
                let struct_id = fields.get("__struct_id").and_then(Json::as_u64).ok_or_else(|| {
                    Error::malformed_json_path(&item_path, "list member missing \"__struct_id\"")
                })? as u32;
                structs.push(json_struct_fields(&item_path, struct_id, fields)?);
            }
            Value::List(structs)
        }
        FieldType::CExoLocString => {
            let entries_obj = obj.get("value").and_then(Json::as_object).ok_or_else(|| Error::malformed_json_path(path, "missing \"value\""))?;
            Value::CExoLocString(json_locstring(path, entries_obj)?)
        }
        FieldType::Void => {
            let text = obj.get("value64").and_then(Json::as_str).ok_or_else(|| Error::malformed_json_path(path, "missing \"value64\""))?;
            use base64::Engine;
            let blob = base64::engine::general_purpose::STANDARD
                .decode(text)
                .map_err(|e| Error::malformed_json_path(path, e.to_string()))?;
            Value::Void(blob)
        }
        _ => {
            let value = obj.get("value").ok_or_else(|| Error::malformed_json_path(path, "missing \"value\""))?;
            json_leaf_to_value(path, ty, value)?
        }
    })
}

fn json_struct_fields(path: &str, struct_id: u32, fields: &Map<String, Json>) -> Result<Struct, Error> {
    let mut out = Struct::new(struct_id);
    for (name, field) in fields {
        if name == "__struct_id" {
            continue;
        }
        let label: Label = name.parse().map_err(|_| Error::malformed_json_path(format!("{path}.{name}"), "label is too long"))?;
        let value = json_field_to_value(&format!("{path}.{name}"), field)?;
        out.insert(label, value).map_err(|e| Error::malformed_json_path(format!("{path}.{name}"), e.to_string()))?;
    }
    Ok(out)
}

fn json_locstring(path: &str, obj: &Map<String, Json>) -> Result<LocString, Error> {
    let mut loc = LocString::new();
    for (key, value) in obj {
        let text = value.as_str().ok_or_else(|| Error::malformed_json_path(path, "localized text must be a string"))?;
        if key == "id" {
            loc.strref = value.as_u64().ok_or_else(|| Error::malformed_json_path(path, "\"id\" must be an integer"))? as u32;
            continue;
        }
        let id: u32 = key.parse().map_err(|_| Error::malformed_json_path(path, format!("invalid language id {key:?}")))?;
        loc.entries.insert(LanguageId(id), normalize_string_value(text));
    }
    Ok(loc)
}

fn json_leaf_to_value(path: &str, ty: FieldType, value: &Json) -> Result<Value, Error> {
    let as_u64 = || value.as_u64().ok_or_else(|| Error::malformed_json_path(path, "expected an unsigned integer"));
    let as_i64 = || value.as_i64().ok_or_else(|| Error::malformed_json_path(path, "expected a signed integer"));
    let as_f64 = || value.as_f64().ok_or_else(|| Error::malformed_json_path(path, "expected a number"));
    let as_str = || value.as_str().ok_or_else(|| Error::malformed_json_path(path, "expected a string"));

    Ok(match ty {
        FieldType::Byte => Value::Byte(as_u64()? as u8),
        FieldType::Char => Value::Char(as_i64()? as i8),
        FieldType::Word => Value::Word(as_u64()? as u16),
        FieldType::Short => Value::Short(as_i64()? as i16),
        FieldType::Dword => Value::Dword(as_u64()? as u32),
        FieldType::Int => Value::Int(as_i64()? as i32),
        FieldType::Dword64 => Value::Dword64(as_u64()?),
        FieldType::Int64 => Value::Int64(as_i64()?),
        FieldType::Float => Value::Float(as_f64()? as f32),
        FieldType::Double => Value::Double(as_f64()?),
        FieldType::ResRef => Value::ResRef(ResRef::new(as_str()?.to_string())?),
        FieldType::CExoString => Value::CExoString(normalize_string_value(as_str()?)),
        _ => return Err(Error::malformed_json_path(path, format!("{ty:?} is not a leaf type"))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut root = Struct::new(SENTINEL);
        root.insert("Name".parse().unwrap(), Value::CExoString("Aribeth".into())).unwrap();
        root.insert("HP".parse().unwrap(), Value::Short(42)).unwrap();
        let mut loc = LocString::new();
        loc.entries.insert(LanguageId(0), "Hello".into());
        root.insert("Greeting".parse().unwrap(), Value::CExoLocString(loc)).unwrap();
        let mut nested = Struct::new(5);
        nested.insert("Power".parse().unwrap(), Value::Dword64(9)).unwrap();
        root.insert("Nested".parse().unwrap(), Value::Struct(nested)).unwrap();
        let mut item = Struct::new(0);
        item.insert("Slot".parse().unwrap(), Value::Byte(1)).unwrap();
        root.insert("Items".parse().unwrap(), Value::List(vec![item])).unwrap();
        Document::new(MagicTag::new("UTC"), root)
    }

    #[test]
    fn root_carries_data_type_and_flat_fields() {
        let json = to_json(&sample());
        assert_eq!(json["__data_type"], "UTC ");
        assert_eq!(json["Name"]["type"], "cexostring");
        assert_eq!(json["Name"]["value"], "Aribeth");
    }

    #[test]
    fn named_struct_duplicates_struct_id() {
        let json = to_json(&sample());
        assert_eq!(json["Nested"]["__struct_id"], 5);
        assert_eq!(json["Nested"]["value"]["__struct_id"], 5);
        assert_eq!(json["Nested"]["value"]["Power"]["value"], 9);
    }

    #[test]
    fn list_member_has_no_type_value_wrapper() {
        let json = to_json(&sample());
        let member = &json["Items"]["value"][0];
        assert_eq!(member["__struct_id"], 0);
        assert_eq!(member["Slot"]["value"], 1);
        assert!(member.get("type").is_none());
    }

    #[test]
    fn locstring_omits_id_when_sentinel() {
        let json = to_json(&sample());
        assert!(json["Greeting"]["value"].get("id").is_none());
        assert_eq!(json["Greeting"]["value"]["0"], "Hello");
    }

    #[test]
    fn round_trips_through_json() {
        let doc = sample();
        let json = to_json(&doc);
        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn from_json_rejects_missing_data_type() {
        let json = serde_json::json!({"Name": {"type": "cexostring", "value": "x"}});
        assert!(from_json(&json).is_err());
    }
}
