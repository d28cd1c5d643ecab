//! Avro schema derivation.
//!
//! Every column becomes one record field. The Avro type comes from the column's [`DataType`]:
//!
//! | column type | Avro type |
//! |---|---|
//! | [`DataType::Bool`] | `"boolean"` |
//! | [`DataType::Int64`] | `"int"` |
//! | [`DataType::Float64`] | `"float"` |
//! | [`DataType::Timestamp`] | `{"type": "long", "logicalType": "timestamp-millis"}` |
//! | [`DataType::Utf8`] | `"string"` |
//!
//! Columns with at least one missing value get the union `["null", <type>]` and
//! `"default": null`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::EdaResult;
use crate::naming::{file_stem, NamingConvention};
use crate::observability::{emit, EdaEvent, EdaObserver};
use crate::types::{DataSet, DataType};

/// Default record namespace.
pub const DEFAULT_NAMESPACE: &str = "com.fecom.ecommerce";

/// Extension of written schema files.
pub const SCHEMA_EXTENSION: &str = "avsc";

/// A primitive or logical Avro type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AvroType {
    /// `"boolean"`, `"int"`, `"null"`, ...
    Primitive(String),
    /// A primitive annotated with a logical type.
    Logical {
        /// Underlying primitive, e.g. `"long"`.
        #[serde(rename = "type")]
        base: String,
        /// Logical annotation, e.g. `"timestamp-millis"`.
        #[serde(rename = "logicalType")]
        logical_type: String,
    },
}

impl AvroType {
    fn primitive(name: &str) -> Self {
        AvroType::Primitive(name.to_string())
    }
}

/// The `type` of a record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AvroFieldType {
    /// A bare type.
    Plain(AvroType),
    /// A union, e.g. `["null", "int"]`.
    Union(Vec<AvroType>),
}

/// One record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvroField {
    /// Column name.
    pub name: String,
    /// Plain type, or a `null` union for nullable columns.
    #[serde(rename = "type")]
    pub field_type: AvroFieldType,
    /// `Some(Value::Null)` for nullable fields; absent otherwise.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_default"
    )]
    pub default: Option<serde_json::Value>,
}

impl AvroField {
    /// True when the field type is a union that includes `"null"`.
    pub fn is_nullable(&self) -> bool {
        match &self.field_type {
            AvroFieldType::Union(members) => members.contains(&AvroType::primitive("null")),
            AvroFieldType::Plain(_) => false,
        }
    }
}

// A present `"default": null` must stay distinct from a missing key.
fn present_default<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// An Avro record schema (`.avsc` document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvroSchema {
    /// Human-readable description of the record.
    pub doc: String,
    /// Always `"record"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Record name.
    pub name: String,
    /// Record namespace.
    pub namespace: String,
    /// One field per column, in column order.
    pub fields: Vec<AvroField>,
}

impl AvroSchema {
    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> EdaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Options controlling [`convert_csv_to_avro`].
#[derive(Clone)]
pub struct AvroOptions {
    /// Where to write the schema. Defaults to the source file's folder, then the working
    /// directory.
    pub output_dir: Option<PathBuf>,
    /// Record namespace.
    pub namespace: String,
    /// How the schema name is derived from the source file name.
    pub naming: NamingConvention,
    /// Optional observer that receives the generated document and the saved path.
    pub observer: Option<Arc<dyn EdaObserver>>,
}

impl fmt::Debug for AvroOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvroOptions")
            .field("output_dir", &self.output_dir)
            .field("namespace", &self.namespace)
            .field("naming", &self.naming)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Default for AvroOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            naming: NamingConvention::default(),
            observer: None,
        }
    }
}

/// Avro type for a column type.
pub fn avro_type_for(data_type: DataType) -> AvroType {
    match data_type {
        DataType::Bool => AvroType::primitive("boolean"),
        DataType::Int64 => AvroType::primitive("int"),
        DataType::Float64 => AvroType::primitive("float"),
        DataType::Timestamp => AvroType::Logical {
            base: "long".to_string(),
            logical_type: "timestamp-millis".to_string(),
        },
        DataType::Utf8 => AvroType::primitive("string"),
    }
}

/// Build the schema for `dataset` without touching the file system.
///
/// `base_name` is the source file stem and only appears in the `doc` string.
pub fn derive_avro_schema(
    dataset: &DataSet,
    name: &str,
    base_name: &str,
    namespace: &str,
) -> AvroSchema {
    let fields = dataset
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let base = avro_type_for(field.data_type);
            if dataset.null_count(idx) > 0 {
                AvroField {
                    name: field.name.clone(),
                    field_type: AvroFieldType::Union(vec![AvroType::primitive("null"), base]),
                    default: Some(serde_json::Value::Null),
                }
            } else {
                AvroField {
                    name: field.name.clone(),
                    field_type: AvroFieldType::Plain(base),
                    default: None,
                }
            }
        })
        .collect();

    AvroSchema {
        doc: format!("Schema for e-commerce {base_name} data"),
        kind: "record".to_string(),
        name: name.to_string(),
        namespace: namespace.to_string(),
        fields,
    }
}

/// Directory a schema for `source_path` is written to.
pub fn resolve_output_dir(source_path: &Path, explicit: Option<&Path>) -> EdaResult<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    match source_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => Ok(std::env::current_dir()?),
    }
}

/// Derive an Avro schema from `dataset` and write it next to (or on behalf of) `csv_path`.
///
/// The schema name is the file stem with [`NamingConvention::schema_prefix`] removed; the file
/// is written to `<output_dir>/<schema name>.avsc` (the directory is created if needed) and its
/// path returned.
///
/// With [`AvroOptions::observer`] set to a
/// [`ConsoleObserver`](crate::observability::ConsoleObserver), the generated document and the
/// saved path are printed; the default options print nothing.
///
/// ```no_run
/// use rust_eda_toolkit::avro::{convert_csv_to_avro, AvroOptions};
/// use rust_eda_toolkit::ingestion::{read_csv_from_path, CsvOptions};
///
/// # fn main() -> Result<(), rust_eda_toolkit::EdaError> {
/// let path = "data/Fecom Inc Customer Orders.csv";
/// let ds = read_csv_from_path(path, &CsvOptions::default())?;
/// let written = convert_csv_to_avro(&ds, path, &AvroOptions::default())?;
/// assert!(written.ends_with("Customer Orders.avsc"));
/// # Ok(())
/// # }
/// ```
pub fn convert_csv_to_avro(
    dataset: &DataSet,
    csv_path: impl AsRef<Path>,
    options: &AvroOptions,
) -> EdaResult<PathBuf> {
    let csv_path = csv_path.as_ref();
    let base_name = file_stem(csv_path)?;
    let derived = options.naming.schema_name(csv_path)?;
    if !derived.follows_convention {
        emit(
            &options.observer,
            EdaEvent::NameFallback {
                path: csv_path.to_path_buf(),
                used: derived.name.clone(),
            },
        );
    }

    let output_dir = resolve_output_dir(csv_path, options.output_dir.as_deref())?;
    fs::create_dir_all(&output_dir)?;
    let schema_path = output_dir.join(format!("{}.{SCHEMA_EXTENSION}", derived.name));

    let schema = derive_avro_schema(dataset, &derived.name, &base_name, &options.namespace);
    let json = schema.to_json_pretty()?;
    emit(
        &options.observer,
        EdaEvent::SchemaGenerated {
            name: schema.name.clone(),
            json: json.clone(),
        },
    );

    fs::write(&schema_path, json)?;
    emit(
        &options.observer,
        EdaEvent::SchemaSaved {
            path: schema_path.clone(),
        },
    );
    Ok(schema_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Schema, Value};

    fn sample() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("qty", DataType::Int64),
                Field::new("paid", DataType::Bool),
            ]),
            vec![
                vec![Value::Int64(1), Value::Bool(true)],
                vec![Value::Null, Value::Bool(false)],
            ],
        )
    }

    #[test]
    fn nullable_int_and_required_bool() {
        let schema = derive_avro_schema(&sample(), "Orders", "Fecom Inc Orders", DEFAULT_NAMESPACE);
        let json = serde_json::to_value(&schema).unwrap();

        assert_eq!(json["fields"][0]["type"], serde_json::json!(["null", "int"]));
        assert!(json["fields"][0]["default"].is_null());
        assert!(json["fields"][0].as_object().unwrap().contains_key("default"));

        assert_eq!(json["fields"][1]["type"], serde_json::json!("boolean"));
        assert!(!json["fields"][1].as_object().unwrap().contains_key("default"));
    }

    #[test]
    fn timestamp_maps_to_logical_long() {
        let json = serde_json::to_value(avro_type_for(DataType::Timestamp)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "long", "logicalType": "timestamp-millis"})
        );
        assert_eq!(
            serde_json::to_value(avro_type_for(DataType::Float64)).unwrap(),
            serde_json::json!("float")
        );
        assert_eq!(
            serde_json::to_value(avro_type_for(DataType::Utf8)).unwrap(),
            serde_json::json!("string")
        );
    }

    #[test]
    fn record_keys_in_document_order() {
        let schema = derive_avro_schema(&sample(), "Orders", "Fecom Inc Orders", DEFAULT_NAMESPACE);
        let text = schema.to_json_pretty().unwrap();
        let pos = |k: &str| text.find(&format!("\"{k}\"")).unwrap();
        assert!(pos("doc") < pos("type"));
        assert!(pos("type") < pos("name"));
        assert!(pos("name") < pos("namespace"));
        assert!(pos("namespace") < pos("fields"));
        assert!(text.contains("\"doc\": \"Schema for e-commerce Fecom Inc Orders data\""));
    }

    #[test]
    fn parsed_schema_keeps_null_default() {
        let schema = derive_avro_schema(&sample(), "Orders", "Fecom Inc Orders", DEFAULT_NAMESPACE);
        let parsed: AvroSchema = serde_json::from_str(&schema.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, schema);
        assert!(parsed.fields[0].is_nullable());
        assert!(!parsed.fields[1].is_nullable());
    }

    #[test]
    fn output_dir_falls_back_to_source_folder() {
        let dir = resolve_output_dir(Path::new("in/Fecom Inc X.csv"), None).unwrap();
        assert_eq!(dir, PathBuf::from("in"));
        let explicit = resolve_output_dir(Path::new("in/x.csv"), Some(Path::new("out"))).unwrap();
        assert_eq!(explicit, PathBuf::from("out"));
        let cwd = resolve_output_dir(Path::new("x.csv"), None).unwrap();
        assert_eq!(cwd, std::env::current_dir().unwrap());
    }
}
