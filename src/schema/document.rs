//! Schema documents
//!
//! The self-describing schema language is the Avro JSON schema notation. A
//! document is a top-level `record` whose fields are typed with:
//!
//! - primitive names: `null`, `boolean`, `int`, `long`, `float`, `double`,
//!   `bytes`, `string`
//! - annotated primitives: `{"type": "long", "logicalType": "timestamp-millis"}`
//! - `enum`, `record`, `array`, `map`, `fixed`
//! - unions, written as JSON arrays
//! - references to a named type declared earlier in the document
//!
//! Name validation is an explicit parser option. Relaxed parsing accepts names
//! such as `ID$` that real-world writers emit.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{BackingKind, EnumType, LogicalType};

/// Primitive schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

impl PrimitiveType {
    /// Returns the schema-language name
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Null => "null",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Bytes => "bytes",
            PrimitiveType::String => "string",
        }
    }

    /// Parses a schema-language primitive name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(PrimitiveType::Null),
            "boolean" => Some(PrimitiveType::Boolean),
            "int" => Some(PrimitiveType::Int),
            "long" => Some(PrimitiveType::Long),
            "float" => Some(PrimitiveType::Float),
            "double" => Some(PrimitiveType::Double),
            "bytes" => Some(PrimitiveType::Bytes),
            "string" => Some(PrimitiveType::String),
            _ => None,
        }
    }

    /// Returns the primitive that backs a logical type
    pub fn backing(logical: &LogicalType) -> Self {
        match logical.backing() {
            BackingKind::Int64 => PrimitiveType::Long,
            BackingKind::Bytes => PrimitiveType::Bytes,
            BackingKind::String => PrimitiveType::String,
        }
    }
}

/// Type of a field (or of a union branch)
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Primitive(PrimitiveType),
    /// Primitive annotated with a recognized logical type
    Logical(LogicalType),
    Enum(EnumType),
    Record(Box<SchemaDocument>),
    Array(Box<SchemaNode>),
    Map(Box<SchemaNode>),
    Fixed { name: String, size: u64 },
    Union(Vec<SchemaNode>),
}

impl SchemaNode {
    /// Returns the shape name for error messages
    pub fn shape_name(&self) -> &'static str {
        match self {
            SchemaNode::Primitive(primitive) => primitive.name(),
            SchemaNode::Logical(logical) => logical.name(),
            SchemaNode::Enum(_) => "enum",
            SchemaNode::Record(_) => "record",
            SchemaNode::Array(_) => "array",
            SchemaNode::Map(_) => "map",
            SchemaNode::Fixed { .. } => "fixed",
            SchemaNode::Union(_) => "union",
        }
    }

    /// Key used to detect duplicate union branches
    fn branch_key(&self) -> String {
        match self {
            SchemaNode::Enum(e) => e.full_name(),
            SchemaNode::Record(r) => r.full_name(),
            SchemaNode::Fixed { name, .. } => name.clone(),
            SchemaNode::Logical(logical) => PrimitiveType::backing(logical).name().to_string(),
            other => other.shape_name().to_string(),
        }
    }
}

/// Field of a record
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub schema: SchemaNode,
    pub doc: Option<String>,
    pub default: Option<Value>,
}

impl FieldNode {
    pub fn new(name: impl Into<String>, schema: SchemaNode) -> Self {
        Self {
            name: name.into(),
            schema,
            doc: None,
            default: None,
        }
    }
}

/// A record schema document
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    pub name: String,
    pub namespace: Option<String>,
    pub doc: Option<String>,
    pub fields: Vec<FieldNode>,
}

impl SchemaDocument {
    pub fn new(name: impl Into<String>, fields: Vec<FieldNode>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            doc: None,
            fields,
        }
    }

    /// Returns `namespace.name`, or just the name when there is no namespace
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    /// Returns the document as a JSON value
    pub fn to_value(&self) -> Value {
        SchemaWriter::default().record(self)
    }

    /// Returns the document as compact JSON text
    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

/// Parser for schema documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaParser {
    strict_names: bool,
}

impl SchemaParser {
    /// Create a parser with relaxed name validation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that enforces `[A-Za-z_][A-Za-z0-9_]*` names
    pub fn strict() -> Self {
        Self { strict_names: true }
    }

    pub fn with_strict_names(mut self, strict_names: bool) -> Self {
        self.strict_names = strict_names;
        self
    }

    pub fn strict_names(&self) -> bool {
        self.strict_names
    }

    /// Parses a document from JSON text
    pub fn parse_str(&self, text: &str) -> SchemaResult<SchemaDocument> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| SchemaError::malformed(format!("Invalid JSON: {}", e)))?;
        self.parse_value(&value)
    }

    /// Parses a document from a JSON value
    pub fn parse_value(&self, value: &Value) -> SchemaResult<SchemaDocument> {
        let obj = value
            .as_object()
            .ok_or_else(|| SchemaError::malformed("top-level schema must be a record object"))?;
        match obj.get("type").and_then(Value::as_str) {
            Some("record") | Some("error") => {}
            _ => return Err(SchemaError::malformed("top-level schema must be a record")),
        }
        let mut ctx = ParseContext {
            strict_names: self.strict_names,
            named: HashMap::new(),
        };
        ctx.record(obj, None)
    }
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"))
}

struct ParseContext {
    strict_names: bool,
    /// Named types declared so far, by full name
    named: HashMap<String, SchemaNode>,
}

impl ParseContext {
    fn check_name(&self, name: &str) -> SchemaResult<()> {
        if self.strict_names && !name_pattern().is_match(name) {
            return Err(SchemaError::invalid_name(name));
        }
        Ok(())
    }

    fn check_full_name(&self, name: &str) -> SchemaResult<()> {
        for part in name.split('.') {
            self.check_name(part)?;
        }
        Ok(())
    }

    fn register(&mut self, full_name: String, node: SchemaNode) -> SchemaResult<()> {
        if self.named.contains_key(&full_name) {
            return Err(SchemaError::malformed(format!(
                "named type '{}' is defined more than once",
                full_name
            )));
        }
        self.named.insert(full_name, node);
        Ok(())
    }

    fn resolve(&self, name: &str, namespace: Option<&str>) -> Option<SchemaNode> {
        if let Some(node) = self.named.get(name) {
            return Some(node.clone());
        }
        namespace
            .filter(|ns| !ns.is_empty())
            .and_then(|ns| self.named.get(&format!("{}.{}", ns, name)))
            .cloned()
    }

    fn record(
        &mut self,
        obj: &Map<String, Value>,
        enclosing_ns: Option<&str>,
    ) -> SchemaResult<SchemaDocument> {
        let name = required_str(obj, "name", "record")?;
        self.check_full_name(name)?;
        let namespace = optional_str(obj, "namespace", name)?;
        let doc = optional_str(obj, "doc", name)?;
        let ns = namespace.as_deref().or(enclosing_ns).map(str::to_string);

        let raw_fields = obj
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::malformed_field(name, "record requires a 'fields' array"))?;

        let mut fields = Vec::with_capacity(raw_fields.len());
        let mut seen = HashSet::new();
        for raw in raw_fields {
            let field_obj = raw
                .as_object()
                .ok_or_else(|| SchemaError::malformed_field(name, "field must be an object"))?;
            let field_name = required_str(field_obj, "name", name)?;
            self.check_name(field_name)?;
            if !seen.insert(field_name.to_string()) {
                return Err(SchemaError::duplicate_field(field_name));
            }
            let type_value = field_obj.get("type").ok_or_else(|| {
                SchemaError::malformed_field(field_name, "field requires a 'type'")
            })?;
            let schema = self.node(type_value, ns.as_deref(), field_name)?;
            fields.push(FieldNode {
                name: field_name.to_string(),
                schema,
                doc: optional_str(field_obj, "doc", field_name)?,
                default: field_obj.get("default").cloned(),
            });
        }

        Ok(SchemaDocument {
            name: name.to_string(),
            namespace,
            doc,
            fields,
        })
    }

    fn node(&mut self, value: &Value, ns: Option<&str>, field: &str) -> SchemaResult<SchemaNode> {
        match value {
            Value::String(name) => match PrimitiveType::from_name(name) {
                Some(primitive) => Ok(SchemaNode::Primitive(primitive)),
                None => self.resolve(name, ns).ok_or_else(|| {
                    SchemaError::malformed_field(field, format!("unknown type '{}'", name))
                }),
            },
            Value::Array(branches) => self.union(branches, ns, field),
            Value::Object(obj) => self.complex(obj, ns, field),
            other => Err(SchemaError::malformed_field(
                field,
                format!("invalid type declaration: {}", other),
            )),
        }
    }

    fn union(&mut self, branches: &[Value], ns: Option<&str>, field: &str) -> SchemaResult<SchemaNode> {
        if branches.is_empty() {
            return Err(SchemaError::malformed_field(field, "union has no branches"));
        }
        let mut members = Vec::with_capacity(branches.len());
        let mut keys = HashSet::new();
        for branch in branches {
            let member = self.node(branch, ns, field)?;
            if matches!(member, SchemaNode::Union(_)) {
                return Err(SchemaError::malformed_field(field, "unions may not contain unions"));
            }
            if !keys.insert(member.branch_key()) {
                return Err(SchemaError::malformed_field(
                    field,
                    format!("duplicate union branch '{}'", member.branch_key()),
                ));
            }
            members.push(member);
        }
        Ok(SchemaNode::Union(members))
    }

    fn complex(
        &mut self,
        obj: &Map<String, Value>,
        ns: Option<&str>,
        field: &str,
    ) -> SchemaResult<SchemaNode> {
        let type_value = obj
            .get("type")
            .ok_or_else(|| SchemaError::malformed_field(field, "type object requires 'type'"))?;
        let type_name = match type_value {
            Value::String(name) => name.as_str(),
            nested => return self.node(nested, ns, field),
        };

        if let Some(primitive) = PrimitiveType::from_name(type_name) {
            let logical = match obj.get("logicalType").and_then(Value::as_str) {
                Some(logical_name) => logical_type(primitive, logical_name, obj, field),
                None => None,
            };
            return Ok(logical.map_or(SchemaNode::Primitive(primitive), SchemaNode::Logical));
        }

        match type_name {
            "record" | "error" => {
                let record = self.record(obj, ns)?;
                let node = SchemaNode::Record(Box::new(record.clone()));
                self.register(qualify(&record.name, record.namespace.as_deref().or(ns)), node.clone())?;
                Ok(node)
            }
            "enum" => {
                let enum_type = self.enum_type(obj, field)?;
                let node = SchemaNode::Enum(enum_type.clone());
                self.register(
                    qualify(&enum_type.name, enum_type.namespace.as_deref().or(ns)),
                    node.clone(),
                )?;
                Ok(node)
            }
            "array" => {
                let items = obj
                    .get("items")
                    .ok_or_else(|| SchemaError::malformed_field(field, "array requires 'items'"))?;
                Ok(SchemaNode::Array(Box::new(self.node(items, ns, field)?)))
            }
            "map" => {
                let values = obj
                    .get("values")
                    .ok_or_else(|| SchemaError::malformed_field(field, "map requires 'values'"))?;
                Ok(SchemaNode::Map(Box::new(self.node(values, ns, field)?)))
            }
            "fixed" => {
                let name = required_str(obj, "name", field)?;
                self.check_full_name(name)?;
                let size = obj
                    .get("size")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| SchemaError::malformed_field(field, "fixed requires 'size'"))?;
                let node = SchemaNode::Fixed {
                    name: name.to_string(),
                    size,
                };
                let fixed_ns = optional_str(obj, "namespace", field)?;
                self.register(qualify(name, fixed_ns.as_deref().or(ns)), node.clone())?;
                Ok(node)
            }
            named => self.resolve(named, ns).ok_or_else(|| {
                SchemaError::malformed_field(field, format!("unknown type '{}'", named))
            }),
        }
    }

    fn enum_type(&self, obj: &Map<String, Value>, field: &str) -> SchemaResult<EnumType> {
        let name = required_str(obj, "name", field)?;
        self.check_full_name(name)?;
        let raw_symbols = obj
            .get("symbols")
            .and_then(Value::as_array)
            .ok_or_else(|| SchemaError::malformed_field(field, "enum requires 'symbols'"))?;
        let mut symbols = Vec::with_capacity(raw_symbols.len());
        for raw in raw_symbols {
            let symbol = raw
                .as_str()
                .ok_or_else(|| SchemaError::malformed_field(field, "enum symbols must be strings"))?;
            self.check_name(symbol)?;
            if symbols.iter().any(|s: &String| s == symbol) {
                return Err(SchemaError::malformed_field(
                    field,
                    format!("duplicate enum symbol '{}'", symbol),
                ));
            }
            symbols.push(symbol.to_string());
        }
        Ok(EnumType {
            name: name.to_string(),
            namespace: optional_str(obj, "namespace", field)?,
            doc: optional_str(obj, "doc", field)?,
            symbols,
        })
    }
}

/// Resolves a `logicalType` annotation. Unknown names and annotations on the
/// wrong backing primitive are ignored.
fn logical_type(
    primitive: PrimitiveType,
    name: &str,
    obj: &Map<String, Value>,
    field: &str,
) -> Option<LogicalType> {
    let logical = match name {
        "date" => LogicalType::Date,
        "time-millis" => LogicalType::TimeMillis,
        "timestamp-millis" => LogicalType::TimestampMillis,
        "uuid" => LogicalType::Uuid,
        "decimal" => {
            let precision = obj.get("precision").and_then(Value::as_u64).unwrap_or(0);
            let scale = obj.get("scale").and_then(Value::as_u64).unwrap_or(0);
            if precision == 0 || scale > precision || precision > u64::from(u32::MAX) {
                log::debug!(
                    "ignoring decimal on field '{}': precision {} scale {}",
                    field,
                    precision,
                    scale
                );
                return None;
            }
            LogicalType::Decimal {
                precision: precision as u32,
                scale: scale as u32,
            }
        }
        other => {
            log::debug!("ignoring unknown logical type '{}' on field '{}'", other, field);
            return None;
        }
    };
    if PrimitiveType::backing(&logical) != primitive {
        log::debug!(
            "ignoring logical type '{}' on '{}' for field '{}'",
            name,
            primitive.name(),
            field
        );
        return None;
    }
    Some(logical)
}

fn qualify(name: &str, namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() && !name.contains('.') => format!("{}.{}", ns, name),
        _ => name.to_string(),
    }
}

fn required_str<'a>(obj: &'a Map<String, Value>, key: &str, context: &str) -> SchemaResult<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| SchemaError::malformed_field(context, format!("'{}' must be a string", key)))
}

fn optional_str(obj: &Map<String, Value>, key: &str, context: &str) -> SchemaResult<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaError::malformed_field(
            context,
            format!("'{}' must be a string", key),
        )),
    }
}

/// Emits documents in canonical key order, writing named types once and
/// referencing them by name afterwards.
#[derive(Default)]
struct SchemaWriter {
    defined: HashSet<String>,
}

impl SchemaWriter {
    fn record(&mut self, record: &SchemaDocument) -> Value {
        self.defined.insert(record.full_name());
        let mut obj = Map::new();
        obj.insert("type".into(), json!("record"));
        obj.insert("name".into(), json!(record.name));
        if let Some(ns) = &record.namespace {
            obj.insert("namespace".into(), json!(ns));
        }
        if let Some(doc) = &record.doc {
            obj.insert("doc".into(), json!(doc));
        }
        let fields: Vec<Value> = record.fields.iter().map(|field| self.field(field)).collect();
        obj.insert("fields".into(), Value::Array(fields));
        Value::Object(obj)
    }

    fn field(&mut self, field: &FieldNode) -> Value {
        let mut obj = Map::new();
        obj.insert("name".into(), json!(field.name));
        obj.insert("type".into(), self.node(&field.schema));
        if let Some(doc) = &field.doc {
            obj.insert("doc".into(), json!(doc));
        }
        if let Some(default) = &field.default {
            obj.insert("default".into(), default.clone());
        }
        Value::Object(obj)
    }

    fn node(&mut self, node: &SchemaNode) -> Value {
        match node {
            SchemaNode::Primitive(primitive) => json!(primitive.name()),
            SchemaNode::Logical(logical) => {
                let mut obj = Map::new();
                obj.insert("type".into(), json!(PrimitiveType::backing(logical).name()));
                obj.insert("logicalType".into(), json!(logical.name()));
                if let LogicalType::Decimal { precision, scale } = logical {
                    obj.insert("precision".into(), json!(precision));
                    obj.insert("scale".into(), json!(scale));
                }
                Value::Object(obj)
            }
            SchemaNode::Enum(enum_type) => {
                let full_name = enum_type.full_name();
                if !self.defined.insert(full_name.clone()) {
                    return json!(full_name);
                }
                let mut obj = Map::new();
                obj.insert("type".into(), json!("enum"));
                obj.insert("name".into(), json!(enum_type.name));
                if let Some(ns) = &enum_type.namespace {
                    obj.insert("namespace".into(), json!(ns));
                }
                if let Some(doc) = &enum_type.doc {
                    obj.insert("doc".into(), json!(doc));
                }
                obj.insert("symbols".into(), json!(enum_type.symbols));
                Value::Object(obj)
            }
            SchemaNode::Record(record) => {
                if self.defined.contains(&record.full_name()) {
                    return json!(record.full_name());
                }
                self.record(record)
            }
            SchemaNode::Array(items) => json!({"type": "array", "items": self.node(items)}),
            SchemaNode::Map(values) => json!({"type": "map", "values": self.node(values)}),
            SchemaNode::Fixed { name, size } => {
                if !self.defined.insert(name.clone()) {
                    return json!(name);
                }
                json!({"type": "fixed", "name": name, "size": size})
            }
            SchemaNode::Union(members) => {
                Value::Array(members.iter().map(|member| self.node(member)).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: Value) -> SchemaResult<SchemaDocument> {
        SchemaParser::new().parse_value(&value)
    }

    #[test]
    fn test_parse_primitive_and_logical_fields() {
        let doc = parse(json!({
            "type": "record",
            "name": "Sale",
            "namespace": "com.example",
            "fields": [
                {"name": "name", "type": "string"},
                {"name": "amount", "type": {"type": "bytes", "logicalType": "decimal", "precision": 10, "scale": 2}},
                {"name": "when", "type": ["null", {"type": "long", "logicalType": "timestamp-millis"}], "default": null}
            ]
        }))
        .unwrap();

        assert_eq!(doc.name, "Sale");
        assert_eq!(doc.full_name(), "com.example.Sale");
        assert_eq!(doc.field_names(), vec!["name", "amount", "when"]);
        assert_eq!(doc.fields[0].schema, SchemaNode::Primitive(PrimitiveType::String));
        assert_eq!(
            doc.fields[1].schema,
            SchemaNode::Logical(LogicalType::Decimal { precision: 10, scale: 2 })
        );
        assert_eq!(
            doc.fields[2].schema,
            SchemaNode::Union(vec![
                SchemaNode::Primitive(PrimitiveType::Null),
                SchemaNode::Logical(LogicalType::TimestampMillis),
            ])
        );
        assert_eq!(doc.fields[2].default, Some(Value::Null));
    }

    #[test]
    fn test_logical_type_on_wrong_backing_is_ignored() {
        let doc = parse(json!({
            "type": "record", "name": "r",
            "fields": [{"name": "d", "type": {"type": "int", "logicalType": "date"}}]
        }))
        .unwrap();
        assert_eq!(doc.fields[0].schema, SchemaNode::Primitive(PrimitiveType::Int));
    }

    #[test]
    fn test_unknown_logical_type_is_ignored() {
        let doc = parse(json!({
            "type": "record", "name": "r",
            "fields": [{"name": "t", "type": {"type": "long", "logicalType": "timestamp-micros"}}]
        }))
        .unwrap();
        assert_eq!(doc.fields[0].schema, SchemaNode::Primitive(PrimitiveType::Long));
    }

    #[test]
    fn test_invalid_decimal_is_ignored() {
        let doc = parse(json!({
            "type": "record", "name": "r",
            "fields": [{"name": "x", "type": {"type": "bytes", "logicalType": "decimal", "precision": 2, "scale": 3}}]
        }))
        .unwrap();
        assert_eq!(doc.fields[0].schema, SchemaNode::Primitive(PrimitiveType::Bytes));
    }

    #[test]
    fn test_relaxed_names_accept_dollar_suffix() {
        let doc = parse(json!({
            "type": "record", "name": "r",
            "fields": [{"name": "ID$", "type": "long"}]
        }))
        .unwrap();
        assert_eq!(doc.fields[0].name, "ID$");
    }

    #[test]
    fn test_strict_names_reject_dollar_suffix() {
        let value = json!({
            "type": "record", "name": "r",
            "fields": [{"name": "ID$", "type": "long"}]
        });
        let err = SchemaParser::strict().parse_value(&value).unwrap_err();
        assert_eq!(err.field(), Some("ID$"));
    }

    #[test]
    fn test_enum_reference_resolves_to_definition() {
        let doc = parse(json!({
            "type": "record", "name": "r", "namespace": "ns",
            "fields": [
                {"name": "a", "type": {"type": "enum", "name": "Op", "symbols": ["INSERT", "DELETE"]}},
                {"name": "b", "type": ["null", "Op"]},
                {"name": "c", "type": "ns.Op"}
            ]
        }))
        .unwrap();
        let op = SchemaNode::Enum(EnumType::new("Op", vec!["INSERT".into(), "DELETE".into()]));
        assert_eq!(doc.fields[0].schema, op);
        assert_eq!(
            doc.fields[1].schema,
            SchemaNode::Union(vec![SchemaNode::Primitive(PrimitiveType::Null), op.clone()])
        );
        assert_eq!(doc.fields[2].schema, op);
    }

    #[test]
    fn test_unknown_reference_fails() {
        let err = parse(json!({
            "type": "record", "name": "r",
            "fields": [{"name": "a", "type": "Missing"}]
        }))
        .unwrap_err();
        assert_eq!(err.field(), Some("a"));
    }

    #[test]
    fn test_duplicate_field_fails() {
        let err = parse(json!({
            "type": "record", "name": "r",
            "fields": [{"name": "a", "type": "int"}, {"name": "a", "type": "long"}]
        }))
        .unwrap_err();
        assert!(err.message().contains("more than once"));
    }

    #[test]
    fn test_nested_union_fails() {
        assert!(parse(json!({
            "type": "record", "name": "r",
            "fields": [{"name": "a", "type": ["null", ["int", "long"]]}]
        }))
        .is_err());
    }

    #[test]
    fn test_duplicate_union_branch_fails() {
        assert!(parse(json!({
            "type": "record", "name": "r",
            "fields": [{"name": "a", "type": ["string", {"type": "string", "logicalType": "uuid"}]}]
        }))
        .is_err());
    }

    #[test]
    fn test_complex_shapes_parse() {
        let doc = parse(json!({
            "type": "record", "name": "r",
            "fields": [
                {"name": "tags", "type": {"type": "array", "items": "string"}},
                {"name": "attrs", "type": {"type": "map", "values": "long"}},
                {"name": "hash", "type": {"type": "fixed", "name": "md5", "size": 16}},
                {"name": "inner", "type": {"type": "record", "name": "Inner", "fields": []}}
            ]
        }))
        .unwrap();
        let shapes: Vec<_> = doc.fields.iter().map(|f| f.schema.shape_name()).collect();
        assert_eq!(shapes, vec!["array", "map", "fixed", "record"]);
    }

    #[test]
    fn test_top_level_must_be_record() {
        assert!(parse(json!("string")).is_err());
        assert!(parse(json!({"type": "enum", "name": "e", "symbols": []})).is_err());
        assert!(SchemaParser::new().parse_str("{not json").is_err());
    }

    #[test]
    fn test_writer_emits_canonical_form() {
        let doc = parse(json!({
            "type": "record", "name": "r",
            "fields": [
                {"name": "a", "type": {"type": "enum", "name": "Op", "symbols": ["X"]}},
                {"name": "b", "type": "Op"},
                {"name": "c", "type": {"type": "string", "logicalType": "uuid"}}
            ]
        }))
        .unwrap();
        let value = doc.to_value();
        assert_eq!(value["fields"][1]["type"], json!("Op"));
        assert_eq!(value["fields"][2]["type"], json!({"type": "string", "logicalType": "uuid"}));
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["type", "name", "fields"]);
        assert_eq!(parse(value).unwrap(), doc);
    }
}
