//! Tool registry: name → {schema, handler}.
//!
//! Built once through [`ToolRegistryBuilder`] and immutable afterwards. Each
//! tool's argument schema is derived from its parameter struct with
//! `schemars`. The same schema is advertised through `tools/list` and checked
//! by [`ToolRegistry::invoke`] before the handler runs, so a failed lookup or
//! validation never reaches the handler.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{GatewayError, RegistryError};
use crate::protocol::{CallToolResult, Tool};

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn matches_type(ty: &str, value: &Value) -> bool {
    match ty {
        "string" => value.is_string(),
        "boolean" => value.is_boolean(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

/// JSON types a property schema allows. Empty means unconstrained.
fn schema_types(schema: &Value) -> Vec<String> {
    match schema.get("type") {
        Some(Value::String(ty)) => vec![ty.clone()],
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => ["anyOf", "oneOf"]
            .iter()
            .filter_map(|key| schema.get(*key)?.as_array())
            .flatten()
            .flat_map(schema_types)
            .collect(),
    }
}

/// Checks for one property, read back from the derived schema.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldRule {
    name: String,
    required: bool,
    types: Vec<String>,
    item_types: Vec<String>,
    min_items: Option<u64>,
}

impl FieldRule {
    fn accepts(&self, value: &Value) -> bool {
        let type_ok =
            self.types.is_empty() || self.types.iter().any(|ty| matches_type(ty, value));
        let items_ok = match value.as_array() {
            Some(items) if !self.item_types.is_empty() => items
                .iter()
                .all(|item| self.item_types.iter().any(|ty| matches_type(ty, item))),
            _ => true,
        };
        type_ok && items_ok
    }

    fn too_short(&self, value: &Value) -> bool {
        match (self.min_items, value.as_array()) {
            (Some(min), Some(items)) => u64::try_from(items.len()).unwrap_or(u64::MAX) < min,
            _ => false,
        }
    }

    fn label(&self) -> String {
        let types: Vec<&str> = self
            .types
            .iter()
            .map(String::as_str)
            .filter(|ty| *ty != "null")
            .collect();
        match (types.as_slice(), self.item_types.as_slice()) {
            (["array"], [item]) => format!("list of {item}s"),
            _ => types.join(" or "),
        }
    }
}

fn field_rules(tool: &str, schema: &JsonObject) -> Result<Vec<FieldRule>, RegistryError> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let Some(properties) = schema.get("properties") else {
        return Ok(Vec::new());
    };
    let properties = properties
        .as_object()
        .ok_or_else(|| RegistryError::InvalidSchema {
            tool: tool.to_string(),
            reason: "`properties` is not an object".to_string(),
        })?;

    Ok(properties
        .iter()
        .map(|(name, property)| FieldRule {
            name: name.clone(),
            required: required.contains(&name.as_str()),
            types: schema_types(property),
            item_types: property.get("items").map(schema_types).unwrap_or_default(),
            min_items: property.get("minItems").and_then(Value::as_u64),
        })
        .collect())
}

/// Declared name, description and argument schema of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    input_schema: Arc<JsonObject>,
    fields: Vec<FieldRule>,
}

impl ToolSchema {
    /// Derive the argument schema from the parameter type `P`.
    pub fn for_params<P: JsonSchema>(
        name: &'static str,
        description: &'static str,
    ) -> Result<Self, RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidSchema {
            tool: name.to_string(),
            reason,
        };
        let schema = schemars::schema_for!(P);
        let Value::Object(input_schema) =
            serde_json::to_value(&schema).map_err(|e| invalid(e.to_string()))?
        else {
            return Err(invalid("schema is not a JSON object".to_string()));
        };
        let fields = field_rules(name, &input_schema)?;
        Ok(Self {
            name,
            description,
            input_schema: Arc::new(input_schema),
            fields,
        })
    }

    /// JSON Schema object advertised through `tools/list`.
    pub fn input_schema(&self) -> &JsonObject {
        &self.input_schema
    }

    /// Check `arguments` and return only the declared, non-null fields.
    ///
    /// Absent arguments count as `{}`. Explicit `null` counts as absent.
    /// Undeclared fields are dropped.
    pub fn validate(&self, arguments: Option<Value>) -> Result<Map<String, Value>, GatewayError> {
        let mut supplied = match arguments {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(GatewayError::invalid_arguments(
                    self.name,
                    None,
                    format!("arguments must be an object, got {}", json_kind(&other)),
                ))
            }
        };

        let mut cleaned = Map::new();
        for field in &self.fields {
            match supplied.remove(&field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        return Err(GatewayError::invalid_arguments(
                            self.name,
                            Some(&field.name),
                            format!("missing required field '{}'", field.name),
                        ));
                    }
                }
                Some(value) => {
                    if !field.accepts(&value) {
                        return Err(GatewayError::invalid_arguments(
                            self.name,
                            Some(&field.name),
                            format!(
                                "field '{}' must be a {}, got {}",
                                field.name,
                                field.label(),
                                json_kind(&value)
                            ),
                        ));
                    }
                    if field.too_short(&value) {
                        return Err(GatewayError::invalid_arguments(
                            self.name,
                            Some(&field.name),
                            format!("field '{}' must not be empty", field.name),
                        ));
                    }
                    cleaned.insert(field.name.clone(), value);
                }
            }
        }
        Ok(cleaned)
    }

    pub fn descriptor(&self) -> Tool {
        Tool::new(self.name, self.description, Arc::clone(&self.input_schema))
    }
}

/// Runs one tool against already-validated arguments.
#[async_trait]
pub trait ToolHandler<C>: Send + Sync {
    async fn call(
        &self,
        ctx: Arc<C>,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, GatewayError>;
}

/// Adapts an `async fn(Arc<C>, P) -> CallToolResult` into a [`ToolHandler`],
/// deserializing the validated arguments into `P`.
pub struct FnHandler<P, F> {
    tool: &'static str,
    f: F,
    _params: PhantomData<fn() -> P>,
}

impl<P, F> FnHandler<P, F> {
    pub fn new(tool: &'static str, f: F) -> Self {
        Self {
            tool,
            f,
            _params: PhantomData,
        }
    }
}

impl<P, F> fmt::Debug for FnHandler<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler")
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C, P, F, Fut> ToolHandler<C> for FnHandler<P, F>
where
    C: Send + Sync + 'static,
    P: DeserializeOwned + Send + 'static,
    F: Fn(Arc<C>, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CallToolResult> + Send + 'static,
{
    async fn call(
        &self,
        ctx: Arc<C>,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResult, GatewayError> {
        let params: P = serde_json::from_value(Value::Object(arguments))
            .map_err(|e| GatewayError::invalid_arguments(self.tool, None, e.to_string()))?;
        Ok((self.f)(ctx, params).await)
    }
}

struct RegisteredTool<C> {
    schema: ToolSchema,
    handler: Arc<dyn ToolHandler<C>>,
}

/// Collects registrations; [`build`](Self::build) rejects duplicates and
/// unusable schemas.
pub struct ToolRegistryBuilder<C> {
    tools: Vec<RegisteredTool<C>>,
    errors: Vec<RegistryError>,
}

impl<C> fmt::Debug for ToolRegistryBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistryBuilder")
            .field("tools", &self.tools.iter().map(|t| t.schema.name).collect::<Vec<_>>())
            .field("errors", &self.errors)
            .finish()
    }
}

impl<C> Default for ToolRegistryBuilder<C> {
    fn default() -> Self {
        Self {
            tools: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<C: Send + Sync + 'static> ToolRegistryBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn register(mut self, schema: ToolSchema, handler: Arc<dyn ToolHandler<C>>) -> Self {
        self.tools.push(RegisteredTool { schema, handler });
        self
    }

    /// Register an async function taking typed parameters. The advertised
    /// schema is derived from `P`.
    #[must_use]
    pub fn tool<P, F, Fut>(mut self, name: &'static str, description: &'static str, f: F) -> Self
    where
        P: JsonSchema + DeserializeOwned + Send + 'static,
        F: Fn(Arc<C>, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallToolResult> + Send + 'static,
    {
        match ToolSchema::for_params::<P>(name, description) {
            Ok(schema) => self.register(schema, Arc::new(FnHandler::new(name, f))),
            Err(e) => {
                self.errors.push(e);
                self
            }
        }
    }

    pub fn build(self) -> Result<ToolRegistry<C>, RegistryError> {
        if let Some(e) = self.errors.into_iter().next() {
            return Err(e);
        }
        let mut index = HashMap::with_capacity(self.tools.len());
        for (position, tool) in self.tools.iter().enumerate() {
            if index.insert(tool.schema.name, position).is_some() {
                return Err(RegistryError::DuplicateTool(tool.schema.name.to_string()));
            }
        }
        Ok(ToolRegistry {
            tools: self.tools,
            index,
        })
    }
}

/// Immutable tool table, in registration order.
pub struct ToolRegistry<C> {
    tools: Vec<RegisteredTool<C>>,
    index: HashMap<&'static str, usize>,
}

impl<C> fmt::Debug for ToolRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl<C> ToolRegistry<C> {
    pub fn builder() -> ToolRegistryBuilder<C> {
        ToolRegistryBuilder::default()
    }

    fn entry(&self, name: &str) -> Result<&RegisteredTool<C>, GatewayError> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| GatewayError::unknown_tool(name))
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<dyn ToolHandler<C>>, GatewayError> {
        self.entry(name).map(|t| Arc::clone(&t.handler))
    }

    pub fn schema(&self, name: &str) -> Result<&ToolSchema, GatewayError> {
        self.entry(name).map(|t| &t.schema)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.schema.name).collect()
    }

    pub fn descriptors(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.schema.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up, validate, then run.
    pub async fn invoke(
        &self,
        ctx: Arc<C>,
        name: &str,
        arguments: Option<Value>,
    ) -> Result<CallToolResult, GatewayError> {
        let tool = self.entry(name)?;
        let arguments = tool.schema.validate(arguments)?;
        debug!(tool = %name, fields = arguments.len(), "Dispatching tool call");
        tool.handler.call(ctx, arguments).await
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::protocol::{result_text, Content};

    #[derive(Debug, Deserialize, JsonSchema)]
    struct EchoParams {
        #[schemars(description = "Word to echo")]
        word: String,
        #[schemars(description = "Shout it")]
        loud: Option<bool>,
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    struct TagParams {
        #[schemars(description = "Tags", length(min = 1))]
        tags: Vec<String>,
        dry: Option<bool>,
    }

    #[derive(Debug, Deserialize, JsonSchema)]
    struct NoParams {}

    fn text(text: impl Into<String>) -> CallToolResult {
        CallToolResult::success(vec![Content::text(text.into())])
    }

    async fn echo(prefix: Arc<String>, params: EchoParams) -> CallToolResult {
        let out = format!("{prefix}{}", params.word);
        if params.loud.unwrap_or(false) {
            text(out.to_uppercase())
        } else {
            text(out)
        }
    }

    async fn tag(_: Arc<String>, params: TagParams) -> CallToolResult {
        text(params.tags.join(","))
    }

    fn echo_schema() -> ToolSchema {
        ToolSchema::for_params::<EchoParams>("echo", "Echo a word").unwrap()
    }

    fn tags_schema() -> ToolSchema {
        ToolSchema::for_params::<TagParams>("tag", "Tag things").unwrap()
    }

    fn registry() -> ToolRegistry<String> {
        ToolRegistry::builder()
            .tool("echo", "Echo a word", echo)
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup_returns_same_handler() {
        let registry = registry();
        let first = registry.lookup("echo").unwrap();
        let second = registry.lookup("echo").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_lookup_unknown_tool() {
        let err = registry().lookup("nope").err().unwrap();
        assert_eq!(err, GatewayError::unknown_tool("nope"));
    }

    #[test]
    fn test_duplicate_tool_rejected() {
        let err = ToolRegistry::<String>::builder()
            .tool("echo", "Echo a word", echo)
            .tool("echo", "Echo again", echo)
            .build()
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("echo".into()));
    }

    #[test]
    fn test_validate_missing_required() {
        let err = echo_schema().validate(Some(json!({"loud": true}))).unwrap_err();
        match err {
            GatewayError::InvalidArguments { field, .. } => {
                assert_eq!(field.as_deref(), Some("word"))
            }
            other => panic!("Expected InvalidArguments, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_null_required_is_missing() {
        assert!(echo_schema().validate(Some(json!({"word": null}))).is_err());
    }

    #[test]
    fn test_validate_wrong_type() {
        let err = echo_schema()
            .validate(Some(json!({"word": 42})))
            .unwrap_err();
        assert!(err.to_string().contains("must be a string, got number"), "{err}");

        let err = echo_schema()
            .validate(Some(json!({"word": "hi", "loud": "yes"})))
            .unwrap_err();
        assert!(err.to_string().contains("must be a boolean, got string"), "{err}");
    }

    #[test]
    fn test_validate_drops_nulls_and_extras() {
        let cleaned = echo_schema()
            .validate(Some(json!({"word": "hi", "loud": null, "extra": 1})))
            .unwrap();
        assert_eq!(Value::Object(cleaned), json!({"word": "hi"}));
    }

    #[test]
    fn test_validate_absent_arguments_are_empty_object() {
        let schema = ToolSchema::for_params::<NoParams>("noop", "Nothing").unwrap();
        assert!(schema.validate(None).unwrap().is_empty());
        assert!(echo_schema().validate(None).is_err());
    }

    #[test]
    fn test_validate_non_object_arguments() {
        let err = echo_schema().validate(Some(json!(["hi"]))).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArguments { field: None, .. }));
    }

    #[test]
    fn test_validate_string_array() {
        let schema = tags_schema();
        assert!(schema.validate(Some(json!({"tags": ["a", "b"]}))).is_ok());
        assert!(schema.validate(Some(json!({"tags": []}))).is_err());
        assert!(schema.validate(Some(json!({"tags": ["a", 1]}))).is_err());
        let err = schema.validate(Some(json!({"tags": "a"}))).unwrap_err();
        assert!(err.to_string().contains("must be a list of strings"), "{err}");
    }

    #[test]
    fn test_advertised_schema_comes_from_params() {
        let schema = tags_schema();
        let input = schema.input_schema();
        assert_eq!(input["type"], "object");
        assert_eq!(input["properties"]["tags"]["type"], "array");
        assert_eq!(input["properties"]["tags"]["items"]["type"], "string");
        assert_eq!(input["properties"]["tags"]["minItems"], 1);
        assert_eq!(input["properties"]["tags"]["description"], "Tags");
        assert_eq!(input["required"], json!(["tags"]));
        assert!(input["properties"].get("dry").is_some());

        let tool = schema.descriptor();
        assert_eq!(tool.name, "tag");
        assert_eq!(&*tool.input_schema, input);
    }

    #[test]
    fn test_descriptors_keep_registration_order() {
        let registry = ToolRegistry::builder()
            .tool("echo", "Echo a word", echo)
            .tool("after", "Registered second", |_: Arc<String>, _: NoParams| async {
                text("ok")
            })
            .build()
            .unwrap();
        let names: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.name.to_string())
            .collect();
        assert_eq!(names, vec!["echo", "after"]);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_invoke_runs_handler() {
        let result = registry()
            .invoke(
                Arc::new("> ".to_string()),
                "echo",
                Some(json!({"word": "hi", "loud": true})),
            )
            .await
            .unwrap();
        assert_eq!(result_text(&result), "> HI");
    }

    #[tokio::test]
    async fn test_invoke_rejects_empty_list_before_handler() {
        let registry = ToolRegistry::builder()
            .tool("tag", "Tag things", tag)
            .build()
            .unwrap();
        let err = registry
            .invoke(Arc::new(String::new()), "tag", Some(json!({"tags": []})))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn test_invoke_validation_failure_skips_handler() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let registry = ToolRegistry::builder()
            .tool("echo", "Echo a word", move |_: Arc<String>, _: EchoParams| {
                counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async { text("ran") }
            })
            .build()
            .unwrap();

        let err = registry
            .invoke(Arc::new(String::new()), "echo", Some(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArguments { .. }));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }
}
