//! Method-schema descriptors shared by the request compiler and the
//! server-side schema generator.
//!
//! A module exposes an ordered table of methods; each method declares its
//! argument shapes and return shape. The same descriptors drive query-text
//! generation on the client and type generation on the server, so ordering
//! (arguments, collections, collection fields) is contract surface, not an
//! implementation detail. Everything here is immutable once a
//! [`ModuleRegistry`] has been built.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ── Method kind ──────────────────────────────────────────────────────────────

/// Whether a method is a read (`query`) or a write (`mutation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Query,
    Mutation,
}

impl MethodKind {
    /// The operation keyword this kind renders as.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

// ── Value and return shapes ──────────────────────────────────────────────────

/// Shape of one argument or return value.
///
/// Closed variant set: every consumer matches exhaustively so that adding a
/// variant fails to build until classification, variable-type rendering, and
/// selection rendering have all been updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueShape {
    /// A primitive wire type, named (`"string"`, `"int"`, ...).
    Scalar(String),
    /// A structured record; the name must resolve in the collection catalog.
    Collection(String),
    /// A homogeneous list of the item shape.
    Array {
        item: Box<ValueShape>,
        /// When true, list items may be null (`[XInput]` vs `[XInput!]`).
        #[serde(default, rename = "optionalItems")]
        optional_items: bool,
    },
}

impl ValueShape {
    #[must_use]
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::Scalar(name.into())
    }

    #[must_use]
    pub fn collection(name: impl Into<String>) -> Self {
        Self::Collection(name.into())
    }

    #[must_use]
    pub fn array(item: ValueShape) -> Self {
        Self::Array {
            item: Box::new(item),
            optional_items: false,
        }
    }
}

/// What a method hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnShape {
    /// No data; the compiled selection is the `{ void }` marker field and
    /// its presence in the response means success.
    Void,
    Value(ValueShape),
}

// ── Method descriptors ───────────────────────────────────────────────────────

/// One declared argument of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDescriptor {
    pub shape: ValueShape,
    /// Consumed from the call's positional prefix, in declaration order.
    #[serde(default)]
    pub positional: bool,
    #[serde(default)]
    pub optional: bool,
}

impl ArgumentDescriptor {
    #[must_use]
    pub fn new(shape: ValueShape) -> Self {
        Self {
            shape,
            positional: false,
            optional: false,
        }
    }

    #[must_use]
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Schema-level description of one remote operation.
///
/// Argument order is declaration order and is significant: positional call
/// values are matched against positional arguments in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub kind: MethodKind,
    #[serde(default)]
    pub args: IndexMap<String, ArgumentDescriptor>,
    pub returns: ReturnShape,
}

impl MethodDescriptor {
    #[must_use]
    pub fn query(returns: ReturnShape) -> Self {
        Self {
            kind: MethodKind::Query,
            args: IndexMap::new(),
            returns,
        }
    }

    #[must_use]
    pub fn mutation(returns: ReturnShape) -> Self {
        Self {
            kind: MethodKind::Mutation,
            args: IndexMap::new(),
            returns,
        }
    }

    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, descriptor: ArgumentDescriptor) -> Self {
        self.args.insert(name.into(), descriptor);
        self
    }
}

// ── Collections ──────────────────────────────────────────────────────────────

/// A named structured record type: field name → field type name.
///
/// The compiler only consumes the field *names* (selection sets list every
/// declared field, in declaration order); the type names exist for the
/// server-side generator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionDescriptor {
    pub fields: IndexMap<String, String>,
}

impl CollectionDescriptor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field_type: impl Into<String>) -> Self {
        self.fields.insert(name.into(), field_type.into());
        self
    }
}

/// GraphQL input-type name generated for a collection.
///
/// `Capitalize(collection) + "Input"` — this convention is shared with the
/// server-side schema generator; the two must agree or client and server
/// diverge silently.
#[must_use]
pub fn input_type_name(collection: &str) -> String {
    let mut chars = collection.chars();
    match chars.next() {
        Some(first) => format!("{}{}Input", first.to_uppercase(), chars.as_str()),
        None => "Input".to_string(),
    }
}

// ── Module config ────────────────────────────────────────────────────────────

/// Everything one module declares: its methods and the collections they
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(default)]
    pub methods: IndexMap<String, MethodDescriptor>,
    #[serde(default)]
    pub collections: IndexMap<String, CollectionDescriptor>,
}

impl ModuleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn method(mut self, name: impl Into<String>, descriptor: MethodDescriptor) -> Self {
        self.methods.insert(name.into(), descriptor);
        self
    }

    #[must_use]
    pub fn collection(
        mut self,
        name: impl Into<String>,
        descriptor: CollectionDescriptor,
    ) -> Self {
        self.collections.insert(name.into(), descriptor);
        self
    }
}

/// Contract for anything that can describe itself as a module.
///
/// Mirrors the config surface consumed by the server-side schema generator,
/// so one implementation can feed both sides.
pub trait SchemaModule {
    fn config(&self) -> ModuleConfig;
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Read-only lookup tables built once from module configs.
///
/// Methods stay grouped per module; collections from every module merge into
/// one catalog in registration order (a later registration of the same name
/// replaces the earlier one).
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: IndexMap<String, IndexMap<String, MethodDescriptor>>,
    catalog: IndexMap<String, CollectionDescriptor>,
}

impl ModuleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one module's config under the given name.
    pub fn register(&mut self, name: impl Into<String>, config: ModuleConfig) {
        for (collection, descriptor) in config.collections {
            self.catalog.insert(collection, descriptor);
        }
        self.modules.insert(name.into(), config.methods);
    }

    /// Register a [`SchemaModule`] implementation under the given name.
    pub fn register_module(&mut self, name: impl Into<String>, module: &dyn SchemaModule) {
        self.register(name, module.config());
    }

    #[must_use]
    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Registered module names, in registration order.
    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Method table of one module, in declaration order.
    #[must_use]
    pub fn methods(&self, module: &str) -> Option<&IndexMap<String, MethodDescriptor>> {
        self.modules.get(module)
    }

    /// Look up one method descriptor.
    #[must_use]
    pub fn method(&self, module: &str, method: &str) -> Option<&MethodDescriptor> {
        self.modules.get(module)?.get(method)
    }

    /// Look up one collection in the merged catalog.
    #[must_use]
    pub fn collection(&self, name: &str) -> Option<&CollectionDescriptor> {
        self.catalog.get(name)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn user_collection() -> CollectionDescriptor {
        CollectionDescriptor::new()
            .field("displayName", "string")
            .field("age", "int")
    }

    #[test]
    fn method_kind_keywords() {
        assert_eq!(MethodKind::Query.keyword(), "query");
        assert_eq!(MethodKind::Mutation.keyword(), "mutation");
    }

    #[test]
    fn input_type_naming() {
        assert_eq!(input_type_name("user"), "UserInput");
        assert_eq!(input_type_name("sharedList"), "SharedListInput");
        assert_eq!(input_type_name(""), "Input");
    }

    #[test]
    fn collection_fields_keep_declaration_order() {
        let collection = user_collection();
        let fields: Vec<&str> = collection.fields.keys().map(String::as_str).collect();
        assert_eq!(fields, ["displayName", "age"]);
    }

    #[test]
    fn registry_merges_collections_across_modules() {
        let mut registry = ModuleRegistry::new();
        registry.register(
            "users",
            ModuleConfig::new()
                .method(
                    "byName",
                    MethodDescriptor::query(ReturnShape::Value(ValueShape::collection("user")))
                        .arg("name", ArgumentDescriptor::new(ValueShape::scalar("string"))),
                )
                .collection("user", user_collection()),
        );
        registry.register(
            "tags",
            ModuleConfig::new().collection("tag", CollectionDescriptor::new().field("name", "string")),
        );

        assert!(registry.has_module("users"));
        assert!(!registry.has_module("groups"));
        assert!(registry.method("users", "byName").is_some());
        assert!(registry.method("users", "missing").is_none());
        let catalog: Vec<&str> = ["user", "tag"]
            .into_iter()
            .filter(|name| registry.collection(name).is_some())
            .collect();
        assert_eq!(catalog, ["user", "tag"]);
    }

    #[test]
    fn config_parses_from_json() {
        let config: ModuleConfig = serde_json::from_str(
            r#"{
                "methods": {
                    "create": {
                        "kind": "mutation",
                        "args": {
                            "user": { "shape": { "collection": "user" } },
                            "notify": { "shape": { "scalar": "boolean" }, "optional": true }
                        },
                        "returns": "void"
                    }
                },
                "collections": {
                    "user": { "fields": { "displayName": "string", "age": "int" } }
                }
            }"#,
        )
        .unwrap();

        let create = &config.methods["create"];
        assert_eq!(create.kind, MethodKind::Mutation);
        assert_eq!(create.returns, ReturnShape::Void);
        assert_eq!(create.args["user"].shape, ValueShape::collection("user"));
        assert!(create.args["notify"].optional);
        assert!(!create.args["notify"].positional);
    }

    #[test]
    fn array_shape_round_trips_with_optional_items() {
        let shape = ValueShape::Array {
            item: Box::new(ValueShape::collection("user")),
            optional_items: true,
        };
        let json = serde_json::to_string(&shape).unwrap();
        assert_eq!(
            json,
            r#"{"array":{"item":{"collection":"user"},"optionalItems":true}}"#
        );
        let parsed: ValueShape = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, shape);

        // optionalItems defaults to false when omitted.
        let parsed: ValueShape =
            serde_json::from_str(r#"{"array":{"item":{"scalar":"int"}}}"#).unwrap();
        assert_eq!(parsed, ValueShape::array(ValueShape::scalar("int")));
    }
}
