//! Query document rendering.
//!
//! Assembles the operation keyword, variable-declaration header, argument
//! list, and return-value selection set into one document string. The exact
//! token sequence is contract surface: the server-side schema generator
//! consumes the same descriptors, and the two sides must agree on input-type
//! naming and selection-set field order.

use serde_json::{Map, Value};

use modgraph_schema::{
    ArgumentDescriptor, MethodDescriptor, ModuleRegistry, ReturnShape, ValueShape, input_type_name,
};

use crate::{
    args::{CallArgs, ClassifiedArg, ClassifiedArgs, classify_arguments},
    error::{ClientError, Result},
};

/// A fully rendered request: the document text plus its detached variables.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRequest {
    pub query: String,
    pub variables: Map<String, Value>,
}

/// Compile one method call into a request document.
///
/// Pure: the same descriptor and argument values always yield byte-identical
/// query text and variable maps. All shape errors surface here, before any
/// network exchange is attempted.
pub fn compile_call(
    registry: &ModuleRegistry,
    module: &str,
    method: &str,
    descriptor: &MethodDescriptor,
    args: &CallArgs,
) -> Result<CompiledRequest> {
    let classified = classify_arguments(descriptor, args)?;
    let arg_list = render_arg_list(&classified.plan);
    let selection = render_selection(registry, &descriptor.returns)?;
    let header = render_variable_header(descriptor, &classified)?;
    let keyword = descriptor.kind.keyword();

    let query = format!("{keyword} {header}{{ {module} {{ {method}{arg_list}{selection} }} }}");
    Ok(CompiledRequest {
        query,
        variables: classified.variables,
    })
}

/// `(name: <literal>, other: $other)`, or nothing when no arguments render.
fn render_arg_list(plan: &[ClassifiedArg]) -> String {
    if plan.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = plan
        .iter()
        .map(|arg| match arg {
            ClassifiedArg::Inline { name, literal } => format!("{name}: {literal}"),
            ClassifiedArg::Promoted { name } => format!("{name}: ${name}"),
        })
        .collect();
    format!("({})", pairs.join(", "))
}

/// Selection set for the return shape, with a leading space when non-empty.
///
/// `Void` selects the `{ void }` marker; bare scalars and scalar arrays
/// select nothing; collection-rooted shapes select every declared field in
/// catalog order.
fn render_selection(registry: &ModuleRegistry, returns: &ReturnShape) -> Result<String> {
    let shape = match returns {
        ReturnShape::Void => return Ok(" { void }".to_string()),
        ReturnShape::Value(shape) => shape,
    };
    let collection = match shape {
        ValueShape::Scalar(_) => return Ok(String::new()),
        ValueShape::Collection(name) => name,
        ValueShape::Array { item, .. } => match item.as_ref() {
            ValueShape::Scalar(_) => return Ok(String::new()),
            ValueShape::Collection(name) => name,
            ValueShape::Array { .. } => return Err(ClientError::UnsupportedReturnShape),
        },
    };
    let descriptor = registry
        .collection(collection)
        .ok_or_else(|| ClientError::UnknownCollection(collection.clone()))?;
    let fields: Vec<&str> = descriptor.fields.keys().map(String::as_str).collect();
    Ok(format!(" {{ {} }}", fields.join(", ")))
}

/// `MethodCall($name: Type, ...) ` when any argument promoted, else nothing.
fn render_variable_header(
    descriptor: &MethodDescriptor,
    classified: &ClassifiedArgs,
) -> Result<String> {
    if classified.variables.is_empty() {
        return Ok(String::new());
    }
    let mut declarations = Vec::with_capacity(classified.variables.len());
    for (name, argument) in &descriptor.args {
        if !classified.variables.contains_key(name.as_str()) {
            continue;
        }
        declarations.push(format!("${name}: {}", variable_type(name, argument)?));
    }
    Ok(format!("MethodCall({}) ", declarations.join(", ")))
}

/// GraphQL type string for a promoted argument.
///
/// `Collection(c)` → `CInput`, `Array(Collection(c))` → `[CInput]`, each
/// level suffixed `!` unless declared optional. The `CInput` naming is the
/// contract shared with the server-side schema generator.
fn variable_type(name: &str, argument: &ArgumentDescriptor) -> Result<String> {
    let bang = if argument.optional { "" } else { "!" };
    match &argument.shape {
        ValueShape::Collection(collection) => Ok(format!("{}{bang}", input_type_name(collection))),
        ValueShape::Array {
            item,
            optional_items,
        } => match item.as_ref() {
            ValueShape::Collection(collection) => {
                let item_bang = if *optional_items { "" } else { "!" };
                Ok(format!("[{}{item_bang}]{bang}", input_type_name(collection)))
            }
            // Only collection arrays promote; anything else reaching the
            // variable channel is a classification bug.
            ValueShape::Scalar(_) | ValueShape::Array { .. } => {
                Err(ClientError::UnsupportedArgumentShape {
                    argument: name.to_string(),
                })
            }
        },
        ValueShape::Scalar(_) => Err(ClientError::UnsupportedArgumentShape {
            argument: name.to_string(),
        }),
    }
}
