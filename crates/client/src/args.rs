//! Argument classification: inline literals vs promoted variables.
//!
//! For one method call, walk the declared arguments in order and decide per
//! argument whether its runtime value is rendered as a JSON literal inside
//! the query text or travels out-of-band as a named variable referenced by
//! `$name`. Collection-shaped values (bare or as array items) promote:
//! they must satisfy a generated input type on the server, so embedding
//! them as literal text would be both verbose and type-unsafe.

use serde_json::{Map, Value};

use modgraph_schema::{MethodDescriptor, ValueShape};

use crate::error::{ClientError, Result};

// ── Call arguments ───────────────────────────────────────────────────────────

/// The call-site argument convention, made explicit: a fixed-length
/// positional prefix followed by exactly one trailing record of named
/// arguments. Named values are never read from arbitrary positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub positional: Vec<Value>,
    pub named: Map<String, Value>,
}

impl CallArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next positional value.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set one named value in the trailing record.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }
}

// ── Classification ───────────────────────────────────────────────────────────

/// One argument's placement in the compiled request, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedArg {
    /// Rendered as a JSON literal directly in the query text.
    Inline { name: String, literal: String },
    /// Sent through the variable channel, referenced as `$name`.
    Promoted { name: String },
}

/// Output of one classification pass: the ordered render plan plus the
/// detached variable map, built fresh per call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedArgs {
    pub plan: Vec<ClassifiedArg>,
    pub variables: Map<String, Value>,
}

/// True when values of this shape travel as bound variables rather than
/// inline query text.
fn promotes(shape: &ValueShape) -> bool {
    match shape {
        ValueShape::Collection(_) => true,
        ValueShape::Array { item, .. } => matches!(item.as_ref(), ValueShape::Collection(_)),
        ValueShape::Scalar(_) => false,
    }
}

/// Classify every declared argument of `descriptor` against the call values.
///
/// A single cursor over the positional prefix advances once per positional
/// argument, in declaration order; all other arguments are read from the
/// trailing named record. One pass produces both the inline render plan and
/// the variable map, so the two can never disagree on cursor state.
///
/// Absent optional arguments are omitted entirely; an absent required
/// argument renders as `null` (the call is malformed upstream, but the
/// compiled text stays well-formed JSON).
pub fn classify_arguments(descriptor: &MethodDescriptor, args: &CallArgs) -> Result<ClassifiedArgs> {
    let mut cursor = 0usize;
    let mut classified = ClassifiedArgs::default();

    for (name, argument) in &descriptor.args {
        let value = if argument.positional {
            let value = args.positional.get(cursor).cloned();
            cursor += 1;
            value
        } else {
            args.named.get(name).cloned()
        };
        let value = match value {
            Some(value) => value,
            None if argument.optional => continue,
            None => Value::Null,
        };

        if promotes(&argument.shape) {
            classified.plan.push(ClassifiedArg::Promoted { name: name.clone() });
            classified.variables.insert(name.clone(), value);
        } else {
            let literal = serde_json::to_string(&value).map_err(ClientError::Encode)?;
            classified
                .plan
                .push(ClassifiedArg::Inline { name: name.clone(), literal });
        }
    }

    Ok(classified)
}
