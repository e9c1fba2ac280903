//! Group-directed value coercion
//!
//! [`Coercer::coerce`] turns a loosely-typed value into the canonical
//! representation of a workspace group in three steps:
//!
//! 1. resolve the group to a name (numeric ids go through the host group table);
//! 2. if the value is text, let the group's registered constructor interpret
//!    it, falling back to the generic literal parser when it declines;
//! 3. apply the group's rule, selected by [`GroupKind::from_name`].
//!
//! Groups without a rule return the value untouched, text included.

mod coerced;
mod constructors;

pub use coerced::CoercedValue;
pub use constructors::{Constructor, ConstructorRegistry};

use crate::array::{Element, NdArray};
use crate::error::{CoerceError, Result};
use crate::group::{GroupId, GroupKind};
use crate::host::{HostTables, VariableRecord};
use crate::parser::parse_literal;
use crate::sparse::CooMatrix;
use crate::value::Value;
use std::borrow::Cow;
use tracing::{debug, trace};

/// Coercion engine bound to one host session
#[derive(Debug, Clone)]
pub struct Coercer<'h> {
    host: &'h HostTables,
    constructors: ConstructorRegistry,
}

impl<'h> Coercer<'h> {
    /// Coercer with the built-in constructors for `Index`, `Numeric` and `String`
    pub fn new(host: &'h HostTables) -> Self {
        Self::with_constructors(host, ConstructorRegistry::default())
    }

    pub fn with_constructors(host: &'h HostTables, constructors: ConstructorRegistry) -> Self {
        Self { host, constructors }
    }

    /// Add or replace the text constructor for a group
    pub fn register_constructor(&mut self, group: impl Into<String>, constructor: Constructor) {
        self.constructors.register(group, constructor);
    }

    pub fn host(&self) -> &'h HostTables {
        self.host
    }

    /// Name of the group a caller refers to
    pub fn resolve<'g>(&self, group: &'g GroupId) -> Result<Cow<'g, str>> {
        match group {
            GroupId::Index(i) => Ok(Cow::Owned(self.host.group_name(*i)?.to_string())),
            GroupId::Name(name) => Ok(Cow::Borrowed(name.as_str())),
        }
    }

    /// Coerce `value` into the representation of `group`
    pub fn coerce(&self, group: &GroupId, value: Value) -> Result<CoercedValue> {
        let name = self.resolve(group)?;
        let kind = GroupKind::from_name(&name);
        debug!(group = %name, ?kind, input = value.type_name(), "coercing value");

        if kind.is_passthrough() {
            return Ok(CoercedValue::Passthrough(value));
        }

        let value = match value {
            Value::Text(text) => self.interpret_text(&name, text)?,
            other => other,
        };
        let fail = |message: String| CoerceError::conversion(name.as_ref(), message);

        match kind {
            GroupKind::Index => Ok(CoercedValue::Index(i64::from_value(&value).map_err(fail)?)),
            GroupKind::ArrayOfIndex => Ok(CoercedValue::IndexArray(
                NdArray::from_value(&value, 1).map_err(fail)?,
            )),
            GroupKind::ArrayOfArrayOfIndex => {
                let array = NdArray::<i64>::from_value(&value, 2).map_err(fail)?;
                Ok(CoercedValue::NestedIndexArray(array.to_nested()))
            }
            GroupKind::String => Ok(CoercedValue::Text(value.to_plain_text())),
            GroupKind::Numeric => Ok(CoercedValue::Numeric(f64::from_value(&value).map_err(fail)?)),
            GroupKind::Vector => Ok(CoercedValue::Vector(NdArray::from_value(&value, 1).map_err(fail)?)),
            GroupKind::Matrix => Ok(CoercedValue::Array(NdArray::from_value(&value, 2).map_err(fail)?)),
            GroupKind::Sparse => Ok(CoercedValue::Sparse(CooMatrix::from_value(&value).map_err(fail)?)),
            GroupKind::Tensor => {
                let rank = group.tensor_rank().map_err(|err| match err {
                    CoerceError::TensorRankUnavailable { .. } => CoerceError::TensorRankUnavailable {
                        group: name.to_string(),
                    },
                    other => other,
                })?;
                Ok(CoercedValue::Array(NdArray::from_value(&value, rank).map_err(fail)?))
            }
            GroupKind::Passthrough => Ok(CoercedValue::Passthrough(value)),
        }
    }

    /// Coerce a variable's declared default through its own group.
    ///
    /// The group is passed by name so that tensor ranks are available.
    pub fn coerce_default(&self, variable: &VariableRecord) -> Result<Option<CoercedValue>> {
        let Some(default) = &variable.default else {
            return Ok(None);
        };
        let group = GroupId::Name(self.host.group_name(variable.group)?.to_string());
        self.coerce(&group, Value::Text(default.clone())).map(Some)
    }

    /// Constructor first; generic literal parsing when it declines
    fn interpret_text(&self, group: &str, text: String) -> Result<Value> {
        if let Some(value) = self.constructors.construct(group, &text) {
            trace!(group, "text accepted by group constructor");
            return Ok(value);
        }
        debug!(group, text = %text, "group constructor declined, parsing as literal");
        parse_literal(&text).map_err(|err| {
            CoerceError::conversion(group, format!("cannot interpret {text:?}: {}", err.message()))
        })
    }
}

/// One-shot coercion with the default constructors
pub fn coerce(host: &HostTables, group: &GroupId, value: Value) -> Result<CoercedValue> {
    Coercer::new(host).coerce(group, value)
}
