//! Canonical typed values produced by the coercer

use crate::array::NdArray;
use crate::sparse::CooMatrix;
use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// Result of a coercion; the variant is fixed by the group's rule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CoercedValue {
    /// `Index`
    Index(i64),
    /// `Numeric`
    Numeric(f64),
    /// `String`
    Text(String),
    /// `ArrayOfIndex`, at least one axis
    IndexArray(NdArray<i64>),
    /// `ArrayOfArrayOfIndex` as nested lists of integers, at least two levels
    NestedIndexArray(Value),
    /// `Vector`, at least one axis
    Vector(NdArray<f64>),
    /// `Matrix` and the `TensorN` family
    Array(NdArray<f64>),
    /// `Sparse`
    Sparse(CooMatrix),
    /// Groups without a rule
    Passthrough(Value),
}

impl CoercedValue {
    /// Short tag naming the representation
    pub fn kind(&self) -> &'static str {
        match self {
            CoercedValue::Index(_) => "index",
            CoercedValue::Numeric(_) => "numeric",
            CoercedValue::Text(_) => "text",
            CoercedValue::IndexArray(_) => "index_array",
            CoercedValue::NestedIndexArray(_) => "nested_index_array",
            CoercedValue::Vector(_) => "vector",
            CoercedValue::Array(_) => "array",
            CoercedValue::Sparse(_) => "sparse",
            CoercedValue::Passthrough(_) => "passthrough",
        }
    }

    /// Back to a loosely-typed value that coerces to the same result again
    pub fn into_value(self) -> Value {
        match self {
            CoercedValue::Index(n) => Value::Int(n),
            CoercedValue::Numeric(x) => Value::Float(x),
            CoercedValue::Text(s) => Value::Text(s),
            CoercedValue::IndexArray(array) => array.to_nested(),
            CoercedValue::NestedIndexArray(rows) => rows,
            CoercedValue::Vector(array) | CoercedValue::Array(array) => Value::Array(array),
            CoercedValue::Sparse(matrix) => Value::Sparse(matrix),
            CoercedValue::Passthrough(value) => value,
        }
    }

    /// Float array behind `Vector`, `Matrix` and `TensorN` results
    pub fn as_array(&self) -> Option<&NdArray<f64>> {
        match self {
            CoercedValue::Vector(array) | CoercedValue::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl fmt::Display for CoercedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercedValue::Index(n) => write!(f, "{n}"),
            CoercedValue::Numeric(x) => write!(f, "{}", Value::Float(*x)),
            CoercedValue::Text(s) => write!(f, "{s}"),
            CoercedValue::IndexArray(array) => write!(f, "{array}"),
            CoercedValue::Vector(array) | CoercedValue::Array(array) => write!(f, "{array}"),
            CoercedValue::Sparse(matrix) => write!(f, "{matrix}"),
            CoercedValue::NestedIndexArray(value) | CoercedValue::Passthrough(value) => {
                write!(f, "{value}")
            }
        }
    }
}
