//! Dense row-major arrays
//!
//! `NdArray::from_value` mirrors what an array constructor with an explicit
//! element type and a minimum rank does: nested sequences must be
//! rectangular, scalars become rank-0 arrays, and missing leading axes are
//! filled with length-1 dimensions until `ndmin` is reached.

use crate::value::Value;
use serde::Serialize;
use std::fmt;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Scalar element of an [`NdArray`]
pub trait Element: Copy + PartialEq + fmt::Debug + Serialize {
    /// Element type name used in conversion errors
    const DTYPE: &'static str;

    /// Convert one scalar value into the element type
    fn from_value(value: &Value) -> Result<Self, String>;

    /// Convert an element of a float array (narrowing if needed)
    fn from_f64(x: f64) -> Result<Self, String>;

    fn to_value(self) -> Value;
}

impl Element for i64 {
    const DTYPE: &'static str = "int64";

    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::Bool(b) => Ok(i64::from(*b)),
            Value::Float(x) => Self::from_f64(*x),
            Value::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid literal for int64: {s:?}")),
            other => Err(format!("cannot convert {} to int64", other.type_name())),
        }
    }

    fn from_f64(x: f64) -> Result<Self, String> {
        if x.is_nan() {
            return Err("cannot convert float NaN to int64".to_string());
        }
        let truncated = x.trunc();
        // i64::MAX is not representable; 2^63 is the first value out of range
        if truncated < -9_223_372_036_854_775_808.0 || truncated >= 9_223_372_036_854_775_808.0 {
            return Err(format!("float {x} out of range for int64"));
        }
        Ok(truncated as i64)
    }

    fn to_value(self) -> Value {
        Value::Int(self)
    }
}

impl Element for f64 {
    const DTYPE: &'static str = "float64";

    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(n) => Ok(*n as f64),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::None => Ok(f64::NAN),
            Value::Text(s) => parse_float_text(s.trim())
                .ok_or_else(|| format!("could not convert string to float64: {s:?}")),
            other => Err(format!("cannot convert {} to float64", other.type_name())),
        }
    }

    fn from_f64(x: f64) -> Result<Self, String> {
        Ok(x)
    }

    fn to_value(self) -> Value {
        Value::Float(self)
    }
}

/// Float text as accepted by numeric constructors: plain literals plus
/// `inf`, `-inf` and `nan` in any case
pub(crate) fn parse_float_text(text: &str) -> Option<f64> {
    let lowered = text.to_ascii_lowercase();
    match lowered.trim_start_matches(['+', '-']) {
        "inf" | "infinity" | "nan" => lowered.parse::<f64>().ok(),
        _ => text.replace('_', "").parse::<f64>().ok(),
    }
}

/// Dense array with row-major element storage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NdArray<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T: Element> NdArray<T> {
    /// Build an array from raw parts; `data.len()` must match the shape
    pub fn from_shape_vec(shape: Vec<usize>, data: Vec<T>) -> Result<Self, String> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(format!(
                "shape {shape:?} needs {expected} elements, got {}",
                data.len()
            ));
        }
        Ok(Self { shape, data })
    }

    /// Caller guarantees `data.len()` equals the product of `shape`
    pub(crate) fn from_parts(shape: Vec<usize>, data: Vec<T>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { shape, data }
    }

    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Convert a loosely-typed value, promoting to at least `ndmin` axes
    pub fn from_value(value: &Value, ndmin: usize) -> Result<Self, String> {
        let mut array = match value {
            Value::Array(array) => Self {
                shape: array.shape.clone(),
                data: array
                    .data
                    .iter()
                    .map(|&x| T::from_f64(x))
                    .collect::<Result<_, _>>()?,
            },
            Value::Sparse(matrix) => {
                let dense = matrix.to_dense()?;
                Self::from_value(&Value::Array(dense), 0)?
            }
            Value::List(_) => {
                let mut shape = Vec::new();
                infer_shape(value, &mut shape);
                let mut data = Vec::with_capacity(shape.iter().product());
                flatten_into(value, &shape, &mut data)?;
                Self { shape, data }
            }
            scalar => Self {
                shape: Vec::new(),
                data: vec![T::from_value(scalar)?],
            },
        };
        array.promote(ndmin);
        Ok(array)
    }

    /// Prepend unit axes until the array has `ndmin` dimensions
    pub fn promote(&mut self, ndmin: usize) {
        if self.shape.len() < ndmin {
            let missing = ndmin - self.shape.len();
            let mut shape = vec![1; missing];
            shape.append(&mut self.shape);
            self.shape = shape;
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Re-express as nested sequences, one level per axis
    pub fn to_nested(&self) -> Value {
        nest(&self.shape, &self.data)
    }
}

fn nest<T: Element>(shape: &[usize], data: &[T]) -> Value {
    match shape.split_first() {
        None => data.first().map_or(Value::None, |x| x.to_value()),
        Some((&len, inner)) => {
            let stride: usize = inner.iter().product();
            Value::List(
                (0..len)
                    .map(|i| nest(inner, &data[i * stride..(i + 1) * stride]))
                    .collect(),
            )
        }
    }
}

/// Shape is taken from the first element at each level; `flatten_into`
/// then checks every sibling against it
fn infer_shape(value: &Value, shape: &mut Vec<usize>) {
    let mut current = value;
    loop {
        match current {
            Value::List(items) => {
                shape.push(items.len());
                match items.first() {
                    Some(first) => current = first,
                    None => return,
                }
            }
            Value::Array(array) => {
                shape.extend_from_slice(&array.shape);
                return;
            }
            _ => return,
        }
    }
}

fn flatten_into<T: Element>(value: &Value, shape: &[usize], out: &mut Vec<T>) -> Result<(), String> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || match (value, shape.split_first()) {
        (Value::List(items), Some((&len, inner))) => {
            if items.len() != len {
                return Err(ragged());
            }
            items.iter().try_for_each(|item| flatten_into(item, inner, out))
        }
        (Value::Array(array), _) if array.shape == shape => {
            for &x in &array.data {
                out.push(T::from_f64(x)?);
            }
            Ok(())
        }
        (Value::List(_) | Value::Array(_), None) | (_, Some(_)) => Err(ragged()),
        (Value::Sparse(_), None) => Err(format!("cannot nest a sparse matrix in a {} array", T::DTYPE)),
        (scalar, None) => {
            out.push(T::from_value(scalar)?);
            Ok(())
        }
    })
}

fn ragged() -> String {
    "setting an array element with a sequence: nested sequences are ragged".to_string()
}

impl<T: Element> fmt::Display for NdArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_nested<T: Element>(
            f: &mut fmt::Formatter<'_>,
            shape: &[usize],
            data: &[T],
        ) -> fmt::Result {
            match shape.split_first() {
                None => match data.first() {
                    Some(x) => write!(f, "{}", x.to_value()),
                    None => write!(f, "[]"),
                },
                Some((&len, inner)) => {
                    let stride: usize = inner.iter().product();
                    write!(f, "[")?;
                    for i in 0..len {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write_nested(f, inner, &data[i * stride..(i + 1) * stride])?;
                    }
                    write!(f, "]")
                }
            }
        }
        write_nested(f, &self.shape, &self.data)
    }
}
