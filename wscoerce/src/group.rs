//! Group identifiers and the closed set of coercion rules

use crate::error::{CoerceError, Result};
use std::fmt;

/// Group as given by a caller: a position in the host group table, or a name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupId {
    Index(usize),
    Name(String),
}

impl GroupId {
    /// Rank of a `TensorN` group, read from the character after `Tensor` in
    /// the name the caller passed. A numeric identifier carries no such
    /// character, so it cannot supply a rank.
    pub fn tensor_rank(&self) -> Result<usize> {
        let name = match self {
            GroupId::Name(name) => name,
            GroupId::Index(_) => {
                return Err(CoerceError::TensorRankUnavailable {
                    group: self.to_string(),
                });
            }
        };
        let digit = name
            .strip_prefix(TENSOR_PREFIX)
            .and_then(|rest| rest.chars().next())
            .and_then(|c| c.to_digit(10));
        match digit {
            Some(rank) if rank > 0 => Ok(rank as usize),
            _ => Err(CoerceError::conversion(
                name.as_str(),
                "tensor groups must be named `TensorN` with a rank digit N >= 1",
            )),
        }
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupId::Index(i) => write!(f, "{i}"),
            GroupId::Name(name) => write!(f, "{name}"),
        }
    }
}

impl From<usize> for GroupId {
    fn from(index: usize) -> Self {
        GroupId::Index(index)
    }
}

impl From<&str> for GroupId {
    fn from(name: &str) -> Self {
        GroupId::Name(name.to_string())
    }
}

impl From<String> for GroupId {
    fn from(name: String) -> Self {
        GroupId::Name(name)
    }
}

const TENSOR_PREFIX: &str = "Tensor";

/// Coercion rule selected by a resolved group name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Index,
    ArrayOfIndex,
    ArrayOfArrayOfIndex,
    String,
    Numeric,
    Vector,
    Matrix,
    Sparse,
    /// Any name starting with `Tensor`
    Tensor,
    /// No rule; the value is returned untouched
    Passthrough,
}

impl GroupKind {
    /// Exact-name rules first, then the `Tensor` prefix family
    pub fn from_name(name: &str) -> Self {
        match name {
            "Index" => GroupKind::Index,
            "ArrayOfIndex" => GroupKind::ArrayOfIndex,
            "ArrayOfArrayOfIndex" => GroupKind::ArrayOfArrayOfIndex,
            "String" => GroupKind::String,
            "Numeric" => GroupKind::Numeric,
            "Vector" => GroupKind::Vector,
            "Matrix" => GroupKind::Matrix,
            "Sparse" => GroupKind::Sparse,
            _ if name.starts_with(TENSOR_PREFIX) => GroupKind::Tensor,
            _ => GroupKind::Passthrough,
        }
    }

    /// Minimum number of array axes the rule produces, if it builds an array
    pub fn ndmin(self) -> Option<usize> {
        match self {
            GroupKind::ArrayOfIndex | GroupKind::Vector => Some(1),
            GroupKind::ArrayOfArrayOfIndex | GroupKind::Matrix | GroupKind::Sparse => Some(2),
            _ => None,
        }
    }

    pub fn is_passthrough(self) -> bool {
        self == GroupKind::Passthrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_names() {
        assert_eq!(GroupKind::from_name("Index"), GroupKind::Index);
        assert_eq!(GroupKind::from_name("ArrayOfArrayOfIndex"), GroupKind::ArrayOfArrayOfIndex);
        assert_eq!(GroupKind::from_name("Sparse"), GroupKind::Sparse);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(GroupKind::from_name("index"), GroupKind::Passthrough);
        assert_eq!(GroupKind::from_name("VECTOR"), GroupKind::Passthrough);
        assert_eq!(GroupKind::from_name("tensor3"), GroupKind::Passthrough);
    }

    #[test]
    fn test_tensor_prefix_family() {
        assert_eq!(GroupKind::from_name("Tensor3"), GroupKind::Tensor);
        assert_eq!(GroupKind::from_name("Tensor7"), GroupKind::Tensor);
        assert_eq!(GroupKind::from_name("Tensor"), GroupKind::Tensor);
    }

    #[test]
    fn test_array_of_names_do_not_match_prefixes() {
        assert_eq!(GroupKind::from_name("ArrayOfTensor3"), GroupKind::Passthrough);
        assert_eq!(GroupKind::from_name("ArrayOfVector"), GroupKind::Passthrough);
    }

    #[test]
    fn test_tensor_rank_from_name() {
        assert_eq!(GroupId::from("Tensor3").tensor_rank(), Ok(3));
        assert_eq!(GroupId::from("Tensor7").tensor_rank(), Ok(7));
        // only the single character after the prefix is read
        assert_eq!(GroupId::from("Tensor42").tensor_rank(), Ok(4));
    }

    #[test]
    fn test_tensor_rank_invalid_names() {
        assert!(GroupId::from("Tensor").tensor_rank().unwrap_err().is_conversion());
        assert!(GroupId::from("TensorX").tensor_rank().is_err());
        assert!(GroupId::from("Tensor0").tensor_rank().is_err());
    }

    #[test]
    fn test_tensor_rank_from_index_is_unavailable() {
        let err = GroupId::Index(12).tensor_rank().unwrap_err();
        assert!(matches!(err, CoerceError::TensorRankUnavailable { .. }));
    }

    #[test]
    fn test_ndmin() {
        assert_eq!(GroupKind::Vector.ndmin(), Some(1));
        assert_eq!(GroupKind::Matrix.ndmin(), Some(2));
        assert_eq!(GroupKind::Index.ndmin(), None);
    }

    #[test]
    fn test_group_id_display() {
        assert_eq!(GroupId::Index(3).to_string(), "3");
        assert_eq!(GroupId::from("Vector").to_string(), "Vector");
    }
}
