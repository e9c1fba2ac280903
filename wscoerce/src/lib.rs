//! Workspace value coercion
//!
//! Turns loosely-typed values (literal text, nested lists, numbers) into the
//! canonical representation of a host workspace group, and exposes
//! name-keyed catalogs over the host's variable and method tables.

pub mod array;
pub mod catalog;
pub mod coerce;
pub mod error;
pub mod group;
pub mod host;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod sparse;
pub mod span;
pub mod util;
pub mod value;

pub use array::NdArray;
pub use catalog::{Catalog, build_method_catalog, build_variable_catalog, variable_name};
pub use coerce::{CoercedValue, Coercer, ConstructorRegistry, coerce};
pub use error::{CoerceError, Result};
pub use group::{GroupId, GroupKind};
pub use host::{GroupRecord, HostTables, MethodRecord, VariableRecord};
pub use parser::parse_literal;
pub use sparse::CooMatrix;
pub use span::Span;
pub use value::Value;
