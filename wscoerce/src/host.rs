//! Read-only host engine tables
//!
//! A `HostTables` value is the session handle the catalogs and the coercer
//! borrow from. It holds the ordered group table, the variable and method
//! metadata tables, and the name-to-index maps over the latter two. Nothing
//! here is mutated after construction.

use crate::error::{CoerceError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Entry of the ordered group-definition table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Workspace variable metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableRecord {
    pub name: String,
    /// Position in the group table
    pub group: usize,
    pub description: String,
    /// Default value as literal text
    pub default: Option<String>,
}

/// Workspace method metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// Variable as written in a description file: its group is given by name
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VariableSpec {
    name: String,
    group: String,
    #[serde(default)]
    description: String,
    default: Option<String>,
}

/// On-disk workspace description
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Description {
    #[serde(default)]
    groups: Vec<GroupRecord>,
    #[serde(default)]
    variables: Vec<VariableSpec>,
    #[serde(default)]
    methods: Vec<MethodRecord>,
}

/// Groups every session knows about when a description lists none
const BUILTIN_GROUPS: &[(&str, &str)] = &[
    ("AbsorptionLines", "Line-by-line absorption data"),
    ("Agenda", "Ordered list of method calls"),
    ("ArrayOfArrayOfIndex", "Array of arrays of indices"),
    ("ArrayOfIndex", "Array of indices"),
    ("ArrayOfMatrix", "Array of matrices"),
    ("ArrayOfString", "Array of strings"),
    ("ArrayOfTensor3", "Array of rank-3 tensors"),
    ("ArrayOfVector", "Array of vectors"),
    ("GridPos", "Grid position"),
    ("Index", "64-bit signed integer"),
    ("Matrix", "2-D array of floating-point numbers"),
    ("Numeric", "64-bit floating-point number"),
    ("Ppath", "Propagation path"),
    ("Sparse", "Sparse floating-point matrix"),
    ("String", "Text"),
    ("Tensor3", "Rank-3 floating-point array"),
    ("Tensor4", "Rank-4 floating-point array"),
    ("Tensor5", "Rank-5 floating-point array"),
    ("Tensor6", "Rank-6 floating-point array"),
    ("Tensor7", "Rank-7 floating-point array"),
    ("Timer", "Wall-clock timer"),
    ("Vector", "1-D array of floating-point numbers"),
    ("Verbosity", "Output verbosity levels"),
];

/// Host engine tables for one session
#[derive(Debug, Clone, Default)]
pub struct HostTables {
    groups: Vec<GroupRecord>,
    variables: Vec<VariableRecord>,
    methods: Vec<MethodRecord>,
    variable_index: HashMap<String, usize>,
    method_index: HashMap<String, usize>,
}

impl HostTables {
    /// Build tables, deriving the name maps from record order.
    ///
    /// Fails on duplicate names and on variables whose group index is not in
    /// the group table.
    pub fn new(
        groups: Vec<GroupRecord>,
        variables: Vec<VariableRecord>,
        methods: Vec<MethodRecord>,
    ) -> Result<Self> {
        let mut seen_groups = HashMap::with_capacity(groups.len());
        for (i, group) in groups.iter().enumerate() {
            if group.name.is_empty() {
                return Err(CoerceError::config(format!("group {i} has an empty name")));
            }
            if seen_groups.insert(group.name.as_str(), i).is_some() {
                return Err(CoerceError::config(format!("duplicate group `{}`", group.name)));
            }
        }
        if let Some(var) = variables.iter().find(|v| v.group >= groups.len()) {
            return Err(CoerceError::config(format!(
                "variable `{}` refers to group {} but only {} groups exist",
                var.name,
                var.group,
                groups.len()
            )));
        }
        let variable_index = index_by_name("variable", variables.iter().map(|v| v.name.as_str()))?;
        let method_index = index_by_name("method", methods.iter().map(|m| m.name.as_str()))?;

        Ok(Self {
            groups,
            variables,
            methods,
            variable_index,
            method_index,
        })
    }

    /// Assemble tables from parts exactly as a host hands them over, without
    /// cross-checking the name maps against the metadata tables
    pub fn from_raw_parts(
        groups: Vec<GroupRecord>,
        variables: Vec<VariableRecord>,
        methods: Vec<MethodRecord>,
        variable_index: HashMap<String, usize>,
        method_index: HashMap<String, usize>,
    ) -> Self {
        Self {
            groups,
            variables,
            methods,
            variable_index,
            method_index,
        }
    }

    /// The standard group table with no variables or methods
    pub fn builtin() -> Self {
        Self {
            groups: builtin_groups(),
            ..Self::default()
        }
    }

    /// Parse a TOML workspace description
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let description: Description = toml::from_str(source)?;
        let groups = if description.groups.is_empty() {
            builtin_groups()
        } else {
            description.groups
        };

        let table = Self {
            groups,
            ..Self::default()
        };
        let variables = description
            .variables
            .into_iter()
            .map(|spec| {
                let group = table.require_group(&spec.group).map_err(|err| {
                    CoerceError::config(format!("variable `{}`: {err}", spec.name))
                })?;
                Ok(VariableRecord {
                    name: spec.name,
                    group,
                    description: spec.description,
                    default: spec.default,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let tables = Self::new(table.groups, variables, description.methods)?;
        debug!(
            groups = tables.groups.len(),
            variables = tables.variables.len(),
            methods = tables.methods.len(),
            "loaded workspace description"
        );
        Ok(tables)
    }

    /// Load a TOML workspace description from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| CoerceError::io_error(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source).map_err(|e| match e {
            CoerceError::Config { message } => {
                CoerceError::config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn groups(&self) -> &[GroupRecord] {
        &self.groups
    }

    /// Name of the group at `index`
    pub fn group_name(&self, index: usize) -> Result<&str> {
        self.groups
            .get(index)
            .map(|g| g.name.as_str())
            .ok_or_else(|| CoerceError::lookup("group", index, self.groups.len()))
    }

    /// Position of a group in the table
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == name)
    }

    /// Like [`group_index`](Self::group_index), with a suggestion on failure
    pub fn require_group(&self, name: &str) -> Result<usize> {
        self.group_index(name).ok_or_else(|| {
            CoerceError::unknown_name("group", name, self.groups.iter().map(|g| g.name.as_str()))
        })
    }

    pub fn variables(&self) -> &[VariableRecord] {
        &self.variables
    }

    pub fn methods(&self) -> &[MethodRecord] {
        &self.methods
    }

    /// Variable name to position in [`variables`](Self::variables)
    pub fn variable_index(&self) -> &HashMap<String, usize> {
        &self.variable_index
    }

    /// Method name to position in [`methods`](Self::methods)
    pub fn method_index(&self) -> &HashMap<String, usize> {
        &self.method_index
    }
}

fn builtin_groups() -> Vec<GroupRecord> {
    BUILTIN_GROUPS
        .iter()
        .map(|(name, description)| GroupRecord {
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect()
}

fn index_by_name<'a>(
    table: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (i, name) in names.enumerate() {
        if index.insert(name.to_string(), i).is_some() {
            return Err(CoerceError::config(format!("duplicate {table} `{name}`")));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = r#"
[[variables]]
name = "f_grid"
group = "Vector"
description = "Frequency grid"
default = "[1e9, 2e9]"

[[variables]]
name = "stokes_dim"
group = "Index"

[[methods]]
name = "VectorSet"
description = "Sets a vector"
inputs = ["value"]
outputs = ["out"]
"#;

    #[test]
    fn test_builtin_has_core_groups() {
        let host = HostTables::builtin();
        for name in ["Index", "Numeric", "String", "Vector", "Matrix", "Sparse", "Tensor3"] {
            assert!(host.group_index(name).is_some(), "missing {name}");
        }
        assert!(host.variables().is_empty());
    }

    #[test]
    fn test_group_name_and_index_agree() {
        let host = HostTables::builtin();
        for (i, group) in host.groups().iter().enumerate() {
            assert_eq!(host.group_name(i).unwrap(), group.name);
            assert_eq!(host.group_index(&group.name), Some(i));
        }
    }

    #[test]
    fn test_group_name_out_of_range() {
        let host = HostTables::builtin();
        let err = host.group_name(10_000).unwrap_err();
        assert!(err.is_lookup());
    }

    #[test]
    fn test_require_group_suggests() {
        let err = HostTables::builtin().require_group("Vectr").unwrap_err();
        assert!(err.to_string().contains("Vector"));
    }

    #[test]
    fn test_from_toml_resolves_group_names() {
        let host = HostTables::from_toml_str(DESCRIPTION).unwrap();
        let f_grid = &host.variables()[0];
        assert_eq!(host.group_name(f_grid.group).unwrap(), "Vector");
        assert_eq!(f_grid.default.as_deref(), Some("[1e9, 2e9]"));
        assert_eq!(host.variable_index()["stokes_dim"], 1);
        assert_eq!(host.method_index()["VectorSet"], 0);
        assert_eq!(host.methods()[0].inputs, vec!["value".to_string()]);
    }

    #[test]
    fn test_from_toml_unknown_group() {
        let err = HostTables::from_toml_str(
            "[[variables]]\nname = \"x\"\ngroup = \"Vectr\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, CoerceError::Config { .. }));
        assert!(err.message().contains("did you mean `Vector`?"));
    }

    #[test]
    fn test_from_toml_custom_groups_replace_builtin() {
        let host = HostTables::from_toml_str(
            "[[groups]]\nname = \"Index\"\n\n[[groups]]\nname = \"Vector\"\n",
        )
        .unwrap();
        assert_eq!(host.groups().len(), 2);
        assert_eq!(host.group_name(1).unwrap(), "Vector");
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        assert!(HostTables::from_toml_str("[[variables]]\nname = \"x\"\ngroup = \"Index\"\nkind = 1\n").is_err());
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let source = "[[variables]]\nname = \"x\"\ngroup = \"Index\"\n\n[[variables]]\nname = \"x\"\ngroup = \"Vector\"\n";
        let err = HostTables::from_toml_str(source).unwrap_err();
        assert!(err.message().contains("duplicate variable `x`"));
    }

    #[test]
    fn test_new_rejects_dangling_group() {
        let variables = vec![VariableRecord {
            name: "x".to_string(),
            group: 5,
            description: String::new(),
            default: None,
        }];
        assert!(HostTables::new(builtin_groups()[..2].to_vec(), variables, vec![]).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = HostTables::load("/nonexistent/workspace.toml").unwrap_err();
        assert!(matches!(err, CoerceError::Io { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace.toml");
        std::fs::write(&path, DESCRIPTION).unwrap();
        let host = HostTables::load(&path).unwrap();
        assert_eq!(host.variables().len(), 2);
    }
}
