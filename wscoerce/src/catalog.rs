//! Name-keyed catalogs over the host metadata tables
//!
//! A catalog joins a name-to-index map against an index-keyed table so that
//! each name maps straight to its record. Catalogs borrow from the
//! [`HostTables`] they were built from and cannot change after construction.

use crate::error::{CoerceError, Result};
use crate::host::{HostTables, MethodRecord, VariableRecord};
use std::collections::HashMap;
use tracing::debug;

/// Immutable name-to-record mapping
#[derive(Debug, Clone)]
pub struct Catalog<'h, T> {
    table: &'static str,
    entries: HashMap<&'h str, &'h T>,
}

impl<'h, T> Catalog<'h, T> {
    pub fn get(&self, name: &str) -> Option<&'h T> {
        self.entries.get(name).copied()
    }

    /// Like [`get`](Self::get), failing with a suggestion for unknown names.
    /// Equally close candidates resolve to the lexically first.
    pub fn lookup(&self, name: &str) -> Result<&'h T> {
        self.get(name)
            .ok_or_else(|| CoerceError::unknown_name(self.table, name, self.names()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in lexical order
    pub fn names(&self) -> Vec<&'h str> {
        let mut names: Vec<&'h str> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'h str, &'h T)> + '_ {
        self.entries.iter().map(|(name, record)| (*name, *record))
    }
}

fn join<'h, T>(
    table: &'static str,
    index: &'h HashMap<String, usize>,
    records: &'h [T],
) -> Result<Catalog<'h, T>> {
    let entries = index
        .iter()
        .map(|(name, &i)| {
            records
                .get(i)
                .map(|record| (name.as_str(), record))
                .ok_or_else(|| CoerceError::lookup(table, i, records.len()))
        })
        .collect::<Result<HashMap<_, _>>>()?;
    debug!(table, entries = entries.len(), "built catalog");
    Ok(Catalog { table, entries })
}

/// Method name to method metadata
pub fn build_method_catalog(host: &HostTables) -> Result<Catalog<'_, MethodRecord>> {
    join("method", host.method_index(), host.methods())
}

/// Variable name to variable metadata
pub fn build_variable_catalog(host: &HostTables) -> Result<Catalog<'_, VariableRecord>> {
    join("variable", host.variable_index(), host.variables())
}

/// Declared name of the variable at `index`
pub fn variable_name(host: &HostTables, index: usize) -> Result<&str> {
    host.variables()
        .get(index)
        .map(|v| v.name.as_str())
        .ok_or_else(|| CoerceError::lookup("variable", index, host.variables().len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::GroupRecord;

    fn host() -> HostTables {
        HostTables::from_toml_str(
            r#"
[[variables]]
name = "f_grid"
group = "Vector"

[[variables]]
name = "iy"
group = "Matrix"

[[variables]]
name = "stokes_dim"
group = "Index"

[[methods]]
name = "yCalc"

[[methods]]
name = "iyCalc"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_variable_catalog_covers_every_name() {
        let host = host();
        let catalog = build_variable_catalog(&host).unwrap();
        assert_eq!(catalog.len(), host.variable_index().len());
        for name in host.variable_index().keys() {
            assert_eq!(catalog.lookup(name).unwrap().name, *name);
        }
    }

    #[test]
    fn test_method_catalog() {
        let host = host();
        let catalog = build_method_catalog(&host).unwrap();
        assert_eq!(catalog.names(), vec!["iyCalc", "yCalc"]);
        assert!(catalog.contains("yCalc"));
        assert!(catalog.get("xCalc").is_none());
    }

    #[test]
    fn test_lookup_suggests_close_name() {
        let host = host();
        let catalog = build_variable_catalog(&host).unwrap();
        let err = catalog.lookup("f_grd").unwrap_err();
        assert!(err.is_lookup());
        assert!(err.to_string().contains("did you mean `f_grid`?"));
    }

    #[test]
    fn test_lookup_hint_is_deterministic_on_ties() {
        let host = HostTables::from_toml_str(
            r#"
[[methods]]
name = "ySet"

[[methods]]
name = "xSet"

[[methods]]
name = "wSet"
"#,
        )
        .unwrap();
        let catalog = build_method_catalog(&host).unwrap();
        let err = catalog.lookup("zSet").unwrap_err();
        assert!(err.to_string().ends_with("(did you mean `wSet`?)"));
    }

    #[test]
    fn test_variable_name_matches_catalog() {
        let host = host();
        let catalog = build_variable_catalog(&host).unwrap();
        for i in 0..host.variables().len() {
            let name = variable_name(&host, i).unwrap();
            assert!(std::ptr::eq(catalog.lookup(name).unwrap(), &host.variables()[i]));
        }
    }

    #[test]
    fn test_variable_name_out_of_range() {
        let host = host();
        let err = variable_name(&host, 3).unwrap_err();
        assert_eq!(err, CoerceError::lookup("variable", 3, 3));
    }

    #[test]
    fn test_join_rejects_dangling_index() {
        let groups = vec![GroupRecord {
            name: "Index".to_string(),
            description: String::new(),
        }];
        let method_index = HashMap::from([("ghost".to_string(), 4)]);
        let host = HostTables::from_raw_parts(groups, vec![], vec![], HashMap::new(), method_index);
        let err = build_method_catalog(&host).unwrap_err();
        assert_eq!(err, CoerceError::lookup("method", 4, 0));
        assert!(build_variable_catalog(&host).unwrap().is_empty());
    }

    #[test]
    fn test_catalog_iter() {
        let host = host();
        let catalog = build_method_catalog(&host).unwrap();
        let mut pairs: Vec<_> = catalog.iter().map(|(name, m)| (name, m.name.as_str())).collect();
        pairs.sort();
        assert_eq!(pairs, vec![("iyCalc", "iyCalc"), ("yCalc", "yCalc")]);
    }
}
