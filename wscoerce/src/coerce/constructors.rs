//! Per-group text constructors
//!
//! A constructor recognizes text written in a group's own syntax. When it
//! declines, the coercer falls back to the generic literal parser.

use crate::array::parse_float_text;
use crate::value::Value;
use std::collections::HashMap;

/// Interpret text in a group's native syntax, or decline with `None`
pub type Constructor = fn(&str) -> Option<Value>;

/// Name-keyed constructor table
#[derive(Debug, Clone)]
pub struct ConstructorRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ConstructorRegistry {
    /// Registry without any constructors; every text goes to the literal parser
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn register(&mut self, group: impl Into<String>, constructor: Constructor) {
        self.constructors.insert(group.into(), constructor);
    }

    pub fn get(&self, group: &str) -> Option<Constructor> {
        self.constructors.get(group).copied()
    }

    /// Run the group's constructor, if any
    pub fn construct(&self, group: &str, text: &str) -> Option<Value> {
        self.get(group).and_then(|constructor| constructor(text))
    }
}

impl Default for ConstructorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("String", construct_string);
        registry.register("Index", construct_index);
        registry.register("Numeric", construct_numeric);
        registry
    }
}

fn construct_string(text: &str) -> Option<Value> {
    Some(Value::Text(text.to_string()))
}

fn construct_index(text: &str) -> Option<Value> {
    text.trim().parse::<i64>().ok().map(Value::Int)
}

fn construct_numeric(text: &str) -> Option<Value> {
    parse_float_text(text.trim()).map(Value::Float)
}
