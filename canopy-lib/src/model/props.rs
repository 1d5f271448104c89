//! Sparse property storage

use std::collections::BTreeMap;

use crate::error::ValueError;
use crate::schema::{PropValue, PropertySchema, parse_value};

/// Sparse, explicitly-set property values of one node.
///
/// Two sides: well-known properties are parsed through the control's
/// schema into typed values and keyed by the table's canonical name;
/// everything else lands in the open custom-attribute map as raw text.
/// Unset properties are simply absent — reads fall back to control-level
/// defaults at a higher layer, never here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    known: BTreeMap<&'static str, PropValue>,
    custom: BTreeMap<String, String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.custom.is_empty()
    }

    /// Number of explicitly-set entries, both sides counted.
    pub fn len(&self) -> usize {
        self.known.len() + self.custom.len()
    }

    /// Sets a property by name. A name found in `schema` (case-insensitive)
    /// is parsed per its encoding rule and stored typed; any other name is
    /// stored verbatim as a custom attribute.
    pub fn set(
        &mut self,
        schema: &PropertySchema,
        name: &str,
        raw: &str,
    ) -> Result<(), ValueError> {
        match schema.field(name) {
            Some(field) => {
                let value = parse_value(raw, field.encoding)?;
                self.known.insert(field.name, value);
                Ok(())
            }
            None => {
                self.custom.insert(name.to_string(), raw.to_string());
                Ok(())
            }
        }
    }

    /// Stores a typed value under a canonical table name, bypassing the
    /// parse step. `name` must be spelled exactly as in the table.
    pub fn set_known(&mut self, name: &'static str, value: PropValue) {
        self.known.insert(name, value);
    }

    pub(crate) fn set_custom(&mut self, name: &str, raw: &str) {
        self.custom.insert(name.to_string(), raw.to_string());
    }

    /// Typed value of a well-known property, by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.known
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Text of a well-known string property.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(PropValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Value of a well-known boolean property.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(PropValue::Bool(flag)) => Some(*flag),
            _ => None,
        }
    }

    /// Raw text of a custom attribute, by exact name.
    pub fn get_custom(&self, name: &str) -> Option<&str> {
        self.custom.get(name).map(String::as_str)
    }

    /// Removes a property by name, either side.
    pub fn remove(&mut self, name: &str) {
        let key = self
            .known
            .keys()
            .find(|candidate| candidate.eq_ignore_ascii_case(name))
            .copied();
        if let Some(key) = key {
            self.known.remove(key);
        }
        self.custom.remove(name);
    }

    /// Explicitly-set well-known entries, in name order.
    pub fn iter_known(&self) -> impl Iterator<Item = (&'static str, &PropValue)> {
        self.known.iter().map(|(name, value)| (*name, value))
    }

    /// Explicitly-set custom attributes, in name order.
    pub fn iter_custom(&self) -> impl Iterator<Item = (&str, &str)> {
        self.custom
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
