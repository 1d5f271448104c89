//! Flattened node records.
//!
//! ## Payload shape
//!
//! The client runtime consumes a literal array-of-arrays structure, one
//! entry per node in pre-order:
//!
//! ```json
//! [["n_a", -1, [1, 2], [[0, "Alpha"]]],
//!  ["n_b", 0, [], [[0, "Beta"], ["data-custom", "x"]]],
//!  ["n_c", 0, [], []]]
//! ```
//!
//! Each record is `[postBackId, parentIndex, childIndexList,
//! propertyDiffList]`. Property entries are `[code, value]` pairs for
//! well-known properties and `[name, value]` pairs (string key) for
//! custom attributes; the two are distinguished by the JSON type of the
//! first element.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `parent_index` of a top-level record.
pub const TOP_LEVEL: i32 = -1;

/// One property diff entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropEntry {
    /// Well-known property, addressed by its dense wire code.
    Known { code: u16, value: String },
    /// Custom (expando) attribute, addressed by its string name.
    Custom { name: String, value: String },
}

/// One flattened node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Wire identity of the node.
    pub postback_id: String,
    /// Index of the parent record, or [`TOP_LEVEL`]. Always strictly less
    /// than this record's own index — the pre-order contract the client's
    /// single forward pass relies on.
    pub parent_index: i32,
    /// Indices of the direct child records. Empty past the drill-down
    /// bound even when the node has real children.
    pub child_indices: Vec<usize>,
    /// Schema-coded diff of the explicitly-set properties only.
    pub props: Vec<PropEntry>,
}

impl Serialize for PropEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(2))?;
        match self {
            Self::Known { code, value } => {
                seq.serialize_element(code)?;
                seq.serialize_element(value)?;
            }
            Self::Custom { name, value } => {
                seq.serialize_element(name)?;
                seq.serialize_element(value)?;
            }
        }
        seq.end()
    }
}

/// First element of a property entry: a code or a custom-attribute name.
#[derive(Deserialize)]
#[serde(untagged)]
enum CodeOrName {
    Code(u16),
    Name(String),
}

impl<'de> Deserialize<'de> for PropEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PropEntryVisitor;

        impl<'de> Visitor<'de> for PropEntryVisitor {
            type Value = PropEntry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a [code-or-name, value] pair")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<PropEntry, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let key: CodeOrName = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let value: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                Ok(match key {
                    CodeOrName::Code(code) => PropEntry::Known { code, value },
                    CodeOrName::Name(name) => PropEntry::Custom { name, value },
                })
            }
        }

        deserializer.deserialize_seq(PropEntryVisitor)
    }
}

impl Serialize for NodeRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(4))?;
        seq.serialize_element(&self.postback_id)?;
        seq.serialize_element(&self.parent_index)?;
        seq.serialize_element(&self.child_indices)?;
        seq.serialize_element(&self.props)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for NodeRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeRecordVisitor;

        impl<'de> Visitor<'de> for NodeRecordVisitor {
            type Value = NodeRecord;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a [postBackId, parentIndex, children, props] record")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<NodeRecord, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let postback_id = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let parent_index = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                let child_indices = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(2, &self))?;
                let props = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(3, &self))?;
                Ok(NodeRecord {
                    postback_id,
                    parent_index,
                    child_indices,
                    props,
                })
            }
        }

        deserializer.deserialize_seq(NodeRecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_as_literal_arrays() {
        let record = NodeRecord {
            postback_id: "n0".to_string(),
            parent_index: TOP_LEVEL,
            child_indices: vec![1, 2],
            props: vec![
                PropEntry::Known {
                    code: 0,
                    value: "Alpha".to_string(),
                },
                PropEntry::Custom {
                    name: "data-custom".to_string(),
                    value: "x".to_string(),
                },
            ],
        };

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"["n0",-1,[1,2],[[0,"Alpha"],["data-custom","x"]]]"#
        );
    }

    #[test]
    fn test_record_round_trips() {
        let json = r#"["n1",0,[],[[7,"1"]]]"#;
        let record: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.postback_id, "n1");
        assert_eq!(record.parent_index, 0);
        assert!(record.child_indices.is_empty());
        assert_eq!(
            record.props,
            vec![PropEntry::Known {
                code: 7,
                value: "1".to_string()
            }]
        );
        assert_eq!(serde_json::to_string(&record).unwrap(), json);
    }

    #[test]
    fn test_custom_entries_keep_string_keys() {
        let json = r#"["n2",1,[],[["aria-label","Files"]]]"#;
        let record: NodeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record.props,
            vec![PropEntry::Custom {
                name: "aria-label".to_string(),
                value: "Files".to_string()
            }]
        );
    }
}
