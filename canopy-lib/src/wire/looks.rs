//! TabStrip look tables.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// A named bundle of style fragments for one tab appearance.
///
/// TabStrip tabs reference looks by name (the `Look`/`SelectedLook`/…
/// properties); the look table itself travels next to the node table so
/// the client can resolve the references without another round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Look {
    name: String,
    style: Option<String>,
    hover_style: Option<String>,
    selected_style: Option<String>,
}

impl Look {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn hover_style(mut self, style: impl Into<String>) -> Self {
        self.hover_style = Some(style.into());
        self
    }

    pub fn selected_style(mut self, style: impl Into<String>) -> Self {
        self.selected_style = Some(style.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Serialize for Look {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(4))?;
        seq.serialize_element(&self.name)?;
        seq.serialize_element(self.style.as_deref().unwrap_or(""))?;
        seq.serialize_element(self.hover_style.as_deref().unwrap_or(""))?;
        seq.serialize_element(self.selected_style.as_deref().unwrap_or(""))?;
        seq.end()
    }
}

/// The four fixed scroll-control looks every TabStrip payload carries, in
/// protocol order: left scroller, left hover, right scroller, right hover.
pub fn scroll_looks() -> [Look; 4] {
    [
        Look::new("ScrollLeft"),
        Look::new("ScrollLeftHover"),
        Look::new("ScrollRight"),
        Look::new("ScrollRightHover"),
    ]
}

/// The parallel tables emitted alongside a TabStrip's node table: the
/// control's named looks, then the fixed scroll-control records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookTables {
    pub looks: Vec<Look>,
    pub scroll: [Look; 4],
}

impl LookTables {
    pub fn new(looks: &[Look]) -> Self {
        Self {
            looks: looks.to_vec(),
            scroll: scroll_looks(),
        }
    }

    /// Both tables as the literal JSON arrays the response embeds.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[[],[]]".to_string())
    }
}

impl Serialize for LookTables {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.looks)?;
        seq.serialize_element(&self.scroll)?;
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_serializes_positionally() {
        let look = Look::new("Flat").style("border:0").selected_style("font-weight:bold");
        assert_eq!(
            serde_json::to_string(&look).unwrap(),
            r#"["Flat","border:0","","font-weight:bold"]"#
        );
    }

    #[test]
    fn test_tables_carry_four_scroll_records() {
        let tables = LookTables::new(&[Look::new("Flat")]);
        let json = serde_json::to_string(&tables).unwrap();
        assert!(json.starts_with(r#"[[["Flat"#));
        assert_eq!(tables.scroll.len(), 4);
        assert!(json.contains("ScrollRightHover"));
    }
}
