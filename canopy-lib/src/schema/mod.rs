//! Well-known property tables and wire value encoding.
//!
//! Each control kind carries a fixed, ordered table of its well-known
//! properties. The table order defines the dense wire codes `0..N-1`, so
//! the client payload can carry `[code, value]` pairs instead of
//! `[name, value]` pairs. Names missing from the table are expando
//! attributes: they are emitted with their string key only when the
//! control's `output_custom_attributes` flag is set, and silently dropped
//! otherwise — that is configuration, not an accident.

mod tabstrip;
mod treeview;

use crate::error::ValueError;

/// Which control family a tree belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    TreeView,
    TabStrip,
}

impl ControlKind {
    /// The fixed property table of this kind.
    pub fn schema(self) -> &'static PropertySchema {
        match self {
            Self::TreeView => &treeview::TREE_VIEW,
            Self::TabStrip => &tabstrip::TAB_STRIP,
        }
    }
}

/// Value-encoding rule bound to a well-known property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Free text, escaped by the payload layer.
    Text,
    /// Free text holding a URL.
    Url,
    /// `"1"` / `"0"` on the wire; `true`/`false` also accepted on input.
    Bool,
    /// Integer literal.
    Int,
    /// Enumeration transmitted as its underlying integer.
    Enum,
    /// Dimension transmitted as `value|unit-constant` (px=0 %=1 em=2 pt=3).
    Unit,
}

/// A parsed, typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    Bool(bool),
    Int(i64),
    Enum(i32),
    Unit(Dimension),
}

/// A CSS-style length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    pub value: f64,
    pub unit: UnitKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Px,
    Percent,
    Em,
    Pt,
}

impl UnitKind {
    /// The fixed constant the client runtime uses for this unit.
    pub fn client_constant(self) -> u8 {
        match self {
            Self::Px => 0,
            Self::Percent => 1,
            Self::Em => 2,
            Self::Pt => 3,
        }
    }

    fn from_constant(constant: &str) -> Option<Self> {
        match constant {
            "0" => Some(Self::Px),
            "1" => Some(Self::Percent),
            "2" => Some(Self::Em),
            "3" => Some(Self::Pt),
            _ => None,
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        if suffix.is_empty() || suffix.eq_ignore_ascii_case("px") {
            Some(Self::Px)
        } else if suffix == "%" {
            Some(Self::Percent)
        } else if suffix.eq_ignore_ascii_case("em") {
            Some(Self::Em)
        } else if suffix.eq_ignore_ascii_case("pt") {
            Some(Self::Pt)
        } else {
            None
        }
    }
}

/// One resolved well-known property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Canonical name, as spelled in the table.
    pub name: &'static str,
    /// Dense wire code (the table index).
    pub code: u16,
    /// Value-encoding rule.
    pub encoding: Encoding,
}

/// The fixed, ordered well-known property table of one control kind.
#[derive(Debug)]
pub struct PropertySchema {
    fields: &'static [(&'static str, Encoding)],
}

impl PropertySchema {
    pub(crate) const fn new(fields: &'static [(&'static str, Encoding)]) -> Self {
        Self { fields }
    }

    /// Number of well-known properties; codes run `0..len`.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks a property up by exact case-insensitive name. `None` means
    /// the name is an expando attribute for this kind.
    pub fn field(&self, name: &str) -> Option<Field> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, (candidate, _))| candidate.eq_ignore_ascii_case(name))
            .map(|(index, (candidate, encoding))| Field {
                name: candidate,
                code: index as u16,
                encoding: *encoding,
            })
    }

    /// Looks a property up by wire code.
    pub fn by_code(&self, code: u16) -> Option<Field> {
        self.fields
            .get(code as usize)
            .map(|(name, encoding)| Field {
                name,
                code,
                encoding: *encoding,
            })
    }

    /// All fields in table (code) order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, (name, encoding))| Field {
                name,
                code: index as u16,
                encoding: *encoding,
            })
    }
}

/// Canonical spellings of the names the engine itself reads.
pub mod names {
    pub const TEXT: &str = "Text";
    pub const TOOL_TIP: &str = "ToolTip";
    pub const NAVIGATE_URL: &str = "NavigateUrl";
    pub const CHILDREN_SOURCE: &str = "ChildrenSource";
    pub const CAUSES_VALIDATION: &str = "CausesValidation";
    pub const VALIDATION_GROUP: &str = "ValidationGroup";
}

/// Encodes a typed value into its wire literal.
pub fn encode_value(value: &PropValue) -> String {
    match value {
        PropValue::Text(text) => text.clone(),
        PropValue::Bool(flag) => if *flag { "1" } else { "0" }.to_string(),
        PropValue::Int(number) => number.to_string(),
        PropValue::Enum(number) => number.to_string(),
        PropValue::Unit(dimension) => {
            let constant = dimension.unit.client_constant();
            if dimension.value.fract() == 0.0 {
                format!("{}|{}", dimension.value as i64, constant)
            } else {
                format!("{}|{}", dimension.value, constant)
            }
        }
    }
}

/// Parses a literal according to an encoding rule.
///
/// The parser accepts both the authoring forms (`"true"`, `"100px"`,
/// `"50%"`) and the wire forms produced by [`encode_value`] (`"1"`,
/// `"100|0"`), so encode/parse round-trips.
pub fn parse_value(raw: &str, encoding: Encoding) -> Result<PropValue, ValueError> {
    match encoding {
        Encoding::Text | Encoding::Url => Ok(PropValue::Text(raw.to_string())),
        Encoding::Bool => match raw {
            "1" => Ok(PropValue::Bool(true)),
            "0" => Ok(PropValue::Bool(false)),
            _ if raw.eq_ignore_ascii_case("true") => Ok(PropValue::Bool(true)),
            _ if raw.eq_ignore_ascii_case("false") => Ok(PropValue::Bool(false)),
            _ => Err(ValueError::new("boolean", raw)),
        },
        Encoding::Int => raw
            .parse::<i64>()
            .map(PropValue::Int)
            .map_err(|_| ValueError::new("integer", raw)),
        Encoding::Enum => raw
            .parse::<i32>()
            .map(PropValue::Enum)
            .map_err(|_| ValueError::new("enumeration", raw)),
        Encoding::Unit => parse_dimension(raw)
            .map(PropValue::Unit)
            .ok_or_else(|| ValueError::new("dimension", raw)),
    }
}

fn parse_dimension(raw: &str) -> Option<Dimension> {
    let raw = raw.trim();
    if let Some((value, constant)) = raw.split_once('|') {
        // Wire form: value|unit-constant.
        return Some(Dimension {
            value: value.parse().ok()?,
            unit: UnitKind::from_constant(constant)?,
        });
    }
    let split = raw
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .unwrap_or(raw.len());
    let (number, suffix) = raw.split_at(split);
    Some(Dimension {
        value: number.parse().ok()?,
        unit: UnitKind::from_suffix(suffix.trim())?,
    })
}
