//! TreeView property table.

use super::Encoding::{Bool, Enum, Int, Text, Unit, Url};
use super::PropertySchema;

/// Well-known TreeView properties, in wire-code order. The order is part
/// of the protocol: reordering entries changes every code after them.
pub(super) static TREE_VIEW: PropertySchema = PropertySchema::new(&[
    ("Text", Text),
    ("ToolTip", Text),
    ("NavigateUrl", Url),
    ("Target", Text),
    ("ImageUrl", Url),
    ("SelectedImageUrl", Url),
    ("ExpandedImageUrl", Url),
    ("CheckBox", Bool),
    ("Expandable", Enum),
    ("ChildrenSource", Url),
    ("NodeData", Text),
    ("CssClass", Text),
    ("HoverCssClass", Text),
    ("SelectedCssClass", Text),
    ("DefaultStyle", Text),
    ("HoverStyle", Text),
    ("SelectedStyle", Text),
    ("Indent", Unit),
    ("ItemSpacing", Unit),
    ("ImageHeight", Unit),
    ("ImageWidth", Unit),
    ("LineImagesFolder", Url),
    ("ShowLines", Bool),
    ("ShowPlus", Bool),
    ("ShowToolTip", Bool),
    ("SelectExpands", Bool),
    ("AutoPostBack", Bool),
    ("CausesValidation", Bool),
    ("ValidationGroup", Text),
    ("AccessKey", Text),
    ("TabIndex", Int),
    ("Enabled", Bool),
    ("Visible", Bool),
    ("FontName", Text),
    ("FontSize", Unit),
    ("FontBold", Bool),
    ("FontItalic", Bool),
    ("FontUnderline", Bool),
    ("ForeColor", Text),
    ("BackColor", Text),
    ("BorderColor", Text),
    ("BorderWidth", Unit),
    ("BorderStyle", Enum),
    ("Height", Unit),
    ("Width", Unit),
    ("Wrap", Bool),
    ("HorizontalAlign", Enum),
    ("VerticalAlign", Enum),
    ("Padding", Unit),
    ("Margin", Unit),
    ("Cursor", Enum),
    ("Direction", Enum),
    ("Opacity", Int),
    ("ZIndex", Int),
    ("Title", Text),
    ("Role", Text),
    ("Lang", Text),
    ("ContextMenuId", Text),
    ("DragEnabled", Bool),
    ("DropEnabled", Bool),
]);
