//! TabStrip property table.

use super::Encoding::{Bool, Enum, Int, Text, Unit, Url};
use super::PropertySchema;

/// Well-known TabStrip properties, in wire-code order. The order is part
/// of the protocol: reordering entries changes every code after them.
pub(super) static TAB_STRIP: PropertySchema = PropertySchema::new(&[
    ("Text", Text),
    ("ToolTip", Text),
    ("NavigateUrl", Url),
    ("Target", Text),
    ("TabImageUrl", Url),
    ("SelectedImageUrl", Url),
    ("HoverImageUrl", Url),
    ("DisabledImageUrl", Url),
    ("Look", Text),
    ("SelectedLook", Text),
    ("HoverLook", Text),
    ("DisabledLook", Text),
    ("CssClass", Text),
    ("HoverCssClass", Text),
    ("SelectedCssClass", Text),
    ("Enabled", Bool),
    ("Visible", Bool),
    ("CausesValidation", Bool),
    ("ValidationGroup", Text),
    ("AccessKey", Text),
    ("TabIndex", Int),
    ("Width", Unit),
    ("Height", Unit),
    ("ItemSpacing", Unit),
    ("Orientation", Enum),
    ("ScrollButtons", Enum),
    ("ScrollStep", Int),
    ("WrapText", Bool),
    ("FontName", Text),
    ("FontSize", Unit),
    ("FontBold", Bool),
    ("FontItalic", Bool),
    ("ForeColor", Text),
    ("BackColor", Text),
    ("BorderColor", Text),
    ("BorderWidth", Unit),
    ("BorderStyle", Enum),
    ("Padding", Unit),
    ("Margin", Unit),
    ("TabData", Text),
]);
