//! XML subtree parsing for on-demand content.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use treedom::Branch;

use crate::error::LoadError;
use crate::model::NodeData;
use crate::schema::PropertySchema;

/// Parses an XML document into the children of an on-demand node.
///
/// Every element maps to one node. Attributes are property assignments
/// resolved through `schema` (case-insensitive); `id` is reserved for the
/// author-assigned identity. Element nesting becomes node nesting. A
/// single top-level `<nodes>` wrapper element is unwrapped; element names
/// otherwise carry no meaning.
pub fn parse_children(
    xml: &str,
    origin: &str,
    schema: &PropertySchema,
) -> Result<Vec<Branch<NodeData>>, LoadError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut top: Vec<Branch<NodeData>> = Vec::new();
    let mut stack: Vec<Branch<NodeData>> = Vec::new();
    let mut seen_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                if !seen_element && element.name().as_ref().eq_ignore_ascii_case(b"nodes") {
                    seen_element = true;
                    continue;
                }
                seen_element = true;
                stack.push(Branch::new(node_from_element(&element, origin, schema)?));
            }
            Ok(Event::Empty(element)) => {
                if !seen_element && element.name().as_ref().eq_ignore_ascii_case(b"nodes") {
                    seen_element = true;
                    continue;
                }
                seen_element = true;
                let branch = Branch::new(node_from_element(&element, origin, schema)?);
                close(branch, &mut stack, &mut top);
            }
            Ok(Event::End(_)) => {
                // An empty stack here is the wrapper's closing tag.
                if let Some(branch) = stack.pop() {
                    close(branch, &mut stack, &mut top);
                }
            }
            Ok(Event::Eof) => break,
            // Text, comments, declarations and processing instructions
            // carry no node data.
            Ok(_) => {}
            Err(err) => return Err(LoadError::xml(origin, err)),
        }
    }

    Ok(top)
}

fn close(
    branch: Branch<NodeData>,
    stack: &mut Vec<Branch<NodeData>>,
    top: &mut Vec<Branch<NodeData>>,
) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(branch),
        None => top.push(branch),
    }
}

fn node_from_element(
    element: &BytesStart<'_>,
    origin: &str,
    schema: &PropertySchema,
) -> Result<NodeData, LoadError> {
    let mut node = NodeData::default();
    for attribute in element.attributes() {
        let attribute = attribute.map_err(|err| LoadError::xml(origin, err.into()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).to_string();
        let value = attribute
            .unescape_value()
            .map_err(|err| LoadError::xml(origin, err.into()))?;
        if key.eq_ignore_ascii_case("id") {
            node.set_id(value.as_ref());
        } else {
            node.props_mut()
                .set(schema, &key, value.as_ref())
                .map_err(|err| LoadError::value(origin, err))?;
        }
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ControlKind;

    fn parse(xml: &str) -> Vec<Branch<NodeData>> {
        parse_children(xml, "test.xml", ControlKind::TreeView.schema()).unwrap()
    }

    #[test]
    fn test_elements_become_nodes() {
        let loaded = parse(
            r#"<node id="a" Text="Alpha"><node id="a1" Text="Child"/></node><node Text="Beta"/>"#,
        );
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].data.id(), Some("a"));
        assert_eq!(loaded[0].data.text(), "Alpha");
        assert_eq!(loaded[0].children[0].data.text(), "Child");
        assert_eq!(loaded[1].data.id(), None);
    }

    #[test]
    fn test_wrapper_element_is_unwrapped() {
        let loaded = parse(r#"<nodes><node Text="Only"/></nodes>"#);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].data.text(), "Only");
    }

    #[test]
    fn test_attributes_resolve_through_schema() {
        let loaded = parse(r#"<node text="Mixed" checkbox="true" data-extra="7"/>"#);
        let node = &loaded[0].data;
        assert_eq!(node.text(), "Mixed");
        assert_eq!(node.props().get_bool("CheckBox"), Some(true));
        assert_eq!(node.props().get_custom("data-extra"), Some("7"));
    }

    #[test]
    fn test_entities_are_unescaped() {
        let loaded = parse(r#"<node Text="A &amp; B"/>"#);
        assert_eq!(loaded[0].data.text(), "A & B");
    }

    #[test]
    fn test_malformed_xml_is_fatal() {
        let result = parse_children(
            "<node><oops></node>",
            "broken.xml",
            ControlKind::TreeView.schema(),
        );
        assert!(matches!(result, Err(LoadError::Xml { .. })));
    }

    #[test]
    fn test_bad_attribute_value_is_fatal() {
        let result = parse_children(
            r#"<node CheckBox="perhaps"/>"#,
            "broken.xml",
            ControlKind::TreeView.schema(),
        );
        assert!(matches!(result, Err(LoadError::Value { .. })));
    }
}
