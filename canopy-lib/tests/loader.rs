use std::path::PathBuf;

use canopy_lib::{Control, LoadError, NodeData, loader};

/// Writes a scratch XML file the loader can read back.
fn write_xml(name: &str, body: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("canopy-loader-{}-{name}", std::process::id()));
    std::fs::write(&path, body).unwrap();
    path
}

fn source_node(id: &str, text: &str, source: &PathBuf) -> NodeData {
    let mut data = NodeData::with_id(id, text);
    data.set_children_source(source.to_string_lossy().as_ref());
    data
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_merges_children_with_prefixed_ids() {
    let file = write_xml(
        "basic.xml",
        r#"<nodes><node id="s" Text="S"/><node Text="Anon"/></nodes>"#,
    );
    let mut control = Control::tree_view("tv");
    let x = control.add_root(source_node("x", "X", &file));

    let merged = loader::load(&mut control, x).unwrap();
    assert_eq!(merged, 2);

    let children = control.tree().children(x).to_vec();
    assert_eq!(children.len(), 2);
    assert_eq!(control.tree().get(children[0]).unwrap().postback_id(), "x.s");
    // Anonymous loaded nodes get positional wire ids.
    assert_eq!(control.tree().get(children[1]).unwrap().postback_id(), "x.2");
    // Loaded content is addressable by subsequent postbacks.
    assert_eq!(control.find_by_postback_id("x.s"), Some(children[0]));

    let _ = std::fs::remove_file(file);
}

#[test]
fn test_reload_replaces_previous_children() {
    let file = write_xml("replace.xml", r#"<node id="only" Text="Only"/>"#);
    let mut control = Control::tree_view("tv");
    let x = control.add_root(source_node("x", "X", &file));
    control.add_child(x, NodeData::new("stale"));

    loader::load(&mut control, x).unwrap();
    let children = control.tree().children(x);
    assert_eq!(children.len(), 1);
    assert_eq!(
        control.tree().get(children[0]).unwrap().text(),
        "Only"
    );

    let _ = std::fs::remove_file(file);
}

#[test]
fn test_missing_file_is_fatal() {
    let mut control = Control::tree_view("tv");
    let mut data = NodeData::with_id("x", "X");
    data.set_children_source("/nonexistent/canopy-test.xml");
    let x = control.add_root(data);

    assert!(matches!(
        loader::load(&mut control, x),
        Err(LoadError::Io { .. })
    ));
    assert!(control.tree().children(x).is_empty());
}

#[test]
fn test_unsupported_source_is_fatal() {
    let mut control = Control::tree_view("tv");
    let mut data = NodeData::with_id("x", "X");
    data.set_children_source("menu.json");
    let x = control.add_root(data);

    assert!(matches!(
        loader::load(&mut control, x),
        Err(LoadError::UnsupportedSource(_))
    ));
}

#[test]
fn test_load_without_source_is_fatal() {
    let mut control = Control::tree_view("tv");
    let x = control.add_root(NodeData::new("plain"));
    assert!(matches!(
        loader::load(&mut control, x),
        Err(LoadError::MissingSource)
    ));
}

// ============================================================================
// Preload → select → prune
// ============================================================================

#[test]
fn test_preload_follows_nested_on_demand_sources() {
    let inner = write_xml("inner.xml", r#"<node id="leaf" Text="Leaf"/>"#);
    let outer = write_xml(
        "outer.xml",
        &format!(
            r#"<nodes><node id="s" Text="S"/><node id="deep" Text="Deep" ChildrenSource="{}"/></nodes>"#,
            inner.display()
        ),
    );

    let mut control = Control::tree_view("tv");
    let x = control.add_root(source_node("x", "X", &outer));

    let merged = loader::preload_all_paths(&mut control).unwrap();
    assert_eq!(merged, 3);

    // The nested on-demand node revealed by the first load was loaded too.
    let leaf = control.find_by_postback_id("x.deep.leaf").unwrap();
    assert_eq!(control.tree().get(leaf).unwrap().text(), "Leaf");
    assert!(control.tree().get(x).unwrap().loaded());

    let _ = std::fs::remove_file(inner);
    let _ = std::fs::remove_file(outer);
}

#[test]
fn test_prune_keeps_only_the_selection_ancestry() {
    let x_file = write_xml("x.xml", r#"<node id="s" Text="S"/>"#);
    let y_file = write_xml("y.xml", r#"<node id="t" Text="T"/>"#);

    let mut control = Control::tree_view("tv");
    let x = control.add_root(source_node("x", "X", &x_file));
    let y = control.add_root(source_node("y", "Y", &y_file));

    loader::preload_all_paths(&mut control).unwrap();
    assert_eq!(control.tree().children(x).len(), 1);
    assert_eq!(control.tree().children(y).len(), 1);

    // Resolve the selection inside the loaded content, then prune.
    let selected = control.find_by_postback_id("x.s").unwrap();
    control.select(selected);
    loader::prune_non_current_paths(&mut control);

    // x is a strict ancestor of the selection: its children survive.
    assert_eq!(control.tree().children(x).len(), 1);
    assert!(control.tree().get(x).unwrap().loaded());
    // y is not on the selection path: emptied and reloadable.
    assert!(control.tree().children(y).is_empty());
    assert!(!control.tree().get(y).unwrap().loaded());

    let _ = std::fs::remove_file(x_file);
    let _ = std::fs::remove_file(y_file);
}

#[test]
fn test_prune_without_selection_empties_every_branch() {
    let x_file = write_xml("all.xml", r#"<node id="s" Text="S"/>"#);
    let mut control = Control::tree_view("tv");
    let x = control.add_root(source_node("x", "X", &x_file));

    loader::preload_all_paths(&mut control).unwrap();
    loader::prune_non_current_paths(&mut control);

    assert!(control.tree().children(x).is_empty());
    assert!(!control.tree().get(x).unwrap().loaded());

    let _ = std::fs::remove_file(x_file);
}
