//! Integration tests for config files

use worldsmith_foundation::ErrorKind;
use worldsmith_storage::{ComponentKind, EntityGraph};
use worldsmith_sync::config;

use crate::common::editor;

const WORLD: &str = r#"{
  "dataPool": [
    {
      "Entity": {"inst": "0x10", "is_entity": true, "name": "hall", "alt_names": ["corridor"]},
      "Area": {"inst": "0x10", "is_area": true, "area_type": "Indoor"},
      "ParentToChildren": {"inst": "0x10", "is_parent": true, "children": ["0x11"]}
    },
    {
      "Entity": {"inst": "0x11", "is_entity": true, "name": "lamp", "alt_names": []},
      "ChildToParent": {"inst": "0x11", "is_child": true, "parent": "0x10"}
    },
    {
      "Exit": {"inst": "0x12", "is_exit": true, "direction_type": "Diagonal"}
    },
    {
      "Dict": {"greeting": "hello"}
    }
  ]
}"#;

#[test]
fn load_keeps_valid_entries_and_reports_first_error() {
    let loaded = config::load(WORLD).unwrap();
    assert_eq!(loaded.data_pool.len(), 2);
    assert_eq!(loaded.messages.len(), 1);
    let first = loaded.first_message().unwrap();
    assert!(
        first.message.starts_with("dataPool[2].Exit.direction_type"),
        "{first}"
    );
}

#[test]
fn editor_import_is_untracked_and_consistent() {
    let mut editor = editor();
    let messages = editor.load_config(WORLD).unwrap();
    assert_eq!(messages.len(), 1);
    assert!(!editor.is_dirty());
    assert_eq!(editor.graph().len(), 2);
    editor.graph().check_invariants().unwrap();
}

#[test]
fn save_then_load_reproduces_entities() {
    let mut editor = editor();
    editor.load_config(WORLD).unwrap();
    let saved = editor.save_config().unwrap();

    let reloaded = config::load(&saved).unwrap();
    assert!(reloaded.messages.is_empty());
    let graph = EntityGraph::from_collections(reloaded.data_pool);
    assert_eq!(graph.get_entities(), editor.graph().get_entities());
    let hall = graph.ids()[0];
    assert_eq!(
        graph.get(hall).unwrap().kinds(),
        vec![
            ComponentKind::Entity,
            ComponentKind::Area,
            ComponentKind::ParentToChildren
        ]
    );
}

#[test]
fn file_round_trip() {
    let mut editor = editor();
    editor.load_config(WORLD).unwrap();
    let path = std::env::temp_dir().join(format!("worldsmith-{}.json", std::process::id()));
    config::save_file(&path, editor.graph()).unwrap();
    let loaded = config::load_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded.data_pool.len(), 2);
}

#[test]
fn wrong_envelope_is_a_validation_error() {
    let err = config::load(r#"{"pool": []}"#).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Validation(_)));
}
