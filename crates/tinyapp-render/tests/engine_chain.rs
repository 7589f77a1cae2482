//! Engines composed the way an application wires them.

use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use serde_json::json;
use tempfile::TempDir;
use tinyapp_render::{
    DebugEngine, FileEngine, MergedEngine, RenderError, RenderingEngine, RenderingEngineExt,
};

fn chain(dir: &TempDir, fallthroughs: &Rc<Cell<usize>>) -> MergedEngine {
    let counter = Rc::clone(fallthroughs);
    MergedEngine::new(vec![
        FileEngine::jinja()
            .with_postfix(".j2")
            .with_directories([dir.path()])
            .boxed(),
        DebugEngine::new().boxed(),
    ])
    .unwrap()
    .with_observer(move |_, _, _, _| counter.set(counter.get() + 1))
}

#[test]
fn file_template_wins_over_debug_mode() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("plain.j2"), "custom: {{ data }}").unwrap();

    let hits = Rc::new(Cell::new(0));
    let engine = chain(&dir, &hits);

    assert_eq!(engine.render(&json!("x"), "plain").unwrap(), "custom: x");
    assert_eq!(hits.get(), 0);
}

#[test]
fn missing_file_falls_back_to_debug() {
    let dir = TempDir::new().unwrap();
    let hits = Rc::new(Cell::new(0));
    let engine = chain(&dir, &hits);

    assert_eq!(
        engine.render(&json!([1, 2]), "json").unwrap(),
        "[\n  1,\n  2\n]"
    );
    assert_eq!(hits.get(), 1);
}

#[test]
fn broken_template_falls_back_too() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tree.j2"), "{% for %}").unwrap();

    let hits = Rc::new(Cell::new(0));
    let engine = chain(&dir, &hits);

    assert_eq!(
        engine.render(&json!(1), "tree").unwrap(),
        " root => [int] 1"
    );
    assert_eq!(hits.get(), 1);
}

#[test]
fn unknown_everywhere_reports_last_engine() {
    let dir = TempDir::new().unwrap();
    let hits = Rc::new(Cell::new(0));
    let engine = chain(&dir, &hits);

    let err = engine.render(&json!(1), "nope").unwrap_err();
    match err {
        RenderError::TemplateNotFound { name, detail } => {
            assert_eq!(name, "nope");
            assert!(detail.unwrap().contains("plain, json, yaml, debug, tree"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(hits.get(), 2);
}

#[test]
fn chain_configuration_reaches_file_engine() {
    let d1 = TempDir::new().unwrap();
    let d2 = TempDir::new().unwrap();
    fs::write(d2.path().join("tpl_name.x"), "found {{ data }}").unwrap();

    let engines = vec![FileEngine::jinja().boxed(), DebugEngine::new().boxed()];
    let mut engine = MergedEngine::new(engines).unwrap();
    engine.set_template_prefix("tpl_");
    engine.set_template_postfix(".x");
    engine.add_template_directories(&[d1.path().to_path_buf(), d2.path().to_path_buf()]);

    assert_eq!(engine.template_prefix(), "tpl_");
    assert_eq!(
        engine.template_directories(),
        vec![d1.path().to_path_buf(), d2.path().to_path_buf()]
    );
    assert_eq!(engine.render(&json!(5), "name").unwrap(), "found 5");

    engine.remove_template_directories(&[d2.path().to_path_buf()]);
    assert_eq!(
        engine.template_directories(),
        vec![PathBuf::from(d1.path())]
    );
    assert!(matches!(
        engine.render(&json!(5), "name").unwrap_err(),
        RenderError::TemplateNotFound { .. }
    ));
}
