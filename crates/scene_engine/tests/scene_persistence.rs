//! End-to-end scene persistence through the registry: build a scene in
//! memory, save it, reload it through the factory, and check the graph
//! survives intact.

use std::path::PathBuf;

use scene_engine::prelude::*;
use scene_engine::scene::{from_fragment, to_fragment};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct OrbitParams {
    radius: f32,
    speed: f32,
}

struct Orbit {
    params: OrbitParams,
}

impl Orbit {
    fn constructor(_owner: NodeId) -> Box<dyn Property> {
        Box::new(Self {
            params: OrbitParams::default(),
        })
    }
}

impl Property for Orbit {
    fn type_name(&self) -> &'static str {
        "Orbit"
    }

    fn load(&mut self, fragment: &PropertyFragment) -> Result<(), SceneError> {
        self.params = from_fragment(fragment)?;
        Ok(())
    }

    fn save(&self) -> Result<PropertyFragment, SceneError> {
        to_fragment(&self.params)
    }
}

fn orbit_factory() -> PropertyFactory {
    let mut factory = PropertyFactory::new();
    factory.register("Orbit", Orbit::constructor);
    factory
}

fn temp_scene_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "scene_engine_{tag}_{}.ron",
        std::process::id()
    ))
}

#[test]
fn scene_survives_save_and_reload() {
    let factory = orbit_factory();
    let path = temp_scene_path("round_trip");

    let mut registry = NodeRegistry::new();
    let moon = registry
        .spawn("Moon", Transform::from_position(Vec3::new(4.0, 0.0, 0.0)))
        .unwrap();
    registry.spawn("Planet", Transform::default()).unwrap();
    registry
        .node_by_id_mut(moon)
        .unwrap()
        .push_property(Box::new(Orbit {
            params: OrbitParams {
                radius: 4.0,
                speed: 0.25,
            },
        }));

    registry.save_to_path(&path).expect("save");
    assert_eq!(registry.current_path(), Some(path.as_path()));

    let mut reloaded = NodeRegistry::new();
    reloaded.load_from_file(&path, &factory).expect("load");

    assert_eq!(reloaded.len(), 2);
    let moon_back = reloaded.node_by_key("Moon").expect("moon survives");
    assert_eq!(moon_back.id(), moon);
    assert_eq!(moon_back.transform().position, Vec3::new(4.0, 0.0, 0.0));
    assert_eq!(moon_back.property_count(), 1);

    let fragment = moon_back
        .properties()
        .next()
        .unwrap()
        .save()
        .expect("save fragment");
    let params: OrbitParams = from_fragment(&fragment).expect("typed");
    assert_eq!(
        params,
        OrbitParams {
            radius: 4.0,
            speed: 0.25,
        }
    );

    // New nodes in the reloaded registry never collide with file ids.
    let fresh = reloaded.spawn("Fresh", Transform::default()).unwrap();
    assert!(reloaded.nodes().filter(|n| n.id() == fresh).count() == 1);

    std::fs::remove_file(&path).ok();
}

#[test]
fn unknown_property_is_skipped_on_load() {
    let factory = orbit_factory();
    let path = temp_scene_path("unknown_property");

    let text = r#"(
        nodes: {
            0: (
                name: "Satellite",
                transform: (
                    position: (x: 0.0, y: 0.0, z: 0.0),
                    rotation: (x: 0.0, y: 0.0, z: 0.0),
                    scale: (x: 1.0, y: 1.0, z: 1.0),
                ),
                properties: {
                    "Thruster": {"fuel": 10.0},
                    "Orbit": {"radius": 2.0, "speed": 1.0},
                },
            ),
        },
    )"#;
    std::fs::write(&path, text).expect("write fixture");

    let mut registry = NodeRegistry::new();
    registry.load_from_file(&path, &factory).expect("load");

    let satellite = registry.node_by_key("Satellite").expect("present");
    let tags: Vec<&str> = satellite.properties().map(|p| p.type_name()).collect();
    assert_eq!(tags, vec!["Orbit"]);

    std::fs::remove_file(&path).ok();
}

#[test]
fn failed_load_leaves_registry_untouched() {
    let factory = orbit_factory();
    let path = temp_scene_path("bad_document");
    std::fs::write(&path, "(version: 1)").expect("write fixture");

    let mut registry = NodeRegistry::new();
    registry.spawn("Existing", Transform::default()).unwrap();

    let result = registry.load_from_file(&path, &factory);
    assert!(matches!(result, Err(SceneError::MissingNodes)));
    assert_eq!(registry.len(), 1);
    assert!(registry.node_by_key("Existing").is_some());
    assert!(registry.current_path().is_none());

    std::fs::remove_file(&path).ok();
}
