//! Orbit demo application
//!
//! Builds a small scene out of custom properties, runs it for a few
//! ticks, saves it to a RON scene file, and reloads it through the
//! property factory to show the full round trip.

use scene_engine::prelude::*;
use scene_engine::scene::{from_fragment, to_fragment};

use serde::{Deserialize, Serialize};

/// Rotation applied around the owner's Y axis every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpinParams {
    degrees_per_tick: f32,
}

impl Default for SpinParams {
    fn default() -> Self {
        Self {
            degrees_per_tick: 3.0,
        }
    }
}

struct Spin {
    params: SpinParams,
}

impl Spin {
    fn constructor(_owner: NodeId) -> Box<dyn Property> {
        Box::new(Self {
            params: SpinParams::default(),
        })
    }
}

impl Property for Spin {
    fn type_name(&self) -> &'static str {
        "Spin"
    }

    fn load(&mut self, fragment: &PropertyFragment) -> Result<(), SceneError> {
        self.params = from_fragment(fragment)?;
        Ok(())
    }

    fn save(&self) -> Result<PropertyFragment, SceneError> {
        to_fragment(&self.params)
    }

    fn update(&mut self, ctx: &mut PropertyContext<'_>) {
        ctx.transform.rotation.y += self.params.degrees_per_tick.to_radians();
    }
}

/// Vertical sine-wave bobbing around the owner's starting height.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BobParams {
    amplitude: f32,
    period_ticks: u32,
}

impl Default for BobParams {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            period_ticks: 60,
        }
    }
}

struct Bob {
    params: BobParams,
    base_height: f32,
    tick: u32,
}

impl Bob {
    fn constructor(_owner: NodeId) -> Box<dyn Property> {
        Box::new(Self {
            params: BobParams::default(),
            base_height: 0.0,
            tick: 0,
        })
    }
}

impl Property for Bob {
    fn type_name(&self) -> &'static str {
        "Bob"
    }

    fn load(&mut self, fragment: &PropertyFragment) -> Result<(), SceneError> {
        self.params = from_fragment(fragment)?;
        Ok(())
    }

    fn save(&self) -> Result<PropertyFragment, SceneError> {
        to_fragment(&self.params)
    }

    fn start(&mut self, ctx: &mut PropertyContext<'_>) {
        self.base_height = ctx.transform.position.y;
    }

    fn update(&mut self, ctx: &mut PropertyContext<'_>) {
        self.tick = self.tick.wrapping_add(1);
        let phase = self.tick as f32 / self.params.period_ticks.max(1) as f32;
        ctx.transform.position.y =
            self.base_height + self.params.amplitude * (phase * std::f32::consts::TAU).sin();
    }
}

fn demo_factory() -> PropertyFactory {
    let mut factory = PropertyFactory::new();
    factory.register("Spin", Spin::constructor);
    factory.register("Bob", Bob::constructor);
    factory
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = HostConfig::default();
    let factory = demo_factory();

    // Build the scene in memory.
    let mut registry = NodeRegistry::new();
    registry.spawn("Camera", Transform::from_position(Vec3::new(0.0, 2.0, 10.0)))?;

    let spinner = registry.spawn("Spinner", Transform::default())?;
    registry
        .node_by_id_mut(spinner)
        .expect("just spawned")
        .push_property(Box::new(Spin {
            params: SpinParams {
                degrees_per_tick: 6.0,
            },
        }));

    let buoy = registry.spawn("Buoy", Transform::from_position(Vec3::new(3.0, 1.0, 0.0)))?;
    registry
        .node_by_id_mut(buoy)
        .expect("just spawned")
        .push_property(Box::new(Bob {
            params: BobParams::default(),
            base_height: 0.0,
            tick: 0,
        }));

    // Run a few frames.
    registry.start();
    for _ in 0..30 {
        registry.update();
    }

    let spinner_yaw = registry
        .node_by_id(spinner)
        .expect("spinner alive")
        .transform()
        .rotation
        .y;
    log::info!("spinner yaw after 30 ticks: {spinner_yaw:.3} rad");

    // Save, then reload through the factory.
    let scene_file = config.scene_path("orbit_demo.ron");
    if let Some(dir) = scene_file.parent() {
        std::fs::create_dir_all(dir)?;
    }
    registry.save_to_path(&scene_file)?;
    println!("saved scene to {}", scene_file.display());

    let mut reloaded = NodeRegistry::new();
    reloaded.load_from_file(&scene_file, &factory)?;
    println!("reloaded {} nodes:", reloaded.len());
    for node in reloaded.nodes() {
        println!(
            "  {} '{}' at {:?} with {} properties",
            node.id(),
            node.key(),
            node.transform().position,
            node.property_count()
        );
    }

    Ok(())
}
