use glam::{Vec3, Vec4};
use monaco::{
    Actor, DrawList, Engine, EngineSettings, Entity, EntityCore, MaterialComponent, MeshComponent,
    RenderContext, Transform,
};

/// Pivot that spins around Y; everything attached to it orbits.
struct Orbit {
    core: EntityCore,
    speed: f32,
}

impl Orbit {
    fn new(name: &str, speed: f32) -> Self {
        let mut core = EntityCore::new(name);
        core.add_component(Transform::new());
        Self { core, speed }
    }
}

impl Entity for Orbit {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn update(&mut self, delta_time: f32, _ctx: &mut dyn RenderContext) {
        if let Some(transform) = self.core.get_component_mut::<Transform>() {
            let mut rotation = transform.rotation();
            rotation.y += self.speed * delta_time;
            transform.set_rotation(rotation);
        }
        self.core.components_mut().update_all(delta_time);
    }
}

fn planet(name: &str, color: Vec4, radius: f32, distance: f32) -> Actor {
    let mut actor = Actor::new(name)
        .with_mesh(MeshComponent::quad(format!("{name}_mesh")))
        .with_material(MaterialComponent::new(color));
    if let Some(transform) = actor.core_mut().get_component_mut::<Transform>() {
        transform.set_transform(Vec3::new(distance, 0.0, 0.0), Vec3::ZERO, Vec3::splat(radius));
    }
    actor
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 1. Engine, optionally configured from JSON
    let settings = match std::env::args().nth(1) {
        Some(path) => EngineSettings::from_json(&std::fs::read_to_string(path)?)?,
        None => EngineSettings {
            log_fps: true,
            ..Default::default()
        },
    };
    let mut engine = Engine::new(settings);

    // 2. Sun -> earth orbit -> earth -> moon orbit -> moon
    let sun = engine.spawn(planet("Sun", Vec4::new(1.0, 0.8, 0.2, 1.0), 4.0, 0.0));
    let earth_orbit = engine.spawn(Orbit::new("EarthOrbit", 0.5));
    let earth = engine.spawn(planet("Earth", Vec4::new(0.2, 0.4, 1.0, 1.0), 1.0, 20.0));
    let moon_orbit = engine.spawn(Orbit::new("MoonOrbit", 2.0));
    let moon = engine.spawn(planet("Moon", Vec4::splat(0.8), 0.3, 3.0));

    let scene = &mut engine.scene;
    let world = &mut engine.world;
    scene.attach(world, earth_orbit, sun);
    scene.attach(world, earth, earth_orbit);
    scene.attach(world, moon_orbit, earth);
    scene.attach(world, moon, moon_orbit);
    scene.validate(world)?;

    // Children inherit the sun's 4x scale; the orbit pivot cancels it
    if let Some(t) = world.component_mut::<Transform>(earth_orbit) {
        t.set_scale(Vec3::splat(0.25));
    }

    // 3. Fixed-step main loop
    let mut draws = DrawList::new();
    let dt = 1.0 / 60.0;
    for frame in 0..600 {
        let stats = engine.step(dt, &mut draws);
        let frame_draws = draws.take();

        if frame % 120 == 0 {
            let moon_pos = engine
                .world
                .component::<Transform>(moon)
                .map(Transform::world_position)
                .unwrap_or_default();
            log::info!(
                "t={:.2}s updated={} draws={} moon at ({:.2}, {:.2}, {:.2})",
                engine.time(),
                stats.updated,
                frame_draws.len(),
                moon_pos.x,
                moon_pos.y,
                moon_pos.z
            );
        }
    }

    engine.shutdown();
    Ok(())
}
