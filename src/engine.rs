//! Engine Core Module
//!
//! [`Engine`] ties the [`World`], the [`SceneGraph`] and a frame [`Timer`]
//! together. It has no window or device of its own: a frontend owns the
//! [`RenderContext`] and hands it in every frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use monaco::{Actor, DrawList, Engine, EngineSettings};
//!
//! let mut engine = Engine::new(EngineSettings::default());
//! let sun = engine.spawn(Actor::new("Sun"));
//!
//! let mut draws = DrawList::new();
//! loop {
//!     engine.frame(&mut draws);
//!     submit_to_gpu(draws.take());
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::ecs::{Entity, EntityHandle, World};
use crate::errors::Result;
use crate::render::RenderContext;
use crate::scene::{FrameStats, SceneGraph, SceneSettings};
use crate::utils::{FpsCounter, Timer};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub scene: SceneSettings,
    /// Log the measured frame rate once per second at `info` level.
    pub log_fps: bool,
}

impl EngineSettings {
    /// Parses settings from JSON. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Owns the world and the scene graph and drives them once per frame.
///
/// # Lifecycle
///
/// 1. Create with [`Engine::new`]
/// 2. Spawn entities with [`Engine::spawn`] and parent them through `scene`
/// 3. Call [`Engine::frame`] (wall clock) or [`Engine::step`] (fixed step)
/// 4. [`Engine::shutdown`] tears everything down
pub struct Engine {
    pub world: World,
    pub scene: SceneGraph,

    settings: EngineSettings,
    timer: Timer,
    fps: FpsCounter,

    time: f32,
    frame_count: u64,
}

impl Engine {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            world: World::new(),
            scene: SceneGraph::with_settings(settings.scene.clone()),
            settings,
            timer: Timer::new(),
            fps: FpsCounter::new(),
            time: 0.0,
            frame_count: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Spawns an entity into the world and registers it with the scene graph.
    pub fn spawn<E: Entity>(&mut self, entity: E) -> EntityHandle {
        let handle = self.world.spawn(entity);
        self.scene.add_entity(&mut self.world, handle);
        handle
    }

    /// Unregisters and despawns an entity.
    pub fn despawn(&mut self, handle: EntityHandle) -> Option<Box<dyn Entity>> {
        self.scene.despawn_entity(&mut self.world, handle)
    }

    /// Runs one frame using wall-clock delta time.
    pub fn frame(&mut self, ctx: &mut dyn RenderContext) -> FrameStats {
        let dt = self.timer.tick();

        if self.settings.log_fps
            && let Some(fps) = self.fps.update(self.timer.delta)
        {
            log::info!("FPS: {fps:.1}");
        }

        self.step(dt, ctx)
    }

    /// Runs one frame with an explicit delta time: scene update, then render.
    pub fn step(&mut self, delta_time: f32, ctx: &mut dyn RenderContext) -> FrameStats {
        let stats = self.scene.update(&mut self.world, delta_time, ctx);
        self.scene.render(&mut self.world, ctx);

        self.time += delta_time;
        self.frame_count += 1;
        stats
    }

    /// Total simulated time in seconds.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Clears the scene graph, then despawns every entity.
    pub fn shutdown(&mut self) {
        self.scene.destroy(&mut self.world);
        self.world.clear();
        log::debug!("Engine shut down after {} frames", self.frame_count);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}
