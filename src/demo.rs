use anyhow::Context;
use rand::Rng;

use crate::{
    animation::{transition::TransitionId, TransitionDriver, TransitionKind},
    camera::{Camera, OrbitControls},
    config::DemoConfig,
    scene_graph::{Lighting, Scene, StandardMaterial},
    scene_objects::SceneObjectSet,
};

pub struct DemoState {
    pub config: DemoConfig,
    pub controls: OrbitControls,
    pub scene: Scene,
    pub boxes: SceneObjectSet,
    pub transitions: TransitionDriver,
    current_transition: Option<TransitionId>,
}

impl DemoState {
    pub fn new(config: DemoConfig) -> anyhow::Result<Self> {
        Self::with_rng(config, &mut rand::thread_rng())
    }

    pub fn with_rng(config: DemoConfig, rng: &mut impl Rng) -> anyhow::Result<Self> {
        config.validate().context("Invalid demo configuration")?;

        let controls = OrbitControls::new(Camera::from_config(&config.camera));

        let mut scene = Scene::new(
            Lighting::from_config(&config.lighting),
            StandardMaterial::from_config(&config.material),
        );
        let boxes = SceneObjectSet::create(&mut scene, rng, &config.boxes)
            .context("Failed to create boxes")?;

        let transitions = TransitionDriver::new(config.animation.clone());

        Ok(Self {
            config,
            controls,
            scene,
            boxes,
            transitions,
            current_transition: None,
        })
    }

    pub fn request_sphere(&mut self) {
        self.current_transition = Some(self.transitions.start_sphere(&self.boxes));
    }

    pub fn request_reset(&mut self) {
        self.current_transition = Some(self.transitions.start_reset(&self.boxes));
    }

    /// Stops the transition started by the last request, if it is still running.
    pub fn cancel_transition(&mut self) -> bool {
        match self.current_transition.take() {
            Some(id) => self.transitions.cancel(id),
            None => false,
        }
    }

    /// Active transition and its progress in `[0, 1]`.
    pub fn transition_status(&self) -> Option<(TransitionKind, f32)> {
        self.transitions
            .active()
            .map(|state| (state.kind(), state.progress()))
    }

    /// Runs one animation frame.
    pub fn update(&mut self) -> anyhow::Result<()> {
        let running = self.transitions.update(&mut self.scene, &self.boxes)?;
        if !running {
            self.current_transition = None;
        }
        Ok(())
    }
}
