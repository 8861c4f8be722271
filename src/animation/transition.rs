use glam::Vec3;

use crate::{
    animation::sphere::sphere_layout, config::AnimationConfig, scene_graph::Scene,
    scene_objects::SceneObjectSet,
};

/// Relative slack when counting frames. f32 steps like 0.02 aren't exact, so `1.0 / 0.02`
/// comes out slightly above 50 and must not round up to 51.
const FRAME_COUNT_TOLERANCE: f64 = 1e-6;

/// Number of `step`-sized frames needed to reach `duration`, i.e. `ceil(duration / step)`.
fn frame_count(duration: f32, step: f32) -> u64 {
    let ratio = duration as f64 / step as f64;
    let nearest = ratio.round();

    let frames = if (ratio - nearest).abs() <= ratio * FRAME_COUNT_TOLERANCE {
        nearest
    } else {
        ratio.ceil()
    };

    (frames as u64).max(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Sphere,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionId(u64);

pub struct TransitionState {
    id: TransitionId,
    kind: TransitionKind,
    targets: Vec<Vec3>,
    frame: u64,
    total_frames: u64,
    time: f32,
    step: f32,
    duration: f32,
}

impl TransitionState {
    fn new(
        id: TransitionId,
        kind: TransitionKind,
        targets: Vec<Vec3>,
        config: &AnimationConfig,
    ) -> Self {
        Self {
            id,
            kind,
            targets,
            frame: 0,
            total_frames: frame_count(config.duration, config.step),
            time: 0.0,
            step: config.step,
            duration: config.duration,
        }
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        self.time / self.duration
    }

    pub fn is_finished(&self) -> bool {
        self.time >= self.duration
    }

    /// Moves time forward by one step and returns the new normalized progress.
    fn advance(&mut self) -> f32 {
        self.frame += 1;
        self.time = if self.frame >= self.total_frames {
            self.duration
        } else {
            (self.frame as f64 * self.step as f64) as f32
        };
        self.progress()
    }
}

/// Animates the object set toward a target layout, one step per frame.
///
/// Each step interpolates from the object's *current* position, which was already moved by
/// the previous step, so the motion eases out geometrically rather than linearly.
pub struct TransitionDriver {
    config: AnimationConfig,
    active: Option<TransitionState>,
    next_id: u64,
}

impl TransitionDriver {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            active: None,
            next_id: 0,
        }
    }

    /// Starts a transition of `kind`, replacing any transition still in flight.
    pub fn start(&mut self, kind: TransitionKind, objects: &SceneObjectSet) -> TransitionId {
        let targets = match kind {
            TransitionKind::Sphere => sphere_layout(objects.len(), self.config.sphere_radius),
            TransitionKind::Reset => objects.initial_positions().to_vec(),
        };

        if let Some(previous) = self.active.take() {
            log::debug!(
                "{:?} transition superseded at {:.0}%",
                previous.kind,
                previous.progress() * 100.0
            );
        }

        let id = TransitionId(self.next_id);
        self.next_id += 1;

        log::debug!("Starting {:?} transition", kind);
        self.active = Some(TransitionState::new(id, kind, targets, &self.config));

        id
    }

    pub fn start_sphere(&mut self, objects: &SceneObjectSet) -> TransitionId {
        self.start(TransitionKind::Sphere, objects)
    }

    pub fn start_reset(&mut self, objects: &SceneObjectSet) -> TransitionId {
        self.start(TransitionKind::Reset, objects)
    }

    /// Cancels the transition with `id` if it is still the active one.
    pub fn cancel(&mut self, id: TransitionId) -> bool {
        match &self.active {
            Some(state) if state.id == id => {
                log::debug!("{:?} transition cancelled", state.kind);
                self.active = None;
                true
            }
            _ => false,
        }
    }

    pub fn active(&self) -> Option<&TransitionState> {
        self.active.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Advances the active transition by one frame and writes the new positions.
    ///
    /// Returns `true` while the transition needs more frames.
    pub fn update(&mut self, scene: &mut Scene, objects: &SceneObjectSet) -> anyhow::Result<bool> {
        let Some(state) = self.active.as_mut() else {
            return Ok(false);
        };

        anyhow::ensure!(
            state.targets.len() == objects.len(),
            "Transition has {} targets for {} objects",
            state.targets.len(),
            objects.len()
        );

        let t = state.advance();

        for (index, target) in state.targets.iter().enumerate() {
            let new_position = if t >= 1.0 {
                *target
            } else {
                objects.position(scene, index)?.lerp(*target, t)
            };
            objects.set_position(scene, index, new_position)?;
        }

        if state.is_finished() {
            log::debug!("{:?} transition finished after {} frames", state.kind, state.frame);
            self.active = None;
            return Ok(false);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::sphere::sphere_target;
    use crate::config::{BoxFieldConfig, LightingConfig, MaterialConfig};
    use crate::scene_graph::{Lighting, StandardMaterial};
    use rand::{rngs::StdRng, SeedableRng};

    fn setup(count: usize) -> (Scene, SceneObjectSet) {
        let mut scene = Scene::new(
            Lighting::from_config(&LightingConfig::default()),
            StandardMaterial::from_config(&MaterialConfig::default()),
        );
        let mut rng = StdRng::seed_from_u64(42);
        let config = BoxFieldConfig {
            count,
            ..Default::default()
        };
        let objects = SceneObjectSet::create(&mut scene, &mut rng, &config).unwrap();
        (scene, objects)
    }

    fn run_to_completion(
        driver: &mut TransitionDriver,
        scene: &mut Scene,
        objects: &SceneObjectSet,
    ) -> usize {
        run_to_completion_within(driver, scene, objects, 10_000)
    }

    fn run_to_completion_within(
        driver: &mut TransitionDriver,
        scene: &mut Scene,
        objects: &SceneObjectSet,
        max_frames: usize,
    ) -> usize {
        let mut frames = 0;
        loop {
            frames += 1;
            if !driver.update(scene, objects).unwrap() {
                return frames;
            }
            assert!(frames < max_frames, "transition never finished");
        }
    }

    #[test]
    fn default_transition_takes_fifty_frames() {
        let (mut scene, objects) = setup(10);
        let mut driver = TransitionDriver::new(AnimationConfig::default());

        driver.start_sphere(&objects);
        assert_eq!(run_to_completion(&mut driver, &mut scene, &objects), 50);
        assert!(!driver.is_running());
    }

    #[test]
    fn progress_is_monotonic_within_unit_range() {
        let (mut scene, objects) = setup(3);
        let mut driver = TransitionDriver::new(AnimationConfig::default());
        driver.start_sphere(&objects);

        let mut last = 0.0;
        while let Some(state) = driver.active() {
            let progress = state.progress();
            assert!(progress >= last);
            assert!(progress <= 1.0);
            last = progress;
            driver.update(&mut scene, &objects).unwrap();
        }
        assert!(last > 0.97);
    }

    #[test]
    fn sphere_transition_lands_on_sphere_targets() {
        let (mut scene, objects) = setup(100);
        let mut driver = TransitionDriver::new(AnimationConfig::default());

        driver.start_sphere(&objects);
        run_to_completion(&mut driver, &mut scene, &objects);

        for (index, position) in objects.positions(&scene).unwrap().iter().enumerate() {
            let target = sphere_target(index, 100, 5.0);
            assert!(position.abs_diff_eq(target, 1e-5), "{} vs {}", position, target);
            assert!((position.length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn steps_interpolate_from_the_current_position() {
        let (mut scene, objects) = setup(4);
        let mut driver = TransitionDriver::new(AnimationConfig::default());

        let start = objects.positions(&scene).unwrap();
        driver.start_sphere(&objects);
        driver.update(&mut scene, &objects).unwrap();
        driver.update(&mut scene, &objects).unwrap();

        for (index, position) in objects.positions(&scene).unwrap().iter().enumerate() {
            let target = sphere_target(index, 4, 5.0);
            let after_first = start[index].lerp(target, 0.02);
            let expected = after_first.lerp(target, 0.04);
            assert!(position.abs_diff_eq(expected, 1e-5), "{} vs {}", position, expected);

            // Interpolating from the starting position would land somewhere else.
            let from_origin = start[index].lerp(target, 0.04);
            if start[index].distance(target) > 1.0 {
                assert!(!position.abs_diff_eq(from_origin, 1e-4));
            }
        }
    }

    #[test]
    fn reset_returns_to_initial_positions_and_is_idempotent() {
        let (mut scene, objects) = setup(50);
        let mut driver = TransitionDriver::new(AnimationConfig::default());

        driver.start_sphere(&objects);
        run_to_completion(&mut driver, &mut scene, &objects);

        driver.start_reset(&objects);
        run_to_completion(&mut driver, &mut scene, &objects);
        let after_first_reset = objects.positions(&scene).unwrap();
        assert_eq!(after_first_reset, objects.initial_positions());

        driver.start_reset(&objects);
        run_to_completion(&mut driver, &mut scene, &objects);
        assert_eq!(objects.positions(&scene).unwrap(), after_first_reset);
    }

    #[test]
    fn starting_a_transition_supersedes_the_active_one() {
        let (mut scene, objects) = setup(20);
        let mut driver = TransitionDriver::new(AnimationConfig::default());

        let sphere = driver.start_sphere(&objects);
        for _ in 0..10 {
            driver.update(&mut scene, &objects).unwrap();
        }

        let reset = driver.start_reset(&objects);
        assert_ne!(sphere, reset);
        assert_eq!(driver.active().map(|state| state.kind()), Some(TransitionKind::Reset));
        assert_eq!(driver.active().map(|state| state.progress()), Some(0.0));

        // Stale ids can't cancel the new transition.
        assert!(!driver.cancel(sphere));
        assert!(driver.is_running());

        run_to_completion(&mut driver, &mut scene, &objects);
        assert_eq!(objects.positions(&scene).unwrap(), objects.initial_positions());
    }

    #[test]
    fn cancelled_transition_stops_moving_objects() {
        let (mut scene, objects) = setup(5);
        let mut driver = TransitionDriver::new(AnimationConfig::default());

        let id = driver.start_sphere(&objects);
        driver.update(&mut scene, &objects).unwrap();
        assert!(driver.cancel(id));

        let frozen = objects.positions(&scene).unwrap();
        assert!(!driver.update(&mut scene, &objects).unwrap());
        assert_eq!(objects.positions(&scene).unwrap(), frozen);
    }

    #[test]
    fn idle_driver_does_nothing() {
        let (mut scene, objects) = setup(5);
        let mut driver = TransitionDriver::new(AnimationConfig::default());

        assert!(!driver.update(&mut scene, &objects).unwrap());
        assert_eq!(objects.positions(&scene).unwrap(), objects.initial_positions());
    }

    #[test]
    fn step_count_follows_configuration() {
        let (mut scene, objects) = setup(2);
        let mut driver = TransitionDriver::new(AnimationConfig {
            duration: 2.0,
            step: 0.1,
            ..Default::default()
        });

        driver.start_reset(&objects);
        assert_eq!(run_to_completion(&mut driver, &mut scene, &objects), 20);

        let mut driver = TransitionDriver::new(AnimationConfig {
            duration: 1.0,
            step: 0.3,
            ..Default::default()
        });
        driver.start_reset(&objects);
        assert_eq!(run_to_completion(&mut driver, &mut scene, &objects), 4);
    }

    #[test]
    fn tiny_steps_still_take_the_full_frame_count() {
        let (mut scene, objects) = setup(1);
        let mut driver = TransitionDriver::new(AnimationConfig {
            duration: 1.0,
            step: 1e-6,
            ..Default::default()
        });

        driver.start_sphere(&objects);
        assert_eq!(
            run_to_completion_within(&mut driver, &mut scene, &objects, 2_000_000),
            1_000_000
        );
    }

    #[test]
    fn frame_count_rounds_up_partial_steps() {
        assert_eq!(frame_count(1.0, 0.02), 50);
        assert_eq!(frame_count(2.0, 0.1), 20);
        assert_eq!(frame_count(1.0, 0.3), 4);
        assert_eq!(frame_count(1000.0, 0.001), 1_000_000);
        assert_eq!(frame_count(1.0, 5.0), 1);
    }
}
