use anyhow::Context;
use glam::Vec3;
use rand::Rng;

use crate::{
    config::BoxFieldConfig,
    scene_graph::{Object3D, ObjectId, Scene, Transform},
};

/// `rand` scales a range's span up slightly while sampling, so spans near `f32::MAX` overflow.
fn has_sampling_headroom(span: f32) -> bool {
    (span * 2.0).is_finite()
}

/// One animatable box. Its position lives in the scene graph node it points to.
#[derive(Debug, Clone, Copy)]
pub struct SceneObject {
    handle: ObjectId,
}

/// Index-stable set of boxes together with the layout they were created in.
pub struct SceneObjectSet {
    objects: Vec<SceneObject>,
    initial_positions: Vec<Vec3>,
}

impl SceneObjectSet {
    /// Spawns `config.count` randomly sized and placed boxes into `scene`.
    pub fn create(
        scene: &mut Scene,
        rng: &mut impl Rng,
        config: &BoxFieldConfig,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            config.min_size.is_finite()
                && config.max_size.is_finite()
                && has_sampling_headroom(config.max_size - config.min_size)
                && 0.0 < config.min_size
                && config.min_size <= config.max_size,
            "Invalid box size range {}..={}",
            config.min_size,
            config.max_size
        );
        anyhow::ensure!(
            (2.0 * config.position_extent)
                .to_array()
                .into_iter()
                .all(has_sampling_headroom)
                && config.position_extent.min_element() >= 0.0,
            "Invalid position extent {}",
            config.position_extent
        );

        let size_range = config.min_size..=config.max_size;
        let extent = config.position_extent;

        let mut objects = Vec::with_capacity(config.count);

        for index in 0..config.count {
            let size = Vec3::new(
                rng.gen_range(size_range.clone()),
                rng.gen_range(size_range.clone()),
                rng.gen_range(size_range.clone()),
            );
            let position = Vec3::new(
                rng.gen_range(-extent.x..=extent.x),
                rng.gen_range(-extent.y..=extent.y),
                rng.gen_range(-extent.z..=extent.z),
            );

            let handle = scene.add_object(Object3D::new(
                format!("Box {}", index),
                Transform::from_translation_scale(position, size),
            ));

            objects.push(SceneObject { handle });
        }

        let mut set = Self {
            objects,
            initial_positions: Vec::new(),
        };
        set.initial_positions = set.positions(scene)?;

        log::info!("Created {} boxes", set.len());

        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn get(&self, index: usize) -> anyhow::Result<&SceneObject> {
        self.objects.get(index).with_context(|| {
            format!(
                "Object index {} out of range ({} objects)",
                index,
                self.objects.len()
            )
        })
    }

    pub fn position(&self, scene: &Scene, index: usize) -> anyhow::Result<Vec3> {
        let object = self.get(index)?;
        scene
            .object_translation(object.handle)
            .with_context(|| format!("Object {} is missing from the scene", index))
    }

    /// Current position of every object, in set order.
    pub fn positions(&self, scene: &Scene) -> anyhow::Result<Vec<Vec3>> {
        (0..self.objects.len())
            .map(|index| self.position(scene, index))
            .collect()
    }

    pub fn set_position(
        &self,
        scene: &mut Scene,
        index: usize,
        position: Vec3,
    ) -> anyhow::Result<()> {
        let object = self.get(index)?;
        anyhow::ensure!(
            scene.set_object_translation(object.handle, position),
            "Object {} is missing from the scene",
            index
        );
        Ok(())
    }

    pub fn initial_position(&self, index: usize) -> anyhow::Result<Vec3> {
        self.initial_positions.get(index).copied().with_context(|| {
            format!(
                "Object index {} out of range ({} objects)",
                index,
                self.initial_positions.len()
            )
        })
    }

    pub fn initial_positions(&self) -> &[Vec3] {
        &self.initial_positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LightingConfig, MaterialConfig};
    use crate::scene_graph::{Lighting, StandardMaterial};
    use rand::{rngs::StdRng, SeedableRng};

    fn empty_scene() -> Scene {
        Scene::new(
            Lighting::from_config(&LightingConfig::default()),
            StandardMaterial::from_config(&MaterialConfig::default()),
        )
    }

    fn create_default(scene: &mut Scene) -> SceneObjectSet {
        let mut rng = StdRng::seed_from_u64(7);
        SceneObjectSet::create(scene, &mut rng, &BoxFieldConfig::default())
            .expect("default config is valid")
    }

    #[test]
    fn initial_positions_match_current_positions() {
        let mut scene = empty_scene();
        let set = create_default(&mut scene);

        assert_eq!(set.len(), 100);
        assert_eq!(scene.len(), 100);

        let positions = set.positions(&scene).unwrap();
        assert_eq!(positions.len(), 100);
        for (index, position) in positions.iter().enumerate() {
            assert_eq!(set.initial_position(index).unwrap(), *position);
        }
    }

    #[test]
    fn samples_stay_within_configured_bounds() {
        let mut scene = empty_scene();
        let set = create_default(&mut scene);
        let config = BoxFieldConfig::default();

        for (index, position) in set.initial_positions().iter().enumerate() {
            assert!(position.abs().cmple(config.position_extent).all());

            let handle = set.get(index).unwrap().handle;
            let size = scene
                .get_object(handle)
                .unwrap()
                .transform
                .matrix()
                .transform_vector3(Vec3::ONE);
            assert!(size.min_element() >= config.min_size);
            assert!(size.max_element() <= config.max_size);
        }
    }

    #[test]
    fn set_position_moves_only_the_current_position() {
        let mut scene = empty_scene();
        let set = create_default(&mut scene);
        let initial = set.initial_position(3).unwrap();

        set.set_position(&mut scene, 3, Vec3::new(1.0, 2.0, 3.0))
            .unwrap();

        assert_eq!(set.position(&scene, 3).unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(set.initial_position(3).unwrap(), initial);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let mut scene = empty_scene();
        let set = create_default(&mut scene);

        assert!(set.position(&scene, 100).is_err());
        assert!(set.initial_position(100).is_err());
        assert!(set.set_position(&mut scene, 100, Vec3::ZERO).is_err());
    }

    #[test]
    fn zero_extent_places_everything_at_origin() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(1);
        let config = BoxFieldConfig {
            count: 5,
            position_extent: Vec3::ZERO,
            ..Default::default()
        };

        let set = SceneObjectSet::create(&mut scene, &mut rng, &config).unwrap();
        assert!(set.initial_positions().iter().all(|p| *p == Vec3::ZERO));
    }

    #[test]
    fn inverted_size_range_is_rejected() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(1);
        let config = BoxFieldConfig {
            min_size: 2.0,
            max_size: 1.0,
            ..Default::default()
        };

        assert!(SceneObjectSet::create(&mut scene, &mut rng, &config).is_err());
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn overflowing_extent_is_rejected() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(1);
        let config = BoxFieldConfig {
            position_extent: Vec3::splat(f32::MAX),
            ..Default::default()
        };

        assert!(SceneObjectSet::create(&mut scene, &mut rng, &config).is_err());
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn largest_finite_extent_is_accepted() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(1);
        let config = BoxFieldConfig {
            count: 3,
            position_extent: Vec3::splat(f32::MAX / 8.0),
            ..Default::default()
        };

        let set = SceneObjectSet::create(&mut scene, &mut rng, &config).unwrap();
        assert!(set.initial_positions().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn overflowing_size_range_is_rejected() {
        let mut scene = empty_scene();
        let mut rng = StdRng::seed_from_u64(1);
        let config = BoxFieldConfig {
            min_size: 1.0,
            max_size: f32::MAX,
            ..Default::default()
        };

        assert!(SceneObjectSet::create(&mut scene, &mut rng, &config).is_err());
    }
}
