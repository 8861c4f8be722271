use glam::Vec3;
use id_arena::Arena;

use crate::scene_graph::light::Lighting;
use crate::scene_graph::material::StandardMaterial;
use crate::scene_graph::object3d::{Object3D, ObjectId};

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub lighting: Lighting,
    pub material: StandardMaterial,
}

impl Scene {
    pub fn new(lighting: Lighting, material: StandardMaterial) -> Self {
        Self {
            objects: Arena::new(),
            lighting,
            material,
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        log::trace!("Adding object {:?}", object.name);
        self.objects.alloc(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn object_translation(&self, object_id: ObjectId) -> Option<Vec3> {
        self.get_object(object_id)
            .map(|object| object.transform.translation())
    }

    /// Returns `false` if the object doesn't exist.
    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) -> bool {
        match self.objects.get_mut(object_id) {
            Some(object) => {
                object.transform.set_translation(translation);
                true
            }
            None => false,
        }
    }

    pub fn visible_objects(&self) -> impl Iterator<Item = &Object3D> {
        self.objects
            .iter()
            .map(|(_, object)| object)
            .filter(|object| object.visible)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether any object moved since the last `early_update`.
    pub fn has_changes(&self) -> bool {
        self.objects
            .iter()
            .any(|(_, object)| object.transform.has_changed())
    }

    pub fn early_update(&mut self) {
        for (_, object) in self.objects.iter() {
            object.transform.reset_flags();
        }
    }
}
