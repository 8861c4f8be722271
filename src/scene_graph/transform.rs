use glam::{Mat4, Vec3};
use std::cell::{Cell, Ref, RefCell};

#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    scale: Vec3,

    matrix: RefCell<Mat4>,
    normal_matrix: RefCell<Mat4>,
    dirty: Cell<bool>,
    has_changed_since_last_update: Cell<bool>,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_translation_scale(translation, Vec3::ONE)
    }

    pub fn from_translation_scale(translation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            scale,
            matrix: RefCell::new(Mat4::IDENTITY),
            normal_matrix: RefCell::new(Mat4::IDENTITY),
            dirty: Cell::new(true),
            has_changed_since_last_update: Cell::new(true),
        }
    }

    fn update_matrices(&self) {
        if self.dirty.get() {
            let matrix = Mat4::from_translation(self.translation) * Mat4::from_scale(self.scale);

            self.matrix.replace(matrix);
            self.normal_matrix.replace(matrix.inverse().transpose());
            self.dirty.set(false);
        }
    }

    pub fn matrix(&self) -> Ref<'_, Mat4> {
        self.update_matrices();
        self.matrix.borrow()
    }

    /// Inverse transpose of the model matrix, for transforming normals under non-uniform scale.
    pub fn normal_matrix(&self) -> Ref<'_, Mat4> {
        self.update_matrices();
        self.normal_matrix.borrow()
    }

    fn invalidate(&self) {
        self.dirty.set(true);
        self.has_changed_since_last_update.set(true);
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.invalidate();
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn reset_flags(&self) {
        self.has_changed_since_last_update.set(false);
    }

    pub fn has_changed(&self) -> bool {
        self.has_changed_since_last_update.get()
    }
}
