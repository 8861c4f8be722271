use glam::Vec3;

use crate::{config::MaterialConfig, math::color::linear_from_hex};

/// Metal-free PBR material shared by every box.
#[derive(Debug, Clone)]
pub struct StandardMaterial {
    /// Linear RGB albedo.
    pub color: Vec3,
    pub roughness: f32,
}

impl StandardMaterial {
    pub fn from_config(config: &MaterialConfig) -> Self {
        Self {
            color: linear_from_hex(config.color),
            roughness: config.roughness,
        }
    }
}
