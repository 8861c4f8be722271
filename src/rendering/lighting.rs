use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use wgpu::util::DeviceExt;

use crate::scene_graph::Scene;

/// Scene lights and the shared box material, laid out for the box shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightingUniformState {
    /// xyz: unit vector toward the directional light.
    pub light_direction: Vec4,
    /// rgb: directional light colour times intensity.
    pub light_radiance: Vec4,
    /// rgb: ambient light colour times intensity.
    pub ambient_radiance: Vec4,
    /// rgb: albedo, a: roughness.
    pub base_color: Vec4,
}

impl LightingUniformState {
    pub fn from_scene(scene: &Scene) -> Self {
        let lighting = &scene.lighting;
        let material = &scene.material;

        Self {
            light_direction: lighting.directional.direction_to_light().extend(0.0),
            light_radiance: lighting.directional.radiance().extend(0.0),
            ambient_radiance: lighting.ambient.radiance().extend(0.0),
            base_color: material.color.extend(material.roughness.clamp(0.04, 1.0)),
        }
    }
}

pub struct LightingUniform {
    buffer: wgpu::Buffer,
}

impl LightingUniform {
    pub fn new(device: &wgpu::Device, initial_state: LightingUniformState) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lighting uniform buffer"),
            contents: bytemuck::cast_slice(&[initial_state]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self { buffer }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn update(&self, queue: &wgpu::Queue, state: LightingUniformState) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[state]));
    }
}
