use glam::Mat4;
use wgpu::BufferUsages;

use crate::scene_graph::{Object3D, Scene};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Instance {
    pub model: Mat4,
    pub normal: Mat4,
}

impl Instance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        5 => Float32x4,
        6 => Float32x4,
        7 => Float32x4,
        8 => Float32x4,
        9 => Float32x4,
        10 => Float32x4,
        11 => Float32x4,
        12 => Float32x4
    ];

    pub fn from_object(object: &Object3D) -> Self {
        Self {
            model: *object.transform.matrix(),
            normal: *object.transform.normal_matrix(),
        }
    }

    pub fn descriptor() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Instance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub struct Instances {
    instances: Vec<Instance>,
}

impl Instances {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
        }
    }

    /// Rebuilds the instance list from every visible scene object.
    pub fn gather(&mut self, scene: &Scene) {
        self.instances.clear();
        self.instances
            .extend(scene.visible_objects().map(Instance::from_object));
    }

    pub fn write_to_buffer(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instance_buffer: &mut InstanceBuffer,
    ) {
        instance_buffer.ensure_capacity(device, self.instances.len());
        queue.write_buffer(
            instance_buffer.buffer(),
            0,
            bytemuck::cast_slice(&self.instances),
        );
    }

    pub fn should_render(&self) -> bool {
        !self.instances.is_empty()
    }

    pub fn count(&self) -> u32 {
        self.instances.len() as u32
    }
}

pub struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
}

impl InstanceBuffer {
    const MIN_INSTANCES: usize = 128;

    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let capacity = capacity.max(Self::MIN_INSTANCES);

        Self {
            buffer: Self::create_buffer(device, capacity),
            capacity,
        }
    }

    fn create_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance buffer"),
            size: (size_of::<Instance>() * capacity) as wgpu::BufferAddress,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.capacity {
            return;
        }

        let capacity = required.next_power_of_two();
        log::debug!(
            "Growing instance buffer from {} to {} instances",
            self.capacity,
            capacity
        );
        self.buffer = Self::create_buffer(device, capacity);
        self.capacity = capacity;
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(1, self.buffer.slice(..));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::Transform;
    use glam::Vec3;

    #[test]
    fn instance_carries_object_matrices() {
        let object = Object3D::new(
            "box",
            Transform::from_translation_scale(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 8.0)),
        );
        let instance = Instance::from_object(&object);

        assert_eq!(
            instance.model.transform_point3(Vec3::splat(0.5)),
            Vec3::new(2.0, 4.0, 7.0)
        );
        let normal = glam::Mat3::from_mat4(instance.normal);
        assert!(normal.abs_diff_eq(
            glam::Mat3::from_diagonal(Vec3::new(0.5, 0.25, 0.125)),
            1e-6
        ));
    }

    #[test]
    fn instance_layout_matches_shader_stride() {
        assert_eq!(size_of::<Instance>(), 128);
        assert_eq!(Instance::descriptor().attributes.len(), 8);
    }
}
