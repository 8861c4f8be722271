use std::f32::consts::PI;

use glam::Vec3;

/// Point on a sphere of `radius` assigned to `index` out of `count`.
///
/// Indices walk a spiral from the -Z pole toward +Z, spreading the points roughly evenly
/// over the surface. The mapping is deterministic for a given count and radius.
pub fn sphere_target(index: usize, count: usize, radius: f32) -> Vec3 {
    let n = count as f32;
    let phi = (-1.0 + 2.0 * index as f32 / n).clamp(-1.0, 1.0).acos();
    let theta = (n * PI).sqrt() * phi;

    Vec3::new(
        theta.cos() * phi.sin(),
        theta.sin() * phi.sin(),
        phi.cos(),
    ) * radius
}

pub fn sphere_layout(count: usize, radius: f32) -> Vec<Vec3> {
    (0..count)
        .map(|index| sphere_target(index, count, radius))
        .collect()
}
