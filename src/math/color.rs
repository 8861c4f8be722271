use glam::Vec3;

/// Converts a single sRGB-encoded channel to linear.
pub fn srgb_to_linear(channel: f32) -> f32 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Decodes a `0xRRGGBB` sRGB colour into linear RGB.
pub fn linear_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

pub fn wgpu_color_from_hex(hex: u32) -> wgpu::Color {
    let linear = linear_from_hex(hex);
    wgpu::Color {
        r: linear.x as f64,
        g: linear.y as f64,
        b: linear.z as f64,
        a: 1.0,
    }
}
