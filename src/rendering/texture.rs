use winit::dpi::PhysicalSize;

/// Sample counts every renderable colour and depth format supports.
const GUARANTEED_SAMPLE_COUNTS: [u32; 2] = [1, 4];

/// Picks `requested` if both the adapter and the guaranteed set allow it, otherwise 1.
pub fn effective_sample_count(requested: u32, adapter_supported: &[u32]) -> u32 {
    if GUARANTEED_SAMPLE_COUNTS.contains(&requested) && adapter_supported.contains(&requested) {
        requested
    } else {
        1
    }
}

/// Render attachment sized to the surface, recreated on resize.
pub struct RenderTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    sample_count: u32,
    label: String,
}

impl RenderTexture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn depth(
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        sample_count: u32,
        label: impl Into<String>,
    ) -> Self {
        Self::new(device, size, Self::DEPTH_FORMAT, sample_count, label)
    }

    pub fn new(
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        format: wgpu::TextureFormat,
        sample_count: u32,
        label: impl Into<String>,
    ) -> Self {
        let label: String = label.into();
        let texture = Self::create_wgpu_texture(device, size, format, sample_count, &label);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        RenderTexture {
            _texture: texture,
            view,
            format,
            sample_count,
            label,
        }
    }

    fn create_wgpu_texture(
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        format: wgpu::TextureFormat,
        sample_count: u32,
        label: &str,
    ) -> wgpu::Texture {
        let size = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };

        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        *self = Self::new(
            device,
            size,
            self.format,
            self.sample_count,
            std::mem::take(&mut self.label),
        );
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_supported_request() {
        assert_eq!(effective_sample_count(4, &[1, 2, 4, 8]), 4);
        assert_eq!(effective_sample_count(1, &[1, 4]), 1);
    }

    #[test]
    fn falls_back_to_single_sample() {
        assert_eq!(effective_sample_count(4, &[1]), 1);
        assert_eq!(effective_sample_count(4, &[]), 1);
        // 8x needs an adapter specific feature we don't request.
        assert_eq!(effective_sample_count(8, &[1, 4, 8]), 1);
    }
}
