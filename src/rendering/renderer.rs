use std::sync::Arc;

use anyhow::Context;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::CameraUniform,
    demo::DemoState,
    math::color::wgpu_color_from_hex,
    rendering::{
        box_pass::{BoxPass, BoxPassTextureViews},
        imgui_renderer::ImguiPass,
        instance::{InstanceBuffer, Instances},
        lighting::{LightingUniform, LightingUniformState},
        mesh::{Mesh, MeshBuffers},
        texture::{effective_sample_count, RenderTexture},
    },
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    msaa_texture: Option<RenderTexture>,
    depth_texture: RenderTexture,
    clear_color: wgpu::Color,

    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    lighting_uniform: LightingUniform,

    cube: MeshBuffers,
    instances: Instances,
    instance_buffer: InstanceBuffer,

    box_pass: BoxPass,
    imgui_pass: ImguiPass,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        demo_state: &DemoState,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable graphics adapter")?;

        log::info!("Using adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("Surface has no supported formats")?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let sample_count = effective_sample_count(
            demo_state.config.render.msaa_samples,
            &adapter
                .get_texture_format_features(surface_format)
                .flags
                .supported_sample_counts(),
        );
        log::info!("Rendering with {}x MSAA", sample_count);

        let msaa_texture = (sample_count > 1).then(|| {
            RenderTexture::new(
                &device,
                size,
                surface_format,
                sample_count,
                "MSAA Color Texture",
            )
        });
        let depth_texture = RenderTexture::depth(&device, size, sample_count, "Depth Texture");

        let mut camera_uniform = CameraUniform::default();
        camera_uniform.update(size, &demo_state.controls.camera);
        let camera_buffer = camera_uniform.create_buffer(&device);

        let lighting_uniform =
            LightingUniform::new(&device, LightingUniformState::from_scene(&demo_state.scene));

        let cube = MeshBuffers::new(&device, &Mesh::unit_cube());
        let instance_buffer = InstanceBuffer::new(&device, demo_state.scene.len());

        let box_pass = BoxPass::create(
            &device,
            surface_format,
            sample_count,
            &camera_buffer,
            lighting_uniform.buffer(),
        )?;
        let imgui_pass = ImguiPass::new(&device, &queue, surface_format, imgui_context);

        let mut renderer = Self {
            window,
            size,
            surface,
            surface_config,
            device,
            queue,
            msaa_texture,
            depth_texture,
            clear_color: wgpu_color_from_hex(demo_state.config.render.clear_color),
            camera_uniform,
            camera_buffer,
            lighting_uniform,
            cube,
            instances: Instances::new(),
            instance_buffer,
            box_pass,
            imgui_pass,
        };
        renderer.upload_instances(demo_state);

        Ok(renderer)
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.surface_config.width = new_size.width;
            self.surface_config.height = new_size.height;
            self.surface.configure(&self.device, &self.surface_config);
            if let Some(msaa_texture) = &mut self.msaa_texture {
                msaa_texture.resize(&self.device, new_size);
            }
            self.depth_texture.resize(&self.device, new_size);
        }
    }

    fn upload_instances(&mut self, demo_state: &DemoState) {
        self.instances.gather(&demo_state.scene);
        self.instances
            .write_to_buffer(&self.device, &self.queue, &mut self.instance_buffer);
    }

    pub fn render(
        &mut self,
        demo_state: &DemoState,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.camera_uniform
            .update(self.size, &demo_state.controls.camera);
        self.camera_uniform
            .update_buffer(&self.queue, &self.camera_buffer);
        self.lighting_uniform.update(
            &self.queue,
            LightingUniformState::from_scene(&demo_state.scene),
        );

        if demo_state.scene.has_changes() {
            self.upload_instances(demo_state);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // With MSAA the boxes are drawn into the multisampled target and resolved into the
        // surface texture, which imgui then draws over.
        let (color, resolve_target) = match &self.msaa_texture {
            Some(msaa_texture) => (msaa_texture.view(), Some(&view)),
            None => (&view, None),
        };

        self.box_pass.render(
            &BoxPassTextureViews {
                color,
                resolve_target,
                depth: self.depth_texture.view(),
            },
            &mut encoder,
            self.clear_color,
            &self.cube,
            &self.instances,
            &self.instance_buffer,
        );

        if let Err(e) = self.imgui_pass.render(
            &view,
            imgui_context,
            &self.device,
            &self.queue,
            &mut encoder,
        ) {
            log::error!("{:#}", e);
        }

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
