use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{config::DemoConfig, demo::DemoState, engine, rendering::renderer::Renderer};

// Pixel scroll is converted to roughly the same zoom per notch as line scroll.
const PIXELS_PER_SCROLL_LINE: f32 = 50.0;

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

#[derive(Default)]
struct MouseState {
    position: Vec2,
    rotating: bool,
    panning: bool,
}

struct App {
    renderer: Option<Renderer>,
    demo_state: DemoState,
    mouse: MouseState,
    imgui: Option<ImguiState>,
    last_frame: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn from_demo_state(demo_state: DemoState) -> Self {
        Self {
            renderer: None,
            demo_state,
            mouse: MouseState::default(),
            imgui: None,
            last_frame: Instant::now(),
            error: None,
        }
    }

    fn create_imgui(window: &Window) -> ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        ImguiState { context, platform }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Sphere field")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let mut imgui = Self::create_imgui(&window);
        let renderer = pollster::block_on(Renderer::new(
            window,
            &self.demo_state,
            &mut imgui.context,
        ))
        .context("Failed to create renderer")?;

        renderer.window.request_redraw();
        self.imgui = Some(imgui);
        self.renderer = Some(renderer);

        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("{:#}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(renderer), Some(imgui)) = (self.renderer.as_mut(), self.imgui.as_mut()) else {
            return;
        };

        let ui_wants_mouse = imgui.context.io().want_capture_mouse;

        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                renderer.resize(*new_size);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                imgui
                    .context
                    .io_mut()
                    .update_delta_time(now - self.last_frame);
                self.last_frame = now;

                if let Err(e) = imgui
                    .platform
                    .prepare_frame(imgui.context.io_mut(), &renderer.window)
                {
                    log::error!("Failed to prepare imgui frame: {}", e);
                    return;
                }

                let ui = imgui.context.new_frame();

                if let Err(e) = engine::update(&mut self.demo_state, ui) {
                    log::error!("Error during engine::update: {:#}", e);
                    self.error = Some(e);
                    event_loop.exit();
                    return;
                }

                imgui.platform.prepare_render(ui, &renderer.window);

                match renderer.render(&self.demo_state, &mut imgui.context) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        renderer.resize(renderer.size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        log::warn!("Timeout");
                    }
                    Err(other) => {
                        log::error!("Unexpected error: {:?}", other);
                    }
                }

                renderer.window.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                let delta = position - self.mouse.position;
                self.mouse.position = position;

                let viewport_height = renderer.size.height as f32;
                let controls = &mut self.demo_state.controls;

                if self.mouse.rotating {
                    controls.rotate(delta, viewport_height);
                } else if self.mouse.panning {
                    controls.pan(delta, viewport_height);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                // Drags that start over the UI belong to the UI.
                let pressed = *state == ElementState::Pressed && !ui_wants_mouse;

                match button {
                    MouseButton::Left => self.mouse.rotating = pressed,
                    MouseButton::Right => self.mouse.panning = pressed,
                    _ => {}
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !ui_wants_mouse => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => {
                        position.y as f32 / PIXELS_PER_SCROLL_LINE
                    }
                };
                self.demo_state.controls.zoom(scroll);
            }
            _ => (),
        }

        imgui.platform.handle_event::<()>(
            imgui.context.io_mut(),
            &renderer.window,
            &Event::WindowEvent { window_id, event },
        );
    }
}

pub async fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let demo_state =
        DemoState::new(DemoConfig::default()).context("Failed to create demo state")?;

    let mut app = App::from_demo_state(demo_state);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
