//! Rounded ring outline demo
//!
//! Lays out three ring outlines (plain, center-filled, textured) that rebuild
//! their meshes whenever the window is resized or a tunable changes.
//!
//! Keys: Up/Down segments, Left/Right corner radius, W/S outline width,
//! B/V mapping bias, F fill center, Esc quit.

use ring_mesh::{mocha, Color, Rect, RingOutline, RingStyle};
use ring_mesh_wgpu::{Renderer, RingDraw, RingTexture};
use std::rc::Rc;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const RING_COUNT: usize = 3;
const MARGIN: f32 = 80.0;
const GAP: f32 = 120.0;

const RADIUS_STEP: f32 = 10.0;
const OUTLINE_STEP: f32 = 5.0;
const BIAS_STEP: f32 = 0.1;

const STRIPE_TEXTURE_WIDTH: u32 = 64;
const STRIPE_TEXTURE_HEIGHT: u32 = 8;
const STRIPE_DASH: u32 = 16;

/// Rectangles for the rings, side by side with room for their outlines
fn layout_rings(width: f32, height: f32) -> [Rect; RING_COUNT] {
    let cell_width = ((width - 2.0 * MARGIN - GAP * (RING_COUNT - 1) as f32)
        / RING_COUNT as f32)
        .max(0.0);
    let cell_height = (height - 2.0 * MARGIN).max(0.0);

    std::array::from_fn(|i| {
        Rect::from_min_size(
            [MARGIN + i as f32 * (cell_width + GAP), MARGIN],
            [cell_width, cell_height],
        )
    })
}

/// Dashed stroke pattern: opaque dashes separated by transparent gaps along U
fn stripe_pixels(width: u32, height: u32, dash: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for _y in 0..height {
        for x in 0..width {
            let alpha = if (x / dash.max(1)) % 2 == 0 { 255 } else { 0 };
            pixels.extend_from_slice(&[255, 255, 255, alpha]);
        }
    }
    pixels
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: Renderer,
    outlines: Vec<RingOutline<Rc<RingTexture>>>,
}

impl GpuState {
    async fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone()).unwrap();

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .unwrap();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = Renderer::new(&device, &queue, surface_format);

        let stripes = renderer
            .create_texture(
                &device,
                &queue,
                STRIPE_TEXTURE_WIDTH,
                STRIPE_TEXTURE_HEIGHT,
                &stripe_pixels(STRIPE_TEXTURE_WIDTH, STRIPE_TEXTURE_HEIGHT, STRIPE_DASH),
            )
            .map(Rc::new);
        if let Err(e) = &stripes {
            log::warn!("Stripe texture unavailable, drawing plain: {e}");
        }

        let style = RingStyle::new()
            .with_outline_width(24.0)
            .with_corner_radius(60.0)
            .with_corner_segments(8);
        let rects = layout_rings(size.width as f32, size.height as f32);

        let mut outlines = vec![
            RingOutline::new(rects[0], style.with_color(mocha::BLUE)),
            RingOutline::new(
                rects[1],
                style
                    .with_fill_center(true)
                    .with_color(mocha::MAUVE.with_alpha(0.8)),
            ),
            RingOutline::new(rects[2], style.with_color(mocha::PEACH)),
        ];
        if let Ok(stripes) = stripes {
            outlines[2].set_texture(Some(stripes));
        }
        log::info!("✓ {} ring outlines created", outlines.len());

        Self {
            surface,
            device,
            queue,
            config,
            renderer,
            outlines,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);

            let rects = layout_rings(new_size.width as f32, new_size.height as f32);
            for (outline, rect) in self.outlines.iter_mut().zip(rects) {
                outline.set_rect(rect);
            }
        }
    }

    /// Apply a tunable change to every ring
    fn adjust_style(&mut self, key: KeyCode) {
        for outline in &mut self.outlines {
            let current = *outline.style();
            let style = match key {
                KeyCode::ArrowUp => current.with_corner_segments(current.corner_segments + 1),
                KeyCode::ArrowDown => {
                    current.with_corner_segments(current.corner_segments.saturating_sub(1))
                }
                KeyCode::ArrowRight => {
                    current.with_corner_radius(current.corner_radius + RADIUS_STEP)
                }
                KeyCode::ArrowLeft => {
                    current.with_corner_radius(current.corner_radius - RADIUS_STEP)
                }
                KeyCode::KeyW => current.with_outline_width(current.outline_width + OUTLINE_STEP),
                KeyCode::KeyS => current.with_outline_width(current.outline_width - OUTLINE_STEP),
                KeyCode::KeyB => current.with_mapping_bias(current.mapping_bias + BIAS_STEP),
                KeyCode::KeyV => current.with_mapping_bias(current.mapping_bias - BIAS_STEP),
                KeyCode::KeyF => current.with_fill_center(!current.fill_center),
                _ => return,
            };
            // Keep tunables inside their ranges so repeated presses stay responsive
            outline.set_style(style.sanitized());
        }

        if let Some(style) = self.outlines.first().map(|outline| *outline.style()) {
            log::info!(
                "segments={} radius={:.0} outline={:.0} bias={:.1} fill={}",
                style.corner_segments,
                style.corner_radius,
                style.outline_width,
                style.mapping_bias,
                style.fill_center
            );
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // Clear the screen
        {
            let _render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Clear Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color(mocha::BASE)),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        }

        for outline in &mut self.outlines {
            outline.update();
        }
        let draws: Vec<RingDraw> = self.outlines.iter().map(RingDraw::from_outline).collect();

        self.renderer.render(
            &self.device,
            &self.queue,
            &mut encoder,
            &view,
            self.config.width as f32,
            self.config.height as f32,
            &draws,
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        surface_texture.present();
        Ok(())
    }
}

fn clear_color(color: Color) -> wgpu::Color {
    wgpu::Color {
        r: color.r as f64,
        g: color.g as f64,
        b: color.b as f64,
        a: 1.0,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title("Rounded Ring Outlines")
                .with_inner_size(winit::dpi::LogicalSize::new(1400, 600));

            let window = Arc::new(event_loop.create_window(window_attributes).unwrap());
            self.window = Some(window.clone());
            self.gpu_state = Some(pollster::block_on(GpuState::new(window)));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.adjust_style(key);
                }
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    match gpu_state.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            if let Some(window) = &self.window {
                                gpu_state.resize(window.inner_size())
                            }
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::error!("Render error: {:?}", e),
                    }
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    // Initialize logger (RUST_LOG=trace shows every mesh rebuild)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting rounded ring demo...");

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        window: None,
        gpu_state: None,
    };

    event_loop.run_app(&mut app).unwrap();
}
