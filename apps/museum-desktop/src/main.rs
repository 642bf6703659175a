mod keymap;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use museum_assets::{AssetLoader, AssetStore, LoadEvent};
use museum_input::{Action, NavigationController, PointerLockControls};
use museum_kernel::{Camera, FrameDriver, FrameHost, MeshHandle, Museum};
use museum_render_wgpu::WgpuRenderer;
use museum_tools::{AppConfig, MuseumInspector};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "museum-desktop", about = "Walk through the museum")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory that model and skybox paths are resolved against
    #[arg(long, default_value = "./public")]
    assets_dir: PathBuf,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Application state.
struct AppState {
    museum: Museum,
    driver: FrameDriver,
    navigation: NavigationController,
    pointer: PointerLockControls,
    loader: Option<AssetLoader>,
    store: AssetStore,
    assets_dir: PathBuf,
    show_inspector: bool,
}

impl AppState {
    fn new(config: &AppConfig, assets_dir: PathBuf) -> Self {
        Self {
            museum: Museum::new(&config.museum),
            driver: FrameDriver::new(),
            navigation: NavigationController::new(config.input.navigation),
            pointer: PointerLockControls::new(config.input.pointer),
            loader: None,
            store: AssetStore::new(),
            assets_dir,
            show_inspector: true,
        }
    }

    /// Start the loader and queue one model per pedestal.
    fn start_loading(&mut self) {
        let loader = match AssetLoader::new(&self.assets_dir) {
            Ok(loader) => loader,
            Err(e) => {
                tracing::error!("failed to start asset loader: {e}");
                return;
            }
        };
        for (slot, spec) in self.museum.layout().sculptures.iter().enumerate() {
            if let Err(e) = loader.load_model(slot, &spec.path) {
                tracing::error!(slot, path = %spec.path, "failed to queue model: {e}");
            }
        }
        self.loader = Some(loader);
    }

    /// Apply whatever the loader has finished since the last frame.
    fn apply_load_events(&mut self, device: &wgpu::Device, renderer: &mut WgpuRenderer) {
        let Some(loader) = &self.loader else {
            return;
        };
        for event in loader.poll() {
            match event {
                LoadEvent::Progress {
                    path, loaded, total, ..
                } => {
                    let percent = if total == 0 {
                        100.0
                    } else {
                        loaded as f64 / total as f64 * 100.0
                    };
                    tracing::debug!(%path, "{percent:.0}% loaded");
                }
                LoadEvent::Loaded { slot, id, model } => {
                    let handle = MeshHandle(id.0);
                    if self.store.register_model(id, model.clone()) {
                        renderer.upload_model(device, handle, &model);
                    }
                    self.museum.place_sculpture(slot, handle);
                }
                LoadEvent::Failed { slot, path, error } => {
                    tracing::error!(slot, %path, "failed to load model: {error}");
                }
            }
        }
    }

    /// Returns `true` when pointer capture changed.
    fn apply(&mut self, action: Action) -> bool {
        action.apply(&mut self.museum.camera, &mut self.pointer)
    }

    /// Returns `true` when pointer capture changed.
    fn handle_key(&mut self, key: KeyCode) -> bool {
        if key == KeyCode::F1 {
            self.show_inspector = !self.show_inspector;
            return false;
        }
        let action = keymap::key_action(key, &self.navigation, &self.museum.camera);
        self.apply(action)
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        let summary = MuseumInspector::summary(&self.museum);

        egui::SidePanel::left("inspector")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Museum");
                ui.separator();
                ui.label(format!(
                    "Frame: {}  Effect time: {:.2}",
                    summary.frame, summary.effect_time
                ));
                ui.label(format!("Nodes: {}", summary.node_count));
                ui.label(format!("Models loaded: {}", self.store.len()));
                let [x, y, z] = summary.camera_position;
                ui.label(format!("Camera: ({x:.1}, {y:.1}, {z:.1})"));
                let [dx, dy, dz] = summary.camera_direction;
                ui.label(format!("Looking: ({dx:.2}, {dy:.2}, {dz:.2})"));
                ui.label(if self.pointer.is_locked() {
                    "Pointer: locked"
                } else {
                    "Pointer: free"
                });
                ui.separator();

                ui.heading("Bodies");
                for body in &summary.bodies {
                    ui.label(body.to_string());
                }

                ui.separator();
                ui.small("F1: Toggle Inspector | Click: Look | Esc: Release | WASD/Arrows: Move");
            });
    }
}

/// What a frame hands off to after the animation step: pointer look and the
/// GPU draw.
struct WindowHost<'a> {
    pointer: &'a mut PointerLockControls,
    renderer: &'a WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    view: &'a wgpu::TextureView,
}

impl FrameHost for WindowHost<'_> {
    fn update_controls(&mut self, camera: &mut Camera) {
        self.pointer.update(camera);
    }

    fn render(&mut self, museum: &Museum) {
        self.renderer.render(self.device, self.queue, self.view, museum);
    }
}

/// Everything that exists once a window and GPU are up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Museum")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("museum_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn grab_pointer(&self, grab: bool) {
        let result = if grab {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = result {
            tracing::warn!("cursor grab failed: {e}");
        }
        self.window.set_cursor_visible(!grab);
    }

    /// Draw the egui overlay on top of the frame already in `view`.
    fn draw_overlay(
        &mut self,
        egui_ctx: &EguiContext,
        view: &wgpu::TextureView,
        ui: impl FnMut(&EguiContext),
    ) {
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, ui);

        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        self.state.apply_load_events(&gpu.device, &mut gpu.renderer);

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut host = WindowHost {
            pointer: &mut self.state.pointer,
            renderer: &gpu.renderer,
            device: &gpu.device,
            queue: &gpu.queue,
            view: &view,
        };
        if !self.state.driver.frame(&mut self.state.museum, &mut host) {
            event_loop.exit();
            return;
        }

        let state = &mut self.state;
        gpu.draw_overlay(&self.egui_ctx, &view, |ctx| state.draw_ui(ctx));

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                self.state.museum.camera.set_viewport(size.width, size.height);
                self.gpu = Some(gpu);
                self.state.start_loading();
            }
            Err(e) => {
                tracing::error!("GPU initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.state.driver.stop_handle().stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size.width, new_size.height);
                self.state
                    .museum
                    .camera
                    .set_viewport(gpu.config.width, gpu.config.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if self.state.handle_key(key) {
                    gpu.grab_pointer(self.state.pointer.is_locked());
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if self.state.apply(Action::LockPointer) {
                    gpu.grab_pointer(true);
                }
            }
            WindowEvent::Focused(false) => {
                if self.state.apply(Action::UnlockPointer) {
                    gpu.grab_pointer(false);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state
                .pointer
                .on_pointer_move(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load(cli.config.as_deref())
        .with_context(|| format!("loading config {:?}", cli.config))?;

    tracing::info!(assets_dir = %cli.assets_dir.display(), "museum-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(&config, cli.assets_dir));
    event_loop.run_app(&mut app)?;

    Ok(())
}
