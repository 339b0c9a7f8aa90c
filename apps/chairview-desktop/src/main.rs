use anyhow::{Context as _, Result};
use chairview_camera::CameraController;
use chairview_common::{ShadingParams, TextureSlot};
use chairview_input::{InputEvent, InputState, KeyCode, MouseButton};
use chairview_render_wgpu::{GpuContext, TextureImage, WgpuRenderer};
use chairview_scene::{Scene, SceneComposer};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

const WINDOW_WIDTH: u32 = 640;
const WINDOW_HEIGHT: u32 = 480;
/// Pixel scroll deltas (touchpads) are converted to wheel lines.
const PIXELS_PER_LINE: f32 = 20.0;

#[derive(Parser)]
#[command(name = "chairview-desktop", about = "Procedural chair viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding wood.jpg and grid.png
    #[arg(long, default_value = ".")]
    assets: PathBuf,
}

fn map_key(key: winit::keyboard::KeyCode) -> Option<KeyCode> {
    use winit::keyboard::KeyCode as K;
    Some(match key {
        K::AltLeft => KeyCode::AltLeft,
        K::KeyF => KeyCode::KeyF,
        K::KeyS => KeyCode::KeyS,
        K::Escape => KeyCode::Escape,
        K::F1 => KeyCode::F1,
        _ => return None,
    })
}

fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    use winit::event::MouseButton as B;
    match button {
        B::Left => Some(MouseButton::Left),
        _ => None,
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
    }
}

/// Translate a window event into the viewer's input vocabulary.
fn map_window_event(event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    repeat,
                    ..
                },
            ..
        } => {
            let key = map_key(*code)?;
            match state {
                ElementState::Pressed if *repeat => None,
                ElementState::Pressed => Some(InputEvent::KeyPressed(key)),
                ElementState::Released => Some(InputEvent::KeyReleased(key)),
            }
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let button = map_button(*button)?;
            Some(match state {
                ElementState::Pressed => InputEvent::ButtonPressed(button),
                ElementState::Released => InputEvent::ButtonReleased(button),
            })
        }
        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::CursorMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),
        WindowEvent::CursorLeft { .. } => Some(InputEvent::CursorLeft),
        WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Scrolled(scroll_lines(*delta))),
        WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
        _ => None,
    }
}

/// Releases must reach input state even when the HUD consumes the event, or
/// a key or button released over the HUD stays held.
fn releases_held_input(event: &InputEvent) -> bool {
    matches!(
        event,
        InputEvent::KeyReleased(_)
            | InputEvent::ButtonReleased(_)
            | InputEvent::CursorLeft
            | InputEvent::FocusLost
    )
}

/// Viewer state independent of the window and GPU.
struct AppState {
    input: InputState,
    controller: CameraController,
    scene: Scene,
    composer: SceneComposer,
    show_hud: bool,
    started: Instant,
}

impl AppState {
    fn new() -> Self {
        let scene = Scene::chair();
        tracing::info!(
            "scene ready: {} parts, {} draw entries",
            scene.batches().len(),
            scene.entry_count()
        );
        Self {
            input: InputState::new(),
            controller: CameraController::default(),
            scene,
            composer: SceneComposer::new(),
            show_hud: true,
            started: Instant::now(),
        }
    }

    /// Apply one input event. Returns false when the viewer should quit.
    fn handle_input(&mut self, event: InputEvent) -> bool {
        let delta = self.input.apply(&event);
        self.controller.handle_event(&self.input, &event, delta);

        match event {
            InputEvent::KeyPressed(KeyCode::Escape) => return false,
            InputEvent::KeyPressed(KeyCode::F1) => self.show_hud = !self.show_hud,
            _ => {}
        }
        true
    }

    fn update(&mut self) {
        self.controller
            .update(&self.input, self.started.elapsed());
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }

        let camera = self.controller.camera();
        egui::Window::new("chairview")
            .default_pos([8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("Mode: {}", self.controller.mode().label()));
                let p = camera.position();
                ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                ui.label(format!(
                    "Yaw {:.1}°  Pitch {:.1}°",
                    camera.yaw().to_degrees(),
                    camera.pitch().to_degrees()
                ));
                ui.label(format!("FOV: {:.2}°", camera.fov()));
                ui.separator();
                ui.small("Alt+LMB drag: orbit | Wheel: zoom");
                ui.small("F: reset | S: spin | F1: HUD | Esc: quit");
            });
    }
}

/// egui context plus its winit and wgpu halves.
struct Overlay {
    ctx: EguiContext,
    winit: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    fn new(window: &Window, gpu: &GpuContext) -> Self {
        let ctx = EguiContext::default();
        let winit = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.render_format(), None, 1, false);
        Self {
            ctx,
            winit,
            renderer,
        }
    }

    fn paint(
        &mut self,
        window: &Window,
        gpu: &GpuContext,
        view: &wgpu::TextureView,
        ui: impl FnMut(&EguiContext),
    ) {
        let raw_input = self.winit.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, ui);
        self.winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
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
            self.renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

/// Window-bound resources, created together once the event loop resumes.
struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: WgpuRenderer,
    overlay: Overlay,
}

fn load_textures(assets: &Path) -> Vec<(TextureSlot, TextureImage)> {
    TextureSlot::ALL
        .iter()
        .map(|slot| (*slot, TextureImage::load_or_white(&assets.join(slot.file_name()))))
        .collect()
}

struct GpuApp {
    state: AppState,
    assets: PathBuf,
    graphics: Option<Graphics>,
    /// Fatal setup failure, reported from `main` once the loop exits.
    init_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(assets: PathBuf) -> Self {
        Self {
            state: AppState::new(),
            assets,
            graphics: None,
            init_error: None,
        }
    }

    fn init_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let attrs = Window::default_attributes()
            .with_title("chairview")
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let gpu = pollster::block_on(GpuContext::new(
            window.clone(),
            size.width,
            size.height,
        ))?;

        let textures = load_textures(&self.assets);
        let renderer = WgpuRenderer::new(
            &gpu.device,
            &gpu.queue,
            gpu.render_format(),
            gpu.size(),
            self.state.scene.meshes(),
            &textures,
        );
        let overlay = Overlay::new(&window, &gpu);

        Ok(Graphics {
            window,
            gpu,
            renderer,
            overlay,
        })
    }

    fn redraw(&mut self) {
        self.state.update();

        let Some(g) = &mut self.graphics else {
            return;
        };

        let (width, height) = g.gpu.size();
        let camera = self.state.controller.camera();
        let matrices = camera.frame_matrices(width, height);
        let shading = ShadingParams::seen_from(camera.position());

        let Some(output) = g.gpu.acquire() else {
            return;
        };
        let view = g.gpu.frame_view(&output);

        let frame = self
            .state
            .composer
            .compose(&self.state.scene, matrices, shading);
        g.renderer.render(&g.gpu.device, &g.gpu.queue, &view, frame);

        let state = &self.state;
        g.overlay
            .paint(&g.window, &g.gpu, &view, |ctx| state.draw_ui(ctx));

        output.present();
        g.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        match self.init_graphics(event_loop) {
            Ok(graphics) => self.graphics = Some(graphics),
            Err(e) => {
                tracing::error!("startup failed: {e:#}");
                self.init_error = Some(e);
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
        let consumed = match &mut self.graphics {
            Some(g) => g.overlay.winit.on_window_event(&g.window, &event).consumed,
            None => false,
        };
        if consumed && !map_window_event(&event).is_some_and(|e| releases_held_input(&e)) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(g) = &mut self.graphics {
                    g.gpu.resize(new_size.width, new_size.height);
                    let (width, height) = g.gpu.size();
                    g.renderer.resize(&g.gpu.device, width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            other => {
                if let Some(input) = map_window_event(&other) {
                    if !self.state.handle_input(input) {
                        event_loop.exit();
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(g) = &self.graphics {
            g.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("chairview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(cli.assets);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.init_error.take() {
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn viewer_keys_are_mapped_and_others_ignored() {
        use winit::keyboard::KeyCode as K;
        assert_eq!(map_key(K::AltLeft), Some(KeyCode::AltLeft));
        assert_eq!(map_key(K::KeyS), Some(KeyCode::KeyS));
        assert_eq!(map_key(K::F1), Some(KeyCode::F1));
        assert_eq!(map_key(K::KeyW), None);
    }

    #[test]
    fn scroll_deltas_are_in_lines() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, 3.0)), 3.0);
        let px = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -40.0));
        assert_eq!(scroll_lines(px), -2.0);
    }

    #[test]
    fn focus_loss_translates() {
        assert_eq!(
            map_window_event(&WindowEvent::Focused(false)),
            Some(InputEvent::FocusLost)
        );
        assert_eq!(map_window_event(&WindowEvent::Focused(true)), None);
        assert_eq!(map_window_event(&WindowEvent::CloseRequested), None);
    }

    #[test]
    fn releases_pass_through_the_hud() {
        assert!(releases_held_input(&InputEvent::ButtonReleased(MouseButton::Left)));
        assert!(releases_held_input(&InputEvent::KeyReleased(KeyCode::AltLeft)));
        assert!(releases_held_input(&InputEvent::FocusLost));
        assert!(!releases_held_input(&InputEvent::ButtonPressed(MouseButton::Left)));
        assert!(!releases_held_input(&InputEvent::CursorMoved { x: 1.0, y: 1.0 }));
        assert!(!releases_held_input(&InputEvent::Scrolled(1.0)));
    }

    #[test]
    fn released_button_stops_orbiting() {
        let mut state = AppState::new();
        state.handle_input(InputEvent::CursorMoved { x: 320.0, y: 240.0 });
        state.handle_input(InputEvent::KeyPressed(KeyCode::AltLeft));
        state.handle_input(InputEvent::ButtonPressed(MouseButton::Left));
        state.handle_input(InputEvent::CursorMoved { x: 330.0, y: 240.0 });
        let yaw = state.controller.camera().yaw();
        assert!(yaw > 0.0);

        // Release delivered while the cursor is over the HUD.
        state.handle_input(InputEvent::ButtonReleased(MouseButton::Left));
        state.handle_input(InputEvent::CursorMoved { x: 400.0, y: 240.0 });
        assert_eq!(state.controller.camera().yaw(), yaw);
        assert!(!state.controller.is_orbit_held(&state.input));
    }

    #[test]
    fn escape_requests_quit_and_f1_toggles_hud() {
        let mut state = AppState::new();
        assert!(state.show_hud);
        assert!(state.handle_input(InputEvent::KeyPressed(KeyCode::F1)));
        assert!(!state.show_hud);
        assert!(state.handle_input(InputEvent::KeyReleased(KeyCode::F1)));
        assert!(!state.handle_input(InputEvent::KeyPressed(KeyCode::Escape)));
    }
}
