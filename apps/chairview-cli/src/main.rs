use chairview_camera::CameraController;
use chairview_common::ShadingParams;
use chairview_input::{InputEvent, InputState};
use chairview_render::{DebugTextRenderer, Renderer};
use chairview_scene::{Scene, SceneComposer};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Framebuffer size assumed for headless composition.
const VIEWPORT: (u32, u32) = (640, 480);

#[derive(Parser)]
#[command(name = "chairview-cli", about = "Headless tools for the chair viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, scene statistics and bindings
    Info,
    /// Compose one frame from the default camera and dump its draw calls
    Scene {
        /// Emit JSON instead of the text listing
        #[arg(long)]
        json: bool,
    },
    /// Replay an orbit drag and scroll, then print the camera state
    Camera {
        /// Horizontal drag distance in pixels
        #[arg(long, default_value = "100", allow_hyphen_values = true)]
        dx: f32,
        /// Vertical drag distance in pixels (down is positive)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        dy: f32,
        /// Wheel lines scrolled after the drag
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        scroll: f32,
        /// Hold the spin key at this many seconds after start
        #[arg(long)]
        spin: Option<f64>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Serialize)]
struct CameraReport {
    mode: &'static str,
    position: [f32; 3],
    target: [f32; 3],
    direction: [f32; 3],
    yaw_degrees: f32,
    pitch_degrees: f32,
    fov_degrees: f32,
}

impl CameraReport {
    fn of(controller: &CameraController) -> Self {
        let c = controller.camera();
        Self {
            mode: controller.mode().label(),
            position: c.position().to_array(),
            target: c.target().to_array(),
            direction: c.direction().to_array(),
            yaw_degrees: c.yaw().to_degrees(),
            pitch_degrees: c.pitch().to_degrees(),
            fov_degrees: c.fov(),
        }
    }
}

/// Feed a scripted event sequence through input state and the controller.
fn replay(dx: f32, dy: f32, scroll: f32, spin: Option<f64>) -> CameraController {
    let mut input = InputState::new();
    let mut controller = CameraController::default();
    let bindings = controller.bindings();
    let (x0, y0) = input.cursor();

    let mut events = vec![
        InputEvent::CursorMoved { x: x0, y: y0 },
        InputEvent::KeyPressed(bindings.orbit_modifier),
        InputEvent::ButtonPressed(bindings.orbit_button),
        InputEvent::CursorMoved {
            x: x0 + dx,
            y: y0 + dy,
        },
        InputEvent::ButtonReleased(bindings.orbit_button),
        InputEvent::KeyReleased(bindings.orbit_modifier),
    ];
    if scroll != 0.0 {
        events.push(InputEvent::Scrolled(scroll));
    }

    for event in &events {
        let delta = input.apply(event);
        controller.handle_event(&input, event, delta);
        tracing::debug!(?event, "replayed");
    }

    if let Some(seconds) = spin {
        input.apply(&InputEvent::KeyPressed(bindings.spin));
        controller.update(&input, Duration::from_secs_f64(seconds.max(0.0)));
    } else {
        controller.update(&input, Duration::ZERO);
    }
    controller
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let scene = Scene::chair();
            println!("chairview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "scene: {} meshes, {} parts, {} draw entries",
                scene.meshes().len(),
                scene.batches().len(),
                scene.entry_count()
            );
            for batch in scene.batches() {
                println!(
                    "  {:<16} x{} ({})",
                    batch.part.name(),
                    batch.transforms.len(),
                    batch.texture.file_name()
                );
            }
            let b = CameraController::default().bindings();
            println!(
                "controls: {:?}+{:?} drag orbit, {:?} reset, {:?} spin",
                b.orbit_modifier, b.orbit_button, b.reset, b.spin
            );
        }
        Commands::Scene { json } => {
            let scene = Scene::chair();
            let controller = CameraController::default();
            let camera = controller.camera();
            let mut composer = SceneComposer::new();
            let frame = composer.compose(
                &scene,
                camera.frame_matrices(VIEWPORT.0, VIEWPORT.1),
                ShadingParams::seen_from(camera.position()),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(frame)?);
            } else {
                print!("{}", DebugTextRenderer::new().render(frame));
            }
        }
        Commands::Camera {
            dx,
            dy,
            scroll,
            spin,
            json,
        } => {
            let controller = replay(dx, dy, scroll, spin);
            let report = CameraReport::of(&controller);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let [px, py, pz] = report.position;
                let [tx, ty, tz] = report.target;
                println!("mode:     {}", report.mode);
                println!("position: ({px:.3}, {py:.3}, {pz:.3})");
                println!("target:   ({tx:.3}, {ty:.3}, {tz:.3})");
                println!(
                    "yaw: {:.2}°  pitch: {:.2}°  fov: {:.2}°",
                    report.yaw_degrees, report.pitch_degrees, report.fov_degrees
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_drag_turns_yaw_by_pixels() {
        let controller = replay(100.0, 0.0, 0.0, None);
        let report = CameraReport::of(&controller);
        assert!((report.yaw_degrees - 100.0).abs() < 1e-3);
        assert!(report.pitch_degrees.abs() < 1e-4);
        assert_eq!(report.mode, "free");
    }

    #[test]
    fn scroll_after_drag_narrows_fov() {
        let controller = replay(0.0, 0.0, 10.0, None);
        assert!((controller.camera().fov() - 44.9).abs() < 1e-4);
    }

    #[test]
    fn spin_reports_spinning_mode() {
        let controller = replay(0.0, 0.0, 0.0, Some(0.0));
        let report = CameraReport::of(&controller);
        assert_eq!(report.mode, "spinning");
        // At t = 0 the spin circle starts on +Z of the centre.
        assert!((report.position[2] - 3.5).abs() < 1e-4);
    }
}
