mod config;
mod display;
mod error;
mod globe;
mod loader;
mod math3d;
mod noise;
mod texture;
mod util;

use clap::Parser;
use display::{
    supersampled_size, Display, InputEvent, MouseButtonKind, PixelBuffer, RenderTarget,
};
use globe::{render, ArcballController, CameraState, CameraTransform, SceneUniforms};
use loader::{TextureLoader, TextureSet};
use math3d::Vec2;
use sdl2::keyboard::Keycode;
use util::FrameClock;

use crate::config::{Args, GlobeConfig};
use crate::error::Result;

/// Frames between FPS log lines and title refreshes
const FPS_REPORT_INTERVAL: u64 = 60;

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        tracing::error!(error = %e, "globe exited with an error");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    if !args.config.exists() {
        match GlobeConfig::default().save(&args.config) {
            Ok(()) => tracing::info!(path = %args.config.display(), "wrote default config"),
            Err(e) => tracing::warn!(error = %e, "could not write default config"),
        }
    }
    let config = GlobeConfig::load_or_default(&args.config)?
        .merge(&args)
        .validate();

    let (mut display, texture_creator) =
        Display::with_options("globe", config.width, config.height, config.vsync)?;
    let (render_w, render_h) = supersampled_size(config.width, config.height, config.quality);
    let mut target = RenderTarget::with_size(&texture_creator, render_w, render_h)?;
    let mut buffer = PixelBuffer::with_size(render_w, render_h);

    tracing::info!(
        window = %format!("{}x{}", config.width, config.height),
        render = %format!("{}x{}", render_w, render_h),
        quality = config.quality,
        vsync = config.vsync,
        octaves = config.cloud_octaves,
        "starting globe"
    );

    let mut textures = TextureSet::new();
    let mut loader = TextureLoader::spawn(config.texture_requests());

    let camera = CameraState::new(config.initial_orientation(), config.initial_radius);
    let mut controller = ArcballController::new(camera, display.width(), display.height());
    let mut clock = FrameClock::new(60);

    'main: loop {
        let (_dt, _current_fps, avg_fps) = clock.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit
                | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::MouseDown {
                    x,
                    y,
                    button: MouseButtonKind::Left,
                } => controller.begin_drag(Vec2::new(x as f32, y as f32)),
                InputEvent::MouseMove { x, y } => {
                    controller.update_drag(Vec2::new(x as f32, y as f32));
                },
                InputEvent::MouseUp {
                    button: MouseButtonKind::Left,
                }
                | InputEvent::FocusLost => controller.end_drag(),
                // Scrolling towards the user zooms out
                InputEvent::Wheel(y) => controller.apply_zoom_delta(-(y as f32)),
                InputEvent::Resized { width, height } => {
                    controller.set_viewport(width, height);
                    tracing::debug!(width, height, "window resized");
                },
                _ => {},
            }
        }

        if !loader.is_finished() {
            loader.apply(&mut textures);
        }

        let state = controller.tick();
        let transform = CameraTransform::from_state(&state);
        let uniforms = SceneUniforms {
            time_ms: clock.elapsed_ms(),
            aspect_ratio: render_w as f32 / render_h as f32,
            cloud_octaves: config.cloud_octaves,
        };
        render(&mut buffer, &transform, &uniforms, &textures);

        display.present(&mut target, &buffer)?;

        if clock.frame_count() % FPS_REPORT_INTERVAL == 0 {
            tracing::debug!(
                fps = avg_fps,
                frame_ms = clock.avg_frame_time_ms(),
                radius = state.radius_current,
                radius_target = controller.camera().radius_target,
                "frame stats"
            );
            display.set_title(&format!("globe - {:.0} fps", avg_fps))?;
        }
    }

    tracing::info!(frames = clock.frame_count(), "shutting down");
    Ok(())
}
