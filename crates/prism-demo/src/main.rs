use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use prism_engine::camera::{CameraFrameBridge, CameraSession, PatternConfig, PatternSource};
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::{Scene, SceneRenderer};
use prism_engine::texture::{PixelBuffer, PixelFormat};
use prism_engine::window::{Runtime, RuntimeConfig};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SceneKind {
    Triangle,
    Square,
    Circle,
    Image,
    Camera,
}

/// Renders a shape, an image or a synthetic camera feed.
#[derive(Parser, Debug)]
#[command(name = "prism-demo", version)]
struct Cli {
    /// What to render.
    #[arg(long, value_enum, default_value_t = SceneKind::Triangle)]
    scene: SceneKind,

    /// Image shown by `--scene image`. A generated gradient is used when omitted.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Synthetic camera resolution as WIDTHxHEIGHT.
    #[arg(long, default_value = "640x480", value_parser = parse_size)]
    camera_size: (u32, u32),

    /// Synthetic camera frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Log filter in env_logger syntax. Falls back to RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    let config = RuntimeConfig {
        title: format!("prism · {:?}", cli.scene).to_lowercase(),
        ..Default::default()
    };

    match cli.scene {
        SceneKind::Camera => {
            let (width, height) = cli.camera_size;
            let source = PatternSource::new(PatternConfig {
                width,
                height,
                fps: cli.fps,
                available: true,
            });
            let camera = CameraSession::new(Box::new(source))
                .with_events(|event| log::info!("camera: {event:?}"));

            Runtime::run(config, Some(camera), |link, redraw| {
                let bridge = CameraFrameBridge::new(Box::new(link), Arc::new(redraw));
                SceneRenderer::new(Scene::CameraFeed(bridge))
            })
        }
        SceneKind::Image => {
            let pixels = match &cli.image {
                Some(path) => load_image(path)?,
                None => gradient(256, 256)?,
            };
            log::info!("showing {}x{} image", pixels.width(), pixels.height());
            Runtime::run(config, None, move |_, _| {
                SceneRenderer::new(Scene::Image(pixels))
            })
        }
        shape => {
            let scene = match shape {
                SceneKind::Square => Scene::Square,
                SceneKind::Circle => Scene::circle(),
                _ => Scene::Triangle,
            };
            Runtime::run(config, None, move |_, _| SceneRenderer::new(scene))
        }
    }
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width `{w}`: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height `{h}`: {e}"))?;
    if w == 0 || h == 0 {
        return Err("camera size must be non-zero".into());
    }
    Ok((w, h))
}

fn load_image(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    PixelBuffer::new(width, height, PixelFormat::Rgba8, img.into_raw())
        .with_context(|| format!("unusable image {}", path.display()))
}

/// Red at the top-left corner, blue at the bottom: shows at a glance
/// whether the image is mirrored.
fn gradient(width: u32, height: u32) -> Result<PixelBuffer> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 / (width - 1).max(1) as f32;
            let fy = y as f32 / (height - 1).max(1) as f32;
            data.extend_from_slice(&[
                ((1.0 - fx) * (1.0 - fy) * 255.0) as u8,
                (fx * (1.0 - fy) * 255.0) as u8,
                (fy * 255.0) as u8,
                255,
            ]);
        }
    }
    PixelBuffer::new(width, height, PixelFormat::Rgba8, data).context("empty gradient")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camera_size() {
        assert_eq!(parse_size("640x480"), Ok((640, 480)));
        assert_eq!(parse_size("1280X720"), Ok((1280, 720)));
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x480").is_err());
    }

    #[test]
    fn gradient_starts_red_in_the_top_left() {
        let img = gradient(4, 4).unwrap();
        assert_eq!(img.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(img.pixel(0, 3), Some([0, 0, 255, 255]));
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["prism-demo"]);
        assert_eq!(cli.scene, SceneKind::Triangle);
        assert_eq!(cli.camera_size, (640, 480));
        assert_eq!(cli.fps, 30);
    }
}
