// Headless frame driver for Lumen.
// Run with: cargo run --release -- [scene.json] [--frames N] [--output frame.png]
//                                   [--camera-step x,y,z] [--resolution-step N]

use anyhow::{bail, Context, Result};
use lumen_core::SceneConfig;
use lumen_math::DVec3;
use lumen_renderer::{FrameInput, RenderContext};
use std::env;
use std::path::{Path, PathBuf};

/// Rotation applied to the animated object each frame, in radians.
const SPIN_PER_FRAME: f64 = 0.1;

const USAGE: &str =
    "Usage: lumen [scene.json] [--frames N] [--output PATH] [--camera-step X,Y,Z] [--resolution-step N]";

/// Command line options.
#[derive(Debug, Clone, PartialEq)]
struct Args {
    scene: Option<PathBuf>,
    frames: u32,
    output: PathBuf,
    camera_step: DVec3,
    resolution_step: i32,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            scene: None,
            frames: 1,
            output: PathBuf::from("frame.png"),
            camera_step: DVec3::ZERO,
            resolution_step: 0,
        }
    }
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| iter.next().with_context(|| format!("{} needs a value\n{}", flag, USAGE));

        match arg.as_str() {
            "--frames" => {
                let text = value("--frames")?;
                parsed.frames = text.parse().with_context(|| format!("invalid frame count '{}'", text))?;
            }
            "--output" => parsed.output = PathBuf::from(value("--output")?),
            "--camera-step" => parsed.camera_step = parse_vec3(value("--camera-step")?)?,
            "--resolution-step" => {
                let text = value("--resolution-step")?;
                parsed.resolution_step = text
                    .parse()
                    .with_context(|| format!("invalid resolution step '{}'", text))?;
            }
            flag if flag.starts_with("--") => bail!("unknown option '{}'\n{}", flag, USAGE),
            path => {
                if parsed.scene.is_some() {
                    bail!("more than one scene given\n{}", USAGE);
                }
                parsed.scene = Some(PathBuf::from(path));
            }
        }
    }

    Ok(parsed)
}

fn parse_vec3(text: &str) -> Result<DVec3> {
    let parts = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid vector '{}'", text))?;

    match parts.as_slice() {
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        _ => bail!("expected three comma-separated numbers, got '{}'", text),
    }
}

/// Scripted input for frame `index`: the camera steps every frame, the
/// resolution changes once up front.
fn scripted_input(args: &Args, index: u32) -> FrameInput {
    FrameInput {
        camera_delta: if index > 0 { args.camera_step } else { DVec3::ZERO },
        resolution_delta: if index == 0 { args.resolution_step } else { 0 },
        quit: index + 1 >= args.frames,
    }
}

fn load_config(scene: Option<&Path>) -> Result<(SceneConfig, PathBuf)> {
    match scene {
        Some(path) => {
            let config = SceneConfig::load(path).with_context(|| format!("failed to load scene {}", path.display()))?;
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            Ok((config, base_dir))
        }
        None => {
            log::info!("No scene given, using the built-in demo room");
            Ok((SceneConfig::demo(), PathBuf::from(".")))
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }
    let args = parse_args(&raw)?;

    log::info!("Starting Lumen");

    let (config, base_dir) = load_config(args.scene.as_deref())?;
    let mut context = RenderContext::from_config(&config, &base_dir).context("failed to set up renderer")?;

    let mut frame = 0;
    loop {
        context.animate(SPIN_PER_FRAME);

        let input = scripted_input(&args, frame);
        context.apply_input(&input);

        let stats = context.render_frame();
        log::info!(
            "Frame {}: {:.2} fps ({:.1} ms), resolution {} ({}), {} rays",
            frame,
            stats.fps,
            stats.frame_time.as_secs_f64() * 1000.0,
            stats.resolution,
            stats.factor_label(),
            stats.rays
        );

        frame += 1;
        if input.quit {
            break;
        }
    }

    context
        .buffer()
        .save_png(&args.output)
        .with_context(|| format!("failed to save {}", args.output.display()))?;

    Ok(())
}
