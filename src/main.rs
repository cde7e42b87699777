//! fbwm
//!
//! Headless driver: brings up an in-memory framebuffer, opens a couple of
//! demo windows, replays an input script and optionally saves a screenshot.

mod demo;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fbwm::input::{InputSource, NoInput};
use fbwm::surface::color::rgb;
use fbwm::{Config, Desktop, FramebufferInfo, MemoryFramebuffer, ScriptedInput, WindowFlags};

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    frames: Option<u64>,
    screenshot: Option<PathBuf>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Args::default();
        let mut iter = std::env::args().skip(1);
        while let Some(arg) = iter.next() {
            let mut value = || {
                iter.next()
                    .with_context(|| format!("Missing value for {}", arg))
            };
            match arg.as_str() {
                "--config" | "-c" => args.config = Some(PathBuf::from(value()?)),
                "--script" | "-s" => args.script = Some(PathBuf::from(value()?)),
                "--frames" | "-n" => {
                    let n = value()?;
                    args.frames = Some(n.parse().with_context(|| format!("Invalid frame count {:?}", n))?);
                }
                "--screenshot" | "-o" => args.screenshot = Some(PathBuf::from(value()?)),
                other => bail!("Unknown argument {:?}", other),
            }
        }
        Ok(args)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "fbwm=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting fbwm");

    let args = Args::parse()?;
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let script = args.script.clone().or_else(|| config.input.script.clone());
    let input: Box<dyn InputSource> = match script {
        Some(path) => Box::new(ScriptedInput::load(&path, config.input.events_per_poll)?),
        None => Box::new(NoInput),
    };

    let display = config.display;
    let info = FramebufferInfo::xrgb(display.width, display.height, display.bits_per_pixel);
    let fb = MemoryFramebuffer::new(info).context("Failed to allocate framebuffer")?;
    let mut desktop = Desktop::new(&config, fb, input).context("Failed to start desktop")?;

    let wm = desktop.wm_mut();
    let gradient = wm.create("Gradient", 60, 60, 360, 260, WindowFlags::normal())?;
    wm.attach(gradient, Box::new(demo::Gradient::new(rgb(94, 129, 172), rgb(163, 190, 140))));
    let pad = wm.create("Scratchpad", 300, 200, 420, 300, WindowFlags::normal())?;
    wm.attach(pad, Box::new(demo::Scratchpad::new()));

    let frames = desktop.run(args.frames);
    info!(
        "Ran {} frames, {} windows open",
        frames,
        desktop.wm().window_count()
    );

    if let Some(path) = &args.screenshot {
        desktop.device().write_ppm(path)?;
    }

    Ok(())
}
