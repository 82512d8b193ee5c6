//! multisource_probe - configure one camera adapter and report what it does.
//!
//! Prints the request URI the adapter derives for the given settings. With
//! `--frames N` it also starts the frame source and pulls N frames.

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

use multisource::config::SourcesConfig;
use multisource::{
    DeviceAdapter, DeviceConfiguration, DeviceFamily, SourceFactory, StreamMode,
    StubSourceFactory,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Derive camera request URIs and optionally pull frames"
)]
struct Args {
    /// Camera config file (JSON, or TOML by extension).
    #[arg(long, env = "MULTISOURCE_CONFIG")]
    config: Option<PathBuf>,

    /// Camera name from the config file.
    #[arg(long, env = "MULTISOURCE_CAMERA")]
    camera: Option<String>,

    /// Device family (axis, pixord, dlink) when no config file is used.
    #[arg(long)]
    family: Option<String>,

    /// Camera address, host[:port].
    #[arg(long)]
    source: Option<String>,

    /// Stream mode: jpeg or mjpeg.
    #[arg(long)]
    mode: Option<StreamMode>,

    /// Milliseconds between frames (0 = camera default).
    #[arg(long, allow_hyphen_values = true)]
    frame_interval: Option<i64>,

    #[arg(long)]
    login: Option<String>,

    #[arg(long)]
    password: Option<String>,

    #[arg(long)]
    resolution: Option<String>,

    /// Frames to pull after configuring (0 = only print the URI).
    #[arg(long, default_value = "0")]
    frames: u32,

    /// Use the synthetic source instead of HTTP.
    #[arg(long)]
    stub: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (family, mut device) = resolve_camera(&args)?;
    apply_overrides(&args, &mut device);

    let mut adapter = DeviceAdapter::from_configuration(family, source_factory(args.stub), &device)?;
    log::info!(
        "{} camera {} in {} mode",
        adapter.family(),
        adapter.endpoint().unwrap_or("<none>"),
        adapter.mode()
    );
    println!("{}", adapter.uri());

    if args.frames == 0 {
        return Ok(());
    }

    let source = adapter.frame_source_mut();
    source.start()?;
    for _ in 0..args.frames {
        let frame = source.next_frame()?;
        log::info!("frame {}: {} bytes", frame.sequence, frame.data.len());
    }
    source.stop();
    Ok(())
}

fn resolve_camera(args: &Args) -> Result<(DeviceFamily, DeviceConfiguration)> {
    if let Some(path) = &args.config {
        let cfg = SourcesConfig::from_path(path)?;
        let camera = match &args.camera {
            Some(name) => cfg
                .camera(name)
                .ok_or_else(|| anyhow!("camera '{}' is not defined in {}", name, path.display()))?,
            None => cfg.selected_camera()?,
        };
        return Ok((camera.family, camera.device.clone()));
    }

    let family = args.family.as_deref().ok_or_else(|| {
        anyhow!(
            "--family is required without --config (one of: {})",
            DeviceFamily::ALL
                .iter()
                .map(|family| family.name())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;
    let family: DeviceFamily = family.parse()?;
    let source = args
        .source
        .as_deref()
        .ok_or_else(|| anyhow!("--source is required without --config"))?;
    Ok((family, DeviceConfiguration::new(source)))
}

fn apply_overrides(args: &Args, device: &mut DeviceConfiguration) {
    if let Some(source) = &args.source {
        device.source = source.clone();
    }
    if let Some(mode) = args.mode {
        device.stream_mode = mode;
    }
    if let Some(interval) = args.frame_interval {
        device.frame_interval = interval;
    }
    if let Some(login) = &args.login {
        device.login = Some(login.clone());
    }
    if let Some(password) = &args.password {
        device.password = Some(password.clone());
    }
    if let Some(resolution) = &args.resolution {
        device.resolution = Some(resolution.clone());
    }
}

fn source_factory(stub: bool) -> Box<dyn SourceFactory> {
    if stub {
        return Box::new(StubSourceFactory::new());
    }
    #[cfg(feature = "http-sources")]
    {
        Box::new(multisource::HttpSourceFactory::default())
    }
    #[cfg(not(feature = "http-sources"))]
    {
        log::warn!("built without http-sources; using the synthetic source");
        Box::new(StubSourceFactory::new())
    }
}
