use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::Context;
use clap::Parser;
use hue_locator::config::LocatorConfig;
use hue_locator::pipeline::{FrameReport, LocatorPipeline};
use image::RgbImage;
use log::{error, info, warn};
use opencv::{
    core::{Mat, Rect, Scalar},
    highgui, imgproc,
    prelude::*,
    videoio::VideoCapture,
};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod source;

use source::{CameraSource, JETSON_CSI_PIPELINE};

const WINDOW_NAME: &str = "result";
const RECT_THICKNESS: i32 = 2;

#[derive(Parser)]
#[command(author, version, about = "Reports the largest target-colored region relative to the optical axis")]
struct Args {
    /// Load locator settings from a TOML file
    #[arg(long)]
    config: Option<PathBuf>,
    /// GStreamer pipeline description (defaults to the Jetson CSI camera)
    #[arg(long, conflicts_with_all = ["device", "file"])]
    pipeline: Option<String>,
    /// Capture device index instead of GStreamer
    #[arg(long, conflicts_with = "file")]
    device: Option<i32>,
    /// Read frames from a video file instead of a camera
    #[arg(long)]
    file: Option<PathBuf>,
    /// Optical-axis offset in pixels, overrides the config file
    #[arg(long, allow_hyphen_values = true)]
    offset_x: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    offset_y: Option<f64>,
    /// Do not open a display window
    #[arg(long, default_value_t = false)]
    headless: bool,
}

impl Args {
    fn camera_source(&self) -> CameraSource {
        if let Some(path) = &self.file {
            CameraSource::File(path.clone())
        } else if let Some(index) = self.device {
            CameraSource::Device(index)
        } else {
            CameraSource::Gstreamer(
                self.pipeline
                    .clone()
                    .unwrap_or_else(|| JETSON_CSI_PIPELINE.to_string()),
            )
        }
    }

    fn locator_config(&self) -> anyhow::Result<LocatorConfig> {
        let mut config = match &self.config {
            Some(path) => LocatorConfig::load(path)?,
            None => LocatorConfig::default(),
        };
        if let Some(offset_x) = self.offset_x {
            config.offset_x = offset_x;
        }
        if let Some(offset_y) = self.offset_y {
            config.offset_y = offset_y;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    // --- 1. Locator Setup ---
    let config = args.locator_config()?;
    info!("Locator config: {:?}", config);
    let mut pipeline = LocatorPipeline::new(config)?;

    // --- 2. Camera Setup ---
    let mut capture = args.camera_source().open()?;

    // --- 3. Interrupt Listener ---
    let stop = Arc::new(AtomicBool::new(false));
    spawn_interrupt_listener(Arc::clone(&stop))?;

    // --- 4. Main Loop ---
    let outcome = run(&mut capture, &mut pipeline, &stop, args.headless);

    // --- 5. Shutdown ---
    info!("Shutting down");
    capture.release().context("releasing capture")?;
    if !args.headless {
        highgui::destroy_all_windows().context("closing display windows")?;
    }
    outcome
}

/// Reads, locates, draws and prints until interrupted or a key is pressed.
fn run(
    capture: &mut VideoCapture,
    pipeline: &mut LocatorPipeline,
    stop: &AtomicBool,
    headless: bool,
) -> anyhow::Result<()> {
    let mut frame = Mat::default();

    while !stop.load(Ordering::Relaxed) {
        match capture.read(&mut frame) {
            Ok(true) if !frame.empty() => {}
            Ok(true) => {
                warn!("Empty frame, skipping");
                continue;
            }
            Ok(false) => {
                warn!("No frame available, stopping");
                break;
            }
            Err(e) => {
                error!("Error reading frame: {:?}", e);
                break;
            }
        }

        let rgb_frame = mat_to_rgb(&frame)?;
        let report = pipeline.process_frame(&rgb_frame)?;
        println!("{}", report);

        if !headless {
            show(&mut frame, pipeline.config(), &report)?;
            if highgui::wait_key(1)? >= 0 {
                info!("Key pressed, stopping");
                break;
            }
        }
    }
    Ok(())
}

/// Converts an OpenCV BGR frame into an `image` RGB buffer.
fn mat_to_rgb(frame: &Mat) -> anyhow::Result<RgbImage> {
    let mut rgb = Mat::default();
    imgproc::cvt_color(frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;
    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let bytes: Vec<u8> = rgb.data_bytes()?.to_vec();
    RgbImage::from_raw(width, height, bytes).context("frame buffer does not match its size")
}

/// Draws the largest region on the cropped view and shows it.
fn show(frame: &mut Mat, config: &LocatorConfig, report: &FrameReport) -> anyhow::Result<()> {
    let size = frame.size()?;
    let Some((x, y, width, height)) = config
        .crop
        .clamp_to(size.width as u32, size.height as u32)
    else {
        return Ok(());
    };

    let mut view = Mat::roi_mut(frame, Rect::new(x as i32, y as i32, width as i32, height as i32))?;
    if let Some(rect) = report.annotation() {
        let color = Scalar::new(0.0, 0.0, 255.0, 0.0); // Red
        let rect = Rect::new(rect.x, rect.y, rect.width, rect.height);
        imgproc::rectangle(&mut view, rect, color, RECT_THICKNESS, imgproc::LINE_8, 0)?;
    }
    highgui::imshow(WINDOW_NAME, &view)?;
    Ok(())
}

/// Flips `stop` on Ctrl+C so the main loop can release the camera cleanly.
fn spawn_interrupt_listener(stop: Arc<AtomicBool>) -> anyhow::Result<()> {
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for signal handling")?;
    thread::spawn(move || {
        runtime.block_on(async {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received");
                    stop.store(true, Ordering::Relaxed);
                }
                Err(e) => error!("Failed to listen for Ctrl+C: {}", e),
            }
        });
    });
    Ok(())
}
