use std::path::PathBuf;

use anyhow::{Context, bail};
use log::info;
use opencv::{
    prelude::*,
    videoio::{self, VideoCapture},
};

/// Jetson CSI camera through GStreamer. `appsink max-buffers=1 drop=True` keeps only
/// the newest frame when processing falls behind the 60 fps sensor.
pub const JETSON_CSI_PIPELINE: &str = "nvarguscamerasrc saturation=1.1 \
    ! video/x-raw(memory:NVMM), width=1280, height=720, format=(string)NV12, framerate=(fraction)60/1 \
    ! nvvidconv ! video/x-raw, width=(int)1280, height=(int)720, format=(string)BGRx \
    ! videobalance \
    ! videoconvert \
    ! appsink max-buffers=1 drop=True";

/// Where frames come from.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraSource {
    /// A GStreamer pipeline description ending in an appsink.
    Gstreamer(String),
    /// A local capture device index.
    Device(i32),
    /// A recorded video file, for bench testing.
    File(PathBuf),
}

impl CameraSource {
    pub fn open(&self) -> anyhow::Result<VideoCapture> {
        let capture = match self {
            CameraSource::Gstreamer(pipeline) => {
                VideoCapture::from_file(pipeline, videoio::CAP_GSTREAMER)
                    .context("opening GStreamer pipeline")?
            }
            CameraSource::Device(index) => VideoCapture::new(*index, videoio::CAP_ANY)
                .with_context(|| format!("opening capture device {index}"))?,
            CameraSource::File(path) => {
                let path_str = path.to_str().context("video path is not valid UTF-8")?;
                VideoCapture::from_file(path_str, videoio::CAP_ANY)
                    .with_context(|| format!("opening video file {}", path.display()))?
            }
        };

        if !capture.is_opened()? {
            bail!("camera source {:?} did not open", self);
        }

        info!(
            "Opened {:?} at {}x{}",
            self,
            capture.get(videoio::CAP_PROP_FRAME_WIDTH)?,
            capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?
        );
        Ok(capture)
    }
}
