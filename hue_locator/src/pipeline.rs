// THEORY:
// The `pipeline` module is the top-level API of the locator. It wires the stages
// together in a fixed order for every frame:
//
// 1.  **Crop**: cut the configured sensor window out of the raw frame.
// 2.  **HSV**: convert the window to full-range HSV.
// 3.  **Locate**: mask, extract regions and pick the largest one (`ColorTarget`).
// 4.  **Recenter**: express the accepted rectangle relative to the optical axis.
// 5.  **Stamp**: measure the time since the previous frame for the report line.
//
// The only thing carried from one frame to the next is the previous timestamp. There
// is no tracking, smoothing or multi-object bookkeeping.

use std::fmt;
use std::time::{Duration, Instant};

use image::RgbImage;
use image::imageops;
use log::debug;

use crate::config::LocatorConfig;
use crate::core_modules::bounding_rect::BoundingRect;
use crate::core_modules::color_target::{ColorTarget, Detection};
use crate::core_modules::hsv_pixel::hsv_pixel;
use crate::core_modules::optical_frame::{OpticalFrame, TargetPosition};
use crate::error::{LocatorError, LocatorResult};

/// Remembers when the last frame was stamped.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    previous: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the previous tick. The first tick measures nothing and returns zero.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let elapsed = self
            .previous
            .map(|previous| now.saturating_duration_since(previous))
            .unwrap_or(Duration::ZERO);
        self.previous = Some(now);
        elapsed
    }

    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }
}

/// Everything the locator has to say about one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub elapsed: Duration,
    pub detection: Detection,
    /// The accepted target in axis-centered coordinates.
    pub position: Option<TargetPosition>,
}

impl FrameReport {
    /// Frames per second implied by `elapsed`; `None` before two frames were seen.
    pub fn frame_rate(&self) -> Option<f64> {
        let seconds = self.elapsed.as_secs_f64();
        (seconds > 0.0).then(|| 1.0 / seconds)
    }

    /// The rectangle to draw on the cropped frame, in crop coordinates.
    pub fn annotation(&self) -> Option<BoundingRect> {
        self.detection.largest
    }
}

impl fmt::Display for FrameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} ", self.elapsed.as_secs_f64())?;
        match self.frame_rate() {
            Some(rate) => write!(f, "{:.3} ", rate)?,
            None => write!(f, "- ")?,
        }
        match self.position {
            Some(position) => write!(
                f,
                "[{}, {}, {}, {}]",
                position.x, position.y, position.width, position.height
            ),
            None => write!(f, "[]"),
        }
    }
}

/// The main struct of the locator: config in, one `FrameReport` per frame out.
pub struct LocatorPipeline {
    config: LocatorConfig,
    target: ColorTarget,
    optical_frame: OpticalFrame,
    clock: FrameClock,
}

impl LocatorPipeline {
    pub fn new(config: LocatorConfig) -> LocatorResult<Self> {
        config.validate()?;
        Ok(Self {
            target: config.target.to_target(),
            optical_frame: config.optical_frame(),
            clock: FrameClock::new(),
            config,
        })
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn target(&self) -> &ColorTarget {
        &self.target
    }

    /// Cuts the configured window out of a full frame.
    pub fn crop(&self, frame: &RgbImage) -> LocatorResult<RgbImage> {
        let (x, y, width, height) = self
            .config
            .crop
            .clamp_to(frame.width(), frame.height())
            .ok_or_else(|| LocatorError::EmptyCrop {
                window: self.config.crop.to_string(),
                width: frame.width(),
                height: frame.height(),
            })?;
        Ok(imageops::crop_imm(frame, x, y, width, height).to_image())
    }

    /// Runs every stage on a full frame and stamps the result with the frame time.
    pub fn process_frame(&mut self, frame: &RgbImage) -> LocatorResult<FrameReport> {
        let now = Instant::now();
        let mut report = self.analyze(frame)?;
        report.elapsed = self.clock.tick_at(now);
        Ok(report)
    }

    /// Runs every stage without touching the frame clock.
    pub fn analyze(&self, frame: &RgbImage) -> LocatorResult<FrameReport> {
        let window = self.crop(frame)?;
        let hsv = hsv_pixel::to_hsv(&window);
        let detection = self.target.locate(&hsv);
        let position = detection
            .accepted()
            .map(|rect| self.optical_frame.to_position(&rect));

        if detection.largest.is_some() && position.is_none() {
            debug!(
                "{}: largest region {:?} is below min area {}",
                self.target.name, detection.largest, self.target.min_area
            );
        }

        Ok(FrameReport {
            elapsed: Duration::ZERO,
            detection,
            position,
        })
    }
}
