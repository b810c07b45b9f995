// THEORY:
// This file is the entry point for the `hue_locator` library crate. It exposes the
// `LocatorPipeline` and its configuration as the high-level interface, while the
// per-stage building blocks (HSV conversion, range masking, region extraction,
// target selection and optical-axis recentering) live in `core_modules`.
//
// The library never touches a camera or a window. It takes an RGB frame and gives
// back a `FrameReport`, so every stage can be exercised with synthetic images. All
// capture and display glue lives in the `camera_runner` binary.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
