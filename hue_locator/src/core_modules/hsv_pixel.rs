// THEORY (HSV Pixel):
// The `HsvPixel` module is the first stage of the color pipeline. It converts an
// 8-bit RGB pixel into an 8-bit HSV triple, using the "full range" hue encoding:
// the hue circle [0, 360) degrees is stretched over the whole byte [0, 255] instead
// of being halved into [0, 180). That gives the color ranges one extra bit of hue
// resolution, and it is the encoding every `HsvRange` in this crate is written in.
//
// Encoding (all single-pixel, no neighbors):
// - value:      max(R, G, B)
// - saturation: 255 * (max - min) / max, or 0 for black
// - hue:        sector-based angle in degrees, scaled by 256/360, rounded and wrapped
//
// A whole frame is converted with `to_hsv`, which keeps the `image` buffer layout
// and simply reinterprets the three channels as H, S and V.

pub mod hsv_pixel {
    use image::{ImageBuffer, Rgb, RgbImage};

    pub type Channel = u8;
    pub type Hue = Channel;
    pub type Saturation = Channel;
    pub type Value = Channel;
    pub type HueDegrees = f32;

    /// An RGB-sized image whose three channels hold hue, saturation and value.
    pub type HsvImage = ImageBuffer<Rgb<Channel>, Vec<Channel>>;

    const HUE_STEPS: f32 = 256.0;
    const DEGREES: f32 = 360.0;

    /// A single pixel in full-range 8-bit HSV.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HsvPixel {
        pub hue: Hue,
        pub saturation: Saturation,
        pub value: Value,
    }

    impl HsvPixel {
        pub fn new(hue: Hue, saturation: Saturation, value: Value) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }

        pub fn from_rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            let maximum_channel = red.max(green.max(blue));
            let minimum_channel = red.min(green.min(blue));
            let chroma = maximum_channel - minimum_channel;

            let saturation = if maximum_channel == 0 {
                0
            } else {
                (255.0 * chroma as f32 / maximum_channel as f32).round() as Saturation
            };

            let hue_steps = (Self::hue_degrees(red, green, blue) * HUE_STEPS / DEGREES).round();
            let hue = (hue_steps as u32 % HUE_STEPS as u32) as Hue;

            Self {
                hue,
                saturation,
                value: maximum_channel,
            }
        }

        /// Hue angle on the color wheel in degrees [0, 360). Gray pixels have hue 0.
        pub fn hue_degrees(red: Channel, green: Channel, blue: Channel) -> HueDegrees {
            let red = red as f32;
            let green = green as f32;
            let blue = blue as f32;
            let maximum_channel = red.max(green.max(blue));
            let minimum_channel = red.min(green.min(blue));
            let chroma = maximum_channel - minimum_channel;

            if chroma == 0.0 {
                return 0.0;
            }

            let (base_difference, sector_offset) = if maximum_channel == red {
                (green - blue, 0.0)
            } else if maximum_channel == green {
                (blue - red, 2.0)
            } else {
                (red - green, 4.0)
            };

            let mut hue_degrees = (base_difference / chroma + sector_offset) * 60.0;
            if hue_degrees < 0.0 {
                hue_degrees += DEGREES;
            }
            hue_degrees
        }
    }

    impl From<Rgb<Channel>> for HsvPixel {
        fn from(pixel: Rgb<Channel>) -> Self {
            let [red, green, blue] = pixel.0;
            HsvPixel::from_rgb(red, green, blue)
        }
    }

    impl From<&Rgb<Channel>> for HsvPixel {
        fn from(pixel: &Rgb<Channel>) -> Self {
            HsvPixel::from(*pixel)
        }
    }

    impl From<HsvPixel> for Rgb<Channel> {
        fn from(pixel: HsvPixel) -> Self {
            Rgb([pixel.hue, pixel.saturation, pixel.value])
        }
    }

    /// Converts a whole RGB frame into full-range HSV.
    pub fn to_hsv(frame: &RgbImage) -> HsvImage {
        let mut hsv = HsvImage::new(frame.width(), frame.height());
        for (source, target) in frame.pixels().zip(hsv.pixels_mut()) {
            *target = HsvPixel::from(source).into();
        }
        hsv
    }
}
