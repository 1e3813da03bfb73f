/// Size of the drawable the background renders into.
///
/// Width and height are logical (CSS) pixels; the backing store is scaled by
/// the device pixel ratio, capped so high-density screens do not multiply the
/// fragment cost without bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSurface {
    width: u32,
    height: u32,
    pixel_ratio: f64,
    max_pixel_ratio: f64,
}

impl RenderSurface {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        let max_pixel_ratio = if max_pixel_ratio.is_finite() && max_pixel_ratio >= 1.0 {
            max_pixel_ratio
        } else {
            1.0
        };
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio: cap_ratio(device_pixel_ratio, max_pixel_ratio),
            max_pixel_ratio,
        }
    }

    /// Applies a viewport change in place. Zero-area sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        self.pixel_ratio = cap_ratio(device_pixel_ratio, self.max_pixel_ratio);
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Device pixel ratio after the cap.
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Backing store size in device pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            scale(self.width, self.pixel_ratio),
            scale(self.height, self.pixel_ratio),
        )
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

fn cap_ratio(ratio: f64, max: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio.min(max)
    } else {
        1.0
    }
}

fn scale(length: u32, ratio: f64) -> u32 {
    ((length as f64 * ratio).round() as u32).max(1)
}
