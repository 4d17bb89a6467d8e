//! Colour scales shared by the interactive and static renderers.

/// Neutral grey for undefined values.
pub const MISSING_RGB: [u8; 3] = [160, 160, 160];

/// Highlight for the selected country.
pub const HIGHLIGHT_RGB: [u8; 3] = [220, 30, 40];

/// Line / bar colour for single-series charts.
pub const SERIES_RGB: [u8; 3] = [52, 152, 219];

/// Bar colour of the top-10 chart.
pub const BAR_RGB: [u8; 3] = [46, 160, 67];

const PLASMA: [[u8; 3]; 8] = [
    [13, 8, 135],
    [84, 2, 163],
    [139, 10, 165],
    [185, 50, 137],
    [219, 92, 104],
    [244, 136, 73],
    [254, 188, 43],
    [240, 249, 33],
];

const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

/// Sequential colour scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScale {
    Plasma,
    Viridis,
}

impl ColorScale {
    fn anchors(self) -> &'static [[u8; 3]] {
        match self {
            ColorScale::Plasma => &PLASMA,
            ColorScale::Viridis => &VIRIDIS,
        }
    }

    /// Colour at position `t`, clamped to [0, 1]. `NaN` maps to grey.
    pub fn sample(self, t: f64) -> [u8; 3] {
        if t.is_nan() {
            return MISSING_RGB;
        }
        let anchors = self.anchors();
        let t = t.clamp(0.0, 1.0);
        let pos = t * (anchors.len() - 1) as f64;
        let lower = pos.floor() as usize;
        let upper = (lower + 1).min(anchors.len() - 1);
        let frac = pos - lower as f64;

        let mut rgb = [0u8; 3];
        for (c, out) in rgb.iter_mut().enumerate() {
            let a = anchors[lower][c] as f64;
            let b = anchors[upper][c] as f64;
            *out = (a + (b - a) * frac).round() as u8;
        }
        rgb
    }

    /// Colour for `value` on the range `[min, max]`.
    pub fn sample_range(self, value: f64, min: f64, max: f64) -> [u8; 3] {
        self.sample(normalize(value, min, max))
    }
}

/// Position of `value` within `[min, max]`; a degenerate range maps to the middle.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return f64::NAN;
    }
    let span = max - min;
    if span <= 0.0 || !span.is_finite() {
        return 0.5;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Black or white, whichever reads better on `rgb`.
pub fn contrast_text(rgb: [u8; 3]) -> [u8; 3] {
    let luma = 0.299 * rgb[0] as f64 + 0.587 * rgb[1] as f64 + 0.114 * rgb[2] as f64;
    if luma > 140.0 {
        [0, 0, 0]
    } else {
        [255, 255, 255]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints_and_clamping() {
        assert_eq!(ColorScale::Viridis.sample(0.0), VIRIDIS[0]);
        assert_eq!(ColorScale::Viridis.sample(1.0), VIRIDIS[8]);
        assert_eq!(ColorScale::Viridis.sample(-3.0), VIRIDIS[0]);
        assert_eq!(ColorScale::Viridis.sample(7.0), VIRIDIS[8]);
        assert_eq!(ColorScale::Plasma.sample(0.0), PLASMA[0]);
        assert_eq!(ColorScale::Plasma.sample(1.0), PLASMA[7]);
        assert_eq!(ColorScale::Plasma.sample(f64::NAN), MISSING_RGB);
    }

    #[test]
    fn test_scale_interpolates_between_anchors() {
        // Halfway between the first two Viridis anchors.
        let mid = ColorScale::Viridis.sample(0.0625);
        assert_eq!(mid, [70, 23, 103]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(12.0, 0.0, 10.0), 1.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
        assert!(normalize(f64::NAN, 0.0, 1.0).is_nan());
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(contrast_text([250, 250, 30]), [0, 0, 0]);
        assert_eq!(contrast_text([13, 8, 135]), [255, 255, 255]);
    }
}
