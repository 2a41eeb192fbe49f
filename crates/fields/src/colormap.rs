//! Piecewise-linear colormaps for single-channel LIC images.

/// One channel as `(t, value)` breakpoints, `t` ascending from 0 to 1.
type Channel = &'static [(f64, f64)];

const GRAY: [Channel; 3] = [
    &[(0.0, 0.0), (1.0, 1.0)],
    &[(0.0, 0.0), (1.0, 1.0)],
    &[(0.0, 0.0), (1.0, 1.0)],
];

// Gray with a blue tint in the shadows.
const BONE: [Channel; 3] = [
    &[(0.0, 0.0), (0.746032, 0.652778), (1.0, 1.0)],
    &[(0.0, 0.0), (0.365079, 0.319444), (0.746032, 0.777778), (1.0, 1.0)],
    &[(0.0, 0.0), (0.365079, 0.444444), (1.0, 1.0)],
];

const NAMES: &[&str] = &["gray", "bone"];

/// A named map from `t` in [0, 1] to an sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Gray,
    Bone,
}

impl Colormap {
    /// Looks a colormap up by name; `None` if unrecognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "gray" | "grey" => Some(Colormap::Gray),
            "bone" => Some(Colormap::Bone),
            _ => None,
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        NAMES
    }

    /// RGB bytes at `t`. `t` is clamped to [0, 1]; NaN maps to 0.
    pub fn sample(self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let channels = match self {
            Colormap::Gray => GRAY,
            Colormap::Bone => BONE,
        };
        channels.map(|channel| (interpolate(channel, t) * 255.0).round() as u8)
    }
}

fn interpolate(channel: Channel, t: f64) -> f64 {
    for pair in channel.windows(2) {
        let ((t0, v0), (t1, v1)) = (pair[0], pair[1]);
        if t <= t1 {
            return v0 + (v1 - v0) * (t - t0) / (t1 - t0);
        }
    }
    channel.last().map_or(0.0, |&(_, v)| v)
}
