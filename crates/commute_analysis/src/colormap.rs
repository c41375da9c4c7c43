use plotters::style::RGBColor;

/// Linear min/max scale of the plotted values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Non finite values are ignored, an empty input gives `0..0`.
    pub fn from_values(values: &[f64]) -> Self {
        let mut finite = values.iter().copied().filter(|value| value.is_finite());

        match finite.next() {
            None => Self { min: 0.0, max: 0.0 },
            Some(first) => finite.fold(Self { min: first, max: first }, |range, value| Self {
                min: range.min.min(value),
                max: range.max.max(value),
            }),
        }
    }

    /// Maps the value to `[0, 1]`. A flat range maps everything to the middle.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 0.5;
        }

        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

fn channel(t: f64, start: f64, end: f64) -> u8 {
    let value = ((t - start) / (end - start)).clamp(0.0, 1.0);
    (value * 255.0).round() as u8
}

/// Black, red, yellow, white.
pub fn hot(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);

    RGBColor(
        channel(t, 0.0, 0.365),
        channel(t, 0.365, 0.746),
        channel(t, 0.746, 1.0),
    )
}

/// Reversed [`hot`]: low values are light, high values dark.
pub fn hot_r(t: f64) -> RGBColor {
    hot(1.0 - t.clamp(0.0, 1.0))
}
