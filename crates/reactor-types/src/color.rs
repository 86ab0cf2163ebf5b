use serde::{Deserialize, Serialize};

/// RGB(A) colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

impl Color {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: None }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a: Some(a) }
    }

    /// Channels as a 3- or 4-element vector.
    pub fn channels(&self) -> Vec<f64> {
        let mut out = vec![self.r, self.g, self.b];
        if let Some(a) = self.a {
            out.push(a);
        }
        out
    }

    pub fn is_valid(&self) -> bool {
        self.channels()
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    /// Hash-stable bit pattern of the channels.
    pub fn to_bits(&self) -> [u64; 4] {
        [
            self.r.to_bits(),
            self.g.to_bits(),
            self.b.to_bits(),
            self.a.map_or(u64::MAX, f64::to_bits),
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::rgb(0.5, 0.5, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_count_follows_alpha() {
        assert_eq!(Color::rgb(0.1, 0.2, 0.3).channels().len(), 3);
        assert_eq!(Color::rgba(0.1, 0.2, 0.3, 1.0).channels().len(), 4);
    }

    #[test]
    fn out_of_range_channel_is_invalid() {
        assert!(Color::rgb(0.0, 1.0, 0.5).is_valid());
        assert!(!Color::rgb(1.2, 0.0, 0.0).is_valid());
        assert!(!Color::rgba(0.0, 0.0, 0.0, -0.1).is_valid());
    }
}
