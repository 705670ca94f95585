//! Classification of earthquake depths into colored bands.
//!
//! Six fixed half-open bands cover depths from -10 km upwards:
//!
//! | band        | color     |
//! |-------------|-----------|
//! | `[-10, 10)` | `#00FF00` |
//! | `[10, 30)`  | `#ADFF2F` |
//! | `[30, 50)`  | `#FFFF00` |
//! | `[50, 70)`  | `#FFA500` |
//! | `[70, 90)`  | `#FF4500` |
//! | `[90, ∞)`   | `#FF0000` |
//!
//! The last color doubles as the catch-all for any depth that no band matches. With the default
//! [`BelowRangePolicy::CatchAll`] this means that depths below -10 km (and `NaN`) are red, not
//! green. [`BelowRangePolicy::FirstBand`] puts them into the first band instead.

use serde::{Deserialize, Serialize};

use crate::Color;

/// Half-open depth interval `[lower, upper)` in kilometers mapped to a display color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBand {
    lower: f64,
    upper: Option<f64>,
    color: Color,
}

impl DepthBand {
    /// Creates a band. `upper == None` means the band is unbounded.
    pub const fn new(lower: f64, upper: Option<f64>, color: Color) -> Self {
        Self {
            lower,
            upper,
            color,
        }
    }

    /// Inclusive lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Exclusive upper bound, `None` for the last band.
    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Display color of the band.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns true if `lower <= depth < upper`.
    pub fn contains(&self, depth: f64) -> bool {
        depth >= self.lower && self.upper.map_or(true, |upper| depth < upper)
    }
}

/// Color returned for depths that fall through every band.
pub const CATCH_ALL_COLOR: Color = Color::from_hex("#FF0000");

/// Color used for features whose depth is missing from the feed.
pub const UNKNOWN_DEPTH_COLOR: Color = Color::GRAY;

/// The fixed depth bands, ordered by depth.
pub const DEPTH_BANDS: [DepthBand; 6] = [
    DepthBand::new(-10.0, Some(10.0), Color::from_hex("#00FF00")),
    DepthBand::new(10.0, Some(30.0), Color::from_hex("#ADFF2F")),
    DepthBand::new(30.0, Some(50.0), Color::from_hex("#FFFF00")),
    DepthBand::new(50.0, Some(70.0), Color::from_hex("#FFA500")),
    DepthBand::new(70.0, Some(90.0), Color::from_hex("#FF4500")),
    DepthBand::new(90.0, None, CATCH_ALL_COLOR),
];

/// What to do with depths below the lowest band boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BelowRangePolicy {
    /// Depths that match no band get the catch-all color (red), including depths below -10 km.
    #[default]
    CatchAll,
    /// Depths below -10 km get the color of the first (shallowest) band.
    FirstBand,
}

/// Maps depths to colors using a list of bands.
#[derive(Debug, Clone)]
pub struct DepthClassifier {
    bands: Vec<DepthBand>,
    below_range: BelowRangePolicy,
}

impl Default for DepthClassifier {
    fn default() -> Self {
        Self::new(BelowRangePolicy::default())
    }
}

impl DepthClassifier {
    /// Creates a classifier over [`DEPTH_BANDS`] with the given policy.
    pub fn new(below_range: BelowRangePolicy) -> Self {
        Self {
            bands: DEPTH_BANDS.to_vec(),
            below_range,
        }
    }

    /// Bands of the classifier in ascending order.
    pub fn bands(&self) -> &[DepthBand] {
        &self.bands
    }

    /// Policy applied to depths below the first band.
    pub fn below_range(&self) -> BelowRangePolicy {
        self.below_range
    }

    /// Color for the given depth. Never fails: any value, including `NaN`, produces a color.
    pub fn classify(&self, depth: f64) -> Color {
        if let Some(band) = self.bands.iter().find(|band| band.contains(depth)) {
            return band.color;
        }

        match (self.below_range, self.bands.first()) {
            (BelowRangePolicy::FirstBand, Some(first)) if depth < first.lower => first.color,
            _ => CATCH_ALL_COLOR,
        }
    }

    /// Color for a depth that may be missing in the source data.
    pub fn classify_opt(&self, depth: Option<f64>) -> Color {
        depth.map_or(UNKNOWN_DEPTH_COLOR, |depth| self.classify(depth))
    }
}

/// Color of the given depth with the default band set and [`BelowRangePolicy::CatchAll`].
pub fn color_for_depth(depth: f64) -> Color {
    for band in &DEPTH_BANDS {
        if band.contains(depth) {
            return band.color;
        }
    }

    CATCH_ALL_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: Color = Color::from_hex("#00FF00");

    #[test]
    fn bands_are_contiguous() {
        for pair in DEPTH_BANDS.windows(2) {
            assert_eq!(pair[0].upper(), Some(pair[1].lower()));
        }
        assert_eq!(DEPTH_BANDS[0].lower(), -10.0);
        assert!(DEPTH_BANDS[5].upper().is_none());
    }

    #[test]
    fn every_depth_in_range_has_exactly_one_band() {
        let mut depth = -10.0;
        while depth < 90.0 {
            let matching: Vec<_> = DEPTH_BANDS
                .iter()
                .filter(|band| band.contains(depth))
                .collect();
            assert_eq!(matching.len(), 1, "depth {depth}");
            assert_eq!(color_for_depth(depth), matching[0].color());
            depth += 0.25;
        }
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(color_for_depth(-10.0), GREEN);
        assert_eq!(color_for_depth(9.999), GREEN);
        assert_eq!(color_for_depth(10.0), Color::from_hex("#ADFF2F"));
        assert_eq!(color_for_depth(30.0), Color::from_hex("#FFFF00"));
        assert_eq!(color_for_depth(50.0), Color::from_hex("#FFA500"));
        assert_eq!(color_for_depth(70.0), Color::from_hex("#FF4500"));
        assert_eq!(color_for_depth(89.99), Color::from_hex("#FF4500"));
        assert_eq!(color_for_depth(90.0), Color::from_hex("#FF0000"));
    }

    #[test]
    fn deep_and_below_range_depths_are_red() {
        assert_eq!(color_for_depth(95.0), Color::from_hex("#FF0000"));
        assert_eq!(color_for_depth(700.0), Color::from_hex("#FF0000"));
        assert_eq!(color_for_depth(-15.0), Color::from_hex("#FF0000"));
        assert_eq!(color_for_depth(-10.0001), Color::from_hex("#FF0000"));
        assert_eq!(color_for_depth(f64::NAN), Color::from_hex("#FF0000"));
        assert_eq!(color_for_depth(f64::NEG_INFINITY), CATCH_ALL_COLOR);
    }

    #[test]
    fn classifier_matches_free_function_by_default() {
        let classifier = DepthClassifier::default();
        for depth in [-100.0, -15.0, -10.0, 0.0, 5.0, 29.0, 55.5, 89.0, 90.0, 650.0] {
            assert_eq!(classifier.classify(depth), color_for_depth(depth));
        }
    }

    #[test]
    fn first_band_policy_fixes_shallow_depths() {
        let classifier = DepthClassifier::new(BelowRangePolicy::FirstBand);
        assert_eq!(classifier.classify(-15.0), GREEN);
        assert_eq!(classifier.classify(-1000.0), GREEN);
        assert_eq!(classifier.classify(95.0), CATCH_ALL_COLOR);
        assert_eq!(classifier.classify(f64::NAN), CATCH_ALL_COLOR);
    }

    #[test]
    fn missing_depth_is_gray() {
        let classifier = DepthClassifier::default();
        assert_eq!(classifier.classify_opt(None), UNKNOWN_DEPTH_COLOR);
        assert_eq!(classifier.classify_opt(Some(5.0)), GREEN);
    }

    #[test]
    fn policy_deserialization() {
        assert_eq!(
            serde_json::from_str::<BelowRangePolicy>("\"first_band\"").unwrap(),
            BelowRangePolicy::FirstBand
        );
        assert_eq!(
            serde_json::from_str::<BelowRangePolicy>("\"catch_all\"").unwrap(),
            BelowRangePolicy::CatchAll
        );
    }
}
