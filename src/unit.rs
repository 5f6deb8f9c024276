//! Time ⇄ pixel conversion under a configurable rounding unit.
//!
//! Two rounding policies coexist on purpose and must not be mixed:
//! nearest-rounding for interactive positioning (so pixel⇄time is
//! approximately invertible and jitter-free while dragging) and
//! ceiling-rounding for the total content extent (so the last partial
//! granule still gets a row and nothing is clipped).
//!
//! The canonical nearest policy is round-half-up at the 30-second boundary,
//! ties away from zero for negative offsets.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::model::{Instant, TimeSpan};

/// The quantization used for all pixel⇄time conversions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutUnit {
    minute_granularity: u32,
    pixels_per_granule: f32,
    default_create_minutes: i64,
}

impl LayoutUnit {
    /// Create a layout unit; all three parameters must be positive.
    ///
    /// A granularity that does not divide 60 evenly is accepted — the
    /// conversion pipeline rounds, it never rejects.
    pub fn new(
        minute_granularity: u32,
        pixels_per_granule: f32,
        default_create_minutes: i64,
    ) -> Result<Self> {
        if minute_granularity == 0 {
            return Err(GridError::InvalidUnit("granularity must be > 0".into()));
        }
        if !(pixels_per_granule > 0.0) {
            return Err(GridError::InvalidUnit(format!(
                "pixels per granule must be > 0, got {pixels_per_granule}"
            )));
        }
        if default_create_minutes <= 0 {
            return Err(GridError::InvalidUnit(
                "default creation duration must be > 0".into(),
            ));
        }
        Ok(Self {
            minute_granularity,
            pixels_per_granule,
            default_create_minutes,
        })
    }

    pub fn minute_granularity(&self) -> u32 {
        self.minute_granularity
    }

    pub fn pixels_per_granule(&self) -> f32 {
        self.pixels_per_granule
    }

    /// Duration assigned to a freshly created event, in minutes.
    pub fn default_create_minutes(&self) -> i64 {
        self.default_create_minutes
    }

    /// Signed pixel distance from `reference` to `instant`.
    ///
    /// Seconds are rounded to whole minutes (half-up at the 30-second
    /// boundary), minutes to the nearest whole granule count, then scaled
    /// by the pixel size of one granule. The sign matches the sign of
    /// `instant - reference`.
    pub fn pixel_offset(&self, reference: Instant, instant: Instant) -> f32 {
        let seconds = (instant - reference).num_seconds();
        let granules = self.nearest_granules(nearest_minutes(seconds));
        granules as f32 * self.pixels_per_granule
    }

    /// Pixel height for an unsigned duration in seconds.
    pub fn pixel_height(&self, duration_seconds: i64) -> f32 {
        let granules = self.nearest_granules(nearest_minutes(duration_seconds.abs()));
        granules as f32 * self.pixels_per_granule
    }

    /// Inverse of the pixel conversions: pixels back to whole minutes,
    /// quantized to the granularity. Signed.
    #[allow(clippy::cast_possible_truncation)] // granule counts fit i64
    pub fn minutes_for_pixels(&self, pixels: f32) -> i64 {
        let granules = f64::from(pixels / self.pixels_per_granule).round() as i64;
        granules * i64::from(self.minute_granularity)
    }

    /// Total granule count of a span, rounded **up** to whole minutes and
    /// then up to whole granules. Feeds the total scrollable content
    /// height — never interactive positioning.
    pub fn ceil_granules(&self, span: &TimeSpan) -> i64 {
        let seconds = span.duration_seconds();
        let minutes = (seconds + 59).div_euclid(60);
        let granularity = i64::from(self.minute_granularity);
        (minutes + granularity - 1).div_euclid(granularity)
    }

    /// Content height for a span: ceiling granule count × granule height.
    pub fn content_height(&self, span: &TimeSpan) -> f32 {
        self.ceil_granules(span) as f32 * self.pixels_per_granule
    }

    /// Nearest whole granule count for a signed minute value, ties away
    /// from zero.
    fn nearest_granules(&self, minutes: i64) -> i64 {
        let granularity = i64::from(self.minute_granularity);
        let rounded = (minutes.abs() * 2 + granularity).div_euclid(2 * granularity);
        if minutes < 0 {
            -rounded
        } else {
            rounded
        }
    }
}

/// Round seconds to whole minutes, half-up at the 30-second boundary,
/// ties away from zero.
fn nearest_minutes(seconds: i64) -> i64 {
    let rounded = (seconds.abs() + 30).div_euclid(60);
    if seconds < 0 {
        -rounded
    } else {
        rounded
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn unit() -> LayoutUnit {
        LayoutUnit::new(15, 8.0, 60).unwrap()
    }

    fn base() -> Instant {
        Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_parameters() {
        assert!(LayoutUnit::new(0, 8.0, 60).is_err());
        assert!(LayoutUnit::new(15, 0.0, 60).is_err());
        assert!(LayoutUnit::new(15, -1.0, 60).is_err());
        assert!(LayoutUnit::new(15, 8.0, 0).is_err());
        // Granularities that do not divide 60 round, they are not rejected.
        assert!(LayoutUnit::new(7, 8.0, 60).is_ok());
    }

    #[test]
    fn test_seconds_round_half_up_at_thirty() {
        assert_eq!(nearest_minutes(899), 15);
        assert_eq!(nearest_minutes(900), 15);
        assert_eq!(nearest_minutes(929), 15);
        assert_eq!(nearest_minutes(930), 16);
        assert_eq!(nearest_minutes(-930), -16);
        assert_eq!(nearest_minutes(-929), -15);
    }

    #[test]
    fn test_pixel_height_quantizes_to_granules() {
        let u = unit();
        // 15 min = exactly one granule.
        assert_eq!(u.pixel_height(900), 8.0);
        // 15.5 min rounds to 16 min, then to the nearest granule (one).
        assert_eq!(u.pixel_height(930), 8.0);
        // 23 min is closer to two granules than one.
        assert_eq!(u.pixel_height(23 * 60), 16.0);
        // 22 min is closer to one.
        assert_eq!(u.pixel_height(22 * 60), 8.0);
    }

    #[test]
    fn test_pixel_offset_sign_follows_instant() {
        let u = unit();
        let r = base();
        assert_eq!(u.pixel_offset(r, r + Duration::minutes(30)), 16.0);
        assert_eq!(u.pixel_offset(r, r - Duration::minutes(30)), -16.0);
        assert_eq!(u.pixel_offset(r, r), 0.0);
    }

    #[test]
    fn test_minutes_for_pixels_inverse() {
        let u = unit();
        assert_eq!(u.minutes_for_pixels(8.0), 15);
        assert_eq!(u.minutes_for_pixels(16.0), 30);
        assert_eq!(u.minutes_for_pixels(-8.0), -15);
        // 11 px is 1.375 granules; nearest is one.
        assert_eq!(u.minutes_for_pixels(11.0), 15);
        // 12 px is 1.5 granules; ties round away from zero.
        assert_eq!(u.minutes_for_pixels(12.0), 30);
    }

    #[test]
    fn test_ceil_granules_never_clips() {
        let u = unit();
        let exact = TimeSpan::new(base(), base() + Duration::minutes(60)).unwrap();
        assert_eq!(u.ceil_granules(&exact), 4);
        // One extra second still claims a whole extra granule.
        let ragged = TimeSpan::new(base(), base() + Duration::seconds(60 * 60 + 1)).unwrap();
        assert_eq!(u.ceil_granules(&ragged), 5);
        assert_eq!(u.content_height(&ragged), 40.0);
    }
}
