//! AQI category, colour and trend classification.
//!
//! # Example
//!
//! ```
//! use airgauge_core::classify::{classify, evaluate, trend};
//! use airgauge_types::{Category, Trend};
//!
//! let (category, _color) = classify(120);
//! assert_eq!(category, Category::UnhealthySensitive);
//!
//! assert_eq!(trend(Some(80), Some(60)), Trend::Up);
//! assert_eq!(trend(Some(80), None), Trend::Flat);
//!
//! let result = evaluate(Some(42), Some(42));
//! assert_eq!(result.category, Some(Category::Good));
//! assert_eq!(result.trend, Trend::Flat);
//! ```

use airgauge_types::{AqiResult, Category, Rgba, Trend};

/// Upper AQI bound (inclusive) of each band below Hazardous.
pub const CATEGORY_LIMITS: [(u16, Category); 5] = [
    (50, Category::Good),
    (100, Category::Moderate),
    (150, Category::UnhealthySensitive),
    (200, Category::Unhealthy),
    (300, Category::VeryUnhealthy),
];

/// Category for an AQI value.
pub fn category_for(aqi: u16) -> Category {
    CATEGORY_LIMITS
        .iter()
        .find(|(limit, _)| aqi <= *limit)
        .map_or(Category::Hazardous, |(_, category)| *category)
}

/// Category and display colour for an AQI value.
pub fn classify(aqi: u16) -> (Category, Rgba) {
    let category = category_for(aqi);
    (category, category.color())
}

/// Direction of change from `old` to `new`.
///
/// Either value being absent gives [`Trend::Flat`].
pub fn trend(new: Option<u16>, old: Option<u16>) -> Trend {
    match (new, old) {
        (Some(new), Some(old)) if new > old => Trend::Up,
        (Some(new), Some(old)) if new < old => Trend::Down,
        _ => Trend::Flat,
    }
}

/// Build the full result for this run's AQI against the previous run's.
///
/// An absent AQI yields [`AqiResult::no_data`] whatever the previous value.
pub fn evaluate(aqi: Option<u16>, previous: Option<u16>) -> AqiResult {
    let Some(value) = aqi else {
        return AqiResult::no_data();
    };
    let (category, color) = classify(value);
    AqiResult {
        aqi: Some(value),
        category: Some(category),
        color,
        trend: trend(aqi, previous),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(category_for(0), Category::Good);
        assert_eq!(category_for(50), Category::Good);
        assert_eq!(category_for(51), Category::Moderate);
        assert_eq!(category_for(100), Category::Moderate);
        assert_eq!(category_for(101), Category::UnhealthySensitive);
        assert_eq!(category_for(150), Category::UnhealthySensitive);
        assert_eq!(category_for(151), Category::Unhealthy);
        assert_eq!(category_for(200), Category::Unhealthy);
        assert_eq!(category_for(201), Category::VeryUnhealthy);
        assert_eq!(category_for(300), Category::VeryUnhealthy);
        assert_eq!(category_for(301), Category::Hazardous);
        assert_eq!(category_for(500), Category::Hazardous);
        assert_eq!(category_for(u16::MAX), Category::Hazardous);
    }

    #[test]
    fn test_classify_colors() {
        assert_eq!(classify(10), (Category::Good, Rgba::new(0, 255, 128, 220)));
        assert_eq!(classify(75).1, Rgba::new(255, 220, 0, 220));
        assert_eq!(classify(400).1, Rgba::new(128, 0, 64, 220));
    }

    #[test]
    fn test_trend_directions() {
        assert_eq!(trend(Some(60), Some(50)), Trend::Up);
        assert_eq!(trend(Some(40), Some(50)), Trend::Down);
        assert_eq!(trend(Some(50), Some(50)), Trend::Flat);
    }

    #[test]
    fn test_trend_with_absent_values() {
        assert_eq!(trend(None, Some(50)), Trend::Flat);
        assert_eq!(trend(Some(50), None), Trend::Flat);
        assert_eq!(trend(None, None), Trend::Flat);
    }

    #[test]
    fn test_evaluate_no_data_ignores_previous() {
        let result = evaluate(None, Some(120));
        assert_eq!(result, AqiResult::no_data());
        assert_eq!(result.label(), "No data");
        assert_eq!(result.color, Rgba::NO_DATA);
    }

    #[test]
    fn test_evaluate_with_previous() {
        let result = evaluate(Some(101), Some(100));
        assert_eq!(result.aqi, Some(101));
        assert_eq!(result.category, Some(Category::UnhealthySensitive));
        assert_eq!(result.trend, Trend::Up);
        assert_eq!(result.label(), "Unhealthy for sensitive");
    }

    #[test]
    fn test_evaluate_first_run() {
        let result = evaluate(Some(30), None);
        assert_eq!(result.trend, Trend::Flat);
        assert_eq!(result.category, Some(Category::Good));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn trend_of_equal_values_is_flat(x: u16) {
            prop_assert_eq!(trend(Some(x), Some(x)), Trend::Flat);
        }

        #[test]
        fn trend_with_absent_side_is_flat(x in proptest::option::of(any::<u16>())) {
            prop_assert_eq!(trend(None, x), Trend::Flat);
            prop_assert_eq!(trend(x, None), Trend::Flat);
        }

        #[test]
        fn trend_is_antisymmetric(a: u16, b: u16) {
            let forward = trend(Some(a), Some(b));
            let backward = trend(Some(b), Some(a));
            let expected = match forward {
                Trend::Up => Trend::Down,
                Trend::Down => Trend::Up,
                Trend::Flat => Trend::Flat,
            };
            prop_assert_eq!(backward, expected);
        }

        #[test]
        fn category_is_monotonic(a: u16, b: u16) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(category_for(lo) <= category_for(hi));
        }
    }
}
