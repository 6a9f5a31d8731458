//! AQI derivation by piecewise-linear breakpoint interpolation.
//!
//! Each pollutant has a table of six bands covering the index ranges
//! 0-50, 51-100, 101-150, 151-200, 201-300 and 301-500. A concentration is
//! interpolated within the first band that contains it and rounded to the
//! nearest integer, ties to even. Concentrations outside every band
//! (negative, above the top band, or inside the small gaps between bands)
//! have no index.
//!
//! # Example
//!
//! ```
//! use airgauge_core::aqi::{aqi_for, combined_aqi, PM25_BREAKPOINTS};
//!
//! assert_eq!(aqi_for(12.0, PM25_BREAKPOINTS), Some(50));
//! assert_eq!(aqi_for(12.1, PM25_BREAKPOINTS), Some(51));
//! assert_eq!(combined_aqi(Some(35.5), Some(60.0)), Some(101));
//! assert_eq!(combined_aqi(None, None), None);
//! ```

/// One row of a breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub conc_low: f64,
    pub conc_high: f64,
    pub index_low: u16,
    pub index_high: u16,
}

impl Breakpoint {
    pub const fn new(conc_low: f64, conc_high: f64, index_low: u16, index_high: u16) -> Self {
        Self {
            conc_low,
            conc_high,
            index_low,
            index_high,
        }
    }

    /// True if `concentration` lies inside this band (both ends inclusive).
    pub fn contains(&self, concentration: f64) -> bool {
        self.conc_low <= concentration && concentration <= self.conc_high
    }

    /// Interpolate within this band. The caller checks containment.
    fn interpolate(&self, concentration: f64) -> f64 {
        let index_span = f64::from(self.index_high - self.index_low);
        let conc_span = self.conc_high - self.conc_low;
        if conc_span == 0.0 {
            return f64::from(self.index_low);
        }
        index_span / conc_span * (concentration - self.conc_low) + f64::from(self.index_low)
    }
}

/// PM2.5 breakpoints (µg/m³, 24-hour).
pub const PM25_BREAKPOINTS: &[Breakpoint] = &[
    Breakpoint::new(0.0, 12.0, 0, 50),
    Breakpoint::new(12.1, 35.4, 51, 100),
    Breakpoint::new(35.5, 55.4, 101, 150),
    Breakpoint::new(55.5, 150.4, 151, 200),
    Breakpoint::new(150.5, 250.4, 201, 300),
    Breakpoint::new(250.5, 500.4, 301, 500),
];

/// PM10 breakpoints (µg/m³, 24-hour).
pub const PM10_BREAKPOINTS: &[Breakpoint] = &[
    Breakpoint::new(0.0, 54.0, 0, 50),
    Breakpoint::new(55.0, 154.0, 51, 100),
    Breakpoint::new(155.0, 254.0, 101, 150),
    Breakpoint::new(255.0, 354.0, 151, 200),
    Breakpoint::new(355.0, 424.0, 201, 300),
    Breakpoint::new(425.0, 604.0, 301, 500),
];

/// Index for one concentration against one table.
///
/// Returns `None` when no band contains the concentration, including
/// NaN and infinite inputs.
pub fn aqi_for(concentration: f64, table: &[Breakpoint]) -> Option<u16> {
    let band = table.iter().find(|bp| bp.contains(concentration))?;
    let index = band.interpolate(concentration).round_ties_even();
    // Interpolation stays within [index_low, index_high], so this never clamps
    // for a well-formed table.
    Some(index.clamp(f64::from(band.index_low), f64::from(band.index_high)) as u16)
}

/// Overall index: the worse of the PM2.5 and PM10 sub-indices.
///
/// A sub-index that is absent (pollutant missing or out of range) is left
/// out of the maximum.
pub fn combined_aqi(pm25: Option<f64>, pm10: Option<f64>) -> Option<u16> {
    let a = pm25.and_then(|c| aqi_for(c, PM25_BREAKPOINTS));
    let b = pm10.and_then(|c| aqi_for(c, PM10_BREAKPOINTS));
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pm25_band_boundaries() {
        let cases = [
            (0.0, 0),
            (12.0, 50),
            (12.1, 51),
            (35.4, 100),
            (35.5, 101),
            (55.4, 150),
            (55.5, 151),
            (150.4, 200),
            (150.5, 201),
            (250.4, 300),
            (250.5, 301),
            (500.4, 500),
        ];
        for (c, expected) in cases {
            assert_eq!(aqi_for(c, PM25_BREAKPOINTS), Some(expected), "PM2.5 {c}");
        }
    }

    #[test]
    fn test_pm10_band_boundaries() {
        let cases = [
            (0.0, 0),
            (54.0, 50),
            (55.0, 51),
            (154.0, 100),
            (155.0, 101),
            (254.0, 150),
            (354.0, 200),
            (424.0, 300),
            (425.0, 301),
            (604.0, 500),
        ];
        for (c, expected) in cases {
            assert_eq!(aqi_for(c, PM10_BREAKPOINTS), Some(expected), "PM10 {c}");
        }
    }

    #[test]
    fn test_interpolation_midpoints() {
        // 50/12 * 6 = 25
        assert_eq!(aqi_for(6.0, PM25_BREAKPOINTS), Some(25));
        // 49/99 * 5 + 51 = 53.47
        assert_eq!(aqi_for(60.0, PM10_BREAKPOINTS), Some(53));
        // 49/23.3 * 10 + 51 = 72.03
        assert_eq!(aqi_for(22.1, PM25_BREAKPOINTS), Some(72));
    }

    #[test]
    fn test_out_of_range_is_absent() {
        assert_eq!(aqi_for(-0.1, PM25_BREAKPOINTS), None);
        assert_eq!(aqi_for(-5.0, PM10_BREAKPOINTS), None);
        assert_eq!(aqi_for(500.5, PM25_BREAKPOINTS), None);
        assert_eq!(aqi_for(604.1, PM10_BREAKPOINTS), None);
        assert_eq!(aqi_for(f64::NAN, PM25_BREAKPOINTS), None);
        assert_eq!(aqi_for(f64::INFINITY, PM25_BREAKPOINTS), None);
    }

    #[test]
    fn test_gap_between_bands_is_absent() {
        assert_eq!(aqi_for(12.05, PM25_BREAKPOINTS), None);
        assert_eq!(aqi_for(54.5, PM10_BREAKPOINTS), None);
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        // 1 index point per 2 µg/m³ gives exact .5 results at odd concentrations.
        let table = [Breakpoint::new(0.0, 10.0, 0, 5)];
        assert_eq!(aqi_for(1.0, &table), Some(0)); // 0.5 -> 0
        assert_eq!(aqi_for(3.0, &table), Some(2)); // 1.5 -> 2
        assert_eq!(aqi_for(5.0, &table), Some(2)); // 2.5 -> 2
        assert_eq!(aqi_for(7.0, &table), Some(4)); // 3.5 -> 4
        assert_eq!(aqi_for(6.0, &table), Some(3));
    }

    #[test]
    fn test_degenerate_band() {
        let table = [Breakpoint::new(5.0, 5.0, 10, 20)];
        assert_eq!(aqi_for(5.0, &table), Some(10));
    }

    #[test]
    fn test_first_matching_band_wins() {
        let table = [
            Breakpoint::new(0.0, 10.0, 0, 10),
            Breakpoint::new(10.0, 20.0, 100, 200),
        ];
        assert_eq!(aqi_for(10.0, &table), Some(10));
    }

    #[test]
    fn test_combined_takes_maximum() {
        // PM2.5 35.5 -> 101, PM10 60 -> 53
        assert_eq!(combined_aqi(Some(35.5), Some(60.0)), Some(101));
        // PM2.5 6 -> 25, PM10 60 -> 53
        assert_eq!(combined_aqi(Some(6.0), Some(60.0)), Some(53));
    }

    #[test]
    fn test_combined_single_pollutant() {
        assert_eq!(
            combined_aqi(None, Some(60.0)),
            aqi_for(60.0, PM10_BREAKPOINTS)
        );
        assert_eq!(combined_aqi(Some(35.4), None), Some(100));
    }

    #[test]
    fn test_combined_absent() {
        assert_eq!(combined_aqi(None, None), None);
        assert_eq!(combined_aqi(Some(-1.0), Some(9999.0)), None);
        // One out of range, the other valid.
        assert_eq!(combined_aqi(Some(9999.0), Some(54.0)), Some(50));
    }

    #[test]
    fn test_tables_cover_standard_index_ranges() {
        let expected = [(0, 50), (51, 100), (101, 150), (151, 200), (201, 300), (301, 500)];
        for table in [PM25_BREAKPOINTS, PM10_BREAKPOINTS] {
            let ranges: Vec<_> = table.iter().map(|b| (b.index_low, b.index_high)).collect();
            assert_eq!(ranges, expected);
            for pair in table.windows(2) {
                assert!(pair[0].conc_high < pair[1].conc_low);
            }
        }
    }
}
