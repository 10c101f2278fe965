use crate::coordinate::Coordinate;

/// Latitudinal/longitudinal extent of a region, in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Span {
    pub lat_delta: f64,
    pub lon_delta: f64,
}

impl Span {
    pub fn new(lat_delta: f64, lon_delta: f64) -> Self {
        Span {
            lat_delta,
            lon_delta,
        }
    }
}

/// Rectangular geographic region as center + span.
///
/// Containment contract:
/// - A coordinate is inside iff it falls within `center ± span/2` on both
///   axes, bounds inclusive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    pub center: Coordinate,
    pub span: Span,
}

impl Region {
    pub fn new(center: Coordinate, span: Span) -> Self {
        Region { center, span }
    }

    pub fn min_lat(&self) -> f64 {
        self.center.lat - self.span.lat_delta / 2.0
    }

    pub fn max_lat(&self) -> f64 {
        self.center.lat + self.span.lat_delta / 2.0
    }

    pub fn min_lon(&self) -> f64 {
        self.center.lon - self.span.lon_delta / 2.0
    }

    pub fn max_lon(&self) -> f64 {
        self.center.lon + self.span.lon_delta / 2.0
    }

    /// True iff the coordinate falls within the rectangular bounds derived
    /// from `center ± span/2`.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.min_lat()..=self.max_lat()).contains(&coordinate.lat)
            && (self.min_lon()..=self.max_lon()).contains(&coordinate.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::{Region, Span};
    use crate::coordinate::Coordinate;

    fn region() -> Region {
        Region::new(Coordinate::new(48.0, 11.0), Span::new(2.0, 4.0))
    }

    #[test]
    fn contains_center_and_edges() {
        let r = region();
        assert!(r.contains(Coordinate::new(48.0, 11.0)));
        // Bounds are inclusive.
        assert!(r.contains(Coordinate::new(47.0, 9.0)));
        assert!(r.contains(Coordinate::new(49.0, 13.0)));
    }

    #[test]
    fn rejects_outside_either_axis() {
        let r = region();
        assert!(!r.contains(Coordinate::new(49.1, 11.0)));
        assert!(!r.contains(Coordinate::new(48.0, 13.1)));
        assert!(!r.contains(Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn bbox_accessors_match_span() {
        let r = region();
        assert_eq!(r.min_lat(), 47.0);
        assert_eq!(r.max_lat(), 49.0);
        assert_eq!(r.min_lon(), 9.0);
        assert_eq!(r.max_lon(), 13.0);
    }
}
