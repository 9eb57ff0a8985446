//! Geodetic to local-meters projection
//!
//! Airports are small enough that an equirectangular projection with a
//! cosine-latitude correction around a local origin is accurate to well under
//! the tolerances the validator works with.

use crate::types::{Bbox2, LatLon, Vec2};

/// Meters per degree of latitude (one nautical mile per arc minute)
pub const DEG_TO_MTR_LAT: f64 = 1852.0 * 60.0;

/// Feet per meter, used only when formatting distances for display
pub const MTR_TO_FT: f64 = 3.280_839_895;

/// Equirectangular projection around a fixed origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalProjection {
    origin: LatLon,
    cos_lat: f64,
}

impl LocalProjection {
    pub fn new(origin: LatLon) -> Self {
        Self {
            origin,
            cos_lat: origin.lat.to_radians().cos(),
        }
    }

    /// Projection centered on the geodetic bounding box of `points`.
    ///
    /// Falls back to (0, 0) when there are no points.
    pub fn centered_on<'a>(points: impl IntoIterator<Item = &'a LatLon>) -> Self {
        let mut bbox = Bbox2::empty();
        for p in points {
            bbox.include(Vec2::new(p.lon, p.lat));
        }
        if bbox.is_empty() {
            return Self::new(LatLon::default());
        }
        let c = bbox.center();
        Self::new(LatLon::new(c.x, c.y))
    }

    pub fn origin(&self) -> LatLon {
        self.origin
    }

    pub fn to_local(&self, p: LatLon) -> Vec2 {
        Vec2::new(
            (p.lon - self.origin.lon) * DEG_TO_MTR_LAT * self.cos_lat,
            (p.lat - self.origin.lat) * DEG_TO_MTR_LAT,
        )
    }

    pub fn to_geo(&self, v: Vec2) -> LatLon {
        let lon_scale = DEG_TO_MTR_LAT * self.cos_lat;
        let lon = if lon_scale.abs() > f64::EPSILON {
            self.origin.lon + v.x / lon_scale
        } else {
            self.origin.lon
        };
        LatLon::new(lon, self.origin.lat + v.y / DEG_TO_MTR_LAT)
    }
}

/// Approximate distance in meters between two nearby positions
pub fn distance_m(a: LatLon, b: LatLon) -> f64 {
    let proj = LocalProjection::new(LatLon::new(a.lon, (a.lat + b.lat) * 0.5));
    proj.to_local(a).distance(&proj.to_local(b))
}

/// True bearing in degrees `[0, 360)` from `from` towards `to`
pub fn bearing_deg(from: LatLon, to: LatLon) -> f64 {
    let proj = LocalProjection::new(LatLon::new(from.lon, (from.lat + to.lat) * 0.5));
    let d = proj.to_local(to) - proj.to_local(from);
    normalize_deg(d.x.atan2(d.y).to_degrees())
}

/// Wrap an angle into `[0, 360)`
pub fn normalize_deg(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Smallest absolute difference between two headings, in `[0, 180]`
pub fn heading_delta(a: f64, b: f64) -> f64 {
    let d = normalize_deg(a - b);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_roundtrip_near_origin() {
        let proj = LocalProjection::new(LatLon::new(-122.3, 47.45));
        let p = LatLon::new(-122.29, 47.46);
        let back = proj.to_geo(proj.to_local(p));
        assert!((back.lon - p.lon).abs() < 1e-9);
        assert!((back.lat - p.lat).abs() < 1e-9);
    }

    #[test]
    fn test_one_minute_of_latitude_is_a_nautical_mile() {
        let a = LatLon::new(0.0, 10.0);
        let b = LatLon::new(0.0, 10.0 + 1.0 / 60.0);
        assert!((distance_m(a, b) - 1852.0).abs() < 0.01);
    }

    #[test]
    fn test_longitude_scales_with_latitude() {
        let a = LatLon::new(0.0, 60.0);
        let b = LatLon::new(1.0 / 60.0, 60.0);
        assert!((distance_m(a, b) - 926.0).abs() < 0.5);
    }

    #[test]
    fn test_bearing() {
        let o = LatLon::new(0.0, 0.0);
        assert!((bearing_deg(o, LatLon::new(0.0, 0.01)) - 0.0).abs() < 1e-6);
        assert!((bearing_deg(o, LatLon::new(0.01, 0.0)) - 90.0).abs() < 1e-6);
        assert!((bearing_deg(o, LatLon::new(0.0, -0.01)) - 180.0).abs() < 1e-6);
        assert!((bearing_deg(o, LatLon::new(-0.01, 0.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_heading_delta_wraps() {
        assert_eq!(heading_delta(350.0, 10.0), 20.0);
        assert_eq!(heading_delta(10.0, 350.0), 20.0);
        assert_eq!(heading_delta(90.0, 270.0), 180.0);
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(720.0), 0.0);
    }
}
