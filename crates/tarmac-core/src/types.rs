//! Geodetic and planar coordinate types

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A geodetic position in degrees.
///
/// Serialized as a `[lon, lat]` pair, matching the order scenery files use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLon {
    pub lon: f64,
    pub lat: f64,
}

impl LatLon {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Whether the position lies on the globe
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for LatLon {
    fn from(v: [f64; 2]) -> Self {
        Self { lon: v[0], lat: v[1] }
    }
}

impl From<LatLon> for [f64; 2] {
    fn from(p: LatLon) -> Self {
        [p.lon, p.lat]
    }
}

/// A planar vector in local meters (x east, y north)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotated 90 degrees counter-clockwise
    pub fn perp(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*other - *self).length()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Axis-aligned planar bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bbox2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bbox2 {
    /// An empty box that grows to fit the first point added
    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.include(*p);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include(&mut self, p: Vec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Length of the diagonal, zero for empty boxes
    pub fn diagonal(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            (self.max - self.min).length()
        }
    }

    /// Corners in counter-clockwise order starting at `min`
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.max.x, self.min.y),
            self.max,
            Vec2::new(self.min.x, self.max.y),
        ]
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

impl Default for Bbox2 {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);
        assert_eq!(a + b, Vec2::new(5.0, 8.0));
        assert_eq!(b - a, Vec2::new(3.0, 4.0));
        assert_eq!((b - a).length(), 5.0);
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(a.cross(&b), 1.0 * 6.0 - 2.0 * 4.0);
        assert_eq!(Vec2::new(1.0, 0.0).perp(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_latlon_serde_as_pair() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            at: LatLon,
        }
        let w: Wrapper = toml::from_str("at = [-122.3, 47.45]").unwrap();
        assert_eq!(w.at, LatLon::new(-122.3, 47.45));
        let out = toml::to_string(&w).unwrap();
        assert!(out.contains("-122.3"));
    }

    #[test]
    fn test_latlon_validity() {
        assert!(LatLon::new(10.0, 50.0).is_valid());
        assert!(!LatLon::new(190.0, 50.0).is_valid());
        assert!(!LatLon::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn test_bbox() {
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)];
        let bbox = Bbox2::from_points(&pts);
        assert_eq!(bbox.diagonal(), 5.0);
        assert!(bbox.contains(Vec2::new(1.0, 1.0)));
        assert!(!bbox.contains(Vec2::new(-1.0, 1.0)));
        assert!(Bbox2::empty().is_empty());
        assert_eq!(Bbox2::empty().diagonal(), 0.0);
    }
}
