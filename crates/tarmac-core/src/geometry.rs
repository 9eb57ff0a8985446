//! Planar geometry predicates.
//!
//! Every function here works on coordinates that were already projected into
//! local meters. They are pure: they return a boolean or the indices of the
//! offending vertices/sides and leave it to the caller to decide how a
//! failure is reported.

use crate::types::{Bbox2, Vec2};

/// Sides shorter than this are treated as zero length
pub const MIN_SEGMENT_M: f64 = 0.1;

/// Minimum wall/segment length for facades, forests and lines under the
/// strictest export target
pub const GATEWAY_MIN_FACADE_SEGMENT_M: f64 = 0.5;

/// Number of chords a cubic bezier side is flattened into
pub const BEZIER_STEPS: usize = 8;

/// Distance within which a chord endpoint counts as touching, not crossing
pub const CURVE_TOLERANCE_M: f64 = 0.01;

/// How far outside `[0, 1]` a UV coordinate may drift
pub const UV_SLOP: f64 = 0.001;

/// Consecutive UV coordinates closer than this are coincident
pub const UV_EPSILON: f64 = 1e-6;

/// One side of a ring or chain: a straight segment or a cubic bezier.
///
/// A straight side has its control points equal to its endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Side {
    pub p0: Vec2,
    pub c0: Vec2,
    pub c1: Vec2,
    pub p1: Vec2,
}

impl Side {
    pub fn line(a: Vec2, b: Vec2) -> Self {
        Self {
            p0: a,
            c0: a,
            c1: b,
            p1: b,
        }
    }

    pub fn bezier(p0: Vec2, c0: Vec2, c1: Vec2, p1: Vec2) -> Self {
        Self { p0, c0, c1, p1 }
    }

    pub fn is_curved(&self) -> bool {
        self.c0 != self.p0 || self.c1 != self.p1
    }

    /// Point at parameter `t` in `[0, 1]`
    pub fn eval(&self, t: f64) -> Vec2 {
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.c0 * (3.0 * u * u * t)
            + self.c1 * (3.0 * u * t * t)
            + self.p1 * (t * t * t)
    }

    /// The side flattened into straight chords
    pub fn chords(&self) -> Vec<(Vec2, Vec2)> {
        if !self.is_curved() {
            return vec![(self.p0, self.p1)];
        }
        let mut out = Vec::with_capacity(BEZIER_STEPS);
        let mut prev = self.p0;
        for i in 1..=BEZIER_STEPS {
            let next = if i == BEZIER_STEPS {
                self.p1
            } else {
                self.eval(i as f64 / BEZIER_STEPS as f64)
            };
            out.push((prev, next));
            prev = next;
        }
        out
    }

    /// Length of the flattened side
    pub fn length(&self) -> f64 {
        self.chords().iter().map(|(a, b)| a.distance(b)).sum()
    }
}

/// Whether a segment is shorter than `min_len`
pub fn segment_too_short(a: Vec2, b: Vec2, min_len: f64) -> bool {
    a.distance(&b) < min_len
}

/// Indices of sides whose (flattened) length is below `min_len`
pub fn short_sides(sides: &[Side], min_len: f64) -> Vec<usize> {
    sides
        .iter()
        .enumerate()
        .filter(|(_, s)| s.length() < min_len)
        .map(|(i, _)| i)
        .collect()
}

/// Shoelace area; positive for counter-clockwise rings
pub fn signed_area(ring: &[Vec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a.cross(&b);
    }
    sum * 0.5
}

pub fn is_ccw(ring: &[Vec2]) -> bool {
    signed_area(ring) > 0.0
}

/// An outer ring and its hole must wind in opposite directions
pub fn windings_opposite(outer: &[Vec2], hole: &[Vec2]) -> bool {
    is_ccw(outer) != is_ccw(hole)
}

/// Signed distance of `p` from the infinite line through `a` and `b`
fn side_of(a: Vec2, b: Vec2, p: Vec2) -> f64 {
    let len = a.distance(&b);
    if len <= f64::EPSILON {
        return 0.0;
    }
    (b - a).cross(&(p - a)) / len
}

/// Whether two segments properly cross.
///
/// Endpoints within `CURVE_TOLERANCE_M` of the other segment's line count as
/// touching, so segments sharing a vertex never cross.
pub fn segments_cross(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    let tol = CURVE_TOLERANCE_M;
    let opposite = |d0: f64, d1: f64| (d0 > tol && d1 < -tol) || (d0 < -tol && d1 > tol);
    opposite(side_of(b0, b1, a0), side_of(b0, b1, a1))
        && opposite(side_of(a0, a1, b0), side_of(a0, a1, b1))
}

/// Whether two segments cross or touch. An endpoint of either one within
/// `CURVE_TOLERANCE_M` of the other segment touches, which also covers
/// collinear overlaps.
pub fn segments_touch(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> bool {
    let tol = CURVE_TOLERANCE_M;
    segments_cross(a0, a1, b0, b1)
        || distance_point_segment(a0, b0, b1) <= tol
        || distance_point_segment(a1, b0, b1) <= tol
        || distance_point_segment(b0, a0, a1) <= tol
        || distance_point_segment(b1, a0, a1) <= tol
}

/// Whether `second`, which starts where `first` ends, meets `first`
/// anywhere other than at that shared vertex
fn meet_beyond_joint(first: &[(Vec2, Vec2)], second: &[(Vec2, Vec2)]) -> bool {
    let tol = CURVE_TOLERANCE_M;
    let last = first.len().saturating_sub(1);
    first.iter().enumerate().any(|(p, &(a0, a1))| {
        second.iter().enumerate().any(|(q, &(b0, b1))| {
            if p == last && q == 0 {
                segments_cross(a0, a1, b0, b1)
                    || distance_point_segment(a0, b0, b1) <= tol
                    || distance_point_segment(b1, a0, a1) <= tol
            } else {
                segments_touch(a0, a1, b0, b1)
            }
        })
    })
}

/// Indices of sides that cross or touch another side of the same sequence.
///
/// Side `i` starts at vertex `i`. Consecutive sides may only meet at their
/// shared vertex; on a `closed` ring the last and first side are
/// consecutive too. Any other contact, including a side doubling back over
/// its neighbour or two sides pinched together at a repeated vertex, is an
/// intersection. Zero-length sides are skipped and their neighbours treated
/// as consecutive.
pub fn self_intersections(sides: &[Side], closed: bool) -> Vec<usize> {
    let live: Vec<usize> = (0..sides.len())
        .filter(|&i| sides[i].length() > CURVE_TOLERANCE_M)
        .collect();
    let chords: Vec<Vec<(Vec2, Vec2)>> = live.iter().map(|&i| sides[i].chords()).collect();
    let n = live.len();
    let mut hit = vec![false; n];

    for i in 0..n {
        // A curved side can loop over itself
        let own = &chords[i];
        for a in 0..own.len() {
            for b in (a + 2)..own.len() {
                if segments_cross(own[a].0, own[a].1, own[b].0, own[b].1) {
                    hit[i] = true;
                }
            }
        }

        for j in (i + 1)..n {
            let met = if j == i + 1 {
                meet_beyond_joint(&chords[i], &chords[j])
            } else if closed && i == 0 && j == n - 1 {
                meet_beyond_joint(&chords[j], &chords[i])
            } else {
                chords[i].iter().any(|(a0, a1)| {
                    chords[j]
                        .iter()
                        .any(|(b0, b1)| segments_touch(*a0, *a1, *b0, *b1))
                })
            };
            if met {
                hit[i] = true;
                hit[j] = true;
            }
        }
    }

    hit.iter()
        .enumerate()
        .filter(|(_, h)| **h)
        .map(|(k, _)| live[k])
        .collect()
}

/// Even-odd point containment against a simple closed ring
pub fn point_in_polygon(p: Vec2, ring: &[Vec2]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = ring[i];
        let b = ring[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Containment against an outer ring with holes
pub fn point_in_polygon_with_holes(p: Vec2, outer: &[Vec2], holes: &[Vec<Vec2>]) -> bool {
    point_in_polygon(p, outer) && !holes.iter().any(|h| point_in_polygon(p, h))
}

fn ring_edges(ring: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// Whether segment `a`-`b` lies fully inside the ring
pub fn segment_in_polygon(a: Vec2, b: Vec2, ring: &[Vec2]) -> bool {
    point_in_polygon(a, ring)
        && point_in_polygon(b, ring)
        && !ring_edges(ring).any(|(e0, e1)| segments_cross(a, b, e0, e1))
}

/// Whether a bounding box lies fully inside the ring
pub fn bbox_in_polygon(bbox: &Bbox2, ring: &[Vec2]) -> bool {
    let c = bbox.corners();
    (0..4).all(|i| segment_in_polygon(c[i], c[(i + 1) % 4], ring))
}

/// Distance from `p` to the segment `a`-`b`
pub fn distance_point_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(&ab);
    if len2 <= f64::EPSILON {
        return p.distance(&a);
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    p.distance(&(a + ab * t))
}

/// Distance from `p` to the nearest edge of a closed ring
pub fn distance_to_ring(p: Vec2, ring: &[Vec2]) -> f64 {
    match ring.len() {
        0 => f64::INFINITY,
        1 => p.distance(&ring[0]),
        _ => ring_edges(ring)
            .map(|(a, b)| distance_point_segment(p, a, b))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Indices of UV vertices that are out of range or coincide with the
/// previous vertex
pub fn uv_degenerate(uvs: &[[f64; 2]]) -> Vec<usize> {
    let in_range = |v: f64| v.is_finite() && (-UV_SLOP..=1.0 + UV_SLOP).contains(&v);
    let mut out = Vec::new();
    for (i, uv) in uvs.iter().enumerate() {
        let bad_range = !in_range(uv[0]) || !in_range(uv[1]);
        let coincident = i > 0 && {
            let prev = uvs[i - 1];
            (uv[0] - prev[0]).abs() < UV_EPSILON && (uv[1] - prev[1]).abs() < UV_EPSILON
        };
        if bad_range || coincident {
            out.push(i);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square(size: f64) -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(size, 0.0),
            Vec2::new(size, size),
            Vec2::new(0.0, size),
        ]
    }

    fn closed_sides(ring: &[Vec2]) -> Vec<Side> {
        let n = ring.len();
        (0..n).map(|i| Side::line(ring[i], ring[(i + 1) % n])).collect()
    }

    #[test]
    fn test_winding() {
        let ccw = square(10.0);
        let mut cw = ccw.clone();
        cw.reverse();
        assert!(is_ccw(&ccw));
        assert!(!is_ccw(&cw));
        assert!(windings_opposite(&ccw, &cw));
        assert!(!windings_opposite(&ccw, &ccw));
        assert_eq!(signed_area(&ccw), 100.0);
    }

    #[test]
    fn test_square_does_not_self_intersect() {
        assert!(self_intersections(&closed_sides(&square(10.0)), true).is_empty());
    }

    #[test]
    fn test_bowtie_self_intersects() {
        let bowtie = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        let hits = self_intersections(&closed_sides(&bowtie), true);
        assert_eq!(hits, vec![0, 2]);
    }

    #[test]
    fn test_curved_side_crossing_a_straight_side() {
        // A bulging top side that dips below the bottom edge
        let sides = vec![
            Side::line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)),
            Side::line(Vec2::new(10.0, 0.0), Vec2::new(10.0, 5.0)),
            Side::bezier(
                Vec2::new(10.0, 5.0),
                Vec2::new(7.0, -20.0),
                Vec2::new(3.0, -20.0),
                Vec2::new(0.0, 5.0),
            ),
            Side::line(Vec2::new(0.0, 5.0), Vec2::new(0.0, 0.0)),
        ];
        let hits = self_intersections(&sides, true);
        assert!(hits.contains(&0));
        assert!(hits.contains(&2));
    }

    #[test]
    fn test_side_doubling_back_intersects() {
        // The second side runs back along the first, then the ring leaves
        // from a point on the first side
        let spike = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 10.0),
        ];
        assert_eq!(self_intersections(&closed_sides(&spike), true), vec![0, 1, 2]);
    }

    #[test]
    fn test_pinched_ring_intersects() {
        // Figure eight through a repeated vertex at (5, 5)
        let pinch = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(0.0, 10.0),
        ];
        assert_eq!(self_intersections(&closed_sides(&pinch), true), vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_closing_pair_is_adjacent_only_when_closed() {
        let ring = square(10.0);
        let open: Vec<Side> = ring.windows(2).map(|w| Side::line(w[0], w[1])).collect();
        assert!(self_intersections(&open, false).is_empty());

        // An open chain ending on its own start touches itself there
        let mut looped = open.clone();
        looped.push(Side::line(ring[3], ring[0]));
        assert!(self_intersections(&looped, true).is_empty());
        assert_eq!(self_intersections(&looped, false), vec![0, 3]);
    }

    #[test]
    fn test_duplicate_vertex_is_not_an_intersection() {
        let ring = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(self_intersections(&closed_sides(&ring), true).is_empty());
    }

    #[test]
    fn test_segments_touch() {
        let o = Vec2::ZERO;
        let e = Vec2::new(10.0, 0.0);
        assert!(segments_touch(o, e, Vec2::new(5.0, 0.0), Vec2::new(5.0, 5.0)));
        assert!(segments_touch(o, e, Vec2::new(2.0, 0.0), Vec2::new(20.0, 0.0)));
        assert!(!segments_touch(o, e, Vec2::new(5.0, 1.0), Vec2::new(5.0, 5.0)));
        assert!(!segments_cross(o, e, Vec2::new(5.0, 0.0), Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_short_sides() {
        let ring = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.05, 0.0),
            Vec2::new(10.0, 10.0),
        ];
        assert_eq!(short_sides(&closed_sides(&ring), MIN_SEGMENT_M), vec![1]);
        assert!(segment_too_short(Vec2::ZERO, Vec2::new(0.05, 0.0), MIN_SEGMENT_M));
        assert!(!segment_too_short(Vec2::ZERO, Vec2::new(0.2, 0.0), MIN_SEGMENT_M));
    }

    #[test]
    fn test_containment() {
        let ring = square(100.0);
        assert!(point_in_polygon(Vec2::new(50.0, 50.0), &ring));
        assert!(!point_in_polygon(Vec2::new(150.0, 50.0), &ring));

        let inner = Bbox2::from_points(&[Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0)]);
        let straddling = Bbox2::from_points(&[Vec2::new(90.0, 10.0), Vec2::new(120.0, 20.0)]);
        assert!(bbox_in_polygon(&inner, &ring));
        assert!(!bbox_in_polygon(&straddling, &ring));

        assert!(segment_in_polygon(Vec2::new(1.0, 1.0), Vec2::new(99.0, 99.0), &ring));
        assert!(!segment_in_polygon(Vec2::new(1.0, 1.0), Vec2::new(199.0, 99.0), &ring));
    }

    #[test]
    fn test_containment_with_holes() {
        let outer = square(100.0);
        let hole: Vec<Vec2> = square(20.0)
            .into_iter()
            .map(|p| p + Vec2::new(40.0, 40.0))
            .collect();
        assert!(!point_in_polygon_with_holes(Vec2::new(50.0, 50.0), &outer, &[hole.clone()]));
        assert!(point_in_polygon_with_holes(Vec2::new(10.0, 10.0), &outer, &[hole]));
    }

    #[test]
    fn test_distance_to_ring() {
        let ring = square(100.0);
        assert_eq!(distance_to_ring(Vec2::new(150.0, 50.0), &ring), 50.0);
        assert_eq!(distance_point_segment(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::ZERO), 50f64.sqrt());
    }

    #[test]
    fn test_uv_degenerate() {
        let good = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert!(uv_degenerate(&good).is_empty());

        let bad = [[0.0, 0.0], [0.0, 0.0], [1.5, 0.0], [0.0, 1.0]];
        assert_eq!(uv_degenerate(&bad), vec![1, 2]);
    }

    proptest! {
        #[test]
        fn prop_reversing_flips_winding(
            pts in proptest::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 3..12)
        ) {
            let ring: Vec<Vec2> = pts.iter().map(|(x, y)| Vec2::new(*x, *y)).collect();
            let area = signed_area(&ring);
            prop_assume!(area.abs() > 1.0);
            let mut rev = ring.clone();
            rev.reverse();
            prop_assert_eq!(is_ccw(&ring), !is_ccw(&rev));
        }

        #[test]
        fn prop_regular_polygons_are_simple(n in 3usize..24, radius in 1.0f64..5000.0) {
            let ring: Vec<Vec2> = (0..n)
                .map(|i| {
                    let a = i as f64 / n as f64 * std::f64::consts::TAU;
                    Vec2::new(radius * a.cos(), radius * a.sin())
                })
                .collect();
            prop_assert!(self_intersections(&closed_sides(&ring), true).is_empty());
            prop_assert!(point_in_polygon(Vec2::ZERO, &ring));
        }
    }
}
