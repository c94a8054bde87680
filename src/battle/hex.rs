//! Axial hex coordinates on a pointy-top grid.
//!
//! Coordinates use the axial (q, r) convention with the implicit cube
//! coordinate s = -q - r. All geometry (distance, lines, ranges) is done
//! in cube space and projected back.

use serde::{Deserialize, Serialize};

/// A position on the hex grid in axial coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

/// The six axial direction offsets, starting east and going counterclockwise.
const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

impl HexCoord {
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

    pub fn new(q: i32, r: i32) -> Self {
        HexCoord { q, r }
    }

    /// The derived third cube coordinate.
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Hex distance: the largest absolute cube-coordinate delta.
    pub fn distance(&self, other: &HexCoord) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        dq.max(dr).max(ds)
    }

    /// All six adjacent hexes, in a fixed direction order.
    pub fn neighbors(&self) -> [HexCoord; 6] {
        let mut out = [*self; 6];
        for (i, (dq, dr)) in DIRECTIONS.iter().enumerate() {
            out[i] = HexCoord::new(self.q + dq, self.r + dr);
        }
        out
    }

    /// Hexes crossed by a straight line from `self` to `target`, inclusive
    /// of both endpoints. Uses cube-space lerp with rounding; the small
    /// epsilon nudge breaks ties consistently on exact edge crossings.
    pub fn line_to(&self, target: &HexCoord) -> Vec<HexCoord> {
        let n = self.distance(target);
        if n == 0 {
            return vec![*self];
        }
        let mut line = Vec::with_capacity(n as usize + 1);
        let (aq, ar, az) = (self.q as f64, self.r as f64, self.s() as f64);
        let (bq, br, bz) = (target.q as f64 + 1e-6, target.r as f64 + 1e-6, target.s() as f64 - 2e-6);
        for i in 0..=n {
            let t = i as f64 / n as f64;
            let q = aq + (bq - aq) * t;
            let r = ar + (br - ar) * t;
            let s = az + (bz - az) * t;
            line.push(cube_round(q, r, s));
        }
        line
    }

    /// Every hex within `range` steps of `self`, including `self`.
    pub fn hexes_in_range(&self, range: i32) -> Vec<HexCoord> {
        let mut out = Vec::new();
        for dq in -range..=range {
            let lo = (-range).max(-dq - range);
            let hi = range.min(-dq + range);
            for dr in lo..=hi {
                out.push(HexCoord::new(self.q + dq, self.r + dr));
            }
        }
        out
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Round fractional cube coordinates to the nearest hex, fixing up the
/// component with the largest rounding error so q + r + s stays zero.
fn cube_round(q: f64, r: f64, s: f64) -> HexCoord {
    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    HexCoord::new(rq as i32, rr as i32)
}
