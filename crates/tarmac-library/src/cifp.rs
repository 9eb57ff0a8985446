//! CIFP runway records
//!
//! Only `RWY:` records are read. A record looks like
//!
//! ```text
//! RWY:RW16L,     ,      ,00429, ,ISEA,1,   ;N47275931,W122183055,0380;
//! ```
//!
//! The first field names the runway end; after the first `;` come the
//! threshold latitude (`N`/`S` + DDMMSSss), longitude (`E`/`W` + DDDMMSSss)
//! and the displaced threshold distance in feet.

use std::fs;
use std::path::Path;
use tarmac_core::{LatLon, Result, TarmacError, MTR_TO_FT};

/// One runway end as published
#[derive(Debug, Clone, PartialEq)]
pub struct CifpRunway {
    /// Runway end designator without the `RW` prefix, e.g. `16L`
    pub name: String,
    pub threshold: LatLon,
    pub displaced_m: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CifpData {
    pub runways: Vec<CifpRunway>,
}

impl CifpData {
    pub fn runway(&self, name: &str) -> Option<&CifpRunway> {
        self.runways.iter().find(|r| r.name == name)
    }
}

pub fn load_cifp<P: AsRef<Path>>(path: P) -> Result<CifpData> {
    let content = fs::read_to_string(path)?;
    parse_cifp(&content)
}

pub fn parse_cifp(text: &str) -> Result<CifpData> {
    let mut data = CifpData::default();
    for (i, line) in text.lines().enumerate() {
        let Some(record) = line.trim().strip_prefix("RWY:") else {
            continue;
        };
        data.runways.push(parse_runway(record, i + 1)?);
    }
    Ok(data)
}

fn parse_runway(record: &str, line: usize) -> Result<CifpRunway> {
    let err = |message: &str| TarmacError::CifpParseError {
        line,
        message: message.to_string(),
    };

    let mut sections = record.split(';');
    let head = sections.next().unwrap_or("");
    let body = sections.next().ok_or_else(|| err("missing position section"))?;

    let id = head.split(',').next().unwrap_or("").trim();
    let name = id
        .strip_prefix("RW")
        .filter(|n| !n.is_empty())
        .ok_or_else(|| err("runway id must start with RW"))?;

    let mut fields = body.split(',').map(str::trim);
    let lat = fields
        .next()
        .and_then(|f| parse_angle(f, 'N', 'S', 2))
        .ok_or_else(|| err("bad latitude"))?;
    let lon = fields
        .next()
        .and_then(|f| parse_angle(f, 'E', 'W', 3))
        .ok_or_else(|| err("bad longitude"))?;
    let displaced_ft = match fields.next() {
        Some(f) if !f.is_empty() => f
            .parse::<f64>()
            .map_err(|_| err("bad displaced threshold"))?,
        _ => 0.0,
    };

    Ok(CifpRunway {
        name: name.to_string(),
        threshold: LatLon::new(lon, lat),
        displaced_m: displaced_ft / MTR_TO_FT,
    })
}

/// Hemisphere letter, then degrees (`deg_digits` wide), minutes, seconds and
/// hundredths of a second
fn parse_angle(field: &str, positive: char, negative: char, deg_digits: usize) -> Option<f64> {
    let mut chars = field.chars();
    let sign = match chars.next()? {
        c if c == positive => 1.0,
        c if c == negative => -1.0,
        _ => return None,
    };
    let digits = chars.as_str();
    if digits.len() != deg_digits + 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let num = |range: std::ops::Range<usize>| digits[range].parse::<f64>().ok();
    let deg = num(0..deg_digits)?;
    let min = num(deg_digits..deg_digits + 2)?;
    let sec = num(deg_digits + 2..deg_digits + 4)?;
    let hundredths = num(deg_digits + 4..deg_digits + 6)?;
    if min >= 60.0 || sec >= 60.0 {
        return None;
    }
    Some(sign * (deg + min / 60.0 + (sec + hundredths / 100.0) / 3600.0))
}
