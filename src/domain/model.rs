use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePair {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl CoordinatePair {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Closed latitude/longitude rectangle used to reject implausible matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&latitude)
            && (self.min_lon..=self.max_lon).contains(&longitude)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(38.0, 43.0, 60.0, 74.0)
    }
}

/// Text of a single page. `text` is `None` when the page has no text layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    pub number: usize,
    pub text: Option<String>,
}

impl PageText {
    pub fn new(number: usize, text: Option<String>) -> Self {
        Self { number, text }
    }

    /// Returns the page text unless it is absent or blank.
    pub fn content(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Working set of rounded coordinates.
///
/// Values are stored as grid keys (`value * 10^precision`, rounded), which
/// makes membership exact and keeps the set ordered by latitude then
/// longitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateSet {
    precision: u32,
    keys: BTreeSet<(i64, i64)>,
}

impl CoordinateSet {
    pub fn new(precision: u32) -> Self {
        Self {
            precision,
            keys: BTreeSet::new(),
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Inserts a pair, returning `false` if its rounded form was already present.
    pub fn insert(&mut self, latitude: f64, longitude: f64) -> bool {
        let scale = self.scale();
        let key = (to_grid(latitude, scale), to_grid(longitude, scale));
        self.keys.insert(key)
    }

    /// Adds every pair of `other`. Both sets must share a precision.
    pub fn merge(&mut self, other: CoordinateSet) {
        debug_assert_eq!(self.precision, other.precision);
        self.keys.extend(other.keys);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn into_table(self) -> CoordinateTable {
        let scale = self.scale();
        let pairs = self
            .keys
            .into_iter()
            .map(|(lat, lon)| CoordinatePair::new(lat as f64 / scale, lon as f64 / scale))
            .collect();
        CoordinateTable { pairs }
    }

    fn scale(&self) -> f64 {
        10f64.powi(self.precision as i32)
    }
}

fn to_grid(value: f64, scale: f64) -> i64 {
    (value * scale).round() as i64
}

/// Deduplicated coordinates sorted by latitude, then longitude.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoordinateTable {
    pairs: Vec<CoordinatePair>,
}

impl CoordinateTable {
    pub fn pairs(&self) -> &[CoordinatePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CoordinatePair> {
        self.pairs.iter()
    }

    /// Mean latitude and mean longitude, or `None` for an empty table.
    pub fn centroid(&self) -> Option<CoordinatePair> {
        if self.pairs.is_empty() {
            return None;
        }
        let n = self.pairs.len() as f64;
        let (lat_sum, lon_sum) = self
            .pairs
            .iter()
            .fold((0.0, 0.0), |(lat, lon), p| (lat + p.latitude, lon + p.longitude));
        Some(CoordinatePair::new(lat_sum / n, lon_sum / n))
    }
}

impl<'a> IntoIterator for &'a CoordinateTable {
    type Item = &'a CoordinatePair;
    type IntoIter = std::slice::Iter<'a, CoordinatePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
