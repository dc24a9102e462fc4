//! Coordinate extraction from page text.
//!
//! Every strategy shares one path for a candidate pair: normalize both
//! tokens, drop anything outside the bounding box, round and insert into a
//! [`CoordinateSet`]. Strategies only differ in where they look for pairs.

use crate::domain::model::{BoundingBox, CoordinateSet, CoordinateTable, PageText};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_ordered, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRECISION: u32 = 6;
pub const DEFAULT_IDENTIFIER_DIGITS: usize = 4;

/// Where to look for coordinate pairs in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Strategy {
    /// Whole page, pairs may wrap across lines.
    WholeText,
    /// Only rows that start with a numeric identifier, pairs on one line.
    LineAnchored,
    /// Union of both.
    #[default]
    Combined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    pub strategy: Strategy,
    /// Decimal places kept before deduplication.
    pub precision: u32,
    /// Minimum leading digits for a row to count as a data row.
    pub identifier_digits: usize,
    pub region: BoundingBox,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            precision: DEFAULT_PRECISION,
            identifier_digits: DEFAULT_IDENTIFIER_DIGITS,
            region: BoundingBox::default(),
        }
    }
}

impl Validate for ExtractionConfig {
    fn validate(&self) -> Result<()> {
        validate_range("extract.precision", self.precision, 0, 12)?;
        validate_positive_number("extract.identifier_digits", self.identifier_digits, 1)?;

        let region = &self.region;
        validate_range("extract.region.min_lat", region.min_lat, -90.0, 90.0)?;
        validate_range("extract.region.max_lat", region.max_lat, -90.0, 90.0)?;
        validate_range("extract.region.min_lon", region.min_lon, -180.0, 180.0)?;
        validate_range("extract.region.max_lon", region.max_lon, -180.0, 180.0)?;
        validate_ordered("extract.region.latitude", region.min_lat, region.max_lat)?;
        validate_ordered("extract.region.longitude", region.min_lon, region.max_lon)?;
        Ok(())
    }
}

/// Parses a matched token such as `41,555 616` into `41.555616`.
///
/// Interior whitespace is dropped and `,` is read as the decimal separator.
pub fn normalize_token(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().ok()
}

/// Regex alternation of every integer part a value inside `[min, max]` can
/// be written with, longest first.
fn integer_parts(min: f64, max: f64) -> String {
    let lo = min.trunc() as i64;
    let hi = max.trunc() as i64;

    let mut parts = Vec::new();
    for i in lo..=hi {
        match i {
            0 => {
                if min < 0.0 {
                    parts.push("-0".to_string());
                }
                if max >= 0.0 {
                    parts.push("0".to_string());
                }
            }
            _ => parts.push(i.to_string()),
        }
    }
    parts.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    format!("(?:{})", parts.join("|"))
}

/// A number with `.` or `,` as decimal separator. The fractional part may be
/// split into space-separated groups of three digits.
fn token_pattern(integer_parts: &str) -> String {
    format!(r"{}[.,](?:[0-9]{{3}}(?: [0-9]{{3}}\b)+|[0-9]+)", integer_parts)
}

pub struct CoordinateExtractor {
    config: ExtractionConfig,
    whole_text: Regex,
    single_line: Regex,
    row_identifier: Regex,
}

impl CoordinateExtractor {
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        config.validate()?;

        let region = &config.region;
        let lat = token_pattern(&integer_parts(region.min_lat, region.max_lat));
        let lon = token_pattern(&integer_parts(region.min_lon, region.max_lon));

        let whole_text = Regex::new(&format!(r"({})[ \t\r\n]+({})", lat, lon))?;
        let single_line = Regex::new(&format!(r"({}) +({})", lat, lon))?;
        let row_identifier = Regex::new(&format!(r"^[0-9]{{{}}}", config.identifier_digits))?;

        tracing::debug!("Coordinate pattern: {}", whole_text.as_str());

        Ok(Self {
            config,
            whole_text,
            single_line,
            row_identifier,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Scans the whole text. The two tokens may be separated by line breaks.
    pub fn scan_whole_text(&self, text: &str) -> CoordinateSet {
        let mut set = CoordinateSet::new(self.config.precision);
        self.collect_pairs(&self.whole_text, text, &mut set);
        set
    }

    /// Scans only lines that start with a numeric row identifier, and only
    /// pairs separated by plain spaces on that line.
    pub fn scan_line_anchored(&self, text: &str) -> CoordinateSet {
        let mut set = CoordinateSet::new(self.config.precision);
        for line in text.lines().map(str::trim) {
            if self.row_identifier.is_match(line) {
                self.collect_pairs(&self.single_line, line, &mut set);
            }
        }
        set
    }

    /// Scans with the configured strategy.
    pub fn scan(&self, text: &str) -> CoordinateSet {
        match self.config.strategy {
            Strategy::WholeText => self.scan_whole_text(text),
            Strategy::LineAnchored => self.scan_line_anchored(text),
            Strategy::Combined => {
                let mut set = self.scan_line_anchored(text);
                set.merge(self.scan_whole_text(text));
                set
            }
        }
    }

    /// Scans every page and returns the sorted, deduplicated table.
    /// Pages without text are skipped.
    pub fn extract_pages(&self, pages: &[PageText]) -> CoordinateTable {
        let mut all = CoordinateSet::new(self.config.precision);
        for page in pages {
            let Some(text) = page.content() else {
                tracing::debug!("Page {} has no text layer, skipping", page.number);
                continue;
            };
            let found = self.scan(text);
            tracing::debug!("Page {}: {} unique coordinate(s)", page.number, found.len());
            all.merge(found);
        }
        all.into_table()
    }

    fn collect_pairs(&self, pattern: &Regex, text: &str, set: &mut CoordinateSet) {
        for caps in pattern.captures_iter(text) {
            self.record_pair(set, &caps[1], &caps[2]);
        }
    }

    /// Inserts a raw candidate pair. Returns `false` for tokens that do not
    /// parse or fall outside the region.
    pub(crate) fn record_pair(
        &self,
        set: &mut CoordinateSet,
        raw_lat: &str,
        raw_lon: &str,
    ) -> bool {
        let (Some(lat), Some(lon)) = (normalize_token(raw_lat), normalize_token(raw_lon)) else {
            tracing::trace!("Unparseable candidate: {:?} {:?}", raw_lat, raw_lon);
            return false;
        };
        if !self.config.region.contains(lat, lon) {
            tracing::trace!("Candidate outside region: {} {}", lat, lon);
            return false;
        }
        set.insert(lat, lon);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> CoordinateExtractor {
        CoordinateExtractor::new(ExtractionConfig::default()).unwrap()
    }

    fn pairs(set: CoordinateSet) -> Vec<(f64, f64)> {
        set.into_table()
            .iter()
            .map(|p| (p.latitude, p.longitude))
            .collect()
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("41,555 616"), Some(41.555616));
        assert_eq!(normalize_token("41.555616"), Some(41.555616));
        assert_eq!(normalize_token("69,123456"), Some(69.123456));
        assert_eq!(normalize_token("41,5,5"), None);
        assert_eq!(normalize_token(""), None);
    }

    #[test]
    fn test_integer_parts_for_default_region() {
        assert_eq!(integer_parts(38.0, 43.0), "(?:38|39|40|41|42|43)");
        assert_eq!(integer_parts(-1.5, 1.0), "(?:-0|-1|0|1)");
    }

    #[test]
    fn test_whole_text_finds_wrapped_pair() {
        let text = "Camera on the ring road\n41,555616\n69,123456\nmore text";
        assert_eq!(pairs(extractor().scan_whole_text(text)), vec![(41.555616, 69.123456)]);
    }

    #[test]
    fn test_line_anchored_requires_identifier() {
        let x = extractor();
        let anchored = "0012 Camera Chilonzor 41,555616 69,123456 north";
        assert_eq!(pairs(x.scan_line_anchored(anchored)), vec![(41.555616, 69.123456)]);

        let unanchored = "Camera Chilonzor 41,555616 69,123456 north";
        assert!(x.scan_line_anchored(unanchored).is_empty());

        let wrapped = "0012 Camera Chilonzor 41,555616\n69,123456";
        assert!(x.scan_line_anchored(wrapped).is_empty());
    }

    #[test]
    fn test_grouped_fraction_digits() {
        let text = "0007 41,555 616 69,123 456";
        assert_eq!(pairs(extractor().scan_line_anchored(text)), vec![(41.555616, 69.123456)]);
    }

    #[test]
    fn test_trailing_row_number_is_not_absorbed() {
        let text = "41.555616 69.123456 001 next row";
        assert_eq!(pairs(extractor().scan_whole_text(text)), vec![(41.555616, 69.123456)]);
    }

    #[test]
    fn test_out_of_region_values_are_dropped() {
        let config = ExtractionConfig {
            region: BoundingBox::new(38.6, 43.0, 66.0, 74.0),
            ..ExtractionConfig::default()
        };
        let x = CoordinateExtractor::new(config).unwrap();
        let text = "38.5 69.1\n41.2 65.9\n41.2 69.3\n38.5 69.1";
        assert_eq!(pairs(x.scan_whole_text(text)), vec![(41.2, 69.3)]);
    }

    #[test]
    fn test_latitude_below_region_is_excluded() {
        assert!(extractor().scan_whole_text("30.0 69.0").is_empty());
        assert!(extractor().scan_whole_text("0001 30,000000 69,000000").is_empty());
    }

    #[test]
    fn test_record_pair_skips_malformed_tokens() {
        let x = extractor();
        let mut set = CoordinateSet::new(DEFAULT_PRECISION);
        assert!(!x.record_pair(&mut set, "41,5,5", "69,1"));
        assert!(!x.record_pair(&mut set, "41.5", "abc"));
        assert!(x.record_pair(&mut set, "41.5", "69.1"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicates_in_mixed_formats_collapse() {
        let text = "0001 41,555616 69,123456\n\
                    0002 41.555616 69.123456\n\
                    41,555 616\n69,123 456\n\
                    41.5556161 69.1234559";
        let x = extractor();
        assert_eq!(pairs(x.scan(text)), vec![(41.555616, 69.123456)]);
    }

    #[test]
    fn test_combined_is_union_of_strategies() {
        let text = "0001 40.1 66.1\nstray 41.2\n67.2";
        let x = extractor();
        assert_eq!(pairs(x.scan_line_anchored(text)), vec![(40.1, 66.1)]);
        assert_eq!(pairs(x.scan(text)), vec![(40.1, 66.1), (41.2, 67.2)]);
    }

    #[test]
    fn test_extract_pages_skips_missing_text() {
        let pages = vec![
            PageText::new(1, None),
            PageText::new(2, Some(String::new())),
            PageText::new(3, Some("0003 42.000001 70.5".to_string())),
            PageText::new(4, Some("0004 39.25 61.75".to_string())),
        ];
        let table = extractor().extract_pages(&pages);
        let got: Vec<(f64, f64)> = table.iter().map(|p| (p.latitude, p.longitude)).collect();
        assert_eq!(got, vec![(39.25, 61.75), (42.000001, 70.5)]);
    }

    #[test]
    fn test_invalid_region_is_rejected() {
        let config = ExtractionConfig {
            region: BoundingBox::new(43.0, 38.0, 60.0, 74.0),
            ..ExtractionConfig::default()
        };
        assert!(CoordinateExtractor::new(config).is_err());
    }
}
