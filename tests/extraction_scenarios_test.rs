use pdf_coord_map::{
    BoundingBox, CoordinateExtractor, ExtractionConfig, PageText, Strategy,
};

fn extractor_with(strategy: Strategy) -> CoordinateExtractor {
    CoordinateExtractor::new(ExtractionConfig {
        strategy,
        ..ExtractionConfig::default()
    })
    .unwrap()
}

fn as_tuples(extractor: &CoordinateExtractor, pages: &[PageText]) -> Vec<(f64, f64)> {
    extractor
        .extract_pages(pages)
        .iter()
        .map(|p| (p.latitude, p.longitude))
        .collect()
}

fn page(number: usize, text: &str) -> PageText {
    PageText::new(number, Some(text.to_string()))
}

const CAMERA_LIST: &str = "\
Reestr of traffic cameras
No. Camera Address Direction Lat Lon
0012 Camera Chilonzor ave 41,555616 69,123456 north
0013 Camera Amir Temur st 41.311081 69.279737 south
0014 Camera Yunusobod 41,366 123 69,288 456 east
Appendix: the Ring road camera is located at 41.298765
69.301234 (see map).
Outside the region: 0015 30,000000 69,000000
";

#[test]
fn line_anchored_scan_reads_identified_rows_only() {
    let x = extractor_with(Strategy::LineAnchored);
    assert_eq!(
        as_tuples(&x, &[page(1, CAMERA_LIST)]),
        vec![
            (41.311081, 69.279737),
            (41.366123, 69.288456),
            (41.555616, 69.123456),
        ]
    );
}

#[test]
fn whole_text_scan_finds_wrapped_pair() {
    let x = extractor_with(Strategy::WholeText);
    let found = as_tuples(&x, &[page(1, CAMERA_LIST)]);
    assert!(found.contains(&(41.298765, 69.301234)));
    assert!(found.contains(&(41.555616, 69.123456)));
}

#[test]
fn combined_scan_is_the_union() {
    let x = extractor_with(Strategy::Combined);
    assert_eq!(
        as_tuples(&x, &[page(1, CAMERA_LIST)]),
        vec![
            (41.298765, 69.301234),
            (41.311081, 69.279737),
            (41.366123, 69.288456),
            (41.555616, 69.123456),
        ]
    );
}

#[test]
fn out_of_region_pairs_never_appear() {
    let x = extractor_with(Strategy::Combined);
    let text = CAMERA_LIST.repeat(3);
    let found = as_tuples(&x, &[page(1, &text), page(2, &text)]);

    let region = BoundingBox::default();
    assert!(found.iter().all(|&(lat, lon)| region.contains(lat, lon)));
    assert!(!found.contains(&(30.0, 69.0)));
}

#[test]
fn narrower_longitude_range_is_configurable() {
    let x = CoordinateExtractor::new(ExtractionConfig {
        region: BoundingBox::new(38.0, 43.0, 66.0, 74.0),
        ..ExtractionConfig::default()
    })
    .unwrap();
    let text = "0001 40.5 61.5\n0002 40.5 67.5\n";
    assert_eq!(as_tuples(&x, &[page(1, text)]), vec![(40.5, 67.5)]);
}

#[test]
fn same_pair_in_many_styles_yields_one_entry() {
    let x = extractor_with(Strategy::Combined);
    let pages = vec![
        page(1, "0001 41,555616 69,123456"),
        page(2, "0002 41.555616   69.123456\n41,555 616\n\n69,123 456"),
        page(3, "41.5556162\t69.1234558"),
    ];
    assert_eq!(as_tuples(&x, &pages), vec![(41.555616, 69.123456)]);
}

#[test]
fn extraction_is_deterministic() {
    let x = extractor_with(Strategy::Combined);
    let pages = vec![page(1, CAMERA_LIST), page(2, "0100 38.5 73.9\n0101 42.9 60.1")];

    let first = x.extract_pages(&pages);
    let second = x.extract_pages(&pages);
    assert_eq!(first, second);

    let lats: Vec<(f64, f64)> = first.iter().map(|p| (p.latitude, p.longitude)).collect();
    let mut sorted = lats.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(lats, sorted);
}

#[test]
fn pages_without_text_are_skipped() {
    let x = extractor_with(Strategy::Combined);
    let pages = vec![
        PageText::new(1, None),
        page(2, ""),
        page(3, "0003 40.1 66.1"),
    ];
    assert_eq!(as_tuples(&x, &pages), vec![(40.1, 66.1)]);

    assert!(x.extract_pages(&[PageText::new(1, None)]).is_empty());
}
