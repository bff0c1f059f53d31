use prism_tools::color::{build_palette_lookup, RampSpace};
use prism_tools::header::parse_header;
use prism_tools::package::package;
use prism_tools::show::{ShowGenerator, SineWave};
use std::collections::BTreeMap;

#[test]
fn end_to_end_sine_wave_packages_and_parses() {
  let _ = env_logger::builder().is_test(true).filter_level(log::LevelFilter::max()).try_init();
  let lookup = build_palette_lookup(&["#000000", "#ffffff"], RampSpace::Hsv, 256).unwrap();
  let show = SineWave::new(&lookup, 16, 24.0, 1.0, 0.8, 2.0, 0.0, 1.0, 0.0, Some(7)).unwrap();
  let frames = show.generate_frames(24.0);

  let pkg = package(&frames, 16, 24.0, 32, 0, 0, BTreeMap::new()).unwrap();
  let parsed = parse_header(&pkg.bytes).unwrap();

  assert_eq!(parsed.led_count, 16);
  assert_eq!(parsed.frame_count as usize, frames.len());
  assert!(parsed.extension.contains_key("palette"));
}

#[test]
fn header_parser_never_panics_on_random_bytes() {
  for len in [0usize, 10, 63, 64, 80, 200] {
    let mut buf = vec![0u8; len];
    getrandom::getrandom(&mut buf).unwrap();
    // Random bytes almost never form a valid header; the only requirement
    // here is that parsing never panics, regardless of outcome.
    let _ = parse_header(&buf);
  }
}

#[test]
fn testbed_vectors_all_pass() {
  let _ = env_logger::builder().is_test(true).filter_level(log::LevelFilter::max()).try_init();
  assert!(prism_tools::testbed::run_all().is_empty());
}
