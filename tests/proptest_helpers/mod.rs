#![allow(dead_code)]

use dota2yolo::ir::{ImageRecord, Pixel, Quad};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Pixel tolerance for a normalize/denormalize round trip on an image side.
pub fn eps_pixel(image_w: usize, image_h: usize) -> f64 {
    image_w.max(image_h) as f64 * 1e-9
}

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Image sizes in the range DOTA ships (small crops up to large scenes).
pub fn image_size_strategy() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=8192, 1usize..=8192)
}

/// A quad whose corners all lie inside a `width x height` image.
pub fn inside_quad_strategy(width: usize, height: usize) -> BoxedStrategy<Quad<Pixel>> {
    let w = width as f64;
    let h = height as f64;
    prop::array::uniform8(0.0f64..=1.0)
        .prop_map(move |unit| {
            let mut flat = [0.0; 8];
            for (idx, value) in unit.iter().enumerate() {
                flat[idx] = if idx % 2 == 0 { value * w } else { value * h };
            }
            Quad::from_flat(flat)
        })
        .boxed()
}

/// A quad with corners anywhere, including well outside the image.
pub fn any_quad_strategy() -> BoxedStrategy<Quad<Pixel>> {
    prop::array::uniform8(-20_000.0f64..20_000.0)
        .prop_map(Quad::from_flat)
        .boxed()
}

/// Distinct image records named like DOTA patches.
pub fn image_set_strategy(max: usize) -> BoxedStrategy<Vec<ImageRecord>> {
    prop::collection::btree_set(0u32..100_000, 0..=max)
        .prop_map(|ids| {
            ids.into_iter()
                .map(|id| ImageRecord::new(format!("/data/PNGImages/P{id:05}.png")))
                .collect()
        })
        .boxed()
}

/// Class names made of the characters DOTA category names use.
pub fn class_names_strategy() -> BoxedStrategy<Vec<String>> {
    prop::collection::vec("[a-z][a-z-]{0,11}", 1..12).boxed()
}
