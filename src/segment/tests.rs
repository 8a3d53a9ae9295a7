use super::*;
use crate::preprocess::Preprocessor;

const BROWN: [u8; 3] = [139, 90, 43];
const SKIN: [u8; 3] = [245, 245, 240];

fn patch_image(w: usize, h: usize, x0: usize, y0: usize, side: usize, fill: [u8; 3]) -> ColorImage {
    ColorImage::from_fn(w, h, |x, y| {
        if (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y) {
            fill
        } else {
            SKIN
        }
    })
}

fn lcg_noise(w: usize, h: usize) -> ColorImage {
    let mut state = 0x1234_5678u32;
    ColorImage::from_fn(w, h, |_, _| {
        let mut px = [0u8; 3];
        for c in &mut px {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            *c = (state >> 16) as u8;
        }
        px
    })
}

#[test]
fn default_ranges_are_pairwise_disjoint() {
    let ranges = SegmentParams::default().ranges;
    for (i, a) in ranges.iter().enumerate() {
        for b in ranges.iter().skip(i + 1) {
            assert!(a.is_disjoint(b), "{} overlaps {}", a.name, b.name);
        }
    }
}

#[test]
fn classify_recognises_each_hair_tone() {
    let seg = Segmenter::default();
    let img = ColorImage::from_fn(4, 1, |x, _| match x {
        0 => [30, 25, 20],
        1 => BROWN,
        2 => [230, 200, 120],
        _ => SKIN,
    });
    let mask = seg.classify(&img);
    assert_eq!(mask.data, vec![true, true, true, false]);
}

#[test]
fn large_brown_patch_is_kept() {
    let seg = Segmenter::default();
    let img = patch_image(128, 128, 30, 30, 60, BROWN);
    let (mask, stats) = seg.segment_with_stats(&img);
    assert_eq!(stats.regions_kept, 1);
    // Opening with the ellipse trims a couple of pixels at each corner.
    let count = mask.count();
    assert!((3580..=3600).contains(&count), "count={count}");
    assert!(mask.get(60, 60));
    assert!(!mask.get(5, 5));
}

#[test]
fn small_patch_is_suppressed() {
    let seg = Segmenter::default();
    let img = patch_image(128, 128, 50, 50, 20, BROWN);
    let mask = seg.segment(&img);
    assert!(mask.is_empty(), "expected no hair, got {} px", mask.count());
}

#[test]
fn segmentation_is_deterministic() {
    let seg = Segmenter::default();
    let img = lcg_noise(256, 256);
    let a = seg.segment(&img);
    let b = seg.segment(&img);
    assert_eq!(a, b);
}

#[test]
fn preprocessed_black_frame_has_no_hair() {
    let pre = Preprocessor::default();
    let black = ColorImage::new(1024, 1024);
    let img = pre.process(&black, "front").unwrap();
    let mask = Segmenter::default().segment(&img);
    assert!(mask.is_empty());
}
