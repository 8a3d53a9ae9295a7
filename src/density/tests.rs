use super::*;

fn striped(w: usize, h: usize) -> ColorImage {
    ColorImage::from_fn(w, h, |x, y| {
        if (x + 2 * y) % 5 < 2 {
            [50, 35, 20]
        } else {
            [200, 170, 140]
        }
    })
}

/// Left half fully covered, right half empty, plus one sparse cell.
fn half_mask(w: usize, h: usize) -> HairMask {
    HairMask::from_fn(w, h, |x, y| x < w / 2 || (x >= 64 && x < 68 && y < 8))
}

#[test]
fn maps_follow_the_grid_and_stay_in_range() {
    let est = DensityEstimator::default();
    let img = striped(100, 70);
    let mask = half_mask(100, 70);
    let out = est.estimate_with_workers(&img, &mask, 2).unwrap();

    assert_eq!((out.density.rows, out.density.cols), (2, 3));
    assert_eq!((out.confidence.rows, out.confidence.cols), (2, 3));
    assert_eq!(out.stats.cells_total, 6);
    for (&d, &c) in out.density.data.iter().zip(&out.confidence.data) {
        assert!((0.0..=1.0).contains(&d));
        assert!((0.0..=1.0).contains(&c));
        if c <= 0.1 {
            assert_eq!(d, 0.0);
        }
    }
    // Column 0 is fully inside the covered half.
    assert_eq!(out.confidence.get(0, 0), 1.0);
    assert!(out.density.get(0, 0) > 0.0);
    // Cell (0, 2) holds the sparse 4x8 block: 32 / 1024 coverage.
    assert!((out.confidence.get(0, 2) - 32.0 / 1024.0).abs() < 1e-6);
    assert_eq!(out.density.get(0, 2), 0.0);
    assert_eq!(out.stats.cells_analyzed + out.stats.cells_skipped, 6);
}

#[test]
fn worker_count_does_not_change_the_result() {
    let est = DensityEstimator::default();
    let img = striped(128, 96);
    let mask = half_mask(128, 96);
    let one = est.estimate_with_workers(&img, &mask, 1).unwrap();
    let eight = est.estimate_with_workers(&img, &mask, 8).unwrap();
    assert_eq!(one.density, eight.density);
    assert_eq!(one.confidence, eight.confidence);
}

#[test]
fn empty_mask_gives_all_zero_maps() {
    let est = DensityEstimator::default();
    let img = striped(64, 64);
    let out = est.estimate(&img, &HairMask::new(64, 64)).unwrap();
    assert!(out.density.data.iter().all(|&v| v == 0.0));
    assert!(out.confidence.data.iter().all(|&v| v == 0.0));
    assert_eq!(out.stats.cells_analyzed, 0);
}

#[test]
fn image_smaller_than_a_cell_has_an_empty_grid() {
    let est = DensityEstimator::default();
    let out = est.estimate(&striped(20, 40), &HairMask::new(20, 40)).unwrap();
    assert_eq!(out.density.rows, 1);
    assert_eq!(out.density.cols, 0);
    assert!(out.density.data.is_empty());
}

#[test]
fn mismatched_mask_is_rejected() {
    let est = DensityEstimator::default();
    let err = est
        .estimate(&striped(64, 64), &HairMask::new(64, 32))
        .unwrap_err();
    assert!(matches!(err, Error::MaskMismatch { mask_h: 32, .. }));
}

fn tasks_with_one_malformed(est: &DensityEstimator) -> (Grid, Vec<CellTask>) {
    let img = striped(64, 64);
    let mask = HairMask::from_fn(64, 64, |_, _| true);
    let (grid, mut tasks) = est.build_tasks(&img, &mask).unwrap();
    tasks[1].image = tasks[1].image.crop(0, 0, 16, 16);
    (grid, tasks)
}

#[test]
fn failed_cell_aborts_by_default() {
    let est = DensityEstimator::default();
    let (grid, tasks) = tasks_with_one_malformed(&est);
    let err = est.run_tasks(grid, &tasks, 4).unwrap_err();
    assert!(matches!(err, Error::CellShape { row: 0, col: 1, .. }));
}

#[test]
fn failed_cell_can_be_zeroed_without_touching_neighbours() {
    let est = DensityEstimator::new(DensityParams {
        failure_policy: CellFailurePolicy::ZeroConfidence,
        ..DensityParams::default()
    });
    let (grid, tasks) = tasks_with_one_malformed(&est);
    let out = est.run_tasks(grid, &tasks, 4).unwrap();
    assert_eq!(out.stats.cells_failed, 1);
    assert_eq!(out.stats.cells_analyzed, 3);
    assert_eq!(out.confidence.get(0, 1), 0.0);
    assert_eq!(out.density.get(0, 1), 0.0);
    for (r, c) in [(0, 0), (1, 0), (1, 1)] {
        assert_eq!(out.confidence.get(r, c), 1.0);
        assert!(out.density.get(r, c) > 0.0);
    }
}

#[test]
fn results_are_placed_by_cell_identity() {
    let est = DensityEstimator::default();
    let img = striped(64, 64);
    let mask = HairMask::from_fn(64, 64, |x, y| x >= 32 && y < 32);
    let (grid, mut tasks) = est.build_tasks(&img, &mask).unwrap();
    tasks.reverse();
    let out = est.run_tasks(grid, &tasks, 3).unwrap();
    assert_eq!(out.confidence.get(0, 1), 1.0);
    assert_eq!(out.confidence.get(0, 0), 0.0);
    assert_eq!(out.confidence.get(1, 1), 0.0);
}

#[test]
fn out_of_grid_task_is_an_error() {
    let est = DensityEstimator::default();
    let img = striped(64, 64);
    let mask = HairMask::new(64, 64);
    let (grid, mut tasks) = est.build_tasks(&img, &mask).unwrap();
    tasks[0].row = 9;
    let err = est.run_tasks(grid, &tasks, 1).unwrap_err();
    assert!(matches!(err, Error::CellOutOfGrid { row: 9, .. }));
}
