//! Integration tests for converting between 2D indices and flat offsets.

use ndarray::array;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ragged_array::lengths::{partition_indices, partition_list, starts_from_lengths};
use ragged_array::translate::{
    flat_from_2d, flat_to_2d, normalize_negative, per_row_slice, slice_indices, where_ragged,
    where_true,
};
use ragged_array::{ErrorKind, SliceSpec};

fn random_lengths(rng: &mut StdRng) -> Vec<usize> {
    let n = rng.gen_range(1..20);
    (0..n).map(|_| rng.gen_range(0..6)).collect()
}

// ---------------------------------------------------------------------------
// Flat <-> 2D
// ---------------------------------------------------------------------------

#[test]
fn flat_and_2d_are_inverse() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let lengths = random_lengths(&mut rng);
        let total: usize = lengths.iter().sum();
        if total == 0 {
            continue;
        }
        let flat: Vec<usize> = (0..10).map(|_| rng.gen_range(0..total)).collect();

        let coords = flat_to_2d(&flat, Some(&lengths), None).unwrap();
        let rows: Vec<isize> = coords.rows.iter().map(|&r| r as isize).collect();
        let cols: Vec<isize> = coords.cols.iter().map(|&c| c as isize).collect();
        let back = flat_from_2d(&rows, &cols, Some(&lengths), None, true).unwrap();
        assert_eq!(back, flat);

        let starts = starts_from_lengths(&lengths);
        let again = flat_to_2d(&back, None, Some(&starts)).unwrap();
        assert_eq!(again, coords);
    }
}

#[test]
fn negative_indices_match_positive() {
    let lengths = [3, 2, 4];
    let negative = flat_from_2d(&[-1, -3, 0], &[-1, 0, -2], Some(&lengths), None, true).unwrap();
    let positive = flat_from_2d(&[2, 0, 0], &[3, 0, 1], Some(&lengths), None, true).unwrap();
    assert_eq!(negative, positive);
    assert_eq!(positive, vec![8, 0, 1]);
}

#[test]
fn single_row_broadcasts_over_columns() {
    let coords = normalize_negative(&[1], &[0, -1], 2, Some(&[3, 2]), true).unwrap();
    assert_eq!(coords.rows, vec![1, 1]);
    assert_eq!(coords.cols, vec![0, 1]);
}

#[test]
fn missing_layout_is_a_configuration_error() {
    let err = flat_from_2d(&[0], &[0], None, None, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = flat_to_2d(&[0], None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn negative_column_needs_lengths() {
    let starts = [0, 3];
    let err = flat_from_2d(&[0], &[-1], None, Some(&starts), false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    // positive columns work from starts alone
    assert_eq!(
        flat_from_2d(&[1], &[1], None, Some(&starts), false).unwrap(),
        vec![4]
    );
}

#[test]
fn out_of_bounds_is_an_index_error() {
    let lengths = [3, 2];
    let err = flat_from_2d(&[2], &[0], Some(&lengths), None, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
    let err = flat_from_2d(&[1], &[2], Some(&lengths), None, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
    let err = flat_from_2d(&[0], &[-4], Some(&lengths), None, true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
}

#[test]
fn mismatched_lengths_and_starts_are_rejected() {
    let err = flat_from_2d(&[2], &[0], Some(&[3, 2]), Some(&[0, 3, 5]), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataInvalid);
    let err = normalize_negative(&[2], &[0], 3, Some(&[3, 2]), true).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
}

// ---------------------------------------------------------------------------
// Slices
// ---------------------------------------------------------------------------

#[test]
fn slices_clip_to_the_axis() {
    assert_eq!(
        slice_indices(&SliceSpec::range(1, 100), Some(4)).unwrap(),
        vec![1, 2, 3]
    );
    assert_eq!(
        slice_indices(&SliceSpec::start_at(-2), Some(4)).unwrap(),
        vec![2, 3]
    );
    assert_eq!(
        slice_indices(&SliceSpec::reversed(), Some(3)).unwrap(),
        vec![2, 1, 0]
    );
    assert_eq!(
        slice_indices(&SliceSpec::full().with_step(2), Some(5)).unwrap(),
        vec![0, 2, 4]
    );
    assert!(slice_indices(&SliceSpec::range(3, 1), Some(5))
        .unwrap()
        .is_empty());
}

#[test]
fn stop_past_row_end_equals_row_length() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..30 {
        let lengths = random_lengths(&mut rng);
        let rows: Vec<usize> = (0..lengths.len()).collect();
        let start = rng.gen_range(0..3);
        for (i, &len) in lengths.iter().enumerate() {
            let past = per_row_slice(&[i], &SliceSpec::range(start, len as isize + 5), &lengths)
                .unwrap();
            let exact =
                per_row_slice(&[i], &SliceSpec::range(start, len as isize), &lengths).unwrap();
            assert_eq!(past, exact);
        }
        let all = per_row_slice(&rows, &SliceSpec::start_at(start), &lengths).unwrap();
        let expected: Vec<usize> = lengths
            .iter()
            .map(|&l| l.saturating_sub(start as usize))
            .collect();
        assert_eq!(all.new_lengths, expected);
    }
}

#[test]
fn open_slice_without_length_is_a_configuration_error() {
    let err = slice_indices(&SliceSpec::start_at(1), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        slice_indices(&SliceSpec::range(1, 4), None).unwrap(),
        vec![1, 2, 3]
    );
}

#[test]
fn step_past_the_integer_range_yields_one_index() {
    assert_eq!(
        slice_indices(&SliceSpec::new(Some(1), None, Some(isize::MAX)), Some(3)).unwrap(),
        vec![1]
    );
    assert_eq!(
        per_row_slice(&[0], &SliceSpec::new(Some(1), None, Some(isize::MAX)), &[4])
            .unwrap()
            .new_lengths,
        vec![1]
    );
}

#[test]
fn zero_step_is_rejected() {
    let err = slice_indices(&SliceSpec::full().with_step(0), Some(3)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataInvalid);
}

// ---------------------------------------------------------------------------
// Masks and partitions
// ---------------------------------------------------------------------------

#[test]
fn ragged_mask_positions() {
    let mask = [false, true, true, false, true];
    let coords = where_ragged(&mask, &[3, 0, 2]).unwrap();
    assert_eq!(coords.pairs().collect::<Vec<_>>(), vec![(0, 1), (0, 2), (2, 1)]);
}

#[test]
fn rectangular_mask_positions() {
    let mask = array![[true, false], [false, true]];
    let coords = where_true(&mask.view());
    assert_eq!(coords.rows, vec![0, 1]);
    assert_eq!(coords.cols, vec![0, 1]);
}

#[test]
fn partition_helpers() {
    let data = [10, 20, 30, 40];
    let parts = partition_list(&data, &[1, 3]).unwrap();
    assert_eq!(parts[1], &[20, 30, 40]);
    let err = partition_list(&data, &[1, 1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataInvalid);

    assert_eq!(partition_indices(&[0, 3], &[1, 3]), vec![(0, 0), (1, 2)]);
}
