//! Integration tests for appending rows and rendering arrays as text.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ragged_array::{Entry, ErrorKind, RaggedArray, RaggedConfig, RenderStyle, RowInput};

// ---------------------------------------------------------------------------
// Append
// ---------------------------------------------------------------------------

#[test]
fn append_single_row() {
    let mut a = RaggedArray::build(vec![vec![1, 2, 3]]).unwrap();
    a.append(RowInput::Flat(vec![7, 8])).unwrap();
    assert_eq!(a.flat(), &[1, 2, 3, 7, 8]);
    assert_eq!(a.lengths(), &[3, 2]);
    assert_eq!(a.starts(), &[0, 3]);
}

#[test]
fn append_empty_row() {
    let mut a = RaggedArray::from_rows(vec![vec![1, 2, 3]]);
    a.push_row(Vec::new()).unwrap();
    assert_eq!(a.lengths(), &[3, 0]);
    a.append(RowInput::Flat(Vec::new())).unwrap();
    assert_eq!(a.lengths(), &[3, 0, 0]);
    assert_eq!(a.starts(), &[0, 3, 3]);
    assert_eq!(a.flat(), &[1, 2, 3]);

    let mut empty: RaggedArray<i32> = RaggedArray::new();
    empty.push_row(Vec::new()).unwrap();
    assert_eq!(empty.len(), 1);
    assert_eq!(empty.lengths(), &[0]);
}

#[test]
fn append_rows_entries_and_arrays() {
    let mut a = RaggedArray::from_rows(vec![vec![1]]);
    a.append(vec![vec![2, 3], vec![]]).unwrap();
    a.append(vec![Entry::Row(vec![4]), Entry::Row(vec![5, 6])])
        .unwrap();
    a.append(RaggedArray::from_rows(vec![vec![7]])).unwrap();
    a.push_row(vec![8, 9]).unwrap();
    assert_eq!(
        a.to_vecs(),
        vec![vec![1], vec![2, 3], vec![], vec![4], vec![5, 6], vec![7], vec![8, 9]]
    );
}

#[test]
fn append_to_empty_is_a_fresh_build() {
    let mut a: RaggedArray<i32> = RaggedArray::new();
    a.append(vec![vec![1, 2], vec![3]]).unwrap();
    assert_eq!(a.lengths(), &[2, 1]);

    let mut v: RaggedArray<i32> = RaggedArray::new();
    let incoming = RaggedArray::from_parts_with_width(vec![1, 2, 3, 4], 2, vec![2]).unwrap();
    v.append(incoming.clone()).unwrap();
    assert_eq!(v, incoming);
}

#[test]
fn append_rejects_non_rows() {
    let mut a = RaggedArray::from_rows(vec![vec![1]]);
    let err = a.append(RowInput::Scalar(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataInvalid);

    let err = a
        .append(vec![Entry::Row(vec![2]), Entry::Scalar(3)])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataInvalid);
    assert_eq!(a.lengths(), &[1]);
}

#[test]
fn append_checks_trailing_width() {
    let mut a = RaggedArray::from_parts_with_width(vec![1, 2, 3, 4], 2, vec![2]).unwrap();

    let wider = RaggedArray::from_parts_with_width(vec![0; 3], 3, vec![1]).unwrap();
    let err = a.append(wider).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataInvalid);

    // raw rows are read as whole elements
    a.append(vec![vec![5, 6, 7, 8]]).unwrap();
    assert_eq!(a.lengths(), &[2, 2]);
    let err = a.append(vec![vec![9, 9, 9]]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataInvalid);
}

#[test]
fn append_is_associative() {
    let mut rng = StdRng::seed_from_u64(21);
    let chunk = |rng: &mut StdRng| -> Vec<Vec<u32>> {
        (0..rng.gen_range(1..5))
            .map(|_| (0..rng.gen_range(0..4)).map(|_| rng.gen_range(0..50)).collect())
            .collect()
    };
    for _ in 0..10 {
        let (x, y, z) = (chunk(&mut rng), chunk(&mut rng), chunk(&mut rng));

        let mut left = RaggedArray::from_rows(x.clone());
        left.append(y.clone()).unwrap();
        left.append(z.clone()).unwrap();

        let mut yz = RaggedArray::from_rows(y);
        yz.append(z).unwrap();
        let mut right = RaggedArray::from_rows(x);
        right.append(yz).unwrap();

        assert_eq!(left, right);
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn debug_and_plain_rendering() {
    let a = RaggedArray::from_rows(vec![vec![1, 2, 3], vec![4, 5]]);
    assert_eq!(
        format!("{:?}", a),
        "RaggedArray([\n      [1, 2, 3],\n      [4, 5]])"
    );
    assert_eq!(a.to_string(), "[ [1, 2, 3],\n [4, 5]]");
}

#[test]
fn long_arrays_are_elided() {
    let a = RaggedArray::from_rows((0..8).map(|i| vec![i]));
    let text = a.render(RenderStyle::Debug);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "RaggedArray([");
    assert_eq!(lines[1], "      [0],");
    assert_eq!(lines[4], "      ...,");
    assert_eq!(lines[7], "      [7]])");
    assert_eq!(lines.len(), 8);
    assert!(!text.contains("[3]"));

    let six = RaggedArray::from_rows((0..6).map(|i| vec![i]));
    assert!(!six.to_string().contains("..."));
}

#[test]
fn vector_elements_render_nested() {
    let a = RaggedArray::from_parts_with_width(vec![1, 2, 3, 4, 5, 6], 2, vec![2, 1]).unwrap();
    assert_eq!(a.to_string(), "[ [[1, 2], [3, 4]],\n [[5, 6]]]");
}

#[test]
fn empty_rendering() {
    let a: RaggedArray<i32> = RaggedArray::new();
    assert_eq!(format!("{:?}", a), "RaggedArray([\n])");
    assert_eq!(a.to_string(), "[]");
}

#[test]
fn render_style_from_config() {
    let a = RaggedArray::from_rows(vec![vec![1.5]]);
    let config: RaggedConfig = serde_json::from_str(r#"{"render_style": "plain"}"#).unwrap();
    assert_eq!(a.render(config.render_style), "[ [1.5]]");
}
