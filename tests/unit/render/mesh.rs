use super::*;

#[test]
fn counts_follow_grid_size() {
    let m = GridMesh::new(24, 72).unwrap();
    assert_eq!(m.vertex_count(), 25 * 73);
    assert_eq!(m.index_count(), 24 * 72 * 6);
    assert_eq!(m.triangles().count(), 24 * 72 * 2);
}

#[test]
fn zero_counts_become_one_cell() {
    let m = GridMesh::new(0, 0).unwrap();
    assert_eq!((m.cols, m.rows), (1, 1));
    assert_eq!(m.positions, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
    assert_eq!(m.indices, vec![0, 2, 1, 1, 2, 3]);
}

#[test]
fn positions_double_as_uvs_and_span_the_unit_square() {
    let m = GridMesh::new(3, 2).unwrap();
    assert_eq!(m.positions, m.uvs);
    assert_eq!(m.positions.first(), Some(&[0.0, 0.0]));
    assert_eq!(m.positions.last(), Some(&[1.0, 1.0]));
    assert_eq!(m.positions[4], [0.0, 0.5]);
}

#[test]
fn indices_stay_in_range() {
    let m = GridMesh::new(7, 5).unwrap();
    let n = m.vertex_count() as u32;
    assert!(m.indices.iter().all(|&i| i < n));
}

#[test]
fn oversized_grid_is_rejected_instead_of_wrapping() {
    let err = GridMesh::new(u32::MAX, 2).unwrap_err();
    assert!(matches!(err, GenieError::Usage(_)), "{err}");
    assert!(GridMesh::new(70_000, 70_000).is_err());
}
