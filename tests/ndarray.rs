//! Round trips through the `ndarray` extension traits.

use mat73::{Error, MatFile, Mode, ReadMatExt, WriteMatExt};
use ndarray::{array, Array, Array1, Array2, Array3, ArrayD};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn mat_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn write_session(path: &Path) -> MatFile {
    let mut mat = MatFile::new(Mode::Write);
    mat.open(path).unwrap();
    mat
}

fn read_session(path: &Path) -> MatFile {
    let mut mat = MatFile::new(Mode::Read);
    mat.open(path).unwrap();
    mat
}

#[test]
fn roundtrip_array2() {
    let dir = TempDir::new().unwrap();
    let path = mat_path(&dir, "m.mat");
    let arr = array![[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]];

    let mut mat = write_session(&path);
    arr.write_mat(&mat, "m").unwrap();
    mat.close().unwrap();

    let mat = read_session(&path);
    let back = Array2::<f64>::read_mat(&mat, "m").unwrap();
    assert_eq!(back, arr);
}

#[test]
fn roundtrip_array1_and_array3() {
    let dir = TempDir::new().unwrap();
    let path = mat_path(&dir, "ranks.mat");
    let vector = Array1::from_iter((0..7).map(|i| i as f32));
    let cube = Array::from_shape_fn((2, 3, 4), |(i, j, k)| (i * 12 + j * 4 + k) as i32);

    let mut mat = write_session(&path);
    vector.write_mat(&mat, "vector").unwrap();
    cube.write_mat(&mat, "cube").unwrap();
    mat.close().unwrap();

    let mat = read_session(&path);
    assert_eq!(Array1::<f32>::read_mat(&mat, "vector").unwrap(), vector);
    assert_eq!(Array3::<i32>::read_mat(&mat, "cube").unwrap(), cube);
}

#[test]
fn roundtrip_dynamic_dimensionality() {
    let dir = TempDir::new().unwrap();
    let path = mat_path(&dir, "dyn.mat");
    let arr = array![[1u16, 2], [3, 4], [5, 6]];

    let mut mat = write_session(&path);
    arr.write_mat(&mat, "m").unwrap();
    mat.close().unwrap();

    let mat = read_session(&path);
    let back = ArrayD::<u16>::read_mat(&mat, "m").unwrap();
    assert_eq!(back.shape(), [3, 2]);
    assert_eq!(back.into_dimensionality().unwrap(), arr);
}

#[test]
fn non_standard_layout_is_copied_before_writing() {
    let dir = TempDir::new().unwrap();
    let path = mat_path(&dir, "t.mat");
    let arr = array![[1.0f64, 2.0], [3.0, 4.0], [5.0, 6.0]];
    let transposed = arr.t();

    let mut mat = write_session(&path);
    transposed.write_mat(&mat, "t").unwrap();
    mat.close().unwrap();

    let mat = read_session(&path);
    let back = Array2::<f64>::read_mat(&mat, "t").unwrap();
    assert_eq!(back, transposed);
}

#[test]
fn wrong_dimensionality_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = mat_path(&dir, "nd.mat");

    let mut mat = write_session(&path);
    Array1::from_iter(0..5i32).write_mat(&mat, "v").unwrap();
    mat.close().unwrap();

    let mat = read_session(&path);
    assert!(matches!(
        Array3::<i32>::read_mat(&mat, "v"),
        Err(Error::WrongNdim { expected: Some(3), actual: 1 })
    ));
}
