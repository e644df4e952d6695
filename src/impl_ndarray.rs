use crate::{Dims, Element, Error, MatFile, Result};
use ndarray::{prelude::*, Data, DataOwned, IntoDimension as _};

/// Extension trait for writing `ndarray` arrays to an open MAT-file.
///
/// # Example
///
/// ```no_run
/// use mat73::{MatFile, Mode, WriteMatExt};
/// use ndarray::array;
///
/// let mut mat = MatFile::new(Mode::Write);
/// mat.open("results.mat")?;
/// array![[1.0f64, 2.0], [3.0, 4.0]].write_mat(&mat, "m")?;
/// mat.close()?;
/// # Ok::<_, mat73::Error>(())
/// ```
pub trait WriteMatExt {
    /// Writes the array as the dataset `name`.
    ///
    /// The array must have rank 3 or lower. Arrays not in standard layout
    /// are copied into one before writing.
    fn write_mat(&self, mat: &MatFile, name: &str) -> Result<()>;
}

impl<A, S, D> WriteMatExt for ArrayBase<S, D>
where
    A: Element,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn write_mat(&self, mat: &MatFile, name: &str) -> Result<()> {
        let dims = dims_of(self.shape())?;
        if let Some(slice) = self.as_slice() {
            mat.write_array(name, slice, dims)
        } else {
            let standard = self.as_standard_layout();
            mat.write_array(name, standard.as_slice().unwrap(), dims)
        }
    }
}

/// Extension trait for reading `ndarray` arrays from an open MAT-file.
///
/// # Example
///
/// ```no_run
/// use mat73::{MatFile, Mode, ReadMatExt};
/// use ndarray::Array2;
///
/// let mut mat = MatFile::new(Mode::Read);
/// mat.open("results.mat")?;
/// let m = Array2::<f64>::read_mat(&mat, "m")?;
/// # let _ = m;
/// # Ok::<_, mat73::Error>(())
/// ```
pub trait ReadMatExt: Sized {
    /// Reads the dataset `name` into an owned array.
    ///
    /// Fails with [`Error::WrongNdim`] when the stored rank does not fit
    /// the requested dimensionality.
    fn read_mat(mat: &MatFile, name: &str) -> Result<Self>;
}

impl<A, S, D> ReadMatExt for ArrayBase<S, D>
where
    A: Element,
    S: DataOwned<Elem = A>,
    D: Dimension,
{
    fn read_mat(mat: &MatFile, name: &str) -> Result<Self> {
        let (data, dims) = mat.read_array(name)?;
        let shape = dims.shape().into_dimension();
        let ndim = shape.ndim();
        ArrayBase::from_shape_vec(shape, data)
            .unwrap()
            .into_dimensionality()
            .map_err(|_| Error::WrongNdim { expected: D::NDIM, actual: ndim })
    }
}

/// Maps an `ndarray` shape onto MAT dims. A rank-0 array becomes a
/// one-element vector, matching how scalar dataspaces read back.
fn dims_of(shape: &[usize]) -> Result<Dims> {
    match *shape {
        [] => Ok(Dims::from(1)),
        [x] => Ok(Dims::from(x)),
        [x, y] => Ok(Dims::from((x, y))),
        [x, y, z] => Ok(Dims::from((x, y, z))),
        _ => Err(Error::WrongNdim { expected: Some(3), actual: shape.len() }),
    }
}
