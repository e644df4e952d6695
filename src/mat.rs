mod elements;
mod header;

pub use self::elements::Element;

#[cfg(feature = "num-complex")]
use num_complex::Complex;
use std::path::{Path, PathBuf};
use std::{fmt, io};
use thiserror::Error;

/// A specialized result type for MAT-file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for MAT-file sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No file is open in this session.
    #[error("no file is open")]
    NotOpen,
    /// The session direction does not permit the requested operation.
    #[error("file is open for {actual} but the operation requires {required}")]
    ModeViolation {
        /// Direction the operation needs.
        required: Mode,
        /// Direction the session was created with.
        actual: Mode,
    },
    /// A write buffer does not hold the number of elements its dims describe.
    #[error("buffer holds {actual} elements but {dims:?} describes {expected}")]
    BufferLength {
        /// Element count described by the dims.
        expected: usize,
        /// Element count actually supplied.
        actual: usize,
        /// The offending dims.
        dims: Dims,
    },
    /// A stored dataset has more dimensions than MAT arrays support.
    #[error("dataset `{name}` has rank {ndim}, expected at most 3")]
    UnsupportedRank {
        /// Name of the dataset.
        name: String,
        /// Rank reported by the file.
        ndim: usize,
    },
    /// A value read found a dataset with no elements.
    #[error("dataset `{name}` is empty")]
    EmptyDataset {
        /// Name of the dataset.
        name: String,
    },
    /// The storage engine reported a failure.
    #[error("storage engine error: {0}")]
    Storage(#[from] hdf5::Error),
    /// The identification header could not be written after closing.
    ///
    /// The file handle is already released when this is returned; the file
    /// remains a valid plain HDF5 container, just without the signature
    /// MATLAB looks for.
    #[error("failed to write MAT header to `{path}`: {source}")]
    HeaderWrite {
        /// File that was left without its header.
        path: PathBuf,
        /// The underlying I/O failure.
        source: io::Error,
    },
    /// A stored array's rank does not fit the requested dimensionality.
    #[error("array of rank {actual} does not fit dimensionality with NDIM = {expected:?}")]
    WrongNdim {
        /// `NDIM` of the requested dimensionality, `None` for dynamic.
        expected: Option<usize>,
        /// Rank of the stored array.
        actual: usize,
    },
}

/// Transfer direction of a session, fixed when the session is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Open an existing file and read datasets from it.
    Read,
    /// Create a new file and write datasets into it.
    Write,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Read => f.write_str("reading"),
            Self::Write => f.write_str("writing"),
        }
    }
}

/// Dimensions of a stored array, rank 1 to 3.
///
/// The first dimension is the outer axis. Trailing zero dimensions collapse
/// the rank: `(n, 0, 0)` describes a vector of `n` elements, `(x, y, 0)` an
/// `x`-by-`y` matrix and `(x, y, z)` a rank-3 array. `From` conversions make
/// the common spellings direct: `5`, `(3, 4)`, `(2, 3, 4)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dims {
    x: usize,
    y: usize,
    z: usize,
}

impl Dims {
    /// Number of dimensions, inferred from the trailing zeros.
    pub fn rank(&self) -> usize {
        if self.y == 0 && self.z == 0 {
            1
        } else if self.z == 0 {
            2
        } else {
            3
        }
    }

    /// The shape truncated to [`rank`](Self::rank) dimensions, outer axis
    /// first.
    pub fn shape(&self) -> Vec<usize> {
        [self.x, self.y, self.z][..self.rank()].to_vec()
    }

    /// Total number of elements the shape describes.
    ///
    /// # Panics
    ///
    /// Panics if the element count overflows `usize`.
    pub fn len(&self) -> usize {
        self.shape()
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .expect("overflow computing number of elements")
    }

    /// Whether the shape describes zero elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First (outer) dimension.
    pub fn x(&self) -> usize {
        self.x
    }

    /// Second dimension; 0 when the rank is 1.
    pub fn y(&self) -> usize {
        self.y
    }

    /// Third dimension; 0 when the rank is below 3.
    pub fn z(&self) -> usize {
        self.z
    }

    /// Rebuilds dims from the extents a file reports. A scalar dataspace
    /// reads as a one-element vector; more than 3 extents is unsupported.
    fn from_extents(shape: &[usize]) -> Option<Self> {
        match *shape {
            [] => Some(Self { x: 1, y: 0, z: 0 }),
            [x] => Some(Self { x, y: 0, z: 0 }),
            [x, y] => Some(Self { x, y, z: 0 }),
            [x, y, z] => Some(Self { x, y, z }),
            _ => None,
        }
    }
}

impl From<usize> for Dims {
    fn from(n: usize) -> Self {
        Self { x: n, y: 0, z: 0 }
    }
}

impl From<(usize, usize)> for Dims {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y, z: 0 }
    }
}

impl From<(usize, usize, usize)> for Dims {
    fn from((x, y, z): (usize, usize, usize)) -> Self {
        Self { x, y, z }
    }
}

/// A MAT-file session: one open HDF5 container in one fixed direction.
///
/// A session is created with [`MatFile::new`], bound to a file with
/// [`open`](Self::open) and released with [`close`](Self::close) or by being
/// dropped. Every data operation checks the session direction before
/// touching the storage engine.
///
/// Closing a write session flushes and closes the HDF5 file, then patches
/// the MATLAB identification header into the user block reserved when the
/// file was created.
///
/// # Example
///
/// ```no_run
/// use mat73::{MatFile, Mode};
///
/// let mut mat = MatFile::new(Mode::Write);
/// mat.open("results.mat")?;
/// mat.write_array("gain", &[0.25f64, 0.5, 0.75, 1.0], (2, 2))?;
/// mat.close()?;
/// # Ok::<_, mat73::Error>(())
/// ```
#[derive(Debug)]
pub struct MatFile {
    mode: Mode,
    open: Option<OpenFile>,
}

#[derive(Debug)]
struct OpenFile {
    path: PathBuf,
    file: hdf5::File,
}

impl MatFile {
    /// Creates a session in the given direction. No file is touched until
    /// [`open`](Self::open).
    pub fn new(mode: Mode) -> Self {
        Self { mode, open: None }
    }

    /// The direction this session was created with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether a file is currently open.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Opens `path` in the session's direction.
    ///
    /// In [`Mode::Read`] the file must already exist and be a valid HDF5
    /// container. In [`Mode::Write`] the file is created, truncating any
    /// existing one, with a 512-byte user block reserved in front of the
    /// HDF5 superblock for the identification header written on close.
    ///
    /// A file already open in this session is closed first, so a session
    /// never holds more than one container.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.close()?;
        let path = path.as_ref();
        let file = match self.mode {
            Mode::Read => hdf5::File::open(path)?,
            Mode::Write => hdf5::File::with_options()
                .with_fcpl(|p| p.userblock(header::HEADER_SIZE as u64))
                .create(path)?,
        };
        tracing::debug!("opened {} for {}", path.display(), self.mode);
        self.open = Some(OpenFile { path: path.to_path_buf(), file });
        Ok(())
    }

    /// Flushes and closes the open file; a no-op when nothing is open.
    ///
    /// In [`Mode::Write`] the identification header is patched into the
    /// user block only after the HDF5 library has flushed and closed the
    /// file — any earlier and the library would overwrite it while
    /// finalizing its own metadata. A header failure is returned as
    /// [`Error::HeaderWrite`] with the handle already released.
    pub fn close(&mut self) -> Result<()> {
        let Some(open) = self.open.take() else {
            return Ok(());
        };
        open.file.flush()?;
        open.file.close()?;
        if self.mode == Mode::Write {
            header::patch_header(&open.path).map_err(|source| Error::HeaderWrite {
                path: open.path.clone(),
                source,
            })?;
        }
        tracing::debug!("closed {}", open.path.display());
        Ok(())
    }

    /// Resolves the open handle, checking the session direction first.
    fn file_for(&self, required: Mode) -> Result<&hdf5::File> {
        if self.mode != required {
            return Err(Error::ModeViolation { required, actual: self.mode });
        }
        let open = self.open.as_ref().ok_or(Error::NotOpen)?;
        Ok(&open.file)
    }

    /// Writes a real array as the dataset `name`.
    ///
    /// The rank is inferred from `dims` and `data` must hold exactly
    /// [`dims.len()`](Dims::len) elements, outer axis first. The dataset is
    /// created and the whole buffer written in one operation; nothing is
    /// created when a precondition fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use mat73::{MatFile, Mode};
    /// # let mut mat = MatFile::new(Mode::Write);
    /// # mat.open("results.mat")?;
    /// mat.write_array("counts", &[1u32, 2, 3, 4, 5, 6], (2, 3))?;
    /// # Ok::<_, mat73::Error>(())
    /// ```
    pub fn write_array<T, D>(&self, name: &str, data: &[T], dims: D) -> Result<()>
    where
        T: Element,
        D: Into<Dims>,
    {
        let dims = dims.into();
        let file = self.file_for(Mode::Write)?;
        check_buffer(data.len(), dims)?;
        let dataset = file
            .new_dataset_builder()
            .empty_as(&T::storage_type())
            .shape(dims.shape())
            .create(name)?;
        dataset.write_raw(data)?;
        tracing::trace!("wrote dataset `{}` with dims {:?}", name, dims);
        Ok(())
    }

    /// Reads the dataset `name` into a freshly allocated buffer.
    ///
    /// The dims come from the file's own extents, not from the caller. No
    /// element-type validation happens beyond the conversions the storage
    /// engine performs itself; matching `T` to what was stored is the
    /// caller's responsibility.
    pub fn read_array<T: Element>(&self, name: &str) -> Result<(Vec<T>, Dims)> {
        let file = self.file_for(Mode::Read)?;
        let dataset = file.dataset(name)?;
        let dims = dims_of(&dataset, name)?;
        let data = dataset.read_raw::<T>()?;
        Ok((data, dims))
    }

    /// Writes a single value as a one-element vector dataset.
    pub fn write_value<T: Element>(&self, name: &str, value: T) -> Result<()> {
        self.write_array(name, &[value], 1usize)
    }

    /// Reads the first element of the dataset `name`.
    pub fn read_value<T: Element>(&self, name: &str) -> Result<T> {
        let (data, _) = self.read_array::<T>(name)?;
        data.into_iter()
            .next()
            .ok_or_else(|| Error::EmptyDataset { name: name.to_owned() })
    }

    /// Writes a complex array as the dataset `name`.
    ///
    /// Elements are stored as a compound of two components of the scalar
    /// type `T`, named "real" and "imag", which is how MATLAB represents
    /// complex data in 7.3 files. The compound descriptor is built fresh
    /// for the call and released with the dataset handle. Rank inference
    /// and buffer preconditions match [`write_array`](Self::write_array).
    #[cfg(feature = "num-complex")]
    pub fn write_complex_array<T, D>(&self, name: &str, data: &[Complex<T>], dims: D) -> Result<()>
    where
        T: Element,
        D: Into<Dims>,
    {
        let dims = dims.into();
        let file = self.file_for(Mode::Write)?;
        check_buffer(data.len(), dims)?;
        let dataset = file
            .new_dataset_builder()
            .empty_as(&elements::complex_type::<T>())
            .shape(dims.shape())
            .create(name)?;
        dataset.write_raw(elements::as_complex_elements(data))?;
        tracing::trace!("wrote complex dataset `{}` with dims {:?}", name, dims);
        Ok(())
    }

    /// Reads a complex dataset written by
    /// [`write_complex_array`](Self::write_complex_array).
    #[cfg(feature = "num-complex")]
    pub fn read_complex_array<T: Element>(&self, name: &str) -> Result<(Vec<Complex<T>>, Dims)> {
        let file = self.file_for(Mode::Read)?;
        let dataset = file.dataset(name)?;
        let dims = dims_of(&dataset, name)?;
        let data = dataset.read_raw::<elements::ComplexElement<T>>()?;
        Ok((data.into_iter().map(|element| element.0).collect(), dims))
    }
}

impl Drop for MatFile {
    fn drop(&mut self) {
        if self.open.is_some() {
            if let Err(err) = self.close() {
                tracing::warn!("error closing MAT-file on drop: {}", err);
            }
        }
    }
}

fn check_buffer(actual: usize, dims: Dims) -> Result<()> {
    let expected = dims.len();
    if actual != expected {
        return Err(Error::BufferLength { expected, actual, dims });
    }
    Ok(())
}

fn dims_of(dataset: &hdf5::Dataset, name: &str) -> Result<Dims> {
    let shape = dataset.shape();
    Dims::from_extents(&shape).ok_or_else(|| Error::UnsupportedRank {
        name: name.to_owned(),
        ndim: shape.len(),
    })
}
