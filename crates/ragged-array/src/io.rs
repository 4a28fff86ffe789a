//! Saving and loading ragged arrays as `.npz` archives.
//!
//! A ragged array is stored as two entries: `array`, the flat buffer (1-D, or
//! 2-D when elements have a trailing width), and `lengths`, the row lengths as
//! int64. A plain rectangular array is stored under the default `arr_0` entry.
use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2, ArrayBase, ArrayD, Data, Dimension, IxDyn, OwnedRepr};
use ndarray_npy::{NpzReader, NpzWriter, ReadableElement, WritableElement};

use crate::array::RaggedArray;
use crate::error::RaggedError;

pub const ARRAY_KEY: &str = "array";
pub const LENGTHS_KEY: &str = "lengths";
pub const DEFAULT_KEY: &str = "arr_0";

/// What [`load`] found in an archive.
#[derive(Debug)]
pub enum Loaded<T> {
    /// An archive without a `lengths` entry.
    Plain(ArrayD<T>),
    Ragged(RaggedArray<T>),
}

impl<T> Loaded<T> {
    pub fn into_ragged(self) -> Option<RaggedArray<T>> {
        match self {
            Loaded::Ragged(array) => Some(array),
            Loaded::Plain(_) => None,
        }
    }
}

/// Entries to assemble in [`load_keys`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keys {
    /// Every entry, in archive order.
    All,
    Named(Vec<String>),
}

impl Keys {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Keys::Named(names.into_iter().map(Into::into).collect())
    }
}

/// An open archive with its entry names, `.npy` suffix removed.
struct Archive {
    reader: NpzReader<File>,
    names: Vec<String>,
}

impl Archive {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let mut reader = NpzReader::new(file)
            .with_context(|| format!("{} is not an npz archive", path.display()))?;
        let names = reader
            .names()
            .with_context(|| format!("failed to list entries of {}", path.display()))?
            .into_iter()
            .map(|name| match name.strip_suffix(".npy") {
                Some(stem) => stem.to_string(),
                None => name,
            })
            .collect();
        Ok(Self { reader, names })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    fn read<T: ReadableElement>(&mut self, name: &str) -> Result<ArrayD<T>> {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                return Err(RaggedError::invalid(format!("archive has no entry named '{}'", name)).into())
            }
        };
        self.reader
            .by_index::<OwnedRepr<T>, IxDyn>(index)
            .with_context(|| format!("failed to read entry '{}'", name))
    }
}

/// Write `array` as an `array` + `lengths` archive.
pub fn save<T, P>(path: P, array: &RaggedArray<T>) -> Result<()>
where
    T: WritableElement + Clone,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut npz = NpzWriter::new(file);

    let flat = array.flat().to_vec();
    match array.width() {
        Some(width) => {
            let data = Array2::from_shape_vec((array.size(), width), flat)
                .context("flat buffer does not match its trailing width")?;
            npz.add_array(ARRAY_KEY, &data)
        }
        None => npz.add_array(ARRAY_KEY, &Array1::from(flat)),
    }
    .with_context(|| format!("failed to write '{}' to {}", ARRAY_KEY, path.display()))?;

    let lengths: Array1<i64> = array.lengths().iter().map(|&len| len as i64).collect();
    npz.add_array(LENGTHS_KEY, &lengths)
        .with_context(|| format!("failed to write '{}' to {}", LENGTHS_KEY, path.display()))?;
    npz.finish()
        .with_context(|| format!("failed to finish {}", path.display()))?;

    log::debug!(
        "saved ragged array ({} rows, {} elements) to {}",
        array.len(),
        array.size(),
        path.display()
    );
    Ok(())
}

/// Write a rectangular array under the default entry name.
pub fn save_plain<S, D, P>(path: P, array: &ArrayBase<S, D>) -> Result<()>
where
    S: Data,
    S::Elem: WritableElement,
    D: Dimension,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut npz = NpzWriter::new(file);
    npz.add_array(DEFAULT_KEY, array)
        .with_context(|| format!("failed to write {}", path.display()))?;
    npz.finish()
        .with_context(|| format!("failed to finish {}", path.display()))?;
    Ok(())
}

/// Load an archive written by [`save`], or a plain array.
///
/// Without a `lengths` entry the default entry (or the only entry) is
/// returned as-is.
pub fn load<T, P>(path: P) -> Result<Loaded<T>>
where
    T: ReadableElement + Clone,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut archive = Archive::open(path)?;

    let ragged = archive.position(ARRAY_KEY).is_some() && archive.position(LENGTHS_KEY).is_some();
    if !ragged {
        let name = if archive.position(DEFAULT_KEY).is_some() {
            DEFAULT_KEY.to_string()
        } else if archive.names.len() == 1 {
            archive.names[0].clone()
        } else {
            bail!(
                "{} holds neither a ragged array nor a single plain array (entries: {:?})",
                path.display(),
                archive.names
            );
        };
        let plain = archive.read::<T>(&name)?;
        log::debug!("loaded plain array of shape {:?} from {}", plain.shape(), path.display());
        return Ok(Loaded::Plain(plain));
    }

    let data = archive.read::<T>(ARRAY_KEY)?;
    let raw_lengths = archive.read::<i64>(LENGTHS_KEY)?;
    let mut lengths = Vec::with_capacity(raw_lengths.len());
    for &len in raw_lengths.iter() {
        if len < 0 {
            return Err(RaggedError::invalid(format!("negative row length {} in archive", len)).into());
        }
        lengths.push(len as usize);
    }

    let flat: Vec<T> = data.iter().cloned().collect();
    let array = match data.ndim() {
        1 => RaggedArray::from_parts(flat, lengths)?,
        2 => RaggedArray::from_parts_with_width(flat, data.shape()[1], lengths)?,
        n => bail!("'{}' entry must be 1-D or 2-D, found {} dimensions", ARRAY_KEY, n),
    };
    log::debug!(
        "loaded ragged array ({} rows, {} elements) from {}",
        array.len(),
        array.size(),
        path.display()
    );
    Ok(Loaded::Ragged(array))
}

/// Build a ragged array with one row per archive entry.
///
/// Every entry must have the same number of dimensions (at most two) and the
/// same non-leading dimensions; row *i* holds entry *i* and its length is
/// that entry's leading size.
pub fn load_keys<T, P>(path: P, keys: &Keys) -> Result<RaggedArray<T>>
where
    T: ReadableElement + Clone,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut archive = Archive::open(path)?;
    let names = match keys {
        Keys::All => archive.names.clone(),
        Keys::Named(names) => names.clone(),
    };

    let mut entries = Vec::with_capacity(names.len());
    for name in &names {
        entries.push(archive.read::<T>(name)?);
    }
    let shapes: Vec<Vec<usize>> = entries.iter().map(|e| e.shape().to_vec()).collect();

    let ndim = match shapes.first() {
        Some(shape) => shape.len(),
        None => return Ok(RaggedArray::new()),
    };
    if ndim == 0 || ndim > 2 {
        return Err(RaggedError::invalid(format!(
            "entries must be 1-D or 2-D to form rows, found {} dimensions ({:?})",
            ndim, shapes
        ))
        .into());
    }
    if shapes.iter().any(|s| s.len() != ndim) {
        return Err(RaggedError::invalid(format!(
            "Not all arrays have the same number of dimensions ({:?})",
            shapes
        ))
        .into());
    }
    for dim in 1..ndim {
        if shapes.iter().any(|s| s[dim] != shapes[0][dim]) {
            return Err(RaggedError::invalid(format!(
                "Not all arrays have the same dimension {} ({:?})",
                dim, shapes
            ))
            .into());
        }
    }

    let lengths: Vec<usize> = shapes.iter().map(|s| s[0]).collect();
    let flat: Vec<T> = entries.iter().flat_map(|e| e.iter().cloned()).collect();
    let array = if ndim == 2 {
        RaggedArray::from_parts_with_width(flat, shapes[0][1], lengths)?
    } else {
        RaggedArray::from_parts(flat, lengths)?
    };
    log::debug!(
        "assembled {} entries from {} into a ragged array",
        names.len(),
        path.display()
    );
    Ok(array)
}
