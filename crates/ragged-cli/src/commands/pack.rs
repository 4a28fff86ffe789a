use std::path::PathBuf;

use anyhow::Result;
use ndarray_npy::{ReadableElement, WritableElement};
use ragged_array::io::{self, Keys};

use super::{dispatch_dtype, Dtype};

#[derive(Clone, Debug)]
pub struct PackArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub keys: Keys,
    pub dtype: Dtype,
}

pub fn run(args: &PackArgs) -> Result<String> {
    dispatch_dtype!(args.dtype, pack(args))
}

fn pack<T>(args: &PackArgs) -> Result<String>
where
    T: ReadableElement + WritableElement + Clone,
{
    let array = io::load_keys::<T, _>(&args.input, &args.keys)?;
    io::save(&args.output, &array)?;
    log::info!(
        "Packed {} entries of {:?} into {:?}",
        array.len(),
        args.input,
        args.output
    );
    Ok(format!(
        "packed {} rows ({} elements) into {}",
        array.len(),
        array.size(),
        args.output.display()
    ))
}
