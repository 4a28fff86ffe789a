use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use ndarray_npy::ReadableElement;
use ragged_array::io::{self, Keys, Loaded};
use ragged_array::{RaggedArray, RenderStyle};

use super::{dispatch_dtype, Dtype};

#[derive(Clone, Debug)]
pub struct InspectArgs {
    pub input: PathBuf,
    pub keys: Option<Keys>,
    pub dtype: Dtype,
    pub style: RenderStyle,
}

pub fn run(args: &InspectArgs) -> Result<String> {
    dispatch_dtype!(args.dtype, inspect(args))
}

/// Shape, lengths and rendering of a ragged array.
pub fn describe<T: fmt::Debug>(array: &RaggedArray<T>, style: RenderStyle) -> String {
    let shape = array.shape();
    let field = |v: Option<usize>| v.map_or_else(|| "ragged".to_string(), |n| n.to_string());
    format!(
        "rows: {}\nrow length: {}\nwidth: {}\nlengths: {:?}\n{}",
        shape.rows,
        field(shape.row_length),
        shape.trailing.map_or_else(|| "scalar".to_string(), |w| w.to_string()),
        array.lengths(),
        array.render(style)
    )
}

fn inspect<T>(args: &InspectArgs) -> Result<String>
where
    T: ReadableElement + Clone + fmt::Debug + fmt::Display,
{
    log::info!("Inspecting {:?}", args.input);
    if let Some(keys) = &args.keys {
        let array = io::load_keys::<T, _>(&args.input, keys)?;
        return Ok(describe(&array, args.style));
    }
    match io::load::<T, _>(&args.input)? {
        Loaded::Ragged(array) => Ok(describe(&array, args.style)),
        Loaded::Plain(plain) => Ok(format!(
            "plain array of shape {:?}\n{}",
            plain.shape(),
            plain
        )),
    }
}
