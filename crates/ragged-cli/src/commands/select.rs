use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use ndarray_npy::{ReadableElement, WritableElement};
use ragged_array::io::{self, Loaded};
use ragged_array::{Index, RaggedArray, RenderStyle, Selection, Selector};

use super::{dispatch_dtype, Dtype};

#[derive(Clone, Debug)]
pub struct SelectArgs {
    pub input: PathBuf,
    pub rows: Selector,
    pub cols: Option<Selector>,
    pub output: Option<PathBuf>,
    pub dtype: Dtype,
    pub style: RenderStyle,
}

impl SelectArgs {
    pub fn index(&self) -> Index {
        match &self.cols {
            Some(cols) => Index::Pair(self.rows.clone(), cols.clone()),
            None => Index::Rows(self.rows.clone()),
        }
    }
}

pub fn run(args: &SelectArgs) -> Result<String> {
    dispatch_dtype!(args.dtype, select(args))
}

fn select<T>(args: &SelectArgs) -> Result<String>
where
    T: ReadableElement + WritableElement + Clone + fmt::Debug,
{
    let array: RaggedArray<T> = match io::load::<T, _>(&args.input)? {
        Loaded::Ragged(array) => array,
        Loaded::Plain(plain) => {
            let ndim = plain.ndim();
            let plain = plain
                .into_dimensionality::<ndarray::Ix2>()
                .with_context(|| format!("expected a 2-D plain array, found {} dimensions", ndim))?;
            RaggedArray::from(plain)
        }
    };

    let index = args.index();
    log::debug!("Selecting {:?} from {:?}", index, args.input);
    let selection = array
        .get(index)
        .with_context(|| format!("failed to select from {}", args.input.display()))?;

    match (&args.output, selection) {
        (Some(output), Selection::Ragged(result)) => {
            io::save(output, &result)?;
            Ok(format!("saved {} rows to {}", result.len(), output.display()))
        }
        (Some(_), _) => bail!("only selections that produce rows can be saved"),
        (None, Selection::Ragged(result)) => Ok(result.render(args.style)),
        (None, Selection::Row(values)) | (None, Selection::Values(values)) => {
            Ok(format!("{:?}", values))
        }
    }
}
