//! One module per subcommand. Each takes its parsed arguments and returns the
//! text to print, so the binary stays a thin shell around them.
use std::str::FromStr;

pub mod inspect;
pub mod pack;
pub mod select;

/// Element type to read archives as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dtype {
    #[default]
    F64,
    F32,
    I64,
    I32,
}

impl FromStr for Dtype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f64" | "float64" => Ok(Dtype::F64),
            "f32" | "float32" => Ok(Dtype::F32),
            "i64" | "int64" => Ok(Dtype::I64),
            "i32" | "int32" => Ok(Dtype::I32),
            _ => Err(format!(
                "Unknown dtype: {}. Expected one of 'f64', 'f32', 'i64' or 'i32'",
                s
            )),
        }
    }
}

/// Call a generic function with the element type named by a [`Dtype`].
macro_rules! dispatch_dtype {
    ($dtype:expr, $func:ident($($arg:expr),*)) => {
        match $dtype {
            $crate::commands::Dtype::F64 => $func::<f64>($($arg),*),
            $crate::commands::Dtype::F32 => $func::<f32>($($arg),*),
            $crate::commands::Dtype::I64 => $func::<i64>($($arg),*),
            $crate::commands::Dtype::I32 => $func::<i32>($($arg),*),
        }
    };
}

pub(crate) use dispatch_dtype;
