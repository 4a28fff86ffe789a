//! Command logic behind the `ragged` binary.
pub mod commands;
pub mod util;
