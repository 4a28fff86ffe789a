use std::path::PathBuf;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;

use ragged_array::{RaggedConfig, RenderStyle, Selector};
use ragged_cli::commands::inspect::{self, InspectArgs};
use ragged_cli::commands::pack::{self, PackArgs};
use ragged_cli::commands::select::{self, SelectArgs};
use ragged_cli::commands::Dtype;
use ragged_cli::util::{load_config, parse_keys, validate_npz_file};

fn archive_arg() -> Arg {
    Arg::new("archive")
        .help("Path to the input .npz archive")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn dtype_arg() -> Arg {
    Arg::new("dtype")
        .long("dtype")
        .help("Element type stored in the archive")
        .value_parser(["f64", "f32", "i64", "i32"])
        .default_value("f64")
}

fn style_arg() -> Arg {
    Arg::new("style")
        .long("style")
        .help("Rendering style. Overrides the style in the configuration file.")
        .value_parser(["debug", "plain"])
        .value_hint(ValueHint::Other)
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .help("Path to a JSON configuration file")
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn keys_args() -> [Arg; 2] {
    [
        Arg::new("keys")
            .long("keys")
            .help("Comma-separated archive entries to assemble, one row per entry")
            .value_parser(clap::builder::NonEmptyStringValueParser::new())
            .conflicts_with("all_keys"),
        Arg::new("all_keys")
            .long("all-keys")
            .help("Assemble every archive entry, one row per entry")
            .action(ArgAction::SetTrue),
    ]
}

fn output_arg(required: bool) -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .help("Path of the .npz archive to write")
        .required(required)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("RAGGED_LOG", "error,ragged=info"))
        .init();

    let matches = Command::new("ragged")
        .version(clap::crate_version!())
        .about("Inspect, assemble and slice ragged arrays stored in .npz archives")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("inspect")
                .about("Print the shape, lengths and contents of an archive")
                .arg(archive_arg())
                .args(keys_args())
                .arg(dtype_arg())
                .arg(style_arg())
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("pack")
                .about("Assemble archive entries into a single ragged array archive")
                .arg(archive_arg())
                .arg(output_arg(true))
                .args(keys_args())
                .arg(dtype_arg()),
        )
        .subcommand(
            Command::new("select")
                .about("Apply a numpy-style index expression to a ragged array")
                .arg(archive_arg())
                .arg(
                    Arg::new("rows")
                        .long("rows")
                        .help("Row selector, e.g. '3', '-1', '0,2,5', '1:' or '::-1'")
                        .required(true)
                        .allow_hyphen_values(true),
                )
                .arg(
                    Arg::new("cols")
                        .long("cols")
                        .help("Column selector, in the same syntax as --rows")
                        .allow_hyphen_values(true),
                )
                .arg(output_arg(false))
                .arg(dtype_arg())
                .arg(style_arg())
                .arg(config_arg()),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("inspect", sub_m)) => handle_inspect(sub_m),
        Some(("pack", sub_m)) => handle_pack(sub_m),
        Some(("select", sub_m)) => handle_select(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    };

    match result {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1)
        }
    }
}

fn checked_archive(matches: &ArgMatches) -> Result<PathBuf> {
    let path: &PathBuf = matches.get_one("archive").unwrap();
    validate_npz_file(&path.to_string_lossy())?;
    Ok(path.clone())
}

fn dtype(matches: &ArgMatches) -> Result<Dtype> {
    let name: &String = matches.get_one("dtype").unwrap();
    name.parse::<Dtype>().map_err(anyhow::Error::msg)
}

/// Configuration file values, with `--style` taking precedence.
fn config(matches: &ArgMatches) -> Result<RaggedConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            log::info!("Using config: {:?}", path);
            load_config(path)?
        }
        None => RaggedConfig::default(),
    };
    if let Some(style) = matches.get_one::<String>("style") {
        config.render_style = style.parse::<RenderStyle>().map_err(anyhow::Error::msg)?;
    }
    Ok(config)
}

fn handle_inspect(matches: &ArgMatches) -> Result<String> {
    let args = InspectArgs {
        input: checked_archive(matches)?,
        keys: parse_keys(
            matches.get_one::<String>("keys").map(String::as_str),
            matches.get_flag("all_keys"),
        ),
        dtype: dtype(matches)?,
        style: config(matches)?.render_style,
    };
    inspect::run(&args)
}

fn handle_pack(matches: &ArgMatches) -> Result<String> {
    let keys = parse_keys(
        matches.get_one::<String>("keys").map(String::as_str),
        matches.get_flag("all_keys"),
    );
    let Some(keys) = keys else {
        anyhow::bail!("pack needs --keys or --all-keys");
    };
    let args = PackArgs {
        input: checked_archive(matches)?,
        output: matches.get_one::<PathBuf>("output").unwrap().clone(),
        keys,
        dtype: dtype(matches)?,
    };
    pack::run(&args)
}

fn handle_select(matches: &ArgMatches) -> Result<String> {
    let rows: &String = matches.get_one("rows").unwrap();
    let cols = matches
        .get_one::<String>("cols")
        .map(|c| c.parse::<Selector>())
        .transpose()?;
    let args = SelectArgs {
        input: checked_archive(matches)?,
        rows: rows.parse::<Selector>()?,
        cols,
        output: matches.get_one::<PathBuf>("output").cloned(),
        dtype: dtype(matches)?,
        style: config(matches)?.render_style,
    };
    select::run(&args)
}
