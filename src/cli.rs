use crate::config::load_config;
use crate::ir::Direction;
use crate::layout::{DagreOracle, layout_canvas};
use crate::layout_dump::write_layout_dump;
use crate::parser::{parse_canvas, serialize_canvas};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cvlay", version, about = "Directed auto-layout for canvas files")]
pub struct Args {
    /// Input file (.canvas) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Rewrite the input file
    #[arg(long = "in-place")]
    pub in_place: bool,

    /// Layout direction (overrides the config file)
    #[arg(short = 'd', long = "direction", value_enum)]
    pub direction: Option<DirectionArg>,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Write a JSON dump of groups and components to this path
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Log progress (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DirectionArg {
    Right,
    Down,
    Left,
    Up,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Right => Direction::Right,
            DirectionArg::Down => Direction::Down,
            DirectionArg::Left => Direction::Left,
            DirectionArg::Up => Direction::Up,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let direction = args.direction.map(Direction::from).unwrap_or(config.direction);

    if args.in_place && !matches!(args.input.as_deref(), Some(p) if p != Path::new("-")) {
        return Err(anyhow::anyhow!("--in-place requires an input file"));
    }

    let input = read_input(args.input.as_deref())?;
    let mut canvas = parse_canvas(&input)?;
    let report = layout_canvas(&mut canvas, direction, &config.layout, &DagreOracle)?;
    let output = serialize_canvas(&canvas)?;

    let target = if args.in_place {
        args.input.as_deref()
    } else {
        args.output.as_deref()
    };
    write_output(&output, target)?;

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &canvas, &report, direction)?;
    }

    log::info!("canvas laid out");
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn write_output(contents: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
