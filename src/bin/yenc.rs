//! `yenc` command-line tool
//!
//! Run with: cargo run -- encode <file>

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use yenc_rs::{DEFAULT_LINE_LENGTH, EncodeConfig, ErrorKind, YencError};

/// Bad arguments, missing input, existing output or unusable configuration
const USAGE_EXIT_CODE: u8 = 4;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a file
    Encode {
        /// The file to encode.
        file: PathBuf,
        /// Output file (default: <file>.yenc). Never overwritten.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Raw bytes per encoded line.
        #[arg(short, long, default_value_t = DEFAULT_LINE_LENGTH)]
        line: usize,
    },
    /// Decode a file
    Decode {
        /// The file to decode.
        file: PathBuf,
        /// Output file (default: standard output).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Failures of the tool itself, before the codec runs
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("file [{0}] does not exist")]
    Missing(PathBuf),
    #[error("file [{0}] exists; cannot overwrite")]
    Exists(PathBuf),
    #[error(transparent)]
    Codec(#[from] YencError),
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Codec(YencError::Io(e))
    }
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Missing(_) | CliError::Exists(_) => USAGE_EXIT_CODE,
            CliError::Codec(e) => match e.kind() {
                ErrorKind::Io => 1,
                ErrorKind::Protocol => 2,
                ErrorKind::Validation => 3,
                ErrorKind::Config => USAGE_EXIT_CODE,
            },
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            return if e.use_stderr() {
                ExitCode::from(USAGE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let result = match args.command {
        Command::Encode { file, output, line } => encode(&file, output, line),
        Command::Decode { file, output } => decode(&file, output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn encode(file: &Path, output: Option<PathBuf>, line: usize) -> Result<(), CliError> {
    if !file.is_file() {
        return Err(CliError::Missing(file.to_path_buf()));
    }

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let config = EncodeConfig::new(name).line_length(line);
    config.validate()?;

    let destination = output.unwrap_or_else(|| {
        let mut name = file.as_os_str().to_owned();
        name.push(".yenc");
        PathBuf::from(name)
    });
    if destination.exists() {
        return Err(CliError::Exists(destination));
    }

    let input = File::open(file)?;
    let created = File::create_new(&destination)?;
    let result = write_encoded(created, input, &config);
    if result.is_err()
        && let Err(e) = fs::remove_file(&destination)
    {
        warn!("Failed to remove {}: {}", destination.display(), e);
    }
    result
}

fn write_encoded(destination: File, input: File, config: &EncodeConfig) -> Result<(), CliError> {
    let mut writer = BufWriter::new(destination);
    yenc_rs::encode_with(&mut writer, input, config)?;
    writer.flush()?;
    Ok(())
}

fn decode(file: &Path, output: Option<&Path>) -> Result<(), CliError> {
    if !file.is_file() {
        return Err(CliError::Missing(file.to_path_buf()));
    }

    let input = BufReader::new(File::open(file)?);
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            yenc_rs::decode(&mut writer, input)?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            yenc_rs::decode(&mut writer, input)?;
        }
    }
    Ok(())
}
