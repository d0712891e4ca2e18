use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use p1_rs::config::{Config, OutputConfig};
use p1_rs::output::{JsonLinesSink, TelegramSink};
use p1_rs::util::LogThrottle;
use p1_rs::{
    init_logger_with_level, log_info, log_warn, log_warn_throttled, obis, BufLineSource, P1Error,
    P1Reader,
};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "p1-reader")]
#[command(about = "Read DSMR P1 smart meter telegrams")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read telegrams from the meter's serial port
    Read {
        #[arg(short, long)]
        port: Option<String>,
        #[arg(short, long)]
        baudrate: Option<u32>,
        /// Number of telegrams to read
        #[arg(short = 'n', long, default_value = "1")]
        count: u64,
        /// Keep reading until interrupted, skipping corrupted telegrams
        #[arg(short, long)]
        follow: bool,
    },
    /// Decode telegrams captured in a file
    Parse { file: PathBuf },
    /// List the OBIS codes that are decoded, or describe one of them
    Codes { code: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    let (port, baudrate) = match &cli.command {
        Commands::Read { port, baudrate, .. } => (port.clone(), *baudrate),
        _ => (None, None),
    };
    config.apply_args(port, baudrate, cli.verbose);

    init_logger_with_level(&config.logging.level);
    debug!("Logger configured");

    match cli.command {
        Commands::Read { count, follow, .. } => read(&config, count, follow).await?,
        Commands::Parse { file } => parse(&config, file)?,
        Commands::Codes { code } => codes(code)?,
    }

    Ok(())
}

fn open_sink(output: &OutputConfig) -> Result<Box<dyn TelegramSink>> {
    Ok(match &output.path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open output file {:?}", path))?;
            Box::new(JsonLinesSink::new(file, output.format))
        }
        None => Box::new(JsonLinesSink::new(io::stdout(), output.format)),
    })
}

/// Errors that only cost one telegram; the meter sends another next cycle.
fn skippable(err: &P1Error) -> bool {
    !err.is_transient() || err.is_timeout()
}

async fn read(config: &Config, count: u64, follow: bool) -> Result<()> {
    let mut sink = open_sink(&config.output)?;
    let mut reader = p1_rs::p1::serial::connect(&config.serial).await?;
    log_info(&format!("Connected to {}", config.serial.port));

    let mut throttle = LogThrottle::new(Duration::from_secs(60), 5);
    let mut received = 0u64;

    while follow || received < count {
        let result = tokio::select! {
            result = reader.read_telegram() => result,
            _ = tokio::signal::ctrl_c() => {
                log_info("Interrupted");
                break;
            }
        };

        match result {
            Ok(telegram) => {
                debug!("{telegram}");
                sink.write_telegram(&telegram)?;
                received += 1;
            }
            Err(err) if follow && skippable(&err) => {
                log_warn_throttled!(throttle, "Telegram dropped: {err}");
            }
            Err(err) => return Err(err).context("Failed to read telegram"),
        }
    }

    log_info(&format!("{received} telegrams read"));
    Ok(())
}

fn parse(config: &Config, path: PathBuf) -> Result<()> {
    let file = File::open(&path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut sink = open_sink(&config.output)?;
    let reader = P1Reader::new(BufLineSource::new(BufReader::new(file)));
    let mut decoded = 0usize;

    for (index, result) in reader.enumerate() {
        match result {
            Ok(telegram) => {
                debug!("{telegram}");
                sink.write_telegram(&telegram)?;
                decoded += 1;
            }
            Err(err) if err.is_transient() => {
                return Err(err).with_context(|| format!("Failed to read {:?}", path));
            }
            Err(err) => log_warn(&format!("Telegram {} skipped: {err}", index + 1)),
        }
    }

    log_info(&format!("{decoded} telegrams decoded from {:?}", path));
    Ok(())
}

fn codes(code: Option<String>) -> Result<()> {
    let Some(code) = code else {
        for entry in obis::entries() {
            let key = obis::code::short_key(entry.code);
            println!("{:<12} {:<8} {}", entry.code, key, entry.description);
        }
        return Ok(());
    };

    match obis::lookup(&code) {
        Some(description) => {
            println!("{:<12} {:<8} {}", code, obis::code::short_key(&code), description);
            Ok(())
        }
        None => bail!("{code} is not a decoded OBIS code"),
    }
}
