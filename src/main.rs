#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use sessioncodec::{codec::CodecFactory, settings::Settings, CodecFormat};
use std::io::{Read, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sessioncodec", version, about = "Inspect and convert stored session blobs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a session blob and print its deadline and values
    Inspect {
        /// Codec the blob was written with (defaults to the configured codec)
        #[arg(long)]
        format: Option<CodecFormat>,

        #[command(flatten)]
        input: InputArgs,
    },
    /// Re-encode a session blob in another format
    Transcode {
        #[arg(long)]
        from: CodecFormat,

        #[arg(long)]
        to: CodecFormat,

        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input and output are base64 text instead of raw bytes
    #[arg(long)]
    base64: bool,

    /// Read the blob from this file instead of stdin
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    let max_depth = settings.codec.max_nesting_depth;

    match cli.command {
        Command::Inspect { format, input } => {
            let format = format.unwrap_or(settings.codec.format);
            let bytes = read_input(&input)?;
            inspect(format, max_depth, &bytes)
        }
        Command::Transcode { from, to, input } => {
            let bytes = read_input(&input)?;
            let output = transcode(from, to, max_depth, &bytes)?;
            write_output(&output, input.base64)
        }
    }
}

fn inspect(format: CodecFormat, max_depth: usize, bytes: &[u8]) -> Result<()> {
    print!("{}", describe(format, max_depth, bytes, Utc::now())?);
    Ok(())
}

/// Human-readable report of a session blob, judged against `now`
fn describe(
    format: CodecFormat,
    max_depth: usize,
    bytes: &[u8],
    now: DateTime<Utc>,
) -> Result<String> {
    let codec = CodecFactory::for_format(format, max_depth)?;
    let snapshot = codec
        .decode_snapshot(bytes)
        .with_context(|| format!("Failed to decode {format} session blob"))?;

    let mut report = format!("Format:   {format} ({} bytes)\n", bytes.len());
    if snapshot.has_deadline() {
        let state = if snapshot.deadline.with_timezone(&Utc) <= now {
            "expired"
        } else {
            "active"
        };
        report.push_str(&format!("Deadline: {} ({state})\n", snapshot.deadline.to_rfc3339()));
    } else {
        report.push_str("Deadline: not set\n");
    }
    report.push_str(&format!("Values:   {} keys\n", snapshot.values.len()));
    report.push_str(
        &serde_json::to_string_pretty(&snapshot.values).context("Failed to render values")?,
    );
    report.push('\n');
    Ok(report)
}

fn transcode(from: CodecFormat, to: CodecFormat, max_depth: usize, bytes: &[u8]) -> Result<Vec<u8>> {
    let decoder = CodecFactory::for_format(from, max_depth)?;
    let encoder = CodecFactory::for_format(to, max_depth)?;

    let snapshot = decoder
        .decode_snapshot(bytes)
        .with_context(|| format!("Failed to decode {from} session blob"))?;
    let output = encoder
        .encode_snapshot(&snapshot)
        .with_context(|| format!("Failed to encode session as {to}"))?;

    log::info!("Transcoded session blob {from} -> {to}: {} -> {} bytes", bytes.len(), output.len());
    Ok(output)
}

fn read_input(input: &InputArgs) -> Result<Vec<u8>> {
    let raw = match &input.file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    if !input.base64 {
        return Ok(raw);
    }

    let text = String::from_utf8(raw).context("Base64 input is not UTF-8")?;
    decode_base64_text(&text)
}

/// Accepts padded standard or unpadded URL-safe base64, ignoring surrounding whitespace
fn decode_base64_text(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    general_purpose::STANDARD
        .decode(text)
        .or_else(|_| general_purpose::URL_SAFE_NO_PAD.decode(text))
        .context("Failed to decode base64 input")
}

fn write_output(bytes: &[u8], as_base64: bool) -> Result<()> {
    if as_base64 {
        println!("{}", general_purpose::STANDARD.encode(bytes));
        return Ok(());
    }
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(bytes).context("Failed to write output")?;
    stdout.flush().context("Failed to flush output")
}
