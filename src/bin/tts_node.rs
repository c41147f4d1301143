//! tts-node — run the TTS node from a shell and save the decoded waveform
//!
//! Usage:
//!   tts-node synthesize [--config <file>] [--text <text>] [--out <file.wav>]
//!   tts-node schema                     Print the input form JSON Schema
//!   tts-node version

use anyhow::{bail, Context};
use openai_tts_node::audio::waveform;
use openai_tts_node::{AudioFormat, SynthesizedAudio, TtsNode, TtsNodeConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "synthesize" => cmd_synthesize(&args[2..]),
        "schema" => cmd_schema(),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"tts-node — OpenAI-compatible text-to-speech node

USAGE:
    tts-node <COMMAND> [OPTIONS]

COMMANDS:
    synthesize      Request speech and write it as a 32-bit float WAV
    schema          Print the JSON Schema of the node inputs
    version         Show version information
    help            Show this help message

SYNTHESIZE OPTIONS:
    --config <file>     YAML or JSON node configuration
    --text <text>       Override the text to speak
    --url <url>         Override the endpoint URL
    --voice <voice>     Override the voice
    --format <mp3|wav>  Override the response format
    --out <file>        Output path (default: speech.wav)

ENVIRONMENT:
    RUST_LOG            Log filter (default: info)"#
    );
}

fn cmd_version() {
    println!("tts-node {}", env!("CARGO_PKG_VERSION"));
}

fn cmd_schema() -> anyhow::Result<()> {
    let schema = TtsNodeConfig::input_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn flag_value<'a>(args: &'a [String], name: &str) -> anyhow::Result<Option<&'a str>> {
    match args.iter().position(|a| a == name) {
        Some(i) => match args.get(i + 1) {
            Some(v) => Ok(Some(v.as_str())),
            None => bail!("{name} requires a value"),
        },
        None => Ok(None),
    }
}

fn cmd_synthesize(args: &[String]) -> anyhow::Result<()> {
    let mut config = match flag_value(args, "--config")? {
        Some(path) => TtsNodeConfig::from_file(path)?,
        None => TtsNodeConfig::default(),
    };
    if let Some(text) = flag_value(args, "--text")? {
        config.text = text.to_string();
    }
    if let Some(url) = flag_value(args, "--url")? {
        config.url = url.to_string();
    }
    if let Some(voice) = flag_value(args, "--voice")? {
        config.voice = voice.to_string();
    }
    if let Some(format) = flag_value(args, "--format")? {
        config.response_format = format.parse::<AudioFormat>()?;
    }
    let out = PathBuf::from(flag_value(args, "--out")?.unwrap_or("speech.wav"));

    let audio = TtsNode::new()?.synthesize(&config)?;
    write_wav(&out, &audio)?;

    println!(
        "Wrote {} ({} ch, {} Hz, {:.2}s)",
        out.display(),
        audio.channels(),
        audio.sample_rate,
        audio.duration().as_secs_f64()
    );
    Ok(())
}

fn write_wav(path: &Path, audio: &SynthesizedAudio) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: u16::try_from(audio.channels()).context("channel count")?,
        sample_rate: audio.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for sample in waveform::to_interleaved(&audio.waveform) {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
