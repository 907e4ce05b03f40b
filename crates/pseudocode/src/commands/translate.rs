//! Translate command - convert Python source into IB pseudocode.

use anyhow::{Context, anyhow};
use clap::{Args, ValueEnum};
use pseudocode_syntax::{Flag, registry};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::PseudocodeConfig;

/// Exit status when `--strict` finds flagged constructs.
const EXIT_FLAGGED: u8 = 2;

/// Translate command arguments
#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Input source file, use - for stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Source language (config, then file extension, then python when omitted)
    #[arg(short, long, value_enum)]
    pub from: Option<SourceLanguage>,

    /// Target notation
    #[arg(short, long, value_enum)]
    pub to: Option<TargetLanguage>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print a JSON document with the code and every flagged construct
    #[arg(long, conflicts_with = "ir")]
    pub json: bool,

    /// Print the parsed IR as JSON instead of rendering it
    #[arg(long)]
    pub ir: bool,

    /// Exit with status 2 when any construct was flagged
    #[arg(long)]
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    /// Python 3
    Python,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    /// IB Computer Science pseudocode
    Ib,
}

impl SourceLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "python",
        }
    }
}

impl TargetLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::Ib => "ib",
        }
    }
}

/// Result of one translation, as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct TranslateResult {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub source_language: String,
    pub target_language: String,
    pub code: String,
    pub flags: Vec<Flag>,
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))
    }
}

/// Pick the source language: flag, then config, then file extension.
fn detect_source_language(args: &TranslateArgs, config: &PseudocodeConfig) -> &'static str {
    if let Some(lang) = args.from.or(config.translate.from) {
        return lang.as_str();
    }
    args.input
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(registry::reader_for_extension)
        .map(|reader| reader.language())
        .unwrap_or(SourceLanguage::Python.as_str())
}

/// Run the translate command.
pub fn cmd_translate(args: TranslateArgs, config: &PseudocodeConfig) -> anyhow::Result<ExitCode> {
    let content = read_input(&args.input)?;
    let input_name = args.input.display().to_string();

    let source_lang = detect_source_language(&args, config);
    let reader = registry::reader_for_language(source_lang)
        .ok_or_else(|| anyhow!("no reader available for language: {source_lang}"))?;

    let ir = reader
        .read(&content)
        .with_context(|| format!("failed to parse {input_name} as {source_lang}"))?;

    if args.ir {
        let json = serde_json::to_string_pretty(&ir)?;
        return emit(args.output.as_deref(), &json).map(|()| ExitCode::SUCCESS);
    }

    let target_lang = args
        .to
        .or(config.translate.to)
        .unwrap_or(TargetLanguage::Ib)
        .as_str();
    let writer = registry::writer_for_language(target_lang)
        .ok_or_else(|| anyhow!("no writer available for language: {target_lang}"))?;

    tracing::debug!(input = %input_name, from = source_lang, to = target_lang, "translating");
    let rendered = writer
        .write(&ir, &config.render_options())
        .with_context(|| format!("failed to render {input_name} as {target_lang}"))?;

    for flag in &rendered.flags {
        tracing::warn!(
            line = flag.line,
            "{input_name}: unsupported {}: {}",
            flag.construct,
            flag.detail
        );
    }

    let flagged = !rendered.is_clean();
    if args.json {
        let result = TranslateResult {
            input: input_name,
            output: args.output.as_ref().map(|p| p.display().to_string()),
            source_language: source_lang.to_string(),
            target_language: target_lang.to_string(),
            code: rendered.text.clone(),
            flags: rendered.flags,
        };
        if let Some(path) = &args.output {
            write_file(path, &rendered.text)?;
        }
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        emit(args.output.as_deref(), &rendered.text)?;
    }

    if flagged && args.strict {
        return Ok(ExitCode::from(EXIT_FLAGGED));
    }
    Ok(ExitCode::SUCCESS)
}

/// Write `text` to the output file, or stdout when none was given.
fn emit(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            write_file(path, text)?;
            tracing::info!(path = %path.display(), "wrote output");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn write_file(path: &Path, text: &str) -> anyhow::Result<()> {
    std::fs::write(path, format!("{text}\n"))
        .with_context(|| format!("failed to write {}", path.display()))
}
