//! mailtree - inspect captured IMAP `FETCH BODY[]` responses.
//!
//! Reads a response (one line per protocol line, CRLF or LF terminated)
//! from a file or stdin and prints the extracted MIME entity tree.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use mailtree_imap::{BodyExtractor, DuplicateHeaders, Extractor, ParseOptions};
use mailtree_mime::{BoundaryGrammar, DEFAULT_CHARSET, DEFAULT_MAX_DEPTH, Entity, EntityKind};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Captured response file; stdin when omitted
    input: Option<PathBuf>,

    /// Maximum multipart nesting depth
    #[clap(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Charset for text parts that declare none
    #[clap(long, env = "MAILTREE_DEFAULT_CHARSET", default_value = DEFAULT_CHARSET)]
    default_charset: String,

    /// Keep every occurrence of repeated headers
    #[clap(long)]
    retain_duplicates: bool,

    /// Read boundaries as proper parameters (unquoted, up to `;`)
    #[clap(long)]
    strict_boundary: bool,

    /// Print the tree as JSON
    #[clap(long)]
    json: bool,
}

impl Args {
    fn parse_options(&self) -> ParseOptions {
        let mut builder = ParseOptions::builder()
            .max_depth(self.max_depth)
            .default_charset(self.default_charset.clone());
        if self.retain_duplicates {
            builder = builder.duplicate_headers(DuplicateHeaders::Retain);
        }
        if self.strict_boundary {
            builder = builder.boundary_grammar(BoundaryGrammar::Parameter);
        }
        builder.build()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailtree=info,mailtree_imap=info,mailtree_mime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let raw = read_input(args.input.as_deref())?;
    let lines: Vec<&str> = raw.lines().collect();
    info!(lines = lines.len(), "Extracting message");

    let messages = BodyExtractor::new()
        .with_options(args.parse_options())
        .extract(&lines)
        .context("failed to extract message")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for message in &messages {
        if args.json {
            serde_json::to_writer_pretty(&mut out, message)?;
            writeln!(out)?;
        } else {
            if let Some(subject) = message.subject() {
                writeln!(out, "Subject: {subject}")?;
            }
            print_entity(&mut out, message, 0)?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}

fn print_entity(out: &mut impl Write, entity: &Entity, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    let mimetype = entity.mimetype();
    let headers = entity.headers.len();

    match &entity.kind {
        EntityKind::Container(parts) => {
            writeln!(
                out,
                "{indent}{} ({headers} headers, {} parts)",
                mimetype.essence(),
                parts.len()
            )?;
            for part in parts {
                print_entity(out, part, depth + 1)?;
            }
        }
        EntityKind::Leaf(body) => {
            let kind = if body.as_text().is_some() { "text" } else { "binary" };
            writeln!(
                out,
                "{indent}{} ({headers} headers, {} bytes {kind})",
                mimetype.essence(),
                body.len()
            )?;
        }
    }

    Ok(())
}
