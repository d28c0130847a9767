//! Reading state documents from the command line
//!
//! A document may be passed inline, as `@path` to a file, or piped on stdin
//! (no argument, or `-`).

use std::io::{IsTerminal, Read};

use anyhow::{Context, Result, bail};
use statusboard_core::domain::pipeline::LiveState;

/// Where a state document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Inline(String),
    File(String),
    Stdin,
}

impl Source {
    pub fn parse(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Source::Stdin,
            Some(arg) => match arg.strip_prefix('@') {
                Some(path) => Source::File(path.to_string()),
                None => Source::Inline(arg.to_string()),
            },
        }
    }
}

/// Reads and parses a live-state document
pub fn read_state(arg: Option<&str>) -> Result<LiveState> {
    let source = Source::parse(arg);
    let text = read_text(&source)?;
    LiveState::from_json(&text).with_context(|| match &source {
        Source::Inline(_) => "Failed to parse state document argument".to_string(),
        Source::File(path) => format!("Failed to parse state document in {}", path),
        Source::Stdin => "Failed to parse state document from stdin".to_string(),
    })
}

fn read_text(source: &Source) -> Result<String> {
    match source {
        Source::Inline(text) => Ok(text.clone()),
        Source::File(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path)),
        Source::Stdin => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                bail!("No state document given: pass it as an argument, as @file, or pipe it in");
            }
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .context("Failed to read state document from stdin")?;
            Ok(text)
        }
    }
}
