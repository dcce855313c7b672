use crate::ingest::NodeId;
use owo_colors::OwoColorize;
use std::io::{self, IsTerminal};
use std::sync::Arc;

/// Styling capability injected into every renderer.
///
/// Renderers never decide on their own whether to emit escape codes; they ask
/// the highlighter, which was chosen once at startup.
pub trait Highlighter: Send + Sync {
    /// Text attributed to a node, in that node's color.
    fn node(&self, node: NodeId, text: &str) -> String;
    fn good(&self, text: &str) -> String;
    fn warn(&self, text: &str) -> String;
    fn bad(&self, text: &str) -> String;
    fn heading(&self, text: &str) -> String;
}

/// ANSI colors via owo-colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiHighlighter;

impl Highlighter for AnsiHighlighter {
    fn node(&self, node: NodeId, text: &str) -> String {
        match node.0 {
            1 => text.green().to_string(),
            2 => text.cyan().to_string(),
            3 => text.yellow().to_string(),
            4 => text.magenta().to_string(),
            5 => text.blue().to_string(),
            _ => text.white().to_string(),
        }
    }

    fn good(&self, text: &str) -> String {
        text.green().to_string()
    }

    fn warn(&self, text: &str) -> String {
        text.yellow().to_string()
    }

    fn bad(&self, text: &str) -> String {
        text.red().bold().to_string()
    }

    fn heading(&self, text: &str) -> String {
        text.bold().to_string()
    }
}

/// Passes text through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn node(&self, _node: NodeId, text: &str) -> String {
        text.to_string()
    }

    fn good(&self, text: &str) -> String {
        text.to_string()
    }

    fn warn(&self, text: &str) -> String {
        text.to_string()
    }

    fn bad(&self, text: &str) -> String {
        text.to_string()
    }

    fn heading(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Colors only when asked for, `NO_COLOR` is unset and stdout is a terminal.
pub fn select_highlighter(no_color: bool) -> Arc<dyn Highlighter> {
    let env_disabled = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());

    if no_color || env_disabled || !io::stdout().is_terminal() {
        Arc::new(PlainHighlighter)
    } else {
        Arc::new(AnsiHighlighter)
    }
}
