//! Terminal capabilities, decided once at startup.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

/// Narrower than this and record tables are not worth shrinking.
const MIN_TABLE_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Terminal {
    /// Highlight status words in tables.
    pub color: bool,
    /// Draw spinners and row counters on stderr.
    pub progress: bool,
    /// Width to fit tables into, when known.
    pub width: Option<usize>,
}

/// What the process is attached to.
#[derive(Clone, Copy, Debug, Default)]
struct Attached {
    stdout_tty: bool,
    stderr_tty: bool,
    no_color: bool,
    columns: Option<usize>,
}

impl Attached {
    fn detect() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            stderr_tty: std::io::stderr().is_terminal(),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            columns: std::env::var("COLUMNS").ok().and_then(|v| v.parse().ok()),
        }
    }
}

impl Terminal {
    fn decide(flags: &GlobalFlags, attached: Attached) -> Self {
        let table = flags.format == OutputFormat::Table;
        let color = table
            && match flags.color {
                ColorMode::Always => true,
                ColorMode::Never => false,
                ColorMode::Auto => attached.stdout_tty && !attached.no_color,
            };
        Self {
            color,
            progress: attached.stderr_tty && !flags.quiet,
            width: attached.columns.filter(|w| *w >= MIN_TABLE_WIDTH),
        }
    }
}

static TERMINAL: OnceLock<Terminal> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = TERMINAL.set(Terminal::decide(flags, Attached::detect()));
}

/// Falls back to a plain, non-interactive terminal before [`init`].
#[must_use]
pub fn terminal() -> Terminal {
    TERMINAL.get().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flags(format: OutputFormat, color: ColorMode, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            quiet,
            verbose: false,
            color,
            endpoint: None,
        }
    }

    const TTY: Attached = Attached {
        stdout_tty: true,
        stderr_tty: true,
        no_color: false,
        columns: Some(120),
    };

    #[test]
    fn tables_on_a_tty_get_color_and_width() {
        let term = Terminal::decide(&flags(OutputFormat::Table, ColorMode::Auto, false), TTY);
        assert_eq!(
            term,
            Terminal {
                color: true,
                progress: true,
                width: Some(120),
            }
        );
    }

    #[test]
    fn json_is_never_colored() {
        let term = Terminal::decide(&flags(OutputFormat::Json, ColorMode::Always, false), TTY);
        assert!(!term.color);
    }

    #[test]
    fn no_color_and_pipes_disable_auto_color() {
        let table = flags(OutputFormat::Table, ColorMode::Auto, false);
        let no_color = Attached {
            no_color: true,
            ..TTY
        };
        let piped = Attached {
            stdout_tty: false,
            ..TTY
        };
        assert!(!Terminal::decide(&table, no_color).color);
        assert!(!Terminal::decide(&table, piped).color);

        // Spinners go to stderr, so a piped stdout keeps them.
        assert!(Terminal::decide(&table, piped).progress);
    }

    #[test]
    fn quiet_hides_progress_and_tiny_widths_are_ignored() {
        let narrow = Attached {
            columns: Some(20),
            ..TTY
        };
        let term = Terminal::decide(&flags(OutputFormat::Table, ColorMode::Auto, true), narrow);
        assert!(!term.progress);
        assert_eq!(term.width, None);
    }
}
