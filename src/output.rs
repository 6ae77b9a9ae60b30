//! Terminal output.
//!
//! Commands talk to the terminal through the [`Ui`] trait so that the
//! library never prints directly; [`Console`] is the colored implementation
//! used by the binary. Free-standing status lines (errors from the top-level
//! handler, headers) go through [`Output`].

use owo_colors::OwoColorize;

/// Where command output goes.
pub trait Ui {
    /// A plain line on stdout.
    fn log(&mut self, line: &str);

    /// A warning line on stderr.
    fn warn(&mut self, line: &str);
}

/// Colored terminal output.
#[derive(Debug, Default)]
pub struct Console;

impl Ui for Console {
    fn log(&mut self, line: &str) {
        println!("{line}");
    }

    fn warn(&mut self, line: &str) {
        Output::warning(line);
    }
}

/// Standard output helpers for consistent CLI formatting.
pub struct Output;

impl Output {
    /// Print an error message with a red X to stderr.
    ///
    /// Example: `✗ Invalid index. Must be greater than 0.`
    pub fn error(msg: impl AsRef<str>) {
        eprintln!("{} {}", "✗".red().bold(), msg.as_ref().red());
    }

    /// Print a warning message with a yellow warning symbol to stderr.
    ///
    /// Example: `⚠ The BUILDPACK_URL config var is still set`
    pub fn warning(msg: impl AsRef<str>) {
        eprintln!("{} {}", "⚠".yellow(), msg.as_ref());
    }
}

/// `=== title` section header.
pub fn header(title: &str) -> String {
    format!("=== {title}")
}

/// Highlight a shell command inside a sentence.
pub fn command(cmd: &str) -> String {
    format!("{}", cmd.magenta())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_methods_dont_panic() {
        Output::error("test");
        Output::warning("test");
        let mut console = Console;
        console.log("test");
        console.warn("test");
    }

    #[test]
    fn test_header_format() {
        assert_eq!(header("demo Buildpack URL"), "=== demo Buildpack URL");
    }

    #[test]
    fn test_command_keeps_text() {
        assert!(command("git push heroku main").contains("git push heroku main"));
    }
}
