//! Colored terminal output for release operations
//!
//! Progress goes to stdout, errors to stderr. Quiet mode silences everything
//! except errors; verbose mode adds `→` detail lines.

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    stdout: BufferWriter,
    verbose: bool,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.verbose, self.quiet)
    }
}

/// Marker printed before a message and its color
struct Style {
    symbol: &'static str,
    color: Option<Color>,
    bold: bool,
    tint_message: bool,
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            verbose,
            quiet,
        }
    }

    fn write_styled(&self, writer: &BufferWriter, style: Style, message: &str) -> std::io::Result<()> {
        let mut buffer = writer.buffer();
        let mut spec = ColorSpec::new();
        spec.set_fg(style.color).set_bold(style.bold);

        buffer.set_color(&spec)?;
        write!(&mut buffer, "{}", style.symbol)?;
        buffer.reset()?;
        if style.tint_message {
            buffer.set_color(ColorSpec::new().set_fg(style.color))?;
        }
        writeln!(&mut buffer, " {}", message)?;
        buffer.reset()?;
        writer.print(&buffer)
    }

    fn emit(&self, style: Style, message: &str) {
        if self.quiet {
            return;
        }
        // Output is best-effort; a closed stdout must not abort a release midway.
        let _ = self.write_styled(&self.stdout, style, message);
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        self.emit(
            Style {
                symbol: "✓",
                color: Some(Color::Green),
                bold: true,
                tint_message: false,
            },
            message,
        );
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        self.emit(
            Style {
                symbol: "⚠",
                color: Some(Color::Yellow),
                bold: true,
                tint_message: true,
            },
            message,
        );
    }

    /// Print a verbose/debug message (only in verbose mode)
    pub fn verbose(&self, message: &str) {
        if !self.verbose {
            return;
        }
        self.emit(
            Style {
                symbol: "→",
                color: Some(Color::Blue),
                bold: false,
                tint_message: false,
            },
            message,
        );
    }

    /// Print an error message to stderr (always shown)
    pub fn error(&self, message: &str) {
        let stderr = BufferWriter::stderr(ColorChoice::Auto);
        let style = Style {
            symbol: "✗",
            color: Some(Color::Red),
            bold: true,
            tint_message: true,
        };
        if self.write_styled(&stderr, style, message).is_err() {
            eprintln!("✗ {}", message);
        }
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        if self.quiet {
            return;
        }
        let mut buffer = self.stdout.buffer();
        let _ = writeln!(&mut buffer);
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
        let _ = writeln!(&mut buffer, "═══ {} ═══", title);
        let _ = buffer.reset();
        let _ = self.stdout.print(&buffer);
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) {
        for line in message.lines() {
            self.println(&format!("    {}", line));
        }
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.quiet {
            return;
        }
        let mut buffer = self.stdout.buffer();
        let _ = writeln!(&mut buffer, "{}", message);
        let _ = self.stdout.print(&buffer);
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
