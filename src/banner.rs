//! The Ghost Protocol banner.
//!
//! Running the binary without a subcommand prints this fixed block and exits
//! with [`EXIT_RESTRICTED`]. Everything here except [`ghost_protocol`] is free
//! of side effects, so the text can be rendered and inspected from tests
//! without touching the console or the process.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Exit code returned after the banner is shown.
pub const EXIT_RESTRICTED: i32 = 1;

/// Width of the `=` and `-` rules.
pub const RULE_WIDTH: usize = 60;

/// One line of the banner, tagged so the writer knows how to colour it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLine {
    Blank,
    HeavyRule,
    LightRule,
    Headline(&'static str),
    Status {
        label: &'static str,
        verdict: &'static str,
    },
    Error(&'static str),
    Detail(&'static str),
}

const LINES: [BannerLine; 11] = [
    BannerLine::Blank,
    BannerLine::HeavyRule,
    BannerLine::Headline("CRITICAL SECURITY WARNING"),
    BannerLine::HeavyRule,
    BannerLine::Status {
        label: "INTEGRITY CHECK.........",
        verdict: "FAILED",
    },
    BannerLine::Status {
        label: "CHECKING PERMISSIONS....",
        verdict: "DENIED",
    },
    BannerLine::Status {
        label: "CONNECTION..............",
        verdict: "REFUSED BY HOST",
    },
    BannerLine::LightRule,
    BannerLine::Error("ERROR: Local execution of 'server.py' is restricted."),
    BannerLine::Detail("This module operates only within the Ghost Cloud Environment."),
    BannerLine::HeavyRule,
];

/// The banner lines in output order, including the trailing blank line.
pub fn banner_lines() -> impl Iterator<Item = BannerLine> {
    LINES.into_iter().chain(std::iter::once(BannerLine::Blank))
}

impl BannerLine {
    /// Plain text of the line, without the trailing newline.
    pub fn text(&self) -> String {
        match self {
            BannerLine::Blank => String::new(),
            BannerLine::HeavyRule => "=".repeat(RULE_WIDTH),
            BannerLine::LightRule => "-".repeat(RULE_WIDTH),
            BannerLine::Headline(text) => format!(" [!] {}", text),
            BannerLine::Status { label, verdict } => format!(" [*] {} [ {} ]", label, verdict),
            BannerLine::Error(text) => format!(" [X] {}", text),
            BannerLine::Detail(text) => format!("     {}", text),
        }
    }
}

/// Render the whole banner as plain text.
pub fn render_banner() -> String {
    let mut out = String::new();
    for line in banner_lines() {
        out.push_str(&line.text());
        out.push('\n');
    }
    out
}

/// Write the banner to `w`, colouring the tags when `w` supports it.
///
/// The bytes written are identical to [`render_banner`] when colour is off.
pub fn write_banner<W: WriteColor>(w: &mut W) -> io::Result<()> {
    let red = || ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true).clone();

    for line in banner_lines() {
        match line {
            BannerLine::Headline(text) => {
                w.set_color(&red())?;
                write!(w, " [!] {}", text)?;
                w.reset()?;
            }
            BannerLine::Status { label, verdict } => {
                w.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
                write!(w, " [*]")?;
                w.reset()?;
                write!(w, " {} ", label)?;
                w.set_color(&red())?;
                write!(w, "[ {} ]", verdict)?;
                w.reset()?;
            }
            BannerLine::Error(text) => {
                w.set_color(&red())?;
                write!(w, " [X] {}", text)?;
                w.reset()?;
            }
            other => write!(w, "{}", other.text())?,
        }
        writeln!(w)?;
    }
    w.flush()
}

/// Show the banner on stdout and hand back the exit code for the process.
///
/// A failed write is logged and otherwise ignored; the exit code is always
/// [`EXIT_RESTRICTED`].
pub fn ghost_protocol(color: ColorChoice) -> i32 {
    let mut stdout = StandardStream::stdout(color);
    if let Err(e) = write_banner(&mut stdout) {
        tracing::debug!(error = %e, "failed to write banner");
    }
    tracing::info!(code = EXIT_RESTRICTED, "local execution refused");
    EXIT_RESTRICTED
}
