//! Leveled, colored status output.
//!
//! User-facing status lines are printed here; `tracing` carries the
//! diagnostic stream. Each line is tagged with its level and, once the
//! context is resolved, an `environment:context` label so operators can see
//! at a glance which configuration a command ran under.

use std::str::FromStr;

use console::style;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show all status lines including informational detail.
    Verbose,
    /// Show steps, results, and warnings.
    #[default]
    Normal,
    /// Show only warnings and errors.
    Quiet,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "verbose" => Ok(Self::Verbose),
            "normal" => Ok(Self::Normal),
            "quiet" => Ok(Self::Quiet),
            _ => Err(format!("unknown output mode: {}", s)),
        }
    }
}

impl OutputMode {
    /// Check if this mode shows informational lines.
    pub fn shows_info(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows steps and success lines.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

/// Status line writer.
#[derive(Debug, Clone)]
pub struct Output {
    mode: OutputMode,
    label: Option<String>,
}

impl Output {
    /// Create a new writer without a context label.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode, label: None }
    }

    /// Tag every line with an `environment:context` label.
    pub fn with_label(mut self, environment: &str, context: &str) -> Self {
        self.label = Some(format!("{}:{}", environment, context));
        self
    }

    /// Get the output mode.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    fn tag(&self, level: &str) -> String {
        match &self.label {
            Some(label) => format!("[{}:{}]", level, label),
            None => format!("[{}]", level),
        }
    }

    /// An action about to be taken.
    pub fn step(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{} {}", style(self.tag("STEP")).blue().bold(), msg);
        }
    }

    /// Informational detail; shown only in verbose mode.
    pub fn info(&self, msg: &str) {
        if self.mode.shows_info() {
            println!("{} {}", style(self.tag("INFO")).cyan(), msg);
        }
    }

    /// A line always shown regardless of mode (reports, summaries).
    pub fn plain(&self, msg: &str) {
        println!("{}", msg);
    }

    /// A completed operation.
    pub fn success(&self, msg: &str) {
        if self.mode.shows_status() {
            println!("{} {}", style(self.tag("SUCCESS")).green().bold(), msg);
        }
    }

    /// A non-fatal problem; always shown.
    pub fn warn(&self, msg: &str) {
        eprintln!("{} {}", style(self.tag("WARNING")).yellow().bold(), msg);
    }

    /// A fatal problem; always shown.
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", style(self.tag("ERROR")).red().bold(), msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes() {
        assert_eq!("verbose".parse::<OutputMode>().unwrap(), OutputMode::Verbose);
        assert_eq!("Normal".parse::<OutputMode>().unwrap(), OutputMode::Normal);
        assert_eq!("QUIET".parse::<OutputMode>().unwrap(), OutputMode::Quiet);
        assert!("loud".parse::<OutputMode>().is_err());
    }

    #[test]
    fn visibility_by_mode() {
        assert!(OutputMode::Verbose.shows_info());
        assert!(!OutputMode::Normal.shows_info());
        assert!(OutputMode::Normal.shows_status());
        assert!(!OutputMode::Quiet.shows_status());
    }

    #[test]
    fn tag_includes_label_when_set() {
        let out = Output::new(OutputMode::Normal).with_label("dev", "local");
        assert_eq!(out.tag("STEP"), "[STEP:dev:local]");
    }

    #[test]
    fn tag_without_label() {
        let out = Output::new(OutputMode::Normal);
        assert_eq!(out.tag("ERROR"), "[ERROR]");
    }
}
