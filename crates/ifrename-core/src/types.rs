//! Core types for diagnostics emitted while loading and applying rules.

use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Tracing detail, e.g. which method was guessed for a line.
    Debug,
    /// Informational message.
    Info,
    /// Content problem; the offending unit was skipped.
    Warning,
    /// Operation-level failure (source unavailable, I/O).
    Error,
    /// Internal inconsistency that should never happen.
    Critical,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// No rules source could be obtained.
    SourceUnavailable,
    /// Reading or writing the rules source failed.
    IoFailure,
    /// A line does not match `<target>[:<method>]=<value>`.
    UnrecognisedLine,
    /// The method token is not one of the known methods.
    UnknownMethod,
    /// The value does not pass its method's validator.
    InvalidValue,
    /// A target was defined more than once.
    DuplicateTarget,
    /// An old-style `pciXpY` ppn was rewritten to `pXpY`.
    LegacyPpn,
    /// The NIC snapshot contains duplicate ppns.
    PpnQuirk,
    /// No NIC matched a formula.
    NotFound,
    /// A binding record could not be constructed.
    BindingFailed,
    /// The method was inferred from the value.
    MethodGuessed,
}

impl DiagnosticKind {
    /// Returns the stable short code (e.g. "SR003").
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::SourceUnavailable => "SR001",
            Self::IoFailure => "SR002",
            Self::UnrecognisedLine => "SR003",
            Self::UnknownMethod => "SR004",
            Self::InvalidValue => "SR005",
            Self::DuplicateTarget => "SR006",
            Self::LegacyPpn => "SR007",
            Self::PpnQuirk => "SR008",
            Self::NotFound => "SR009",
            Self::BindingFailed => "SR010",
            Self::MethodGuessed => "SR011",
        }
    }

    /// Returns the level this kind is normally reported at.
    #[must_use]
    pub fn default_level(self) -> Level {
        match self {
            Self::SourceUnavailable | Self::IoFailure => Level::Error,
            Self::MethodGuessed => Level::Debug,
            _ => Level::Warning,
        }
    }
}

/// A single message emitted by the parser, resolver or serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What the message is about.
    pub kind: DiagnosticKind,
    /// Severity.
    pub level: Level,
    /// Human-readable message.
    pub message: String,
    /// 1-indexed line in the rules source, when the message concerns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Diagnostic {
    /// Creates a diagnostic at the kind's default level.
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            level: kind.default_level(),
            message: message.into(),
            line: None,
        }
    }

    /// Attaches a source line number.
    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Overrides the level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.level, self.kind.code(), self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}
