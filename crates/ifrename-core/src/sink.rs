//! Injected destinations for diagnostics.
//!
//! Every operation in this crate reports content problems through a
//! [`DiagnosticSink`] passed in by the caller instead of a process-wide
//! logger. Behaviour never depends on what the sink does with a message.

use crate::types::{Diagnostic, DiagnosticKind, Level};

/// Receives diagnostics emitted by parsing, resolution and serialization.
pub trait DiagnosticSink {
    /// Handles one diagnostic.
    fn emit(&mut self, diagnostic: Diagnostic);

    /// Emits a debug-level diagnostic.
    fn debug(&mut self, kind: DiagnosticKind, message: String) {
        self.emit(Diagnostic::new(kind, message).with_level(Level::Debug));
    }

    /// Emits an info-level diagnostic.
    fn info(&mut self, kind: DiagnosticKind, message: String) {
        self.emit(Diagnostic::new(kind, message).with_level(Level::Info));
    }

    /// Emits a warning.
    fn warn(&mut self, kind: DiagnosticKind, message: String) {
        self.emit(Diagnostic::new(kind, message).with_level(Level::Warning));
    }

    /// Emits an error.
    fn error(&mut self, kind: DiagnosticKind, message: String) {
        self.emit(Diagnostic::new(kind, message).with_level(Level::Error));
    }

    /// Emits a critical diagnostic.
    fn critical(&mut self, kind: DiagnosticKind, message: String) {
        self.emit(Diagnostic::new(kind, message).with_level(Level::Critical));
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn emit(&mut self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

/// Forwards diagnostics to `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, d: Diagnostic) {
        let code = d.kind.code();
        match d.level {
            Level::Debug => tracing::debug!(code, line = d.line, "{}", d.message),
            Level::Info => tracing::info!(code, line = d.line, "{}", d.message),
            Level::Warning => tracing::warn!(code, line = d.line, "{}", d.message),
            Level::Error => tracing::error!(code, line = d.line, "{}", d.message),
            Level::Critical => {
                tracing::error!(code, line = d.line, critical = true, "{}", d.message);
            }
        }
    }
}

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default, Clone)]
pub struct Collector {
    diagnostics: Vec<Diagnostic>,
}

impl Collector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns diagnostics of the given kind.
    #[must_use]
    pub fn of_kind(&self, kind: DiagnosticKind) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.kind == kind).collect()
    }

    /// Returns true if any diagnostic of the given kind was emitted.
    #[must_use]
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    /// Counts diagnostics at or above a level.
    #[must_use]
    pub fn count_at(&self, level: Level) -> usize {
        self.diagnostics.iter().filter(|d| d.level >= level).count()
    }
}

impl DiagnosticSink for Collector {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
