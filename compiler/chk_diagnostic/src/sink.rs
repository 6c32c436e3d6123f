use crate::{Diagnostic, ErrorGuaranteed, Severity};

/// The interface the core consumes from the downstream diagnostic
/// publisher/formatter. The checker never formats or prints a
/// diagnostic itself — it only ever constructs [`Diagnostic`] values and
/// hands them to a `Sink`.
pub trait Sink {
    fn emit(&mut self, diagnostic: Diagnostic);

    /// Emit an error diagnostic, returning proof that it happened.
    fn emit_error(&mut self, diagnostic: Diagnostic) -> ErrorGuaranteed {
        debug_assert!(diagnostic.is_error(), "emit_error called with a warning");
        self.emit(diagnostic);
        ErrorGuaranteed::new()
    }
}

/// An in-memory sink that just accumulates diagnostics in emission order.
/// This is what the checker's own test suite uses; a real publisher (source
/// snippet rendering, JSON/SARIF output, LSP push) lives downstream.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

impl Sink for CollectingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use chk_ir::Span;

    #[test]
    fn counts_errors_and_warnings_separately() {
        let mut sink = CollectingSink::new();
        sink.emit(Diagnostic::error(
            ErrorCode::E2002TypeMismatch,
            Span::DUMMY,
            "boom",
        ));
        sink.emit(Diagnostic::warning(
            ErrorCode::E2003InvalidCast,
            Span::DUMMY,
            "maybe traps",
        ));
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.warning_count(), 1);
        assert!(sink.has_errors());
    }

    #[test]
    fn emit_error_returns_a_guarantee() {
        let mut sink = CollectingSink::new();
        let _proof = sink.emit_error(Diagnostic::error(
            ErrorCode::E1001UnresolvedName,
            Span::DUMMY,
            "what?",
        ));
    }
}
