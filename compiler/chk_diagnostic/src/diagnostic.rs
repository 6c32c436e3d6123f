use std::fmt;

use chk_ir::Span;

use crate::ErrorCode;

/// Severity level for a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// How a span in a diagnostic should be rendered.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HighlightStyle {
    /// The span that is actually wrong.
    Primary,
    /// A related span offered for context (e.g. the other cyclic declaration).
    Secondary,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Highlight {
    pub span: Span,
    pub label: String,
    pub style: HighlightStyle,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Note {
    pub span: Option<Span>,
    pub label: String,
}

/// A textual replacement offered as a fix-it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Replacement {
    pub span: Span,
    pub snippet: String,
}

/// A structured diagnostic record, matching the `{ severity, primary-location,
/// message, highlights[range,label,mode], notes[range,label], replacements,
/// insertions }` shape the downstream diagnostic publisher expects.
///
/// `chk_diagnostic` never formats or prints this — that is the downstream
/// publisher's job. The checker only ever *produces* `Diagnostic` values.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub primary: Span,
    pub message: String,
    pub highlights: Vec<Highlight>,
    pub notes: Vec<Note>,
    pub replacements: Vec<Replacement>,
    /// Text to insert at a span rather than replace (e.g. a missing generic
    /// argument list).
    pub insertions: Vec<Replacement>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, primary: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            primary,
            message: message.into(),
            highlights: Vec::new(),
            notes: Vec::new(),
            replacements: Vec::new(),
            insertions: Vec::new(),
        }
    }

    pub fn warning(code: ErrorCode, primary: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(code, primary, message)
        }
    }

    #[must_use]
    pub fn with_highlight(mut self, span: Span, label: impl Into<String>) -> Self {
        self.highlights.push(Highlight {
            span,
            label: label.into(),
            style: HighlightStyle::Secondary,
        });
        self
    }

    #[must_use]
    pub fn with_note(mut self, label: impl Into<String>) -> Self {
        self.notes.push(Note {
            span: None,
            label: label.into(),
        });
        self
    }

    #[must_use]
    pub fn with_replacement(mut self, span: Span, snippet: impl Into<String>) -> Self {
        self.replacements.push(Replacement {
            span,
            snippet: snippet.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
