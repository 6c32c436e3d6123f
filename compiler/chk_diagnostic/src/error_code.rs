//! Stable error codes for checker diagnostics.
//!
//! Codes are grouped by the component that raises them, mirroring error
//! taxonomy. Downstream `--explain CODE` lookups key on this enum; renumbering
//! an existing variant is a breaking change, so new diagnostics are always
//! appended at the end of their group.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Name resolution (E1xxx)
    /// Identifier does not resolve to any declaration in scope.
    E1001UnresolvedName,
    /// `A.B` resolves but `B` is hidden from the caller's scope.
    E1002Inaccessible,
    /// Workspace import cycle detected.
    E1003CyclicImport,
    /// `use` target workspace does not exist.
    E1004UnknownWorkspace,
    /// A workspace `use`s itself.
    E1005SelfImport,
    /// A local variable from an enclosing expression scope was referenced
    /// across a function-literal boundary.
    E1006IllegalCapture,
    /// Duplicate definition of a name within one environment.
    E1007DuplicateDefinition,

    // Type checking (E2xxx)
    /// Operand types are not compatible with an operator.
    E2001OperatorMismatch,
    /// Expression type incompatible with its expected/annotated type.
    E2002TypeMismatch,
    /// `as` conversion is not permitted between the two types.
    E2003InvalidCast,
    /// Assignment, `++`/`--`, or mutable coercion on an immutable binding.
    E2004MutabilityViolation,
    /// Call arity/naming does not match the callee's parameters.
    E2005ArityMismatch,
    /// A required record field was left uninitialized, or named twice.
    E2006FieldMismatch,
    /// `break`/`continue`/`return` used outside the construct that accepts it.
    E2007MisplacedControlFlow,
    /// Type-recursion cycle with no pointer indirection.
    E2008CyclicType,
    /// `start` entry point declared more than once, or with the wrong signature.
    E2009InvalidEntryPoint,

    // Generics and concepts (E3xxx)
    /// A generic parameter could not be deduced and was not bound explicitly.
    E3001UnboundGenericParameter,
    /// A concept constraint was not satisfied by the candidate type.
    E3002ConceptNotSatisfied,
    /// Non-trivial generic argument used to partially specialize an `extend`.
    E3003IllegalPartialSpecialization,
    /// Behaviour conformance check failed: a prototype has no matching member.
    E3004MissingBehaviourMember,

    // Patterns (E4xxx)
    /// `...` used somewhere other than the last element of a composite pattern.
    E4001MisplacedRestPattern,
    /// Pattern shape does not match the scrutinee's type.
    E4002PatternShapeMismatch,
    /// The two sides of an or-pattern bind different names or types.
    E4003OrPatternBindingMismatch,

    // Fatal / internal (E9xxx)
    /// Generic instantiation recursion exceeded the depth limit.
    E9001InstantiationDepthExceeded,
    /// A workspace declaration appeared in the wrong package.
    E9002WorkspacePackageViolation,
}

impl ErrorCode {
    /// The stable `E####`-style code, for `--explain` lookups.
    pub fn code(self) -> &'static str {
        match self {
            ErrorCode::E1001UnresolvedName => "E1001",
            ErrorCode::E1002Inaccessible => "E1002",
            ErrorCode::E1003CyclicImport => "E1003",
            ErrorCode::E1004UnknownWorkspace => "E1004",
            ErrorCode::E1005SelfImport => "E1005",
            ErrorCode::E1006IllegalCapture => "E1006",
            ErrorCode::E1007DuplicateDefinition => "E1007",
            ErrorCode::E2001OperatorMismatch => "E2001",
            ErrorCode::E2002TypeMismatch => "E2002",
            ErrorCode::E2003InvalidCast => "E2003",
            ErrorCode::E2004MutabilityViolation => "E2004",
            ErrorCode::E2005ArityMismatch => "E2005",
            ErrorCode::E2006FieldMismatch => "E2006",
            ErrorCode::E2007MisplacedControlFlow => "E2007",
            ErrorCode::E2008CyclicType => "E2008",
            ErrorCode::E2009InvalidEntryPoint => "E2009",
            ErrorCode::E3001UnboundGenericParameter => "E3001",
            ErrorCode::E3002ConceptNotSatisfied => "E3002",
            ErrorCode::E3003IllegalPartialSpecialization => "E3003",
            ErrorCode::E3004MissingBehaviourMember => "E3004",
            ErrorCode::E4001MisplacedRestPattern => "E4001",
            ErrorCode::E4002PatternShapeMismatch => "E4002",
            ErrorCode::E4003OrPatternBindingMismatch => "E4003",
            ErrorCode::E9001InstantiationDepthExceeded => "E9001",
            ErrorCode::E9002WorkspacePackageViolation => "E9002",
        }
    }

    /// Whether this code's surface behavior is `abort`: fatal,
    /// terminates the whole `check()` rather than just the declaration.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            ErrorCode::E9001InstantiationDepthExceeded | ErrorCode::E9002WorkspacePackageViolation
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
