//! Canonical error facility for snapvault
//!
//! Every failure in the engine is classified by a stable kind taxonomy.
//! Operations attach context (operation name, path, snapshot id, content
//! hash) through builder methods; the CLI maps kinds to exit behaviour.

/// Result type alias using SvError
pub type Result<T> = std::result::Result<T, SvError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling
/// and test assertions. Kinds classify failures, not call sites: the same
/// kind can surface from the store, the content layer, or an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvErrorKind {
    /// Underlying storage substrate failure (disk full, lock contention)
    StoreIo,
    /// Database opened but schema is absent or incompatible
    Schema,
    /// Referenced snapshot id does not exist
    UnknownSnapshot,
    /// A referenced hash has no content row (prior corruption)
    MissingContent,
    /// A content row's bytes do not match its hash
    CorruptContent,
    /// Source/target filesystem error (read, write, permission)
    FileIo,
    /// File exceeds the configured size cap; recoverable, file skipped
    TooLarge,
    /// Store-level integrity violation (a bug, or external tampering)
    Constraint,
    /// JSON encoding of a report failed
    Serialization,
    /// Internal invariant breach
    Internal,
}

impl SvErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            SvErrorKind::StoreIo => "ERR_STORE_IO",
            SvErrorKind::Schema => "ERR_SCHEMA",
            SvErrorKind::UnknownSnapshot => "ERR_UNKNOWN_SNAPSHOT",
            SvErrorKind::MissingContent => "ERR_MISSING_CONTENT",
            SvErrorKind::CorruptContent => "ERR_CORRUPT_CONTENT",
            SvErrorKind::FileIo => "ERR_FILE_IO",
            SvErrorKind::TooLarge => "ERR_TOO_LARGE",
            SvErrorKind::Constraint => "ERR_CONSTRAINT",
            SvErrorKind::Serialization => "ERR_SERIALIZATION",
            SvErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind plus optional context fields. Context is attached at the
/// site that has it: row-level helpers add the operation name, operations
/// add paths and snapshot ids.
#[derive(Debug, Clone)]
pub struct SvError {
    kind: SvErrorKind,
    op: Option<String>,
    path: Option<String>,
    snapshot_id: Option<i64>,
    hash: Option<String>,
    message: String,
}

impl SvError {
    /// Create a new error with the specified kind
    pub fn new(kind: SvErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            snapshot_id: None,
            hash: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add filesystem or store path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add snapshot id context
    pub fn with_snapshot_id(mut self, id: i64) -> Self {
        self.snapshot_id = Some(id);
        self
    }

    /// Add content hash context
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> SvErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the snapshot id context, if any
    pub fn snapshot_id(&self) -> Option<i64> {
        self.snapshot_id
    }

    /// Get the content hash context, if any
    pub fn hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for SvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(id) = self.snapshot_id {
            write!(f, " (snapshot: {})", id)?;
        }
        if let Some(hash) = &self.hash {
            write!(f, " (hash: {})", hash)?;
        }
        Ok(())
    }
}

impl std::error::Error for SvError {}

/// Create a filesystem error from std::io::Error
pub fn file_io(operation: &str, err: std::io::Error) -> SvError {
    SvError::new(SvErrorKind::FileIo)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
