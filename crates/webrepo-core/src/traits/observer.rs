//! Observer capability for repository side-channel events.

/// Sink for repository observability events.
///
/// The repository reports operation intent, outcomes, and absence
/// short-circuits through this narrow interface instead of a global
/// logging facility, so the core stays testable without a concrete
/// logging backend. Observer calls are infallible: an observer can never
/// cause a repository operation to fail.
pub trait Observer: Send + Sync {
    /// Record an informational event (operation intent, outcome, or an
    /// absence short-circuit).
    fn info(&self, message: &str);

    /// Record a warning event (a remote failure about to be escalated).
    fn warn(&self, message: &str);
}
