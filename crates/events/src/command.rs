/// A command: intent handed to a command handler.
///
/// Commands are **transient** fixture values. A handler turns one into a single
/// event or rejects it with a `DomainError`.
///
/// ## Design Constraints
///
/// Commands must be:
/// - **Cloneable**: fixtures may be reused across timelines
/// - **Send + Sync**: slices may replay on worker threads
/// - **'static**: commands own all their data
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable command name (e.g. "create_course"), used in logs.
    fn command_type(&self) -> &'static str;
}

/// State-only slices issue no commands.
impl Command for () {
    fn command_type(&self) -> &'static str {
        "none"
    }
}
