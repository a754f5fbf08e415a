//! Directive domain model.

/// A locally recognized command embedded in user input.
///
/// Directives bypass the remote conversational backend entirely; the
/// interpreter performs the corresponding operations call and synthesizes the
/// reply itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Send a message to a notification channel.
    SendChannelMessage { channel: String, text: String },
    /// Fetch current pipeline statistics.
    PipelineStats,
    /// Fetch the current lead records.
    ListLeads,
    /// Check backend system health.
    HealthCheck,
}
