//! Keyword matching for operational directives.
//!
//! Matching is an ordered list of rules evaluated in priority order with an
//! explicit no-match terminal, using case-insensitive substring checks rather
//! than a grammar. The matching is intentionally permissive: an unrelated
//! sentence containing "status" will trigger a health check. That false
//! positive is an accepted trade for simplicity, not a bug.

use super::model::Directive;

type MatchFn = fn(&str) -> Option<Directive>;

/// Ordered matching rules; the first rule that produces a directive wins.
/// The channel-message rule runs first because it is the most specific.
const RULES: &[MatchFn] = &[
    match_send_channel_message,
    match_pipeline_stats,
    match_list_leads,
    match_health_check,
];

/// Scans `input` for an embedded directive.
///
/// Returns `None` when no rule matches; the turn should then proceed to the
/// remote backend.
pub fn match_directive(input: &str) -> Option<Directive> {
    RULES.iter().find_map(|rule| rule(input))
}

/// Matches `send to <channel>: <text>` anywhere in the input.
fn match_send_channel_message(input: &str) -> Option<Directive> {
    const KEYWORD: &str = "send to ";
    let start = find_ignore_ascii_case(input, KEYWORD)?;
    let rest = &input[start + KEYWORD.len()..];
    let colon = rest.find(':')?;

    let channel = rest[..colon].trim();
    let text = rest[colon + 1..].trim();
    if channel.is_empty() || text.is_empty() {
        return None;
    }

    Some(Directive::SendChannelMessage {
        channel: channel.to_string(),
        text: text.to_string(),
    })
}

fn match_pipeline_stats(input: &str) -> Option<Directive> {
    let lower = input.to_lowercase();
    let matched = lower.contains("pipeline stats")
        || lower.contains("pipeline statistics")
        || lower.contains("show stats");
    matched.then_some(Directive::PipelineStats)
}

fn match_list_leads(input: &str) -> Option<Directive> {
    let lower = input.to_lowercase();
    let matched =
        lower.contains("list leads") || lower.contains("show leads") || lower.contains("my leads");
    matched.then_some(Directive::ListLeads)
}

fn match_health_check(input: &str) -> Option<Directive> {
    let lower = input.to_lowercase();
    let matched = lower.contains("system health")
        || lower.contains("health check")
        || lower.contains("status");
    matched.then_some(Directive::HealthCheck)
}

/// Byte offset of the first ASCII case-insensitive occurrence of `needle`.
///
/// The needle is plain ASCII, so the returned offset always lands on a char
/// boundary of `haystack`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_for_plain_chat() {
        assert_eq!(match_directive("Draft a pitch for Acme Corp"), None);
    }

    #[test]
    fn test_send_channel_message() {
        let directive = match_directive("please Send To #sales: deal closed!").unwrap();
        assert_eq!(
            directive,
            Directive::SendChannelMessage {
                channel: "#sales".to_string(),
                text: "deal closed!".to_string(),
            }
        );
    }

    #[test]
    fn test_send_requires_channel_and_text() {
        assert_eq!(match_directive("send to : hello"), None);
        assert_eq!(match_directive("send to #sales:   "), None);
        // Without a colon the rule does not apply; "send to" alone also
        // contains no other keyword, so the turn goes to the backend.
        assert_eq!(match_directive("send to the moon"), None);
    }

    #[test]
    fn test_pipeline_stats_keywords() {
        assert_eq!(
            match_directive("Show Pipeline Stats please"),
            Some(Directive::PipelineStats)
        );
        assert_eq!(
            match_directive("can you show stats?"),
            Some(Directive::PipelineStats)
        );
    }

    #[test]
    fn test_list_leads_keywords() {
        assert_eq!(match_directive("list leads"), Some(Directive::ListLeads));
        assert_eq!(
            match_directive("Show LEADS from this week"),
            Some(Directive::ListLeads)
        );
    }

    #[test]
    fn test_health_keywords() {
        assert_eq!(
            match_directive("run a health check"),
            Some(Directive::HealthCheck)
        );
        assert_eq!(
            match_directive("what's the system health like"),
            Some(Directive::HealthCheck)
        );
    }

    #[test]
    fn test_permissive_status_false_positive() {
        // Documented limitation: keyword matching trades false positives for
        // simplicity. "status" anywhere triggers a health check.
        assert_eq!(
            match_directive("update the order status wording in the email"),
            Some(Directive::HealthCheck)
        );
    }

    #[test]
    fn test_rule_priority() {
        // "pipeline stats" outranks the health rule even though the sentence
        // also mentions status.
        assert_eq!(
            match_directive("pipeline stats and deployment status"),
            Some(Directive::PipelineStats)
        );
    }
}
