use queuelens_types::EventCategory;

/// Glyphs the queue processor prints next to successful matches
pub const CHECKMARKS: [char; 3] = ['✓', '✔', '✅'];

/// Glyphs the queue processor prints next to failed matches
pub const CROSSMARKS: [char; 3] = ['✗', '✘', '❌'];

/// Test applied to a lowercased message
pub type Predicate = fn(&str) -> bool;

/// Evaluated top to bottom, first match wins. The order is load-bearing:
/// a probe line that also reports a failure must stay a probe.
const RULES: [(Predicate, EventCategory); 5] = [
    (is_probe, EventCategory::Probe),
    (is_retry, EventCategory::Retry),
    (is_success, EventCategory::Success),
    (is_error, EventCategory::Error),
    (is_recovery, EventCategory::Recovery),
];

/// Assigns an [`EventCategory`] to a queue processor message
pub struct EventClassifier;

impl EventClassifier {
    /// The ordered rule table
    pub fn rules() -> &'static [(Predicate, EventCategory)] {
        &RULES
    }

    pub fn classify(message: &str) -> EventCategory {
        let lower = message.to_lowercase();
        RULES
            .iter()
            .find(|(matches, _)| matches(&lower))
            .map(|(_, category)| *category)
            .unwrap_or(EventCategory::Other)
    }
}

pub(crate) fn has_checkmark(text: &str) -> bool {
    text.contains(CHECKMARKS)
}

fn has_crossmark(text: &str) -> bool {
    text.contains(CROSSMARKS)
}

fn is_probe(msg: &str) -> bool {
    msg.contains("time to check") || msg.contains("quota prober:")
}

fn is_retry(msg: &str) -> bool {
    msg.contains("retrying match")
        || msg.contains("pending videos to retry")
        || (msg.contains("found") && msg.contains("pending"))
}

fn is_success(msg: &str) -> bool {
    msg.contains("successfully matched") || has_checkmark(msg)
}

fn is_error(msg: &str) -> bool {
    msg.contains("no match found")
        || msg.contains("failed")
        || has_crossmark(msg)
        || msg.contains("error")
}

fn is_recovery(msg: &str) -> bool {
    msg.contains("quota restored")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_category() {
        let cases = [
            ("Time to check quota again", EventCategory::Probe),
            ("Quota prober: probing search.list", EventCategory::Probe),
            ("Retrying match for video abc", EventCategory::Retry),
            ("Found 4 pending videos to retry", EventCategory::Retry),
            ("Successfully matched 'Song' to abc123", EventCategory::Success),
            ("✓ abc123", EventCategory::Success),
            ("No match found for 'Song'", EventCategory::Error),
            ("Request failed with 500", EventCategory::Error),
            ("❌ abc123", EventCategory::Error),
            ("Unexpected ERROR in worker", EventCategory::Error),
            ("Quota restored, resuming", EventCategory::Recovery),
            ("Worker started", EventCategory::Other),
        ];
        for (message, expected) in cases {
            assert_eq!(EventClassifier::classify(message), expected, "{}", message);
        }
    }

    #[test]
    fn test_probe_failure_stays_probe() {
        assert_eq!(
            EventClassifier::classify("Quota prober: probe failed, still exhausted"),
            EventCategory::Probe
        );
    }

    #[test]
    fn test_rule_precedence() {
        // retry before error
        assert_eq!(
            EventClassifier::classify("No match found, 3 still pending"),
            EventCategory::Retry
        );
        // success before error
        assert_eq!(
            EventClassifier::classify("✓ matched after earlier error"),
            EventCategory::Success
        );
        // error before recovery
        assert_eq!(
            EventClassifier::classify("Quota restored but refresh failed"),
            EventCategory::Error
        );
    }

    #[test]
    fn test_rule_order_is_fixed() {
        let order: Vec<EventCategory> = EventClassifier::rules().iter().map(|(_, c)| *c).collect();
        assert_eq!(
            order,
            vec![
                EventCategory::Probe,
                EventCategory::Retry,
                EventCategory::Success,
                EventCategory::Error,
                EventCategory::Recovery,
            ]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            EventClassifier::classify("SUCCESSFULLY MATCHED everything"),
            EventCategory::Success
        );
        assert_eq!(EventClassifier::classify("QUOTA RESTORED"), EventCategory::Recovery);
    }
}
