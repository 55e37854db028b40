use domain::{Suggestion, SuggestionKind};
use std::collections::HashSet;

/// Combine backend suggestions with caller-supplied strings.
///
/// Remote suggestions come first, in the order received, followed by every
/// external string wrapped as a `Term` with full confidence. A later entry
/// whose display key (`kind + text`) was already seen is dropped; nothing is
/// reordered.
pub fn merge_suggestions(remote: &[Suggestion], external: &[String]) -> Vec<Suggestion> {
    let mut seen: HashSet<(SuggestionKind, &str)> = HashSet::new();
    let mut merged = Vec::with_capacity(remote.len() + external.len());

    for suggestion in remote {
        if seen.insert(suggestion.display_key()) {
            merged.push(suggestion.clone());
        }
    }
    for text in external {
        if seen.insert((SuggestionKind::Term, text.as_str())) {
            merged.push(Suggestion::term(text.as_str()));
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Confidence;

    fn category(text: &str) -> Suggestion {
        Suggestion::new(text, SuggestionKind::Category, Confidence::clamped(0.8))
    }

    #[test]
    fn test_remote_first_then_external() {
        let a = category("Invoices");
        let b = Suggestion::document("Invoice 2024-03", Confidence::clamped(0.6), "42");
        let merged = merge_suggestions(&[a.clone(), b.clone()], &["invoice due".to_string()]);

        assert_eq!(merged, vec![a, b, Suggestion::term("invoice due")]);
    }

    #[test]
    fn test_duplicates_by_display_key_keep_first() {
        let remote = vec![
            Suggestion::new("tax", SuggestionKind::Term, Confidence::clamped(0.4)),
            category("tax"),
        ];
        let external = vec!["tax".to_string(), "receipts".to_string(), "receipts".to_string()];

        let merged = merge_suggestions(&remote, &external);
        let texts: Vec<_> = merged.iter().map(|s| (s.kind, s.text.as_str())).collect();

        assert_eq!(
            texts,
            vec![
                (SuggestionKind::Term, "tax"),
                (SuggestionKind::Category, "tax"),
                (SuggestionKind::Term, "receipts"),
            ]
        );
        // The remote entry wins, with its own confidence
        assert_eq!(merged[0].confidence.value(), 0.4);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge_suggestions(&[], &[]).is_empty());
        assert_eq!(merge_suggestions(&[], &["x".to_string()]).len(), 1);
    }
}
