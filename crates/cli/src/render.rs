//! Terminal rendering of search data. Functions return strings so the
//! output can be tested without a terminal.

use application::{SearchEvent, SearchSnapshot};
use console::style;
use domain::{HistoryEntry, RelatedDocument, SearchResult, Suggestion, SuggestionKind};

/// Drop the `<em>`-style markup the backend puts around matched terms
pub fn strip_markup(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => plain.push(c),
            _ => {}
        }
    }
    plain
}

pub fn suggestion_line(index: usize, suggestion: &Suggestion) -> String {
    let tag = match suggestion.kind {
        SuggestionKind::Term => style("term").dim(),
        SuggestionKind::Category => style("category").yellow(),
        SuggestionKind::Document => style("document").cyan(),
        SuggestionKind::External => style("external").magenta(),
    };
    let mut line = format!(
        "{:>3}. {} [{}]",
        index + 1,
        style(&suggestion.text).bold(),
        tag
    );
    if suggestion.kind == SuggestionKind::Document {
        line.push_str(&format!(" {}%", suggestion.confidence.as_percent()));
    }
    line
}

pub fn result_line(index: usize, result: &SearchResult) -> String {
    let document = &result.document;
    let mut line = format!(
        "{:>3}. {} {}",
        index + 1,
        style(&document.name).bold(),
        style(format!("(#{}, score {:.2})", document.id, result.score)).dim()
    );
    if let Some(category) = &document.category {
        line.push_str(&format!(" {}", style(category).yellow()));
    }
    if result.personalized {
        line.push_str(&format!(" {}", style("*").green()));
    }
    for highlight in &result.highlights {
        line.push_str(&format!("\n       {}", strip_markup(highlight)));
    }
    line
}

pub fn related_line(index: usize, related: &RelatedDocument) -> String {
    let percent = (related.similarity_score.clamp(0.0, 1.0) * 100.0).round() as u8;
    format!(
        "{:>3}. {} {} {}",
        index + 1,
        related.document.name,
        style(format!("{percent}% match")).green(),
        style(format!("(#{})", related.document.id)).dim()
    )
}

pub fn history_line(entry: &HistoryEntry) -> String {
    let mut line = format!(
        "{} {}",
        style(entry.timestamp.format("%Y-%m-%d %H:%M")).dim(),
        entry.query
    );
    if let Some(category) = &entry.clicked_category {
        line.push_str(&format!(" -> {}", style(category).yellow()));
    }
    line
}

/// Lines printed by the interactive session for one coordinator event
pub fn event_lines(event: &SearchEvent) -> Vec<String> {
    match event {
        SearchEvent::SuggestionsUpdated { suggestions, .. } if suggestions.is_empty() => Vec::new(),
        SearchEvent::SuggestionsUpdated { query, suggestions } => {
            let mut lines = vec![format!("{} {}", style("suggestions for").dim(), query)];
            lines.extend(
                suggestions
                    .iter()
                    .enumerate()
                    .map(|(i, s)| suggestion_line(i, s)),
            );
            lines
        }
        SearchEvent::SuggestionsFailed { query, error } => vec![format!(
            "{} suggestions for '{}' unavailable: {}",
            style("!").yellow(),
            query,
            error
        )],
        SearchEvent::ResultsUpdated { query, results } => {
            let mut lines = vec![format!(
                "{} {} result(s) for '{}'",
                style("=").green().bold(),
                results.len(),
                query
            )];
            lines.extend(results.iter().enumerate().map(|(i, r)| result_line(i, r)));
            lines
        }
        SearchEvent::SearchFailed { query, error } => vec![format!(
            "{} search for '{}' failed: {}",
            style("x").red().bold(),
            query,
            error
        )],
        SearchEvent::ExternalSelected(suggestion) => vec![format!(
            "{} external action: {}",
            style(">").magenta(),
            suggestion.text
        )],
        SearchEvent::FocusChanged {
            document_id: Some(id),
        } => vec![format!("{} focused #{}", style(">").cyan(), id)],
        SearchEvent::FocusChanged { document_id: None } => Vec::new(),
        SearchEvent::RelatedUpdated {
            document_id,
            related,
        } => {
            let mut lines = vec![format!(
                "{} {} related to #{}",
                style("~").cyan(),
                related.len(),
                document_id
            )];
            lines.extend(related.iter().enumerate().map(|(i, r)| related_line(i, r)));
            lines
        }
    }
}

pub fn snapshot_lines(snapshot: &SearchSnapshot) -> Vec<String> {
    let mut lines = vec![format!("query: '{}'", snapshot.query)];
    lines.push(format!(
        "suggestions: {}{}",
        snapshot.suggestions.len(),
        if snapshot.suggestions_loading { " (loading)" } else { "" }
    ));
    lines.push(format!(
        "results: {}{}",
        snapshot.results.len(),
        if snapshot.searching { " (searching)" } else { "" }
    ));
    if let Some(error) = &snapshot.error {
        lines.push(format!("error: {error}"));
    }
    if let Some(id) = &snapshot.focused_document {
        lines.push(format!(
            "focused: #{} ({} related{})",
            id,
            snapshot.related.len(),
            if snapshot.related_loading { ", loading" } else { "" }
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::DocumentRef;

    fn plain(text: &str) -> String {
        console::strip_ansi_codes(text).into_owned()
    }

    fn document(id: &str, name: &str) -> DocumentRef {
        DocumentRef {
            id: id.to_string(),
            name: name.to_string(),
            category: None,
            mime_type: None,
            web_view_link: None,
            last_accessed: None,
        }
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<em>tax</em> report"), "tax report");
        assert_eq!(strip_markup("a > b"), "a > b");
        assert_eq!(strip_markup("no tags"), "no tags");
    }

    #[test]
    fn test_result_line_numbering_and_highlights() {
        let result = SearchResult::new(document("12", "Tax report"), 0.5)
            .with_highlights(vec!["<b>tax</b> 2023".to_string()]);
        let line = plain(&result_line(0, &result));

        assert!(line.starts_with("  1. Tax report"));
        assert!(line.contains("#12"));
        assert!(line.ends_with("tax 2023"));
    }

    #[test]
    fn test_related_line_shows_match_percent() {
        let related = RelatedDocument::new(document("43", "Invoice 43"), 0.774);
        assert_eq!(plain(&related_line(1, &related)), "  2. Invoice 43 77% match (#43)");
    }

    #[test]
    fn test_event_lines() {
        let event = SearchEvent::SuggestionsUpdated {
            query: "inv".to_string(),
            suggestions: vec![Suggestion::term("invoice"), Suggestion::external("Invoices app")],
        };
        let lines: Vec<_> = event_lines(&event).iter().map(|l| plain(l)).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "  2. Invoices app [external]");

        let cleared = SearchEvent::SuggestionsUpdated {
            query: "i".to_string(),
            suggestions: Vec::new(),
        };
        assert!(event_lines(&cleared).is_empty());
    }

    #[test]
    fn test_snapshot_lines_show_focus() {
        let snapshot = SearchSnapshot {
            query: "tax".to_string(),
            focused_document: Some("9".to_string()),
            related_loading: true,
            ..SearchSnapshot::default()
        };
        let lines = snapshot_lines(&snapshot);
        assert_eq!(lines.last().map(String::as_str), Some("focused: #9 (0 related, loading)"));
    }
}
