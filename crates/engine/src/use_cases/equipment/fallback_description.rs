//! Best-effort recovery of an equipment blurb from a source's HTML description.
//!
//! Used only when a source has no structured starting equipment. Heuristics
//! run from strictest to loosest and the first match wins.

use std::sync::OnceLock;

use regex_lite::Regex;

static LABELED_HEADING: OnceLock<Option<Regex>> = OnceLock::new();
static BOLD_LABEL: OnceLock<Option<Regex>> = OnceLock::new();
static DEFINITION_LIST: OnceLock<Option<Regex>> = OnceLock::new();
static HEADING_SECTION: OnceLock<Option<Regex>> = OnceLock::new();
static PARAGRAPH: OnceLock<Option<Regex>> = OnceLock::new();
static START_OR_GOLD: OnceLock<Option<Regex>> = OnceLock::new();
static BLOCK_END: OnceLock<Option<Regex>> = OnceLock::new();
static ANY_TAG: OnceLock<Option<Regex>> = OnceLock::new();
static PLAIN_TEXT: OnceLock<Option<Regex>> = OnceLock::new();

fn pattern(cell: &'static OnceLock<Option<Regex>>, source: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(source) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(pattern = source, error = %e, "Invalid description pattern");
            None
        }
    })
    .as_ref()
}

/// Which heuristic produced a fallback description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    LabeledHeading,
    BoldLabel,
    DefinitionList,
    HeadingSection,
    Paragraph,
    PlainText,
}

/// Extract a human-readable equipment blurb, as markup.
pub fn extract_fallback_description(html: &str) -> Option<String> {
    extract_with_heuristic(html).map(|(_, markup)| markup)
}

pub fn extract_with_heuristic(html: &str) -> Option<(Heuristic, String)> {
    if html.trim().is_empty() {
        return None;
    }

    let heuristics: [(Heuristic, fn(&str) -> Option<String>); 6] = [
        (Heuristic::LabeledHeading, labeled_heading),
        (Heuristic::BoldLabel, bold_label),
        (Heuristic::DefinitionList, definition_list),
        (Heuristic::HeadingSection, heading_section),
        (Heuristic::Paragraph, paragraph),
        (Heuristic::PlainText, plain_text),
    ];

    heuristics.iter().find_map(|(heuristic, extract)| {
        extract(html).map(|markup| {
            tracing::debug!(?heuristic, "Recovered equipment description");
            (*heuristic, markup)
        })
    })
}

/// `<h3>Starting Equipment</h3>` followed by a list or paragraph.
fn labeled_heading(html: &str) -> Option<String> {
    let re = pattern(
        &LABELED_HEADING,
        r"(?is)<h[1-6][^>]*>\s*(?:starting\s+)?equipment\s*:?\s*</h[1-6]>\s*(<(?:ul|ol)[^>]*>.*?</(?:ul|ol)>|<p[^>]*>.*?</p>)",
    )?;
    let caps = re.captures(html)?;
    non_empty(caps.get(1)?.as_str())
}

/// `<strong>Equipment:</strong> ...` up to the end of the paragraph or line.
fn bold_label(html: &str) -> Option<String> {
    let re = pattern(
        &BOLD_LABEL,
        r"(?is)<(?:strong|b)>\s*(?:starting\s+)?equipment\s*:?\s*</(?:strong|b)>\s*:?(.*?)(?:</p>|<br\s*/?>|</li>|$)",
    )?;
    let caps = re.captures(html)?;
    non_empty(caps.get(1)?.as_str()).map(|text| format!("<p>{}</p>", text))
}

/// `<dt>Equipment</dt><dd>...</dd>`
fn definition_list(html: &str) -> Option<String> {
    let re = pattern(
        &DEFINITION_LIST,
        r"(?is)<dt[^>]*>\s*(?:starting\s+)?equipment\s*:?\s*</dt>\s*<dd[^>]*>(.*?)</dd>",
    )?;
    let caps = re.captures(html)?;
    non_empty(caps.get(1)?.as_str()).map(|text| format!("<p>{}</p>", text))
}

/// Any heading mentioning equipment, up to the next heading.
fn heading_section(html: &str) -> Option<String> {
    let re = pattern(
        &HEADING_SECTION,
        r"(?is)<h[1-6][^>]*>[^<]*equipment[^<]*</h[1-6]>(.*?)(?:<h[1-6][^>]*>|$)",
    )?;
    let caps = re.captures(html)?;
    non_empty(caps.get(1)?.as_str())
}

/// A paragraph that mentions equipment together with starting or gold.
fn paragraph(html: &str) -> Option<String> {
    let re = pattern(&PARAGRAPH, r"(?is)<p[^>]*>(.*?)</p>")?;
    let start_or_gold = pattern(
        &START_OR_GOLD,
        r"(?i)\b(?:start\w*|begin\w*|gold|gp)\b",
    )?;
    re.captures_iter(html).find_map(|caps| {
        let whole = caps.get(0)?.as_str();
        let text = caps.get(1)?.as_str();
        let lower = text.to_lowercase();
        (lower.contains("equipment") && start_or_gold.is_match(text)).then(|| whole.trim().to_string())
    })
}

/// `Equipment: ...` anywhere in the text once tags are stripped.
fn plain_text(html: &str) -> Option<String> {
    let block_end = pattern(
        &BLOCK_END,
        r"(?i)</(?:p|li|div|h[1-6]|dd|dt|tr)>|<br\s*/?>",
    )?;
    let any_tag = pattern(&ANY_TAG, r"<[^>]+>")?;
    let plain = pattern(&PLAIN_TEXT, r"(?im)equipment\s*:\s*(.+)$")?;

    let text = block_end.replace_all(html, "\n");
    let text = any_tag.replace_all(&text, "");
    let caps = plain.captures(&text)?;
    non_empty(caps.get(1)?.as_str()).map(|line| format!("<p>{}</p>", line))
}

fn non_empty(fragment: &str) -> Option<String> {
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_heading_returns_the_following_list() {
        let html = "<p>Monks are disciplined.</p><h3>Starting Equipment</h3><ul><li>Spear</li><li>10 darts</li></ul><h3>Features</h3>";
        let (heuristic, markup) = extract_with_heuristic(html).unwrap();
        assert_eq!(heuristic, Heuristic::LabeledHeading);
        assert_eq!(markup, "<ul><li>Spear</li><li>10 darts</li></ul>");
    }

    #[test]
    fn bold_label_stops_at_paragraph_end() {
        let html = "<p><strong>Equipment:</strong> A crowbar, dark clothes, 15 gp</p><p>Other</p>";
        let (heuristic, markup) = extract_with_heuristic(html).unwrap();
        assert_eq!(heuristic, Heuristic::BoldLabel);
        assert_eq!(markup, "<p>A crowbar, dark clothes, 15 gp</p>");
    }

    #[test]
    fn definition_list_match() {
        let html = "<dl><dt>Skills</dt><dd>Stealth</dd><dt>Equipment</dt><dd>A shovel and a pot</dd></dl>";
        let (heuristic, markup) = extract_with_heuristic(html).unwrap();
        assert_eq!(heuristic, Heuristic::DefinitionList);
        assert_eq!(markup, "<p>A shovel and a pot</p>");
    }

    #[test]
    fn heading_section_runs_to_the_next_heading() {
        let html = "<h2>Your Equipment Choices</h2><p>Take a spear.</p><p>Take a net.</p><h2>Next</h2>";
        let (heuristic, markup) = extract_with_heuristic(html).unwrap();
        assert_eq!(heuristic, Heuristic::HeadingSection);
        assert_eq!(markup, "<p>Take a spear.</p><p>Take a net.</p>");
    }

    #[test]
    fn paragraph_needs_a_start_or_gold_phrase() {
        let html = "<p>Equipment is heavy.</p><p>You start with this equipment: a lantern.</p>";
        let (heuristic, markup) = extract_with_heuristic(html).unwrap();
        assert_eq!(heuristic, Heuristic::Paragraph);
        assert_eq!(markup, "<p>You start with this equipment: a lantern.</p>");
    }

    #[test]
    fn plain_text_is_the_last_resort() {
        let html = "<div>Equipment: a hooded lantern<br>Other stuff</div>";
        let (heuristic, markup) = extract_with_heuristic(html).unwrap();
        assert_eq!(heuristic, Heuristic::PlainText);
        assert_eq!(markup, "<p>a hooded lantern</p>");
    }

    #[test]
    fn earlier_heuristics_win() {
        let html = "<h3>Equipment</h3><p>From the heading</p><p><strong>Equipment:</strong> From the label</p>";
        let (heuristic, _) = extract_with_heuristic(html).unwrap();
        assert_eq!(heuristic, Heuristic::LabeledHeading);
    }

    #[test]
    fn nothing_to_find() {
        assert!(extract_fallback_description("").is_none());
        assert!(extract_fallback_description("<p>A wandering sage.</p>").is_none());
    }
}
