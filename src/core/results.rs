// ScanBoard - core/results.rs
//
// Derived view of a ScanDetail's tool output: tab selection, overview card
// text, and raw tab bodies. Everything here is a pure function of the cached
// detail, so re-rendering an identical payload produces identical output.

use crate::core::model::ScanDetail;
use crate::util::constants::{NO_RESULTS_PLACEHOLDER, PENDING_PLACEHOLDER};

// =============================================================================
// Tools
// =============================================================================

/// The external tools whose output the backend attaches to a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Subfinder,
    Httpx,
    Nuclei,
    Katana,
    Xss,
    Dalfox,
}

impl Tool {
    /// All tools in pipeline order.
    pub const ALL: [Tool; 6] = [
        Tool::Subfinder,
        Tool::Httpx,
        Tool::Nuclei,
        Tool::Katana,
        Tool::Xss,
        Tool::Dalfox,
    ];

    /// Raw output blob for this tool, if the backend has produced one.
    ///
    /// An empty string is treated the same as an absent field.
    pub fn blob<'a>(&self, detail: &'a ScanDetail) -> Option<&'a str> {
        let field = match self {
            Tool::Subfinder => &detail.subfinder_results,
            Tool::Httpx => &detail.httpx_results,
            Tool::Nuclei => &detail.nuclei_results,
            Tool::Katana => &detail.katana_results,
            Tool::Xss => &detail.xss_results,
            Tool::Dalfox => &detail.dalfox_results,
        };
        field.as_deref().filter(|s| !s.is_empty())
    }

    /// Overview card title.
    pub fn card_title(&self) -> &'static str {
        match self {
            Tool::Subfinder => "Subfinder",
            Tool::Httpx => "Live Subdomains",
            Tool::Nuclei => "Nuclei",
            Tool::Katana => "Katana",
            Tool::Xss => "XSS Parameters",
            Tool::Dalfox => "Dalfox",
        }
    }

    /// Heading shown above the raw output in the tool's tab.
    pub fn tab_heading(&self) -> &'static str {
        match self {
            Tool::Subfinder => "Subfinder Results",
            Tool::Httpx => "Live Subdomains (httpx)",
            Tool::Nuclei => "Nuclei Vulnerability Scan Results",
            Tool::Katana => "Katana Crawl Results",
            Tool::Xss => "XSS Parameter Discovery",
            Tool::Dalfox => "Dalfox XSS Test Results",
        }
    }

    /// Unit noun for the overview count; `None` for tools whose output is not
    /// line-oriented (dalfox).
    fn count_noun(&self) -> Option<&'static str> {
        match self {
            Tool::Subfinder => Some("subdomains found"),
            Tool::Httpx => Some("live hosts"),
            Tool::Nuclei => Some("findings"),
            Tool::Katana => Some("URLs crawled"),
            Tool::Xss => Some("parameters"),
            Tool::Dalfox => None,
        }
    }
}

// =============================================================================
// Tabs
// =============================================================================

/// Selected tab of the detail view. Default is the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultTab {
    #[default]
    Overview,
    Tool(Tool),
}

impl ResultTab {
    /// All tabs in display order.
    pub fn all() -> impl Iterator<Item = ResultTab> {
        std::iter::once(ResultTab::Overview).chain(Tool::ALL.into_iter().map(ResultTab::Tool))
    }

    /// Tab button label.
    pub fn label(&self) -> &'static str {
        match self {
            ResultTab::Overview => "Overview",
            ResultTab::Tool(Tool::Subfinder) => "Subfinder Results",
            ResultTab::Tool(Tool::Httpx) => "Live Subdomains",
            ResultTab::Tool(Tool::Nuclei) => "Nuclei Results",
            ResultTab::Tool(Tool::Katana) => "Katana Results",
            ResultTab::Tool(Tool::Xss) => "XSS Parameters",
            ResultTab::Tool(Tool::Dalfox) => "Dalfox Results",
        }
    }
}

// =============================================================================
// Derived text
// =============================================================================

/// Number of non-blank lines in a newline-delimited blob.
pub fn count_lines(blob: &str) -> usize {
    blob.lines().filter(|l| !l.trim().is_empty()).count()
}

/// One overview card: tool title plus its summary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewCard {
    pub tool: Tool,
    pub title: &'static str,
    pub text: String,
}

/// Summary line for one tool: a count, "Results available", or the pending placeholder.
pub fn summary_text(tool: Tool, detail: &ScanDetail) -> String {
    match (tool.blob(detail), tool.count_noun()) {
        (None, _) => PENDING_PLACEHOLDER.to_string(),
        (Some(blob), Some(noun)) => format!("{} {noun}", count_lines(blob)),
        (Some(_), None) => "Results available".to_string(),
    }
}

/// Overview cards for every tool, in pipeline order.
pub fn overview_cards(detail: &ScanDetail) -> Vec<OverviewCard> {
    Tool::ALL
        .iter()
        .map(|&tool| OverviewCard {
            tool,
            title: tool.card_title(),
            text: summary_text(tool, detail),
        })
        .collect()
}

/// Raw body of a tool tab, or the no-results placeholder.
pub fn tab_body(tool: Tool, detail: &ScanDetail) -> &str {
    tool.blob(detail).unwrap_or(NO_RESULTS_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> ScanDetail {
        serde_json::from_str(
            r#"{"id":1,"domain":"example.com","status":"running","progress":10,
                "created_at":"2025-01-01T00:00:00","updated_at":"2025-01-01T00:00:00"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_count_lines_skips_blank_lines() {
        assert_eq!(count_lines("a\nb\n\n"), 2);
        assert_eq!(count_lines("  \n\t\nx"), 1);
        assert_eq!(count_lines(""), 0);
    }

    #[test]
    fn test_absent_field_renders_pending() {
        let d = detail();
        assert_eq!(summary_text(Tool::Subfinder, &d), "Pending");
        assert_eq!(tab_body(Tool::Nuclei, &d), "No results yet...");
    }

    #[test]
    fn test_empty_blob_counts_as_absent() {
        let mut d = detail();
        d.katana_results = Some(String::new());
        assert_eq!(summary_text(Tool::Katana, &d), "Pending");
    }

    #[test]
    fn test_overview_counts_and_dalfox_availability() {
        let mut d = detail();
        d.subfinder_results = Some("a.example.com\nb.example.com\n\n".to_string());
        d.httpx_results = Some("https://a.example.com\n".to_string());
        d.dalfox_results = Some("[POC] something".to_string());

        let cards = overview_cards(&d);
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0].text, "2 subdomains found");
        assert_eq!(cards[1].text, "1 live hosts");
        assert_eq!(cards[2].text, "Pending");
        assert_eq!(cards[5].text, "Results available");
        assert_eq!(tab_body(Tool::Dalfox, &d), "[POC] something");
    }

    #[test]
    fn test_tabs_default_to_overview_and_list_all_tools() {
        assert_eq!(ResultTab::default(), ResultTab::Overview);
        let tabs: Vec<_> = ResultTab::all().collect();
        assert_eq!(tabs.len(), 7);
        assert_eq!(tabs[0], ResultTab::Overview);
        assert_eq!(tabs[6], ResultTab::Tool(Tool::Dalfox));
    }

    #[test]
    fn test_identical_payload_renders_identically() {
        let mut d = detail();
        d.nuclei_results = Some("[high] x\n".to_string());
        assert_eq!(overview_cards(&d), overview_cards(&d.clone()));
    }
}
