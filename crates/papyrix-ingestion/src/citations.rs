//! Citation-pattern scanning over per-page text.
//!
//! Three fixed patterns: parenthetical author-year `(Smith, 2020)`,
//! bracketed numeric `[12]`, and author-then-year `Smith (2020)`. Matches
//! are attributed to the first line of the page containing them. Duplicates
//! across patterns are not suppressed, and no attempt is made to tell a real
//! citation from an incidental match.

use lazy_static::lazy_static;
use regex::Regex;

use crate::PageText;

pub const NO_CITATIONS_FOUND: &str = "No citations found.";

lazy_static! {
    static ref CITATION_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\(\w+,\s*\d{4}\)").unwrap(),
        Regex::new(r"\[\d+\]").unwrap(),
        Regex::new(r"\w+\s\(\d{4}\)").unwrap(),
    ];
}

/// A pattern match located within a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub text: String,
    /// 1-based page number.
    pub page: u32,
    /// 1-based line number within the page.
    pub line: usize,
}

impl std::fmt::Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (p. {}, l. {})", self.text, self.page, self.line)
    }
}

/// Scan the given pages for citation patterns, in pattern order per page.
pub fn extract_citations(pages: &[PageText]) -> Vec<Citation> {
    let mut citations = Vec::new();

    for page in pages {
        let lines: Vec<&str> = page.text.split('\n').collect();
        for pattern in CITATION_PATTERNS.iter() {
            for m in pattern.find_iter(&page.text) {
                let matched = m.as_str();
                if let Some(line) = lines.iter().position(|l| l.contains(matched)) {
                    citations.push(Citation {
                        text: matched.to_string(),
                        page: page.number,
                        line: line + 1,
                    });
                }
            }
        }
    }

    citations
}

/// Space-joined citation strings, or the fixed sentinel when none were found.
pub fn format_citation_list(citations: &[Citation]) -> String {
    if citations.is_empty() {
        return NO_CITATIONS_FOUND.to_string();
    }
    citations
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
