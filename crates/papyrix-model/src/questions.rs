//! Template-based question suggestion from a summary.
//!
//! This is substring substitution, not generation: the first five
//! non-stopword alphabetic tokens of the summary are slotted into fixed
//! sentence templates, positionally.

/// Common English stopwords excluded from the keyword pick.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "will", "would", "could", "should", "may", "might", "must", "can", "this",
    "that", "these", "those", "it", "its", "as", "if", "then", "than", "so", "such", "no",
    "not", "only", "own", "same", "too", "very", "just", "also", "now", "here", "there",
    "when", "where", "why", "how", "all", "each", "every", "both", "few", "more", "most",
    "other", "some", "any", "into", "through", "during", "before", "after", "above", "below",
    "up", "down", "out", "off", "over", "under", "again", "further", "once", "he", "she",
    "they", "we", "you", "i", "me", "my", "your", "his", "her", "their", "our", "which", "who",
    "whom", "what", "whose",
];

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Suggest up to five questions from a summary. Fewer surviving keywords
/// yield fewer questions; none yield an empty list.
pub fn suggest_questions(summary: &str) -> Vec<String> {
    let lowered = summary.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty() && !is_stopword(w))
        .take(5)
        .collect();

    let mut questions = Vec::with_capacity(5);
    if let Some(w) = words.first() {
        questions.push(format!("What is the main idea of {w}?"));
    }
    if let Some(w) = words.get(1) {
        questions.push(format!("How does {w} relate to the overall topic?"));
    }
    if let Some(w) = words.get(2) {
        questions.push(format!("Why is {w} important?"));
    }
    if let Some(w) = words.get(3) {
        questions.push(format!("Can you explain the significance of {w}?"));
    }
    if let Some(w) = words.get(4) {
        questions.push(format!("What are the implications of {w} in this context?"));
    }
    questions
}
