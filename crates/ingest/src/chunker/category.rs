//! Document category inference.
//!
//! Keyword heuristics over the filename and the leading text; falls back to
//! `Default` when nothing matches.

use docqa_core::DocumentCategory;

const LEGAL_KEYWORDS: &[&str] = &[
    "policy", "terms", "conditions", "agreement", "contract", "clause", "liability",
];
const MEDICAL_KEYWORDS: &[&str] = &[
    "medical", "health", "treatment", "diagnosis", "surgery", "patient", "clinical",
];
const TECHNICAL_KEYWORDS: &[&str] = &[
    "technical", "specification", "manual", "guide", "procedure", "protocol",
];
const FINANCIAL_KEYWORDS: &[&str] = &[
    "financial", "cost", "price", "payment", "claim", "coverage", "premium",
];

/// Chars of document text scanned for keywords. The vocabulary this targets
/// is front-matter wording, so a bounded scan keeps inference cheap for
/// large documents.
const SCAN_CHARS: usize = 4000;

pub fn infer_category(filename: &str, text: &str) -> DocumentCategory {
    let filename_lower = filename.to_lowercase();
    let head: String = text.chars().take(SCAN_CHARS).collect();
    let text_lower = head.to_lowercase();

    let matches = |keywords: &[&str]| {
        keywords
            .iter()
            .any(|k| filename_lower.contains(k) || text_lower.contains(k))
    };

    if matches(LEGAL_KEYWORDS) {
        DocumentCategory::Legal
    } else if matches(MEDICAL_KEYWORDS) {
        DocumentCategory::Medical
    } else if matches(TECHNICAL_KEYWORDS) {
        DocumentCategory::Technical
    } else if matches(FINANCIAL_KEYWORDS) {
        DocumentCategory::Financial
    } else {
        DocumentCategory::Default
    }
}
