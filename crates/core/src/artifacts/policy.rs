/// Fallback preference order for datasets without an explicit entry.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".json", ".md", ".txt"];

/// Preferred file extensions for a dataset, most preferred first.
///
/// Narrative-first datasets list `.md` ahead of the structured fallback;
/// purely numeric datasets only ever ship `.json`. Total over all inputs.
pub fn preferred_extensions(dataset: &str) -> &'static [&'static str] {
    match dataset {
        "recommendations"
        | "business-summaries"
        | "transcript-analysis"
        | "mda-analysis"
        | "financials-analysis"
        | "fundamentals-analysis" => &[".md", ".json"],
        "technicals"
        | "technicals-analysis"
        | "news-analysis"
        | "financial-statements"
        | "key-metrics"
        | "ratios"
        | "headline-news"
        | "prices"
        | "price-chart-json" => &[".json"],
        "earnings-call-transcripts" | "sec-business" | "sec-mda" | "sec-risk" => &[".md", ".txt"],
        _ => DEFAULT_EXTENSIONS,
    }
}
