use thurgood_core::models::{SearchOutcome, SearchResult};
use thurgood_core::{ClientError, ErrorMetadata};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One line per chunk: confidence, source object and a preview of the text.
pub fn search_summary(outcome: &SearchOutcome, preview_len: usize) -> String {
    match outcome {
        SearchOutcome::NoResults { method, query } => {
            format!("No results found for \"{}\" using {} search.", query, method)
        }
        SearchOutcome::Results(result) => summarize_result(result, preview_len),
    }
}

fn summarize_result(result: &SearchResult, preview_len: usize) -> String {
    let mut lines = Vec::new();
    if let Some(response) = &result.response {
        lines.push(response.clone());
    }
    for chunk in &result.chunks {
        let text = chunk.text.split_whitespace().collect::<Vec<_>>().join(" ");
        lines.push(format!(
            "[{:>3}%] {} {}",
            chunk.confidence,
            chunk.object_id.as_deref().unwrap_or("-"),
            truncate_string(&text, preview_len)
        ));
    }
    lines.join("\n")
}

/// Suggested follow-up for client errors, shown under the error message.
pub fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.downcast_ref::<ClientError>()
        .and_then(|e| e.suggested_action())
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
