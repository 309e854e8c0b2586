use std::path::Path;

use tracing::info;

use crate::classify::read_lossy;
use crate::contract::DigestError;

/// Word and token counts for a combined document.
///
/// The token figure is a coarse estimate (two per word), not the output of a
/// real tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub word_count: usize,
    pub estimated_tokens: usize,
}

impl Summary {
    pub fn from_text(text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        Self {
            word_count,
            estimated_tokens: word_count * 2,
        }
    }
}

/// Re-reads the combined document and counts it.
pub fn summarize(combined: &Path) -> Result<Summary, DigestError> {
    let text = read_lossy(combined).map_err(DigestError::io("read", combined))?;
    let summary = Summary::from_text(&text);
    info!(
        path = %combined.display(),
        words = summary.word_count,
        tokens = summary.estimated_tokens,
        "Summarised combined document"
    );
    Ok(summary)
}
