use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{SwarmError, SwarmResult};

/// One displayable quote.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Quote {
    /// Quote body.
    pub text: String,
    /// Attribution shown under the quote.
    pub author: String,
}

impl Quote {
    /// Build a quote from borrowed strings.
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    /// Clean hand-entered fields before they are stored.
    ///
    /// Both fields are trimmed and `'`/`"` marks are stripped from the text. Either field
    /// ending up empty is a validation error.
    pub fn curated(text: &str, author: &str) -> SwarmResult<Self> {
        let text: String = text
            .trim()
            .chars()
            .filter(|c| !matches!(c, '\'' | '"'))
            .collect();
        let author = author.trim();
        if text.trim().is_empty() || author.is_empty() {
            return Err(SwarmError::validation("quote text and author must not be empty"));
        }
        Ok(Self::new(text, author))
    }
}

/// Built-in quotes shown when the configured source is unavailable or empty.
pub fn fallback_quotes() -> Vec<Quote> {
    vec![
        Quote::new("Server unavailable but we keep working", "Dev"),
        Quote::new("API connection error", "System"),
        Quote::new(
            "People do not buy what you do they buy why you do it",
            "Simon Sinek",
        ),
        Quote::new(
            "Content is fire and social media is gasoline",
            "Jay Baer",
        ),
    ]
}

/// Supplier of the quote list consumed at scene start-up.
pub trait QuoteSource {
    /// Fetch the full quote list.
    fn fetch(&self) -> SwarmResult<Vec<Quote>>;
}

/// In-memory quote list.
#[derive(Clone, Debug, Default)]
pub struct StaticQuotes(pub Vec<Quote>);

impl QuoteSource for StaticQuotes {
    fn fetch(&self) -> SwarmResult<Vec<Quote>> {
        Ok(self.0.clone())
    }
}

/// Quote list stored as a JSON array of `{ "text", "author" }` objects.
#[derive(Clone, Debug)]
pub struct JsonFileQuotes {
    path: PathBuf,
}

impl JsonFileQuotes {
    /// Source backed by the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the backing file with `quotes` as pretty-printed JSON.
    pub fn save(&self, quotes: &[Quote]) -> SwarmResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create quotes dir '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(quotes)
            .map_err(|e| SwarmError::serde(format!("encode quotes JSON: {e}")))?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write quotes file '{}'", self.path.display()))?;
        Ok(())
    }

    /// Put `quote` at the front of the stored list, creating the file if needed. Returns the
    /// new list length.
    pub fn add(&self, quote: Quote) -> SwarmResult<usize> {
        let mut quotes = if self.path.exists() {
            self.fetch()?
        } else {
            Vec::new()
        };
        quotes.insert(0, quote);
        self.save(&quotes)?;
        tracing::debug!(count = quotes.len(), "quote added");
        Ok(quotes.len())
    }

    /// Delete the quote at `index` and return it.
    pub fn remove(&self, index: usize) -> SwarmResult<Quote> {
        let mut quotes = self.fetch()?;
        if index >= quotes.len() {
            return Err(SwarmError::validation(format!(
                "quote index {index} out of range (have {})",
                quotes.len()
            )));
        }
        let removed = quotes.remove(index);
        self.save(&quotes)?;
        tracing::debug!(index, count = quotes.len(), "quote removed");
        Ok(removed)
    }
}

impl QuoteSource for JsonFileQuotes {
    fn fetch(&self) -> SwarmResult<Vec<Quote>> {
        let f = File::open(&self.path)
            .with_context(|| format!("open quotes file '{}'", self.path.display()))?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            SwarmError::serde(format!(
                "parse quotes JSON '{}': {e}",
                self.path.display()
            ))
        })
    }
}

/// Fetch quotes from `source`, substituting [`fallback_quotes`] when the fetch fails or returns
/// nothing. Never fails.
pub fn load_quotes(source: &dyn QuoteSource) -> Vec<Quote> {
    match source.fetch() {
        Ok(quotes) if !quotes.is_empty() => {
            tracing::debug!(count = quotes.len(), "quotes loaded");
            quotes
        }
        Ok(_) => {
            tracing::warn!("quote source is empty, using fallback quotes");
            fallback_quotes()
        }
        Err(e) => {
            tracing::warn!(error = %e, "quote source unavailable, using fallback quotes");
            fallback_quotes()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/quotes.rs"]
mod tests;
