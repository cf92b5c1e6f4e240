//! OCR artifact cleaning for scanned commentary text.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::CleanerConfig;

/// Pure `text -> text` transform applied to merge entries.
pub trait TextCleaner {
    fn clean(&self, text: &str) -> String;
}

impl<F> TextCleaner for F
where
    F: Fn(&str) -> String,
{
    fn clean(&self, text: &str) -> String {
        self(text)
    }
}

// Page markers: "Sh14", "s. 123"
static PAGE_MARK_SH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bSh\d+\b").unwrap());
static PAGE_MARK_S: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bs\.\s*\d+\b").unwrap());

// Inline noise such as " a 0 - w oo " or " iL S N "
static INLINE_NOISE_LOWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[a-z]\s+[a-z0-9]\s*-\s*[a-z]\s+[a-z0-9]+\s*-?\s*").unwrap());
static INLINE_NOISE_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[A-Z]{1,2}\s+[A-Z][a-z]?\s+[A-Z]\s+").unwrap());

// Whole-line noise
static NOISE_LINE_SYMBOLS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-\s\d.oOaAwWzZ]{3,}$").unwrap());
static NOISE_LINE_CAPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{1,3}\s+[A-Z][a-z]?\s*$").unwrap());

static DASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\s*-+").unwrap());
static SHORT_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^)]{0,5}\)").unwrap());
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"  +").unwrap());
static MULTI_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

#[derive(Debug, Clone)]
pub struct OcrCleaner {
    config: CleanerConfig,
    valid: HashSet<char>,
}

impl Default for OcrCleaner {
    fn default() -> Self {
        Self::new(CleanerConfig::default())
    }
}

impl OcrCleaner {
    pub fn new(config: CleanerConfig) -> Self {
        let valid = config.alphabet.chars().chain(config.punctuation.chars()).collect();
        Self { config, valid }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Share of characters in `line` that belong to the alphabet or the
    /// allowed punctuation. Empty lines score 1.0.
    pub fn valid_ratio(&self, line: &str) -> f64 {
        let total = line.chars().count();
        if total == 0 {
            return 1.0;
        }
        let valid = line.chars().filter(|c| self.valid.contains(c)).count();
        valid as f64 / total as f64
    }

    fn is_noise_line(&self, stripped: &str) -> bool {
        let ratio = self.valid_ratio(stripped);
        if ratio < self.config.short_line_ratio && stripped.chars().count() < self.config.short_line_len {
            return true;
        }
        if ratio < self.config.drop_ratio {
            return true;
        }
        NOISE_LINE_SYMBOLS.is_match(stripped) || NOISE_LINE_CAPS.is_match(stripped)
    }

    fn filter_lines(&self, text: &str) -> String {
        let mut kept: Vec<&str> = Vec::new();

        for line in text.split('\n') {
            let stripped = line.trim();
            if stripped.is_empty() {
                // Keep a single paragraph break after real content.
                if kept.last().is_some_and(|l| !l.trim().is_empty()) {
                    kept.push("");
                }
                continue;
            }
            if self.is_noise_line(stripped) {
                continue;
            }
            kept.push(line);
        }

        kept.join("\n")
    }

    /// One cleaning pass. Every rewrite removes characters or replaces a
    /// match with something strictly shorter.
    fn pass(&self, text: &str) -> String {
        let text = PAGE_MARK_SH.replace_all(text, "");
        let text = PAGE_MARK_S.replace_all(&text, "");
        let text = INLINE_NOISE_LOWER.replace_all(&text, " ");
        let text = INLINE_NOISE_UPPER.replace_all(&text, " ");

        let text = self.filter_lines(&text);

        let text = DASH_RUN.replace_all(&text, "-");
        let text = SHORT_PAREN.replace_all(&text, "");
        let text = MULTI_SPACE.replace_all(&text, " ");
        let text = MULTI_NEWLINE.replace_all(&text, "\n\n");

        let text: Vec<&str> = text.split('\n').map(str::trim_end).collect();
        text.join("\n").trim().to_string()
    }
}

impl TextCleaner for OcrCleaner {
    /// Repeat passes until one no longer shortens the text. The result is a
    /// fixed point, so `clean(clean(x)) == clean(x)`.
    fn clean(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self.pass(&current);
            if next.len() >= current.len() {
                return current;
            }
            current = next;
        }
    }
}
