//! Tokenization helpers shared by the rule generators.
//!
//! The rules operate on word tokens while rebuilding sentences from the
//! original text, so tokens carry their byte spans. A word is a maximal run
//! of alphanumeric characters and interior hyphens; suffixed forms like
//! `numa-tu` stay single tokens.

/// A word token located inside its source sentence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordSpan<'a> {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// The token text.
    pub text: &'a str,
}

/// Scan `text` into word spans, left to right.
pub fn word_spans(text: &str) -> Vec<WordSpan<'_>> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, ch) in text.char_indices() {
        if is_word_char(ch) {
            if start.is_none() {
                start = Some(idx);
            }
        } else if let Some(from) = start.take() {
            push_trimmed(text, from, idx, &mut spans);
        }
    }
    if let Some(from) = start {
        push_trimmed(text, from, text.len(), &mut spans);
    }
    spans
}

/// Rebuild `text` with the token at `span` replaced by `replacement`.
pub fn replace_span(text: &str, span: &WordSpan<'_>, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..span.start]);
    out.push_str(replacement);
    out.push_str(&text[span.end..]);
    out
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-'
}

// Hyphens are word-internal only; strip any that lead or trail a run.
fn push_trimmed<'a>(text: &'a str, start: usize, end: usize, spans: &mut Vec<WordSpan<'a>>) {
    let raw = &text[start..end];
    let trimmed = raw.trim_matches('-');
    if trimmed.is_empty() {
        return;
    }
    let lead = raw.len() - raw.trim_start_matches('-').len();
    let from = start + lead;
    let to = from + trimmed.len();
    spans.push(WordSpan {
        start: from,
        end: to,
        text: &text[from..to],
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<&str> {
        word_spans(text).into_iter().map(|s| s.text).collect()
    }

    #[test]
    fn suffixed_forms_stay_single_tokens() {
        assert_eq!(tokens("wane numa-tu"), vec!["wane", "numa-tu"]);
    }

    #[test]
    fn punctuation_breaks_tokens() {
        assert_eq!(tokens("satu chixra, wane."), vec!["satu", "chixra", "wane"]);
    }

    #[test]
    fn dangling_hyphens_are_stripped() {
        assert_eq!(tokens("numa- -tu --"), vec!["numa", "tu"]);
    }

    #[test]
    fn replace_span_preserves_surroundings() {
        let text = "wane numa-tu wa";
        let spans = word_spans(text);
        let rebuilt = replace_span(text, &spans[1], "numa");
        assert_eq!(rebuilt, "wane numa wa");
    }

    #[test]
    fn spans_report_byte_offsets() {
        let text = " eklu chixra";
        let spans = word_spans(text);
        assert_eq!(spans[0].start, 1);
        assert_eq!(&text[spans[1].start..spans[1].end], "chixra");
    }
}
