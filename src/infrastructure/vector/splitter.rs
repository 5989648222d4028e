//! Recursive document splitter
//!
//! Splits long text into segments of at most `max_chunk_size` characters,
//! preferring the coarsest natural boundary that works: paragraphs, then
//! lines, then sentences, then words, then a hard character cut. Adjacent
//! pieces are merged greedily and each new chunk opens with a short tail of
//! the previous one. A piece too long to follow that tail is split again at
//! the next finer boundary.

use std::collections::VecDeque;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    Metadata, SplitterConfig, TextSegment, METADATA_INDEX, METADATA_SOURCE_ID,
};

/// One unsplittable unit and the separator that preceded it in the source.
#[derive(Debug)]
struct Piece {
    joiner: &'static str,
    text: String,
    level: Level,
}

impl Piece {
    /// Split this piece at the first finer boundary that yields more than one
    /// part. Words are only cut into characters when they came from a hard cut.
    fn subdivide(&self) -> Option<Vec<Self>> {
        let mut level = self.level;
        loop {
            let parts = match level {
                Level::Paragraph => split_trimmed(&self.text, "\n\n"),
                Level::Line => split_trimmed(&self.text, "\n"),
                Level::Sentence => split_sentences(&self.text),
                Level::Word => self.text.split_whitespace().map(str::to_string).collect(),
                Level::Char => hard_cut(&self.text, 1),
            };

            if parts.len() > 1 {
                let part_level = match level {
                    Level::Word => Level::Word,
                    other => other.next(),
                };
                return Some(
                    parts
                        .into_iter()
                        .enumerate()
                        .map(|(i, text)| Self {
                            joiner: if i == 0 { self.joiner } else { level.joiner() },
                            text,
                            level: part_level,
                        })
                        .collect(),
                );
            }
            if matches!(level, Level::Word | Level::Char) {
                return None;
            }
            level = level.next();
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Level {
    Paragraph,
    Line,
    Sentence,
    Word,
    Char,
}

impl Level {
    const fn next(self) -> Self {
        match self {
            Self::Paragraph => Self::Line,
            Self::Line => Self::Sentence,
            Self::Sentence => Self::Word,
            Self::Word | Self::Char => Self::Char,
        }
    }

    const fn joiner(self) -> &'static str {
        match self {
            Self::Paragraph => "\n\n",
            Self::Line => "\n",
            Self::Sentence | Self::Word => " ",
            Self::Char => "",
        }
    }
}

/// Character-based recursive splitter.
#[derive(Debug, Clone)]
pub struct DocumentSplitter {
    config: SplitterConfig,
}

impl DocumentSplitter {
    /// Create a splitter, rejecting `max_chunk_size == 0` and
    /// `chunk_overlap >= max_chunk_size`.
    pub fn new(config: SplitterConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// One-shot split with explicit sizes.
    pub fn split_with(
        text: &str,
        max_chunk_size: usize,
        chunk_overlap: usize,
    ) -> DomainResult<Vec<TextSegment>> {
        Ok(Self::new(SplitterConfig::new(max_chunk_size, chunk_overlap))?.split(text))
    }

    pub const fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Split `text` into segments tagged with their index.
    pub fn split(&self, text: &str) -> Vec<TextSegment> {
        self.split_chunks(text)
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| {
                TextSegment::new(chunk, Metadata::new().with(METADATA_INDEX, index.to_string()))
            })
            .collect()
    }

    /// Split `text` and tag every segment with `source_id` and its index.
    pub fn split_document(&self, text: &str, source_id: &str) -> Vec<TextSegment> {
        self.split_chunks(text)
            .into_iter()
            .enumerate()
            .map(|(index, chunk)| {
                let metadata = Metadata::new()
                    .with(METADATA_SOURCE_ID, source_id)
                    .with(METADATA_INDEX, index.to_string());
                TextSegment::new(chunk, metadata)
            })
            .collect()
    }

    fn split_chunks(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if char_len(text) <= self.config.max_chunk_size {
            return vec![text.to_string()];
        }

        let mut pieces = Vec::new();
        self.split_piece(text, Level::Paragraph, "", &mut pieces);
        self.merge(pieces)
    }

    fn split_piece(&self, text: &str, level: Level, joiner: &'static str, out: &mut Vec<Piece>) {
        let max = self.config.max_chunk_size;
        if char_len(text) <= max {
            out.push(Piece {
                joiner,
                text: text.to_string(),
                level,
            });
            return;
        }

        let parts: Vec<String> = match level {
            Level::Paragraph => split_trimmed(text, "\n\n"),
            Level::Line => split_trimmed(text, "\n"),
            Level::Sentence => split_sentences(text),
            Level::Word => text.split_whitespace().map(str::to_string).collect(),
            Level::Char => hard_cut(text, max),
        };

        if matches!(level, Level::Char) {
            for (i, part) in parts.into_iter().enumerate() {
                out.push(Piece {
                    joiner: if i == 0 { joiner } else { level.joiner() },
                    text: part,
                    level,
                });
            }
            return;
        }

        if parts.len() <= 1 {
            self.split_piece(text, level.next(), joiner, out);
            return;
        }

        for (i, part) in parts.iter().enumerate() {
            let part_joiner = if i == 0 { joiner } else { level.joiner() };
            self.split_piece(part, level.next(), part_joiner, out);
        }
    }

    fn merge(&self, pieces: Vec<Piece>) -> Vec<String> {
        let max = self.config.max_chunk_size;
        let mut queue: VecDeque<Piece> = pieces.into();
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;
        // `current` holds only the tail carried over from the last chunk
        let mut carried = false;

        while let Some(piece) = queue.pop_front() {
            let piece_len = char_len(&piece.text);

            if current.is_empty() {
                current = piece.text;
                current_len = piece_len;
                carried = false;
                continue;
            }

            let joiner = if carried { glue(piece.joiner) } else { piece.joiner };
            let joined_len = current_len + char_len(joiner) + piece_len;
            if joined_len <= max {
                current.push_str(joiner);
                current.push_str(&piece.text);
                current_len = joined_len;
                carried = false;
                continue;
            }

            if !carried {
                let tail = self.overlap_tail(&current);
                chunks.push(std::mem::take(&mut current));
                current_len = char_len(&tail);
                current = tail;
                carried = true;
                queue.push_front(piece);
                continue;
            }

            if let Some(parts) = piece.subdivide() {
                for part in parts.into_iter().rev() {
                    queue.push_front(part);
                }
                continue;
            }

            // A single word that cannot follow the whole tail keeps as many
            // trailing tail words as still fit.
            let budget = max.saturating_sub(char_len(joiner) + piece_len);
            let tail = shrink_to_words(&current, budget);
            if tail.is_empty() {
                current = piece.text;
                current_len = piece_len;
            } else {
                current = format!("{tail}{joiner}{}", piece.text);
                current_len = char_len(&current);
            }
            carried = false;
        }

        if !current.is_empty() && !carried {
            chunks.push(current);
        }
        chunks
    }

    /// Up to `chunk_overlap` trailing characters, starting at a word boundary
    /// when the tail contains one.
    fn overlap_tail(&self, chunk: &str) -> String {
        let overlap = self.config.chunk_overlap;
        if overlap == 0 {
            return String::new();
        }

        let chars: Vec<char> = chunk.chars().collect();
        if chars.len() <= overlap {
            return chunk.trim().to_string();
        }

        let start = chars.len() - overlap;
        let mut tail = &chars[start..];
        let starts_mid_word = !chars[start - 1].is_whitespace() && !tail[0].is_whitespace();
        if starts_mid_word {
            if let Some(ws) = tail.iter().position(|c| c.is_whitespace()) {
                tail = &tail[ws..];
            }
        }

        tail.iter().collect::<String>().trim().to_string()
    }
}

impl Default for DocumentSplitter {
    fn default() -> Self {
        Self {
            config: SplitterConfig::default(),
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Separator between a carried tail and the next piece.
const fn glue(joiner: &'static str) -> &'static str {
    if joiner.is_empty() {
        ""
    } else {
        " "
    }
}

/// Drop leading words from `tail` until it fits in `budget` characters.
fn shrink_to_words(tail: &str, budget: usize) -> String {
    let mut tail = tail;
    while char_len(tail) > budget {
        match tail.find(char::is_whitespace) {
            Some(ws) => tail = tail[ws..].trim_start(),
            None => return String::new(),
        }
    }
    tail.to_string()
}

fn split_trimmed(text: &str, separator: &str) -> Vec<String> {
    text.split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split after `.`, `!` or `?` when followed by whitespace.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(_, next)) = chars.peek() {
                if next.is_whitespace() {
                    let end = i + c.len_utf8();
                    sentences.push(&text[start..end]);
                    start = end;
                }
            }
        }
    }
    sentences.push(&text[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn hard_cut(text: &str, max: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts(segments: &[TextSegment]) -> Vec<&str> {
        segments.iter().map(TextSegment::text).collect()
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let splitter = DocumentSplitter::default();
        assert!(splitter.split("").is_empty());
        assert!(splitter.split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_short_input_is_single_trimmed_segment() {
        let splitter = DocumentSplitter::default();
        let segments = splitter.split("  Rust is a systems language.  ");
        assert_eq!(texts(&segments), vec!["Rust is a systems language."]);
        assert_eq!(segments[0].metadata().get(METADATA_INDEX), Some("0"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(DocumentSplitter::split_with("text", 0, 0).is_err());
        assert!(DocumentSplitter::split_with("text", 10, 10).is_err());
    }

    #[test]
    fn test_paragraphs_preferred() {
        let text = "First paragraph about Rust.\n\nSecond paragraph about Java.";
        let segments = DocumentSplitter::split_with(text, 30, 0).unwrap();
        assert_eq!(
            texts(&segments),
            vec!["First paragraph about Rust.", "Second paragraph about Java."]
        );
    }

    #[test]
    fn test_sentences_used_when_paragraph_too_long() {
        let text = "One two three. Four five six. Seven eight nine.";
        let segments = DocumentSplitter::split_with(text, 20, 0).unwrap();
        assert_eq!(
            texts(&segments),
            vec!["One two three.", "Four five six.", "Seven eight nine."]
        );
    }

    #[test]
    fn test_small_pieces_are_merged() {
        let text = "a b c d e f g h";
        let segments = DocumentSplitter::split_with(text, 7, 0).unwrap();
        assert_eq!(texts(&segments), vec!["a b c d", "e f g h"]);
    }

    #[test]
    fn test_hard_cut_for_unbroken_text() {
        let text = "abcdefghij";
        let segments = DocumentSplitter::split_with(text, 4, 0).unwrap();
        assert_eq!(texts(&segments), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_overlap_snaps_to_word_boundary() {
        let text = "alpha beta gamma delta epsilon zeta";
        let segments = DocumentSplitter::split_with(text, 20, 8).unwrap();
        assert!(segments.len() > 1);
        // The second chunk opens with whole words carried from the first.
        let first = segments[0].text();
        let second = segments[1].text();
        let carried = second.split_whitespace().next().unwrap();
        assert!(first.ends_with(carried));
        for segment in &segments {
            assert!(segment.char_len() <= 20);
        }
    }

    /// Length of the longest prefix of `next` that `previous` ends with.
    fn shared_len(previous: &str, next: &str) -> usize {
        (1..=previous.len().min(next.len()))
            .rev()
            .find(|&k| next.is_char_boundary(k) && previous.ends_with(&next[..k]))
            .unwrap_or(0)
    }

    fn long_sentence(offset: usize) -> String {
        let words: Vec<String> = (offset..offset + 34).map(|i| format!("term{i:03}")).collect();
        format!("{}.", words.join(" "))
    }

    #[test]
    fn test_overlap_kept_when_next_sentence_is_long() {
        let text = [long_sentence(0), long_sentence(100), long_sentence(200)].join(" ");
        let segments = DocumentSplitter::split_with(&text, 300, 50).unwrap();

        assert!(segments.len() >= 3);
        for pair in segments.windows(2) {
            let shared = shared_len(pair[0].text(), pair[1].text());
            assert!(
                (40..=50).contains(&shared),
                "consecutive chunks share {shared} chars, configured overlap 50"
            );
        }
        for segment in &segments {
            assert!(segment.char_len() <= 300);
        }
        for word in text.split_whitespace() {
            let word = word.trim_end_matches('.');
            assert!(segments.iter().any(|s| s.text().contains(word)));
        }
    }

    #[test]
    fn test_long_word_shrinks_carried_tail() {
        let text = "aa bb cc dd ee ffffffffffff";
        let segments = DocumentSplitter::split_with(text, 15, 8).unwrap();

        assert_eq!(texts(&segments), vec!["aa bb cc dd ee", "ee ffffffffffff"]);
    }

    #[test]
    fn test_split_document_metadata() {
        let splitter = DocumentSplitter::new(SplitterConfig::new(10, 0)).unwrap();
        let segments = splitter.split_document("first bit\n\nsecond bit", "doc-7");
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].metadata().get(METADATA_SOURCE_ID), Some("doc-7"));
        assert_eq!(segments[1].metadata().get(METADATA_INDEX), Some("1"));
    }

    #[test]
    fn test_multibyte_text_respects_char_budget() {
        let text = "°°°°°° °°°°°° °°°°°°";
        let segments = DocumentSplitter::split_with(text, 6, 2).unwrap();
        for segment in &segments {
            assert!(segment.char_len() <= 6);
        }
    }

    proptest! {
        #[test]
        fn prop_chunks_never_exceed_max(
            text in "[a-z .!?\n]{0,400}",
            max in 5usize..60,
            overlap_ratio in 0.0f64..0.9,
        ) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
            let overlap = ((max as f64) * overlap_ratio) as usize;
            let segments = DocumentSplitter::split_with(&text, max, overlap).unwrap();
            for segment in &segments {
                prop_assert!(segment.char_len() <= max);
                prop_assert!(!segment.text().trim().is_empty());
            }
        }

        #[test]
        fn prop_every_word_survives(
            words in prop::collection::vec("[a-z]{1,8}", 1..60),
            max in 20usize..80,
        ) {
            let text = words.join(" ");
            let segments = DocumentSplitter::split_with(&text, max, 5).unwrap();
            for word in &words {
                prop_assert!(segments.iter().any(|s| s.text().split_whitespace().any(|w| w == word)));
            }
        }

        #[test]
        fn prop_consecutive_chunks_overlap(
            words in prop::collection::vec("[a-z]{1,8}", 10..120),
            max in 40usize..100,
            overlap in 10usize..20,
        ) {
            let text = words.join(" ");
            let segments = DocumentSplitter::split_with(&text, max, overlap).unwrap();
            for pair in segments.windows(2) {
                let shared = shared_len(pair[0].text(), pair[1].text());
                prop_assert!(shared > 0);
            }
        }
    }
}
