//! Paragraph chunking with sentence fallback for oversized paragraphs

use unicode_segmentation::UnicodeSegmentation;

/// Split `text` into chunks of at most `max_chars` bytes.
///
/// Paragraphs (blank-line separated) are packed together while they fit.
/// A paragraph longer than `max_chars` is split by sentence, and a single
/// sentence longer than that is cut on character boundaries.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in split_paragraphs(text) {
        if paragraph.len() > max_chars {
            flush(&mut current, &mut chunks);
            chunks.extend(split_long_paragraph(paragraph, max_chars));
            continue;
        }

        if current.is_empty() {
            current.push_str(paragraph);
        } else if current.len() + 2 + paragraph.len() <= max_chars {
            current.push_str("\n\n");
            current.push_str(paragraph);
        } else {
            flush(&mut current, &mut chunks);
            current.push_str(paragraph);
        }
    }

    flush(&mut current, &mut chunks);
    chunks
}

fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    text.split("\n\n").map(str::trim).filter(|p| !p.is_empty())
}

fn split_long_paragraph(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in paragraph.unicode_sentences() {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        if sentence.len() > max_chars {
            flush(&mut current, &mut chunks);
            chunks.extend(hard_split(sentence, max_chars));
        } else if current.is_empty() {
            current.push_str(sentence);
        } else if current.len() + 1 + sentence.len() <= max_chars {
            current.push(' ');
            current.push_str(sentence);
        } else {
            flush(&mut current, &mut chunks);
            current.push_str(sentence);
        }
    }

    flush(&mut current, &mut chunks);
    chunks
}

fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_chars).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        // A single char wider than the limit still has to make progress
        if end == start {
            end = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }

        let piece = text[start..end].trim();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
        start = end;
    }

    pieces
}

fn flush(current: &mut String, chunks: &mut Vec<String>) {
    if !current.is_empty() {
        chunks.push(std::mem::take(current));
    }
}
