//! Loads `.txt` and `.md` files from a directory into indexable chunks

use std::path::Path;

use pulldown_cmark::{Event, Parser, Tag};
use tracing::{debug, info, warn};

use super::chunker::chunk_text;
use crate::domain::{ChunkInput, DomainError, VectorStore};

const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// Read every supported file in `dir` (non-recursive, sorted by name) and
/// chunk it.
pub async fn load_directory(dir: &Path, chunk_size: usize) -> Result<Vec<ChunkInput>, DomainError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|e| {
        DomainError::configuration(format!(
            "Failed to read documents directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DomainError::internal(format!("Failed to list documents: {}", e)))?
    {
        let path = entry.path();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));

        if supported && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut chunks = Vec::new();
    for path in paths {
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable document");
                continue;
            }
        };

        let is_markdown = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| !ext.eq_ignore_ascii_case("txt"));
        let text = if is_markdown { markdown_to_text(&raw) } else { raw };

        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pieces = chunk_text(&text, chunk_size);

        debug!(source = %source, chunks = pieces.len(), "Document chunked");

        chunks.extend(
            pieces
                .into_iter()
                .map(|content| ChunkInput::new(content).with_source(source.clone())),
        );
    }

    Ok(chunks)
}

/// Load `dir` and add its chunks to `store`, returning the number indexed
pub async fn index_directory(
    store: &dyn VectorStore,
    dir: &Path,
    chunk_size: usize,
) -> Result<usize, DomainError> {
    let chunks = load_directory(dir, chunk_size).await?;
    if chunks.is_empty() {
        warn!(dir = %dir.display(), "No documents found to index");
        return Ok(0);
    }

    let indexed = store.add_documents(chunks).await?;
    info!(dir = %dir.display(), chunks = indexed, "Documents indexed");

    Ok(indexed)
}

/// Plain text of a markdown document with block elements separated by
/// blank lines
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::Start(Tag::Item) => text.push_str("- "),
            Event::End(Tag::Heading(..))
            | Event::End(Tag::Paragraph)
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_)) => text.push_str("\n\n"),
            _ => {}
        }
    }

    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    async fn temp_dir_with(files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("docs-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        for (name, content) in files {
            tokio::fs::write(dir.join(name), content).await.unwrap();
        }
        dir
    }

    #[test]
    fn test_markdown_to_text() {
        let markdown = "# Agentic AI\n\nAgents **plan** and act.\n\n- uses tools\n- reflects\n";
        let text = markdown_to_text(markdown);

        assert_eq!(
            text,
            "Agentic AI\n\nAgents plan and act.\n\n- uses tools\n\n- reflects"
        );
    }

    #[tokio::test]
    async fn test_load_directory_filters_and_sorts() {
        let dir = temp_dir_with(&[
            ("b.txt", "Second file."),
            ("a.md", "# Title\n\nFirst file."),
            ("ignored.json", "{}"),
        ])
        .await;

        let chunks = load_directory(&dir, 1000).await.unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "Title\n\nFirst file.");
        assert_eq!(chunks[0].source.as_deref(), Some("a.md"));
        assert_eq!(chunks[1].content, "Second file.");
        assert_eq!(chunks[1].source.as_deref(), Some("b.txt"));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_missing_directory_is_configuration_error() {
        let dir = std::env::temp_dir().join(format!("missing-{}", uuid::Uuid::new_v4()));

        let result = load_directory(&dir, 1000).await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
