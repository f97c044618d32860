use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::data::{SourceBatch, SourceRecord};
use crate::errors::ReconcileError;
use crate::id::id_occurrences;
use crate::source::RecordSource;
use crate::types::SourceName;
use crate::utils::{clean_block, truncate_chars};

/// Configuration for a text-dump source.
#[derive(Clone, Debug)]
pub struct TextDumpConfig {
    /// Stable source identifier stamped onto parsed records.
    pub source_id: SourceName,
    /// Single dump file, or a directory scanned for `.txt` files.
    pub root: PathBuf,
    /// Char bound applied to each record's content.
    pub content_limit: usize,
    /// Optional filename substring that candidate files must contain.
    pub include_marker: Option<String>,
    /// Optional filename substring that excludes candidate files.
    pub exclude_marker: Option<String>,
}

impl TextDumpConfig {
    /// Create a config for a dump source with explicit id and root.
    pub fn new(source_id: impl Into<SourceName>, root: impl Into<PathBuf>) -> Self {
        Self {
            source_id: source_id.into(),
            root: root.into(),
            content_limit: crate::constants::validation::DEFAULT_CONTENT_LIMIT,
            include_marker: None,
            exclude_marker: None,
        }
    }

    /// Override the content char bound.
    pub fn with_content_limit(mut self, limit: usize) -> Self {
        self.content_limit = limit;
        self
    }

    /// Require candidate filenames to contain `marker`.
    pub fn with_include_marker(mut self, marker: impl Into<String>) -> Self {
        self.include_marker = Some(marker.into());
        self
    }

    /// Exclude candidate filenames containing `marker`.
    pub fn with_exclude_marker(mut self, marker: impl Into<String>) -> Self {
        self.exclude_marker = Some(marker.into());
        self
    }
}

/// Parses question records out of raw text dumps.
///
/// A dump interleaves question IDs with free text; each ID owns the segment
/// up to the next ID occurrence or end of file. IDs whose trailing text is
/// empty after cleanup are dropped rather than emitted empty.
pub struct TextDumpSource {
    config: TextDumpConfig,
}

impl TextDumpSource {
    /// Create a dump source from configuration.
    pub fn new(config: TextDumpConfig) -> Self {
        Self { config }
    }

    fn candidate_files(&self) -> Vec<PathBuf> {
        let root = &self.config.root;
        if root.is_file() {
            return vec![root.clone()];
        }
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.path().to_path_buf())
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .filter(|path| self.name_passes_markers(path))
            .collect();
        files.sort();
        files
    }

    fn name_passes_markers(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        if let Some(marker) = &self.config.include_marker
            && !name.contains(marker)
        {
            return false;
        }
        if let Some(marker) = &self.config.exclude_marker
            && name.contains(marker)
        {
            return false;
        }
        true
    }
}

impl RecordSource for TextDumpSource {
    fn id(&self) -> &str {
        &self.config.source_id
    }

    fn load(&self) -> Result<SourceBatch, ReconcileError> {
        let mut batch = SourceBatch::default();
        if !self.config.root.exists() {
            warn!(
                source = %self.config.source_id,
                root = %self.config.root.display(),
                "dump root missing, loading as empty source"
            );
            return Ok(batch);
        }
        for path in self.candidate_files() {
            let content = std::fs::read_to_string(&path)?;
            let records = parse_blocks(
                &content,
                &self.config.source_id,
                self.config.content_limit,
            );
            debug!(
                source = %self.config.source_id,
                file = %path.display(),
                records = records.len(),
                "parsed dump file"
            );
            for record in records {
                batch.insert(record);
            }
        }
        Ok(batch)
    }
}

/// Split `text` on ID-pattern boundaries and pair each ID with its trailing
/// segment, cleaned and bounded to `content_limit` chars.
pub fn parse_blocks(text: &str, source_id: &str, content_limit: usize) -> Vec<SourceRecord> {
    let occurrences = id_occurrences(text);
    let mut records = Vec::with_capacity(occurrences.len());
    for (idx, (id, range)) in occurrences.iter().enumerate() {
        let segment_end = occurrences
            .get(idx + 1)
            .map(|(_, next)| next.start)
            .unwrap_or(text.len());
        let cleaned = clean_block(&text[range.end..segment_end]);
        if cleaned.is_empty() {
            // An ID with no trailing text is a stray mention, not a record.
            continue;
        }
        records.push(SourceRecord::text(
            id.clone(),
            source_id,
            truncate_chars(&cleaned, content_limit),
        ));
    }
    records
}
