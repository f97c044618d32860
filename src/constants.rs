/// Constants used by question-ID validation and extraction.
pub mod id {
    /// Core question-ID shape: 3-digit year code, one uppercase section
    /// letter, 1-3 digit question number.
    pub const ID_PATTERN: &str = r"\d{3}[A-Z]\d{1,3}";
    /// Length of the year-code prefix.
    pub const YEAR_LEN: usize = 3;
    /// Byte offset of the question-number suffix.
    pub const NUMBER_OFFSET: usize = 4;
}

/// Localized column names used by spreadsheet exports of the question
/// database. Header matching is substring-based because exports prepend a
/// BOM or decorate headers.
pub mod columns {
    /// Token identifying the question-ID column ("question ID").
    pub const QUESTION_ID_TOKEN: &str = "問題ID";
    /// Question ID.
    pub const COL_QUESTION_ID: &str = "問題ID";
    /// Exam year code ("year").
    pub const COL_YEAR: &str = "年度";
    /// Exam section letter ("section").
    pub const COL_SECTION: &str = "セクション";
    /// Question number within the section ("question number").
    pub const COL_NUMBER: &str = "問題番号";
    /// Correct answer ("answer").
    pub const COL_ANSWER: &str = "正答";
    /// Historical answer rate ("answer rate").
    pub const COL_ANSWER_RATE: &str = "正答率";
    /// English-question flag.
    pub const COL_ENGLISH: &str = "英語問題";
    /// Image-question flag.
    pub const COL_IMAGE: &str = "画像問題";
    /// Linked-question flag ("serial question").
    pub const COL_LINKED: &str = "連問";
    /// Calculation-question flag.
    pub const COL_CALCULATION: &str = "計算問題";
    /// Question statement text.
    pub const COL_QUESTION_TEXT: &str = "問題文";
    /// Clinical case text.
    pub const COL_CASE_TEXT: &str = "症例文";
    /// Answer choices.
    pub const COL_CHOICES: &str = "選択肢";
    /// Web display text.
    pub const COL_WEB_DISPLAY: &str = "Web表示用";
    /// Free-form tags.
    pub const COL_TAGS: &str = "タグ";
    /// Last-updated timestamp from the hosted database.
    pub const COL_LAST_UPDATED: &str = "最終更新";
    /// Source tag recorded during baseline integration.
    pub const COL_SOURCE: &str = "ソース";
    /// Baseline free-text content.
    pub const COL_CONTENT: &str = "コンテンツ";
    /// Provenance tag recording which tier satisfied the record.
    pub const COL_DATA_STATE: &str = "データ状態";

    /// Default value for the boolean-ish flag columns.
    pub const FLAG_DEFAULT: &str = "No";

    /// Column order of the merged CSV artifact.
    pub const MERGED_CSV_COLUMNS: [&str; 19] = [
        COL_QUESTION_ID,
        COL_YEAR,
        COL_SECTION,
        COL_NUMBER,
        COL_ANSWER,
        COL_ANSWER_RATE,
        COL_ENGLISH,
        COL_IMAGE,
        COL_LINKED,
        COL_CALCULATION,
        COL_QUESTION_TEXT,
        COL_CASE_TEXT,
        COL_CHOICES,
        COL_WEB_DISPLAY,
        COL_TAGS,
        COL_LAST_UPDATED,
        COL_SOURCE,
        COL_CONTENT,
        COL_DATA_STATE,
    ];

    /// Column order of the restore CSV, shaped for re-import into the hosted
    /// database (no source/content/state bookkeeping columns).
    pub const RESTORE_CSV_COLUMNS: [&str; 16] = [
        COL_QUESTION_ID,
        COL_YEAR,
        COL_SECTION,
        COL_NUMBER,
        COL_ANSWER,
        COL_ANSWER_RATE,
        COL_ENGLISH,
        COL_IMAGE,
        COL_LINKED,
        COL_CALCULATION,
        COL_QUESTION_TEXT,
        COL_CASE_TEXT,
        COL_CHOICES,
        COL_WEB_DISPLAY,
        COL_TAGS,
        COL_LAST_UPDATED,
    ];
}

/// Source tier names used for provenance tagging.
pub mod tiers {
    /// Baseline records parsed from the raw text dumps.
    pub const BASE_SOURCE: &str = "base_data";
    /// Records first seen in the curated web-display generation.
    pub const WEB_SOURCE: &str = "web_display_added";
    /// Default id for the hosted-database export source.
    pub const NOTION_SOURCE: &str = "notion";
    /// Default id for the restored/backfilled export source.
    pub const RESTORE_SOURCE: &str = "restore";
}

/// Export artifact naming and document versioning.
pub mod export {
    /// Merged CSV artifact filename.
    pub const MERGED_CSV_FILENAME: &str = "complete_question_database.csv";
    /// Merged JSON artifact filename.
    pub const MERGED_JSON_FILENAME: &str = "complete_question_database.json";
    /// Markdown statistics report filename.
    pub const STATISTICS_FILENAME: &str = "database_statistics.md";
    /// Restore CSV filename (rows missing from the detailed export).
    pub const RESTORE_CSV_FILENAME: &str = "missing_questions_restore.csv";
    /// Plain-text restoration summary filename.
    pub const SUMMARY_FILENAME: &str = "restoration_report.txt";
    /// Version tag written into the JSON metadata block.
    pub const DATABASE_VERSION: &str = "1.0";
    /// Description written into the JSON metadata block.
    pub const DATABASE_DESCRIPTION: &str =
        "Reconciled question-bank database merged from text dumps and database exports";
}

/// Defaults used by parsing limits and validation findings.
pub mod validation {
    /// Default char bound applied to baseline free-text content.
    pub const DEFAULT_CONTENT_LIMIT: usize = 1000;
    /// Default expected question count per exam year.
    pub const EXPECTED_QUESTIONS_PER_YEAR: usize = 400;
    /// Max missing IDs enumerated verbatim in the summary report.
    pub const REPORT_MISSING_ID_LIMIT: usize = 50;
    /// Filename marker excluded from baseline dump scanning.
    pub const WEB_DISPLAY_MARKER: &str = "web_display";
}
