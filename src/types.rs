/// Three-digit exam year code taken from the front of a question ID.
/// Examples: `115`, `119`
pub type YearCode = String;
/// Single uppercase exam-block letter inside a question ID.
/// Examples: `A`, `F`
pub type SectionCode = char;
/// Identifier for the source that produced a record or batch.
/// Examples: `base_data`, `web_display_added`, `notion`
pub type SourceName = String;
/// Column header text from a spreadsheet export (may carry a BOM).
/// Examples: `問題ID`, `正答率`
pub type ColumnName = String;
/// Cell or structured-field value carried through a merge unmodified.
/// Examples: `e`, `89.2%`, `Yes`
pub type FieldValue = String;
