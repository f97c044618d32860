/// CSV-row parser for hosted-database exports.
pub mod notion_csv;
/// Text-block parser for raw dump files.
pub mod text_dump;
