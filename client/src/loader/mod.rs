//! Row loader: CSV or JSON file to a list of records.
//!
//! The format is picked from the file extension (case-insensitive):
//!
//! | Extension | Accepted content                                          |
//! |-----------|-----------------------------------------------------------|
//! | `.csv`    | Header row, then one record per line                      |
//! | `.json`   | `[{...}, ...]`, `{"rows": [{...}, ...]}`, or a single `{...}` |
//!
//! CSV input may be UTF-8, ISO-8859-1 or Windows-1252; the encoding is
//! detected from a prefix of the file.

use serde_json::Value;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::models::Record;

/// Number of leading bytes handed to the encoding detector.
const ENCODING_SAMPLE_BYTES: usize = 64 * 1024;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options for CSV parsing. JSON input ignores them.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    /// Field delimiter.
    pub delimiter: u8,
    /// Cell contents (after trimming) that become JSON `null`.
    pub null_values: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            null_values: vec!["NA".to_string()],
        }
    }
}

/// Input formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Pick the format from the path's extension.
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("json") => Ok(FileFormat::Json),
            _ => Err(LoadError::UnsupportedExtension(dotted_extension(path))),
        }
    }
}

/// `.ext` as written in the path, or an empty string when there is none.
fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

/// Load a file into records using default options.
///
/// # Example
/// ```ignore
/// let rows = checks_client::file_to_rows("data/dataset.csv")?;
/// println!("{} rows", rows.len());
/// ```
pub fn file_to_rows(path: impl AsRef<Path>) -> LoadResult<Vec<Record>> {
    file_to_rows_with(path, &LoadOptions::default())
}

/// Load a file into records.
pub fn file_to_rows_with(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<Vec<Record>> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;

    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // Both branches take ownership so the raw bytes are gone before rows are built.
    let rows = match format {
        FileFormat::Csv => {
            let (content, encoding) = decode_auto(bytes);
            tracing::debug!(path = %path.display(), encoding = %encoding, "decoded CSV input");
            csv_rows(&content, path, options)?
        }
        FileFormat::Json => json_rows(bytes, path)?,
    };

    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded rows");
    Ok(rows)
}

// =============================================================================
// Encoding
// =============================================================================

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let sample = &bytes[..bytes.len().min(ENCODING_SAMPLE_BYTES)];
    let charset = chardet::detect(sample).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "iso-8859-15" | "latin-9" | "latin9" => "iso-8859-15".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes with the given encoding.
///
/// ISO-8859-1 maps every byte to the code point of the same value. Other
/// labels go through `encoding_rs`; unknown labels decode as lossy UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8_lossy(bytes).into_owned(),
        "iso-8859-1" | "latin-1" | "latin1" => bytes.iter().map(|&b| char::from(b)).collect(),
        "iso-8859-15" | "latin-9" | "latin9" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.into_owned()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
        label => match encoding_rs::Encoding::for_label(label.as_bytes()) {
            Some(encoding) => encoding.decode(bytes).0.into_owned(),
            None => String::from_utf8_lossy(bytes).into_owned(),
        },
    }
}

/// Valid UTF-8 is taken as is, without copying; anything else goes through
/// detection.
fn decode_auto(mut bytes: Vec<u8>) -> (String, String) {
    if bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }

    match String::from_utf8(bytes) {
        Ok(text) => (text, "utf-8".to_string()),
        Err(err) => {
            let bytes = err.into_bytes();
            let encoding = detect_encoding(&bytes);
            (decode_content(&bytes, &encoding), encoding)
        }
    }
}

// =============================================================================
// CSV
// =============================================================================

/// Parse CSV text into records keyed by the header row.
///
/// Short rows are padded with empty strings, surplus fields are dropped.
pub fn csv_rows(content: &str, path: &Path, options: &LoadOptions) -> LoadResult<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, &e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, &e))?;
        let mut row = Record::new();

        for (i, header) in headers.iter().enumerate() {
            let raw = record.get(i).unwrap_or("");
            row.insert(header.clone(), cell_value(raw, options));
        }

        rows.push(row);
    }

    Ok(rows)
}

fn cell_value(raw: &str, options: &LoadOptions) -> Value {
    let trimmed = raw.trim();
    if options.null_values.iter().any(|n| n == trimmed) {
        Value::Null
    } else {
        Value::String(raw.to_string())
    }
}

fn csv_error(path: &Path, err: &csv::Error) -> LoadError {
    LoadError::Csv {
        path: path.to_path_buf(),
        line: err.position().map(|p| p.line()).unwrap_or(0),
        message: err.to_string(),
    }
}

// =============================================================================
// JSON
// =============================================================================

fn json_rows(bytes: Vec<u8>, path: &Path) -> LoadResult<Vec<Record>> {
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes.as_slice());
    let value: Value = serde_json::from_slice(content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    drop(bytes);

    rows_from_json(value, path)
}

/// Extract records from an already-parsed JSON document.
///
/// `path` is only used for error context.
pub fn rows_from_json(value: Value, path: &Path) -> LoadResult<Vec<Record>> {
    match value {
        Value::Array(items) => into_records(items).map_err(|index| LoadError::NonObjectRow {
            path: path.to_path_buf(),
            index,
        }),
        Value::Object(mut object) => match object.remove("rows") {
            Some(Value::Array(items)) => {
                into_records(items).map_err(|_| LoadError::InvalidRowsField {
                    path: path.to_path_buf(),
                })
            }
            Some(_) => Err(LoadError::InvalidRowsField {
                path: path.to_path_buf(),
            }),
            None => Ok(vec![object]),
        },
        _ => Err(LoadError::UnsupportedJson {
            path: path.to_path_buf(),
        }),
    }
}

/// Index of the first non-object on failure.
fn into_records(items: Vec<Value>) -> Result<Vec<Record>, usize> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(object) => Ok(object),
            _ => Err(index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_json_array_keeps_order_and_values() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "rows.json",
            br#"[{"id": 1, "name": "a"}, {"id": 2.5, "name": null}, {"id": "3", "flag": true}]"#,
        );

        let rows = file_to_rows(&path).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["id"], json!(1));
        assert_eq!(rows[1]["id"], json!(2.5));
        assert_eq!(rows[1]["name"], Value::Null);
        assert_eq!(rows[2]["id"], json!("3"));
        assert_eq!(rows[2]["flag"], json!(true));
    }

    #[test]
    fn test_json_rows_field_returned_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "wrapped.json",
            br#"{"rows": [{"a": "1"}, {"a": "2"}], "meta": "ignored"}"#,
        );

        let rows = file_to_rows(&path).unwrap();
        let as_value = Value::Array(rows.into_iter().map(Value::Object).collect());

        assert_eq!(as_value, json!([{"a": "1"}, {"a": "2"}]));
    }

    #[test]
    fn test_json_single_object_wrapped() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "single.json", br#"{"variable": "age", "type": "integer"}"#);

        let rows = file_to_rows(&path).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["variable"], "age");
        assert_eq!(rows[0]["type"], "integer");
    }

    #[test]
    fn test_json_empty_array_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.json", b"[]");

        assert!(file_to_rows(&path).unwrap().is_empty());
    }

    #[test]
    fn test_json_array_of_scalars_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "scalars.json", b"[1, 2, 3]");

        let err = file_to_rows(&path).unwrap_err();
        assert!(matches!(err, LoadError::NonObjectRow { index: 0, .. }));
        assert!(err.to_string().contains("JSON array must contain objects"));
    }

    #[test]
    fn test_json_array_with_later_scalar_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "mixed.json", br#"[{"a": 1}, "oops"]"#);

        let err = file_to_rows(&path).unwrap_err();
        assert!(matches!(err, LoadError::NonObjectRow { index: 1, .. }));
    }

    #[test]
    fn test_json_rows_field_not_array_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad_rows.json", br#"{"rows": "nope"}"#);

        let err = file_to_rows(&path).unwrap_err();
        assert!(matches!(err, LoadError::InvalidRowsField { .. }));
    }

    #[test]
    fn test_json_scalar_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "scalar.json", b"42");

        let err = file_to_rows(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedJson { .. }));
        assert!(err.to_string().contains("Unsupported JSON format"));
    }

    #[test]
    fn test_json_syntax_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "broken.json", b"[{\"a\": ");

        assert!(matches!(file_to_rows(&path), Err(LoadError::Json { .. })));
    }

    #[test]
    fn test_csv_rows_keyed_by_header_in_order() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "data.csv", b"name,age\nAlice,30\nBob,25\nCarol,41\n");

        let rows = file_to_rows(&path).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["name"], "Alice");
        assert_eq!(rows[0]["age"], "30");
        assert_eq!(rows[1]["name"], "Bob");
        assert_eq!(rows[2]["name"], "Carol");
        assert_eq!(rows[2]["age"], "41");
        let keys: Vec<&String> = rows[0].keys().collect();
        assert_eq!(keys, vec!["name", "age"]);
    }

    #[test]
    fn test_csv_header_only_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "header.csv", b"name,age\n");

        assert!(file_to_rows(&path).unwrap().is_empty());
    }

    #[test]
    fn test_csv_quoted_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "quoted.csv", b"name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\n");

        let rows = file_to_rows(&path).unwrap();

        assert_eq!(rows[0]["name"], "Smith, J");
        assert_eq!(rows[0]["note"], "said \"hi\"");
    }

    #[test]
    fn test_csv_null_marker_and_short_rows() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "na.csv", b"a,b,c\n1,NA,3\n4\n");

        let rows = file_to_rows(&path).unwrap();

        assert_eq!(rows[0]["b"], Value::Null);
        assert_eq!(rows[0]["c"], "3");
        assert_eq!(rows[1]["a"], "4");
        assert_eq!(rows[1]["b"], "");
        assert_eq!(rows[1]["c"], "");
    }

    #[test]
    fn test_csv_custom_delimiter_without_null_markers() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "semi.csv", b"a;b\nNA;2\n");
        let options = LoadOptions {
            delimiter: b';',
            null_values: vec![],
        };

        let rows = file_to_rows_with(&path, &options).unwrap();

        assert_eq!(rows[0]["a"], "NA");
        assert_eq!(rows[0]["b"], "2");
    }

    #[test]
    fn test_csv_bom_stripped() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bom.csv", b"\xEF\xBB\xBFid,v\n1,x\n");

        let rows = file_to_rows(&path).unwrap();

        assert_eq!(rows[0]["id"], "1");
    }

    #[test]
    fn test_uppercase_extension_accepted() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "DATA.CSV", b"x\n1\n");

        assert_eq!(file_to_rows(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "notes.txt", b"hello");

        let err = file_to_rows(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(".txt"));
        assert!(msg.contains(".csv"));
        assert!(msg.contains(".json"));
    }

    #[test]
    fn test_missing_extension_checked_before_read() {
        let err = file_to_rows("does/not/exist").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ref ext) if ext.is_empty()));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = file_to_rows("does/not/exist.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("exist.csv"));
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1");
        assert_eq!(decoded, "Société");
    }

    #[test]
    fn test_latin1_keeps_symbols_that_differ_in_latin9() {
        let bytes: &[u8] = &[0xA4, 0xA6, 0xA8, 0xB4, 0xB8, 0xBC, 0xBD, 0xBE];

        assert_eq!(decode_content(bytes, "iso-8859-1"), "¤¦¨´¸¼½¾");
        assert_eq!(decode_content(bytes, "windows-1252"), "¤¦¨´¸¼½¾");
        assert_eq!(decode_content(bytes, "iso-8859-15"), "€ŠšŽžŒœŸ");
    }

    #[test]
    fn test_latin1_csv_file_loads_unchanged() {
        let dir = TempDir::new().unwrap();
        // "label\n½ prix ¤\n" in ISO-8859-1
        let path = write(&dir, "latin1.csv", b"label\n\xBD prix \xA4\n");

        let rows = file_to_rows(&path).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["label"], "½ prix ¤");
    }

    #[test]
    fn test_decode_auto_utf8_passthrough() {
        let (text, encoding) = decode_auto(b"\xEF\xBB\xBFa,b\n\xC3\xA9,2\n".to_vec());

        assert_eq!(text, "a,b\né,2\n");
        assert_eq!(encoding, "utf-8");
    }
}
