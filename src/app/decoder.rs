//! CSV decoding capability
//!
//! The loader never parses CSV itself; it is handed a [`CsvDecoder`] at
//! construction. [`HeaderCsvDecoder`] is the default implementation, backed
//! by the `csv` crate: the first record is the header, header names are
//! trimmed, and records whose fields are all blank are skipped.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::app::models::{CellValue, Row};
use crate::errors::{DecodeError, DecodeResult};

/// Header-aware CSV-to-rows decoding
pub trait CsvDecoder: Send + Sync {
    /// Decode CSV text into rows keyed by header name
    fn decode(&self, text: &str) -> DecodeResult<Vec<Row>>;
}

/// CSV parser configuration
#[derive(Clone, Debug)]
pub struct CsvConfig {
    /// Field delimiter (default: b',')
    pub delimiter: u8,
    /// Trim whitespace around header names
    pub trim_headers: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim_headers: true,
        }
    }
}

/// Default decoder using the first record as header
#[derive(Clone, Debug, Default)]
pub struct HeaderCsvDecoder {
    config: CsvConfig,
}

impl HeaderCsvDecoder {
    /// Create a decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with custom settings
    pub fn with_config(config: CsvConfig) -> Self {
        Self { config }
    }

    fn is_blank(record: &StringRecord) -> bool {
        record.iter().all(|field| field.trim().is_empty())
    }
}

impl CsvDecoder for HeaderCsvDecoder {
    fn decode(&self, text: &str) -> DecodeResult<Vec<Row>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.config.delimiter)
            .flexible(true)
            .trim(if self.config.trim_headers {
                Trim::Headers
            } else {
                Trim::None
            })
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| DecodeError::Malformed {
                reason: e.to_string(),
            })?
            .clone();

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for record in reader.records() {
            let record = record.map_err(|e| DecodeError::Malformed {
                reason: e.to_string(),
            })?;

            if Self::is_blank(&record) {
                skipped += 1;
                continue;
            }

            // Short records yield only the columns present; surplus fields are dropped
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(name, field)| (name.to_string(), CellValue::from_field(field)))
                .collect();
            rows.push(row);
        }

        debug!(
            "Decoded {} rows with {} columns ({} blank rows skipped)",
            rows.len(),
            headers.len(),
            skipped
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(row: &Row, column: &str) -> String {
        row.get(column).map(|cell| cell.to_string()).unwrap_or_default()
    }

    #[test]
    fn test_decode_simple_payload() {
        let rows = HeaderCsvDecoder::new().decode("a,b\n1,2\n3,4").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(text(&rows[0], "a"), "1");
        assert_eq!(text(&rows[0], "b"), "2");
        assert_eq!(text(&rows[1], "a"), "3");
        assert_eq!(text(&rows[1], "b"), "4");
        assert_eq!(rows[0]["a"], CellValue::Text("1".to_string()));
    }

    #[test]
    fn test_columns_follow_header_order() {
        let rows = HeaderCsvDecoder::new()
            .decode("station,date,temp
x,2024-01-01,3
")
            .unwrap();
        assert_eq!(
            rows[0].keys().collect::<Vec<_>>(),
            vec!["station", "date", "temp"]
        );
    }

    #[test]
    fn test_header_names_trimmed() {
        let rows = HeaderCsvDecoder::new().decode(" a , b\n1,2\n").unwrap();
        assert!(rows[0].contains_key("a"));
        assert!(rows[0].contains_key("b"));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let payload = "a,b\n1,2\n\n , \n,\n3,4\n";
        let rows = HeaderCsvDecoder::new().decode(payload).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(text(&rows[1], "a"), "3");
    }

    #[test]
    fn test_empty_cells_and_quotes() {
        let payload = "name,amount\n\"Smith, J\",\n";
        let rows = HeaderCsvDecoder::new().decode(payload).unwrap();
        assert_eq!(text(&rows[0], "name"), "Smith, J");
        assert_eq!(rows[0]["amount"], CellValue::Empty);
    }

    #[test]
    fn test_ragged_rows() {
        let payload = "a,b,c\n1\n1,2,3,4\n";
        let rows = HeaderCsvDecoder::new().decode(payload).unwrap();
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 3);
        assert_eq!(text(&rows[1], "c"), "3");
    }

    #[test]
    fn test_custom_delimiter() {
        let decoder = HeaderCsvDecoder::with_config(CsvConfig {
            delimiter: b';',
            ..Default::default()
        });
        let rows = decoder.decode("a;b\n1;2\n").unwrap();
        assert_eq!(text(&rows[0], "b"), "2");
    }

    #[test]
    fn test_header_only_payload_has_no_rows() {
        let rows = HeaderCsvDecoder::new().decode("a,b\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_non_ascii_headers() {
        let rows = HeaderCsvDecoder::new().decode("città,valore\nRoma,1\n").unwrap();
        assert_eq!(text(&rows[0], "città"), "Roma");
    }
}
