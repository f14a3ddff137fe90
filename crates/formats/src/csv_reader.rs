//! CSV reader for `id,title,description` exports
//!
//! Column order is free; columns are resolved by header name. An empty
//! description cell is read as a missing description since CSV cannot tell
//! null and empty apart. Ragged rows are accepted: a short row without its
//! description cell reads as missing, one without its id cell is invalid.

use crate::record::parse_id;
use crate::{Error, Record, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    title: Option<usize>,
    description: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let missing = |name: &str| Error::InvalidRecord {
            line: 1,
            reason: format!("CSV header has no '{}' column", name),
        };

        Ok(Self {
            id: find("id").ok_or_else(|| missing("id"))?,
            title: find("title"),
            description: find("description").ok_or_else(|| missing("description"))?,
        })
    }
}

/// Streaming CSV reader producing typed records
pub struct CsvReader<R: Read> {
    reader: csv::Reader<R>,
    columns: Columns,
    records_read: usize,
    total_bytes: Option<u64>,
}

impl CsvReader<File> {
    /// Open a CSV file with a header row
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening CSV file: {:?}", path);
        let file = File::open(path)?;
        let total_bytes = file.metadata()?.len();
        let mut reader = Self::new(file)?;
        reader.total_bytes = Some(total_bytes);
        Ok(reader)
    }
}

impl<R: Read> CsvReader<R> {
    /// Create a reader from any source; the header row is read eagerly
    pub fn new(source: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);
        let columns = Columns::resolve(reader.headers()?)?;

        Ok(Self {
            reader,
            columns,
            records_read: 0,
            total_bytes: None,
        })
    }

    /// Get the number of records produced
    pub fn records_processed(&self) -> usize {
        self.records_read
    }

    /// Get the byte offset reached in the source
    pub fn bytes_processed(&self) -> u64 {
        self.reader.position().byte()
    }

    /// Get total file size if known
    pub fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }

    fn to_record(&self, row: &StringRecord) -> Result<Record> {
        let line = row
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(self.records_read + 1);

        let id = parse_id(row.get(self.columns.id).unwrap_or(""))
            .map_err(|reason| Error::InvalidRecord { line, reason })?;

        let title = self
            .columns
            .title
            .and_then(|idx| row.get(idx))
            .unwrap_or("")
            .to_string();

        let description = row
            .get(self.columns.description)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string);

        Ok(Record {
            id,
            title,
            description,
        })
    }
}

impl<R: Read> Iterator for CsvReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = StringRecord::new();
        match self.reader.read_record(&mut row) {
            Ok(false) => None,
            Ok(true) => {
                self.records_read += 1;
                Some(self.to_record(&row))
            }
            Err(e) => Some(Err(Error::Csv(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_reader_basic() {
        let data = "id,title,description\n\
                    1,Test,This is a test description\n\
                    2,Empty,\n\
                    3,Quoted,\"Commas, inside quotes\"\n";

        let reader = CsvReader::new(data.as_bytes()).unwrap();
        let records: Vec<_> = reader.collect::<Result<Vec<_>>>().unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].title, "Test");
        assert_eq!(records[0].description(), Some("This is a test description"));
        assert!(records[1].description.is_none());
        assert_eq!(records[2].description(), Some("Commas, inside quotes"));
    }

    #[test]
    fn test_csv_reader_column_order_and_missing_title() {
        let data = "description,ID\nhello world!,10\n";

        let reader = CsvReader::new(data.as_bytes()).unwrap();
        let records: Vec<_> = reader.collect::<Result<Vec<_>>>().unwrap();

        assert_eq!(records, vec![Record::new(10, "", Some("hello world!".to_string()))]);
    }

    #[test]
    fn test_csv_reader_requires_columns() {
        let data = "id,title\n1,Only a title\n";
        assert!(matches!(
            CsvReader::new(data.as_bytes()),
            Err(Error::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_csv_reader_rejects_bad_id() {
        let data = "id,title,description\nabc,Bad,text here\n";
        let mut reader = CsvReader::new(data.as_bytes()).unwrap();
        assert!(matches!(
            reader.next().unwrap(),
            Err(Error::InvalidRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_csv_reader_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "id,title,description").unwrap();
        writeln!(temp_file, "1,A,first description").unwrap();
        writeln!(temp_file, "2,B,second description").unwrap();
        temp_file.flush().unwrap();

        let mut reader = CsvReader::open(temp_file.path()).unwrap();
        assert!(reader.total_bytes().unwrap() > 0);

        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(reader.records_processed(), 1);
        assert!(reader.bytes_processed() > 0);
    }
}
