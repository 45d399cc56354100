//! Raw rows as split from the CSV export.

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::io::{self, Read};
use std::ops::Index;

/// Field separator used by the export.
pub const DELIMITER: u8 = b';';

const QUOTE: u8 = b'"';
const SPACE: u8 = b' ';

/// One line of the export, split into fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRow {
    fields: Vec<String>,
}

impl RawRow {
    /// Creates a row from already split fields, dropping spaces at the start of each.
    ///
    /// Only `' '` is dropped; tabs and other whitespace are kept.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RawRow {
            fields: fields
                .into_iter()
                .map(|f| f.as_ref().trim_start_matches(' ').to_string())
                .collect(),
        }
    }

    /// Number of fields in the row.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the field at `idx`, or `None` past the end of the row.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }

    /// Returns the first field, which holds the account id (or the header sentinel).
    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }
}

impl Index<usize> for RawRow {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        &self.fields[idx]
    }
}

/// Fields come from a reader wrapped in [`SkipInitialSpace`] and are taken as is:
/// spaces inside a quoted field are data.
impl From<&StringRecord> for RawRow {
    fn from(record: &StringRecord) -> Self {
        RawRow {
            fields: record.iter().map(str::to_string).collect(),
        }
    }
}

/// Drops the spaces that open a field, before the CSV parser sees them.
///
/// A field written as `; "A; B"` thereby reaches the parser as `;"A; B"` and
/// is read as one quoted field. Spaces inside quotes, tabs and spaces in the
/// middle of a field are passed through.
pub struct SkipInitialSpace<R> {
    inner: R,
    field_start: bool,
    quoted: bool,
    in_quotes: bool,
}

impl<R: Read> SkipInitialSpace<R> {
    pub fn new(inner: R) -> Self {
        SkipInitialSpace {
            inner,
            field_start: true,
            quoted: false,
            in_quotes: false,
        }
    }

    /// Advances the quote state by one byte; returns `false` if the byte is dropped.
    fn keep(&mut self, b: u8) -> bool {
        if self.field_start {
            if b == SPACE {
                return false;
            }
            self.field_start = false;
            if b == QUOTE {
                self.quoted = true;
                self.in_quotes = true;
                return true;
            }
        }

        if self.in_quotes {
            if b == QUOTE {
                self.in_quotes = false;
            }
            return true;
        }

        match b {
            DELIMITER | b'\n' | b'\r' => {
                self.field_start = true;
                self.quoted = false;
            }
            // `""` inside a quoted field: the second quote reopens it.
            QUOTE if self.quoted => self.in_quotes = true,
            _ => {}
        }
        true
    }
}

impl<R: Read> Read for SkipInitialSpace<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }

            let mut kept = 0;
            for i in 0..n {
                let b = buf[i];
                if self.keep(b) {
                    buf[kept] = b;
                    kept += 1;
                }
            }
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

/// Builds the CSV reader for a KBC export.
///
/// Headers are not interpreted by the reader; the header row is handed out
/// like any other row. Rows of differing width are allowed through so the
/// parser can report them with its own error.
pub fn reader<R: Read>(input: R) -> Reader<SkipInitialSpace<R>> {
    ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(SkipInitialSpace::new(input))
}

/// Lazy sequence of rows over a CSV reader.
///
/// Consumes the underlying stream; blank lines are skipped by the reader.
pub struct RawRows<'r, R> {
    reader: &'r mut Reader<SkipInitialSpace<R>>,
    record: StringRecord,
}

impl<'r, R: Read> RawRows<'r, R> {
    pub fn new(reader: &'r mut Reader<SkipInitialSpace<R>>) -> Self {
        RawRows {
            reader,
            record: StringRecord::new(),
        }
    }
}

impl<R: Read> Iterator for RawRows<'_, R> {
    type Item = csv::Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(true) => Some(Ok(RawRow::from(&self.record))),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn split(input: &str) -> Vec<RawRow> {
        let mut rdr = reader(Cursor::new(input.to_string()));
        RawRows::new(&mut rdr).collect::<csv::Result<Vec<_>>>().unwrap()
    }

    /// Feeds the adapter one byte per `read` call.
    struct ByteByByte<'a>(&'a [u8]);

    impl Read for ByteByByte<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let data = self.0;
            match data.split_first() {
                Some((b, rest)) if !buf.is_empty() => {
                    buf[0] = *b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn test_split_on_semicolon() {
        let rows = split("a;b;c\nd;e\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RawRow::new(["a", "b", "c"]));
        assert_eq!(rows[1].len(), 2);
    }

    #[test]
    fn test_leading_spaces_are_stripped() {
        let rows = split("  a;  b ;c\n");
        assert_eq!(&rows[0][0], "a");
        assert_eq!(&rows[0][1], "b ");
        assert_eq!(&rows[0][2], "c");
    }

    #[test]
    fn test_tab_is_not_stripped() {
        let rows = split("a;\tb\n");
        assert_eq!(&rows[0][1], "\tb");
        assert_eq!(&RawRow::new(["\tx"])[0], "\tx");
    }

    #[test]
    fn test_quoted_field_keeps_delimiter() {
        let rows = split("x;\"SHOP; BRUSSEL\";y\n");
        assert_eq!(rows[0].len(), 3);
        assert_eq!(&rows[0][1], "SHOP; BRUSSEL");
    }

    #[test]
    fn test_quoted_field_after_spaces() {
        let rows = split("x;  \"A; B\"; \"X, Y MET KBC-BANKKAART\"\n");
        assert_eq!(rows[0].len(), 3);
        assert_eq!(&rows[0][1], "A; B");
        assert_eq!(&rows[0][2], "X, Y MET KBC-BANKKAART");
    }

    #[test]
    fn test_spaces_inside_quotes_are_kept() {
        let rows = split("x; \"  a ; b\n c\"; y\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "  a ; b\n c");
        assert_eq!(&rows[0][2], "y");
    }

    #[test]
    fn test_escaped_quote_inside_quoted_field() {
        let rows = split("x; \"say \"\"hi\"\"; ok\"; y\n");
        assert_eq!(rows[0].len(), 3);
        assert_eq!(&rows[0][1], "say \"hi\"; ok");
    }

    #[test]
    fn test_quote_in_middle_of_field_is_literal() {
        let rows = split("x; a\"b; c\n");
        assert_eq!(rows[0].len(), 3);
        assert_eq!(&rows[0][1], "a\"b");
        assert_eq!(&rows[0][2], "c");
    }

    #[test]
    fn test_state_survives_short_reads() {
        let input = b"x;   \"A; B\";  y\n";
        let mut out = Vec::new();
        SkipInitialSpace::new(ByteByByte(input))
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"x;\"A; B\";y\n");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let rows = split("a;b\n\n\nc;d\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].first(), Some("c"));
    }

    #[test]
    fn test_get_past_end() {
        let row = RawRow::new(["only"]);
        assert_eq!(row.get(1), None);
        assert!(!row.is_empty());
        assert!(RawRow::default().is_empty());
    }
}
