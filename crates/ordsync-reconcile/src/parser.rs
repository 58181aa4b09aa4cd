use crate::entries::{split_entries, Entries};
use crate::lenient;
use crate::types::{ParsedLine, Record};

/// Field delimiter of the fulfillment export.
pub const FIELD_DELIMITER: char = '|';

/// Lazy, restartable view over a raw `<order number>|<status>` export.
///
/// Holds only a borrow of the text; every call to [`RecordParser::iter`]
/// starts again from the first line.
#[derive(Clone, Copy, Debug)]
pub struct RecordParser<'a> {
    text: &'a str,
}

impl<'a> RecordParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn iter(&self) -> ParsedLines<'a> {
        ParsedLines {
            entries: split_entries(self.text),
        }
    }

    /// Number of lines the iterator will yield (empty lines excluded).
    pub fn line_count(&self) -> usize {
        self.iter().count()
    }
}

impl<'a> IntoIterator for RecordParser<'a> {
    type Item = ParsedLine;
    type IntoIter = ParsedLines<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`RecordParser::iter`].
#[derive(Clone, Debug)]
pub struct ParsedLines<'a> {
    entries: Entries<'a>,
}

impl Iterator for ParsedLines<'_> {
    type Item = ParsedLine;

    fn next(&mut self) -> Option<ParsedLine> {
        let line = self.entries.by_ref().find(|l| !l.is_empty())?;
        Some(parse_line(line))
    }
}

/// Decode one trimmed, non-empty line.
///
/// Malformed when the line does not have exactly two fields, or when the
/// order number coerces to 0 (no storefront order carries number 0). The
/// status field is not checked here; an unusable status surfaces later as an
/// unmapped status.
pub fn parse_line(line: &str) -> ParsedLine {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() != 2 {
        return ParsedLine::Malformed {
            raw: line.to_string(),
        };
    }

    let order_number = lenient::parse_i64(fields[0]);
    if order_number == 0 {
        return ParsedLine::Malformed {
            raw: line.to_string(),
        };
    }

    ParsedLine::Record(Record::new(order_number, lenient::parse_i64(fields[1])))
}
