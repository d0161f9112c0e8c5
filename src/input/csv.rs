//! Minimal RFC 4180 reader/writer: quoted fields may hold commas, doubled
//! quotes and line breaks. Review bodies need all three.

use std::collections::HashMap;
use std::io::Write;
use std::iter::Peekable;
use std::str::Chars;

use crate::input::DatasetError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    /// 1-based line on which the record starts.
    pub line: usize,
    pub fields: Vec<String>,
}

impl CsvRecord {
    pub fn is_blank(&self) -> bool {
        self.fields.len() == 1 && self.fields[0].trim().is_empty()
    }
}

pub struct CsvRecords<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

pub fn records(content: &str) -> CsvRecords<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    CsvRecords {
        chars: content.chars().peekable(),
        line: 1,
    }
}

impl Iterator for CsvRecords<'_> {
    type Item = Result<CsvRecord, DatasetError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chars.peek()?;

        let start_line = self.line;
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut quoted = false;

        loop {
            match self.chars.next() {
                None => {
                    if in_quotes {
                        return Some(Err(DatasetError::Parse {
                            line: start_line,
                            msg: "unterminated quoted field".to_string(),
                        }));
                    }
                    fields.push(field);
                    break;
                }
                Some('"') if in_quotes => {
                    if self.chars.peek() == Some(&'"') {
                        self.chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                Some('"') if field.is_empty() && !quoted => {
                    in_quotes = true;
                    quoted = true;
                }
                Some(c) if in_quotes => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    field.push(c);
                }
                Some(',') => {
                    fields.push(std::mem::take(&mut field));
                    quoted = false;
                }
                Some('\r') if self.chars.peek() == Some(&'\n') => {}
                Some('\n') => {
                    self.line += 1;
                    fields.push(field);
                    break;
                }
                Some(c) => field.push(c),
            }
        }

        Some(Ok(CsvRecord {
            line: start_line,
            fields,
        }))
    }
}

/// Column name → position, built from a header record.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
    width: usize,
}

impl HeaderIndex {
    pub fn new(header: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            // First occurrence wins on duplicate names.
            positions.entry(name.trim().to_string()).or_insert(idx);
        }
        Self {
            positions,
            width: header.len(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Resolves every column, trying each alias in turn. Fails listing all
    /// columns that could not be found.
    pub fn resolve(&self, columns: &[ColumnSpec]) -> Result<Vec<usize>, DatasetError> {
        let mut positions = Vec::with_capacity(columns.len());
        let mut missing = Vec::new();
        for spec in columns {
            let found = self
                .position(&spec.name)
                .or_else(|| spec.alias.as_deref().and_then(|a| self.position(a)));
            match found {
                Some(idx) => positions.push(idx),
                None => missing.push(spec.name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(DatasetError::Schema(missing));
        }
        Ok(positions)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub alias: Option<String>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(name: impl Into<String>, alias: Option<String>) -> Self {
        Self {
            name: name.into(),
            alias,
        }
    }
}

pub fn write_record<W: Write>(w: &mut W, fields: &[&str]) -> std::io::Result<()> {
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(field) {
            w.write_all(b"\"")?;
            w.write_all(field.replace('"', "\"\"").as_bytes())?;
            w.write_all(b"\"")?;
        } else {
            w.write_all(field.as_bytes())?;
        }
    }
    w.write_all(b"\n")
}

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"', '\n', '\r'])
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/csv.rs"]
mod tests;
