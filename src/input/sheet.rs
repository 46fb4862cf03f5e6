use std::collections::BTreeMap;
use std::io::BufRead;

use crate::input::InputError;

#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reads a tab-separated sheet. Lines above `header_row` (1-based) are skipped.
pub fn parse_sheet<R: BufRead>(mut reader: R, header_row: usize) -> Result<Sheet, InputError> {
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    let mut sheet = Sheet::default();
    let mut header_seen = false;

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if line_no < header_row {
            continue;
        }
        // ANSI exports are not valid UTF-8; undecodable bytes become U+FFFD
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\r', '\n']);
        let fields = line.split('\t').map(unquote).collect::<Vec<_>>();
        if !header_seen {
            sheet.header = fields;
            header_seen = true;
        } else {
            sheet.rows.push(fields);
        }
    }

    if line_no == 0 {
        return Ok(sheet);
    }
    if header_row == 0 || !header_seen {
        return Err(InputError::HeaderRowOutOfRange {
            row: header_row,
            available: line_no,
        });
    }
    Ok(sheet)
}

/// Excel quotes a cell holding `"` and doubles the quotes inside it.
fn unquote(field: &str) -> String {
    match field
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => field.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: BTreeMap<String, usize>,
}

impl ColumnMap {
    pub fn resolve(header: &[String], required: &[&str]) -> Result<Self, InputError> {
        let mut indices = BTreeMap::new();
        for (idx, title) in header.iter().enumerate() {
            let name = title.trim();
            if name.is_empty() {
                continue;
            }
            // first occurrence wins
            indices.entry(name.to_string()).or_insert(idx);
        }

        let missing = required
            .iter()
            .filter(|name| !indices.contains_key(**name))
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(InputError::MissingColumns(missing));
        }

        Ok(Self { indices })
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Cell text for `name`, or `None` when the row is shorter than the header.
    pub fn get<'a>(&self, row: &'a [String], name: &str) -> Option<&'a str> {
        let idx = self.index_of(name)?;
        row.get(idx).map(String::as_str)
    }
}
