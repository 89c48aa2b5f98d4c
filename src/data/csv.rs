use super::{TableSource, VecColumn};

/// Error returned by [`CsvParser::parse`].
/// Line numbers are 1-based, the header being line 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvParseError {
    /// A line has more fields than the header
    ColCount {
        /// Offending line
        line: usize,
    },
    /// A field does not parse as the type requested for its column
    ColType {
        /// Offending line
        line: usize,
    },
    /// A column spec names a title absent from the header
    UnknownCol {
        /// The unknown title
        title: String,
    },
    /// A column spec refers to an index beyond the header
    UnknownColIdx {
        /// The unknown index
        idx: usize,
    },
}

impl std::fmt::Display for CsvParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsvParseError::ColCount { line } => {
                write!(f, "Inconsistent column count at line {line}")
            }
            CsvParseError::ColType { line } => {
                write!(f, "Inconsistent column type at line {line}")
            }
            CsvParseError::UnknownCol { title } => {
                write!(f, "Unknown column title {title}")
            }
            CsvParseError::UnknownColIdx { idx } => {
                write!(f, "Unknown column index {idx}")
            }
        }
    }
}

impl std::error::Error for CsvParseError {}

/// CSV parsing spec for a specific column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CsvColSpec {
    /// Numeric if every non-empty field is a number, string otherwise
    #[default]
    Auto,
    /// Numeric column, every non-empty field must be a number
    F64,
    /// String column, fields are kept verbatim (trimmed)
    Str,
}

#[derive(Debug, Clone)]
enum ColId {
    Tit(String),
    Idx(usize),
}

/// Parses CSV text into a [`TableSource`].
///
/// The first line is the header. Fields are trimmed, empty fields are null.
/// Fields may be enclosed in double quotes to contain the separator,
/// a doubled quote inside a quoted field stands for one quote.
///
/// Period columns are kept as strings unless all their labels are plain numbers
/// (e.g. years), in which case the pivot renders them back as text.
#[derive(Debug, Clone)]
pub struct CsvParser {
    sep: char,
    col_specs: Vec<(ColId, CsvColSpec)>,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvParser {
    /// Create a comma separated parser with automatic column types
    pub fn new() -> Self {
        CsvParser {
            sep: ',',
            col_specs: Vec::new(),
        }
    }

    /// Set the field separator
    pub fn with_sep(mut self, sep: char) -> Self {
        self.sep = sep;
        self
    }

    /// Set the spec of the column with the given header title
    pub fn with_col_spec(mut self, title: &str, spec: CsvColSpec) -> Self {
        self.col_specs.push((ColId::Tit(title.to_string()), spec));
        self
    }

    /// Set the spec of the column at the given index
    pub fn with_col_spec_idx(mut self, idx: usize, spec: CsvColSpec) -> Self {
        self.col_specs.push((ColId::Idx(idx), spec));
        self
    }

    /// Parse the data
    pub fn parse(self, data: &str) -> Result<TableSource, CsvParseError> {
        let sep = self.sep;

        let mut lines = data.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());
        let Some((_, head_line)) = lines.next() else {
            return Ok(TableSource::new());
        };
        let header = split_fields(head_line, sep);

        let mut specs = vec![CsvColSpec::Auto; header.len()];
        for (id, spec) in self.col_specs {
            let idx = match id {
                ColId::Tit(title) => header
                    .iter()
                    .position(|h| *h == title)
                    .ok_or(CsvParseError::UnknownCol { title })?,
                ColId::Idx(idx) if idx < header.len() => idx,
                ColId::Idx(idx) => return Err(CsvParseError::UnknownColIdx { idx }),
            };
            specs[idx] = spec;
        }

        // first pass: split every line, keep the line number of each row
        let mut fields: Vec<Vec<Option<String>>> = vec![Vec::new(); header.len()];
        let mut line_nums: Vec<usize> = Vec::new();
        for (lidx, line) in lines {
            let line_num = lidx + 1;
            let row = split_fields(line, sep);
            if row.len() > header.len() {
                return Err(CsvParseError::ColCount { line: line_num });
            }
            let mut row = row.into_iter();
            for col in fields.iter_mut() {
                let field = row.next().filter(|f| !f.is_empty());
                col.push(field);
            }
            line_nums.push(line_num);
        }

        // second pass: type each column
        let mut src = TableSource::new();
        for ((head, spec), col) in header.iter().zip(specs).zip(fields) {
            let col = match spec {
                CsvColSpec::Str => VecColumn::Str(col),
                CsvColSpec::F64 => VecColumn::F64(parse_f64_column(&col, &line_nums)?),
                CsvColSpec::Auto => match parse_f64_column(&col, &line_nums) {
                    Ok(vec) if col.iter().any(Option::is_some) => VecColumn::F64(vec),
                    _ => VecColumn::Str(col),
                },
            };
            src.add_column(head, col);
        }
        Ok(src)
    }
}

fn parse_f64_column(
    col: &[Option<String>],
    line_nums: &[usize],
) -> Result<Vec<f64>, CsvParseError> {
    col.iter()
        .zip(line_nums)
        .map(|(field, &line)| match field {
            None => Ok(f64::NAN),
            Some(s) => s.parse::<f64>().map_err(|_| CsvParseError::ColType { line }),
        })
        .collect()
}

/// Split a line into trimmed fields, honoring double quotes
fn split_fields(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            }
            '"' if field.trim().is_empty() => {
                field.clear();
                quoted = true;
            }
            c if c == sep && !quoted => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            c => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}
