use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

//==============================================================================
// Supported Formats
//==============================================================================

/// File formats the tool can read and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedFormat {
    /// Comma-delimited text with a header row
    Csv,
    /// Office Open XML workbook (first worksheet only)
    Xlsx,
}

impl SupportedFormat {
    /// Detect format from the path's extension (case-insensitive, no content sniffing)
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.to_string_lossy().to_lowercase();
        if name.ends_with(".csv") {
            Some(SupportedFormat::Csv)
        } else if name.ends_with(".xlsx") {
            Some(SupportedFormat::Xlsx)
        } else {
            None
        }
    }

    /// Extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            SupportedFormat::Csv => "csv",
            SupportedFormat::Xlsx => "xlsx",
        }
    }

    /// Human label used in notices ("File saved as Excel!")
    pub fn label(&self) -> &'static str {
        match self {
            SupportedFormat::Csv => "CSV",
            SupportedFormat::Xlsx => "Excel",
        }
    }
}

impl fmt::Display for SupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for SupportedFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(SupportedFormat::Csv),
            "xlsx" | "excel" => Ok(SupportedFormat::Xlsx),
            other => Err(format!("unknown format '{}' (expected csv or xlsx)", other)),
        }
    }
}

//==============================================================================
// Cells and Columns
//==============================================================================

/// A single cell, detached from its column
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) => f.write_str(&format_number(*n)),
            Cell::Text(s) => f.write_str(s),
            Cell::Boolean(true) => f.write_str("True"),
            Cell::Boolean(false) => f.write_str("False"),
            Cell::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

/// Column value types (homogeneous, with empty cells as `None`)
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Number(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
    DateTime(Vec<Option<NaiveDateTime>>),
}

impl ColumnValue {
    /// Get the length of the array
    pub fn len(&self) -> usize {
        match self {
            ColumnValue::Number(v) => v.len(),
            ColumnValue::Text(v) => v.len(),
            ColumnValue::Boolean(v) => v.len(),
            ColumnValue::DateTime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Number(_) => "Number",
            ColumnValue::Text(_) => "Text",
            ColumnValue::Boolean(_) => "Boolean",
            ColumnValue::DateTime(_) => "DateTime",
        }
    }

    /// Cell at `index`, or `Cell::Empty` past the end
    pub fn get(&self, index: usize) -> Cell {
        match self {
            ColumnValue::Number(v) => v
                .get(index)
                .copied()
                .flatten()
                .map_or(Cell::Empty, Cell::Number),
            ColumnValue::Text(v) => v
                .get(index)
                .cloned()
                .flatten()
                .map_or(Cell::Empty, Cell::Text),
            ColumnValue::Boolean(v) => v
                .get(index)
                .copied()
                .flatten()
                .map_or(Cell::Empty, Cell::Boolean),
            ColumnValue::DateTime(v) => v
                .get(index)
                .copied()
                .flatten()
                .map_or(Cell::Empty, Cell::DateTime),
        }
    }

    /// Pad with empty cells up to `len`
    fn pad_to(&mut self, len: usize) {
        match self {
            ColumnValue::Number(v) => v.resize(len, None),
            ColumnValue::Text(v) => v.resize(len, None),
            ColumnValue::Boolean(v) => v.resize(len, None),
            ColumnValue::DateTime(v) => v.resize(len, None),
        }
    }
}

/// A named column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: ColumnValue,
}

impl Column {
    pub fn new(name: impl Into<String>, values: ColumnValue) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Infer a column from raw text fields (CSV).
    ///
    /// Number if every non-empty field is a decimal literal, Boolean if every
    /// non-empty field is a boolean literal, otherwise Text with fields kept verbatim.
    pub fn infer_from_text(name: impl Into<String>, fields: Vec<Option<String>>) -> Self {
        let present = || fields.iter().flatten();
        let any_present = present().next().is_some();

        let values = if any_present && present().all(|f| parse_number(f).is_some()) {
            ColumnValue::Number(
                fields
                    .iter()
                    .map(|f| f.as_deref().and_then(parse_number))
                    .collect(),
            )
        } else if any_present && present().all(|f| parse_bool(f).is_some()) {
            ColumnValue::Boolean(
                fields
                    .iter()
                    .map(|f| f.as_deref().and_then(parse_bool))
                    .collect(),
            )
        } else {
            ColumnValue::Text(fields)
        };

        Self::new(name, values)
    }

    /// Infer a column from already-typed cells (XLSX).
    ///
    /// A column keeps a native type only when all non-empty cells share it;
    /// mixed columns fall back to Text.
    pub fn infer_from_cells(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let all = |pred: fn(&Cell) -> bool| {
            let mut present = cells.iter().filter(|c| !c.is_empty()).peekable();
            present.peek().is_some() && present.all(pred)
        };
        let (numbers, booleans, datetimes) = (
            all(|c| matches!(c, Cell::Number(_))),
            all(|c| matches!(c, Cell::Boolean(_))),
            all(|c| matches!(c, Cell::DateTime(_))),
        );

        let values = if numbers {
            ColumnValue::Number(
                cells
                    .iter()
                    .map(|c| match c {
                        Cell::Number(n) => Some(*n),
                        _ => None,
                    })
                    .collect(),
            )
        } else if booleans {
            ColumnValue::Boolean(
                cells
                    .iter()
                    .map(|c| match c {
                        Cell::Boolean(b) => Some(*b),
                        _ => None,
                    })
                    .collect(),
            )
        } else if datetimes {
            ColumnValue::DateTime(
                cells
                    .iter()
                    .map(|c| match c {
                        Cell::DateTime(dt) => Some(*dt),
                        _ => None,
                    })
                    .collect(),
            )
        } else {
            ColumnValue::Text(
                cells
                    .into_iter()
                    .map(|c| match c {
                        Cell::Empty => None,
                        Cell::Text(s) => Some(s),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            )
        };

        Self::new(name, values)
    }
}

//==============================================================================
// Document
//==============================================================================

/// An in-memory table: ordered named columns of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    columns: Vec<Column>,
    origin: Option<PathBuf>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from columns, padding short columns with empty cells
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let rows = columns.iter().map(Column::len).max().unwrap_or(0);
        for column in &mut columns {
            column.values.pad_to(rows);
        }
        Self {
            columns,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// File this document was loaded from, if any
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get the number of rows (all columns share it)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.columns
            .get(col)
            .map_or(Cell::Empty, |c| c.values.get(row))
    }

    /// One row as (column name, cell) pairs in column order
    pub fn record(&self, row: usize) -> Option<Vec<(&str, Cell)>> {
        if row >= self.row_count() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.as_str(), c.values.get(row)))
                .collect(),
        )
    }

    /// Shape report for display and `--json`
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            origin: self.origin.as_ref().map(|p| p.display().to_string()),
            rows: self.row_count(),
            columns: self
                .columns
                .iter()
                .map(|c| ColumnSummary {
                    name: c.name.clone(),
                    kind: c.values.type_name(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

//==============================================================================
// Header Names
//==============================================================================

/// Make header names unique and non-blank: blanks become `Unnamed: {i}`,
/// repeats become `name.1`, `name.2`, ...
pub fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut n = 1;
        while out.contains(&candidate) {
            candidate = format!("{}.{}", base, n);
            n += 1;
        }
        out.push(candidate);
    }
    out
}

//==============================================================================
// Literal Parsing and Formatting
//==============================================================================

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Largest integer magnitude that survives a trip through f64
const MAX_EXACT_INT: u64 = 1 << 53;

/// Parse a decimal literal: optional sign, digits, optional fraction, optional exponent.
/// Rejects `inf`, `NaN`, hex and integers too large for exact f64.
pub fn parse_number(field: &str) -> Option<f64> {
    let s = field.trim();
    let body = s.strip_prefix(['+', '-']).unwrap_or(s);
    if body.is_empty() || !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    if body.chars().all(|c| c.is_ascii_digit()) {
        let n: i64 = s.parse().ok()?;
        return (n.unsigned_abs() <= MAX_EXACT_INT).then_some(n as f64);
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn parse_bool(field: &str) -> Option<bool> {
    match field.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Whole numbers print without a fractional part (`1`, not `1.0`)
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn excel_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// First serial after Excel's phantom 1900-02-29
const FIRST_SERIAL_AFTER_LEAP_BUG: f64 = 61.0;

/// Excel serial day number (1900 date system) to a timestamp, rounded to the millisecond.
///
/// Serials below 60 are shifted a day forward so 1 is 1900-01-01; serial 60, the
/// non-existent 1900-02-29, reads as 1900-02-28.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let serial = if serial < 60.0 { serial + 1.0 } else { serial };
    let millis = (serial * 86_400_000.0).round() as i64;
    excel_epoch()?.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

/// Inverse of [`from_excel_serial`]; dates before 1900-03-01 skip the phantom leap day
pub fn to_excel_serial(dt: &NaiveDateTime) -> f64 {
    excel_epoch().map_or(0.0, |epoch| {
        let serial = (*dt - epoch).num_milliseconds() as f64 / 86_400_000.0;
        if serial < FIRST_SERIAL_AFTER_LEAP_BUG {
            serial - 1.0
        } else {
            serial
        }
    })
}

pub fn is_midnight(dt: &NaiveDateTime) -> bool {
    dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(raw: &[&str]) -> Vec<Option<String>> {
        raw.iter()
            .map(|s| (!s.is_empty()).then(|| s.to_string()))
            .collect()
    }

    #[test]
    fn test_format_from_path_is_case_insensitive() {
        assert_eq!(
            SupportedFormat::from_path(Path::new("Data.CSV")),
            Some(SupportedFormat::Csv)
        );
        assert_eq!(
            SupportedFormat::from_path(Path::new("/tmp/report.XlSx")),
            Some(SupportedFormat::Xlsx)
        );
        assert_eq!(SupportedFormat::from_path(Path::new("data.xls")), None);
        assert_eq!(SupportedFormat::from_path(Path::new("data.csv.bak")), None);
        assert_eq!(SupportedFormat::from_path(Path::new("csv")), None);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("CSV".parse::<SupportedFormat>(), Ok(SupportedFormat::Csv));
        assert_eq!(".xlsx".parse::<SupportedFormat>(), Ok(SupportedFormat::Xlsx));
        assert_eq!("excel".parse::<SupportedFormat>(), Ok(SupportedFormat::Xlsx));
        assert!("ods".parse::<SupportedFormat>().is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1"), Some(1.0));
        assert_eq!(parse_number("-2.5"), Some(-2.5));
        assert_eq!(parse_number("+.5"), Some(0.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("0x10"), None);
        assert_eq!(parse_number("12 apples"), None);
        assert_eq!(parse_number("12345678901234567890"), None);
        assert_eq!(parse_number("-9223372036854775808"), None);
        assert_eq!(parse_number("9007199254740992"), Some(9007199254740992.0));
        assert_eq!(parse_number("-9007199254740993"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    #[test]
    fn test_infer_number_column_with_blanks() {
        let col = Column::infer_from_text("A", fields(&["1", "", "2.5"]));
        assert_eq!(
            col.values,
            ColumnValue::Number(vec![Some(1.0), None, Some(2.5)])
        );
    }

    #[test]
    fn test_infer_mixed_column_keeps_text_verbatim() {
        let col = Column::infer_from_text("A", fields(&["1.50", "n/a"]));
        assert_eq!(
            col.values,
            ColumnValue::Text(vec![Some("1.50".into()), Some("n/a".into())])
        );
    }

    #[test]
    fn test_infer_boolean_column() {
        let col = Column::infer_from_text("flag", fields(&["True", "false", ""]));
        assert_eq!(
            col.values,
            ColumnValue::Boolean(vec![Some(true), Some(false), None])
        );
    }

    #[test]
    fn test_infer_all_empty_is_text() {
        let col = Column::infer_from_text("A", fields(&["", ""]));
        assert_eq!(col.values, ColumnValue::Text(vec![None, None]));
    }

    #[test]
    fn test_infer_from_mixed_cells_renders_text() {
        let col = Column::infer_from_cells(
            "A",
            vec![Cell::Number(3.0), Cell::Text("x".into()), Cell::Empty],
        );
        assert_eq!(
            col.values,
            ColumnValue::Text(vec![Some("3".into()), Some("x".into()), None])
        );
    }

    #[test]
    fn test_dedupe_headers() {
        let names = dedupe_headers(vec![
            "A".into(),
            "A".into(),
            "".into(),
            "A".into(),
        ]);
        assert_eq!(names, vec!["A", "A.1", "Unnamed: 2", "A.2"]);
    }

    #[test]
    fn test_document_pads_short_columns() {
        let doc = Document::from_columns(vec![
            Column::new("A", ColumnValue::Number(vec![Some(1.0), Some(2.0)])),
            Column::new("B", ColumnValue::Text(vec![Some("x".into())])),
        ]);
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.cell(1, 1), Cell::Empty);
        assert_eq!(
            doc.record(0),
            Some(vec![("A", Cell::Number(1.0)), ("B", Cell::Text("x".into()))])
        );
        assert_eq!(doc.record(2), None);
    }

    #[test]
    fn test_excel_serial_roundtrip() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let serial = to_excel_serial(&dt);
        assert!((serial - 45366.520833).abs() < 1e-5);
        assert_eq!(from_excel_serial(serial), Some(dt));
        assert!(!is_midnight(&dt));
    }

    #[test]
    fn test_excel_serial_before_march_1900() {
        let day = |m, d| {
            NaiveDate::from_ymd_opt(1900, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        assert_eq!(from_excel_serial(1.0), Some(day(1, 1)));
        assert_eq!(from_excel_serial(59.0), Some(day(2, 28)));
        assert_eq!(from_excel_serial(61.0), Some(day(3, 1)));
        assert_eq!(to_excel_serial(&day(1, 1)), 1.0);
        assert_eq!(to_excel_serial(&day(2, 28)), 59.0);
        assert_eq!(to_excel_serial(&day(3, 1)), 61.0);
        assert_eq!(from_excel_serial(to_excel_serial(&day(2, 14))), Some(day(2, 14)));
    }
}
