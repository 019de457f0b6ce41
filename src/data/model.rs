use std::collections::BTreeMap;
use std::fmt;

use super::citations::CitationParseError;

/// Placeholder written into required columns that are absent from the source.
pub const SENTINEL: &str = "N/A";

/// Columns every publication table has after loading.
pub const PUBLICATION_COLUMNS: [&str; 6] =
    ["Title", "Authors", "Year", "Publisher", "Citations", "Link"];

/// Columns every author table has after loading.
pub const AUTHOR_COLUMNS: [&str; 7] = [
    "Name",
    "Affiliation",
    "Interests",
    "Cited by",
    "H-Index",
    "i10-Index",
    "Citations Per Year",
];

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common dataframe dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.0}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// The placeholder value for absent required columns.
    pub fn sentinel() -> Self {
        CellValue::String(SENTINEL.to_string())
    }

    /// Guess the type of a raw text cell (CSV and other untyped sources).
    pub fn infer(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            // "nan", "inf" and friends are text here, not numbers.
            if f.is_finite() {
                return CellValue::Float(f);
            }
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the value as a calendar year.
    ///
    /// Spreadsheets store every number as a float, so `2019.0` is a year too.
    pub fn as_year(&self) -> Option<i32> {
        match self {
            CellValue::Integer(i) => i32::try_from(*i).ok(),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                let y = *v as i64;
                i32::try_from(y).ok()
            }
            _ => None,
        }
    }

    /// Text content, if this is a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the cell is empty or holds the placeholder.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty() || s == SENTINEL,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded frame
// ---------------------------------------------------------------------------

/// Column-named rows of cells, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Table { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at (`row`, column `name`), if both exist.
    pub fn cell(&self, row: usize, name: &str) -> Option<&CellValue> {
        let col = self.column_index(name)?;
        self.rows.get(row)?.get(col)
    }

    /// Append every absent `required` column, filled with [`SENTINEL`].
    ///
    /// Returns the names of the columns that were added.
    pub fn ensure_columns(&mut self, required: &[&str]) -> Vec<String> {
        let mut added = Vec::new();
        for &name in required {
            if self.column_index(name).is_some() {
                continue;
            }
            self.columns.push(name.to_string());
            for row in &mut self.rows {
                row.push(CellValue::sentinel());
            }
            added.push(name.to_string());
        }
        added
    }

    /// Pad short rows with nulls so every row has one cell per column.
    pub(crate) fn pad_rows(&mut self) {
        let width = self.columns.len();
        for row in &mut self.rows {
            row.resize(width, CellValue::Null);
        }
    }

    fn owned_cell(&self, row: usize, name: &str) -> CellValue {
        self.cell(row, name).cloned().unwrap_or_else(CellValue::sentinel)
    }
}

// ---------------------------------------------------------------------------
// Publications
// ---------------------------------------------------------------------------

/// One row of the publications table.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub title: CellValue,
    pub authors: CellValue,
    pub year: CellValue,
    pub publisher: CellValue,
    pub citations: CellValue,
    pub link: CellValue,
}

impl Publication {
    fn from_row(table: &Table, row: usize) -> Self {
        Publication {
            title: table.owned_cell(row, "Title"),
            authors: table.owned_cell(row, "Authors"),
            year: table.owned_cell(row, "Year"),
            publisher: table.owned_cell(row, "Publisher"),
            citations: table.owned_cell(row, "Citations"),
            link: table.owned_cell(row, "Link"),
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.year.as_year()
    }

    pub fn citations(&self) -> Option<f64> {
        self.citations.as_f64()
    }
}

/// The loaded publications: the full frame plus one typed record per row.
#[derive(Debug, Clone, Default)]
pub struct PublicationSet {
    pub table: Table,
    pub records: Vec<Publication>,
}

impl PublicationSet {
    /// Build records from a table that already carries the required columns.
    pub fn from_table(table: Table) -> Self {
        let records = (0..table.len())
            .map(|row| Publication::from_row(&table, row))
            .collect();
        PublicationSet { table, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

/// The normalized `Citations Per Year` value of one author.
#[derive(Debug, Clone, PartialEq)]
pub enum CitationHistory {
    /// Year → citation count.
    Parsed(BTreeMap<i32, u64>),
    /// Empty cell or the placeholder.
    Missing,
    /// Source text that is not a year → count mapping.
    Malformed {
        raw: String,
        error: CitationParseError,
    },
}

impl CitationHistory {
    pub fn as_mapping(&self) -> Option<&BTreeMap<i32, u64>> {
        match self {
            CitationHistory::Parsed(map) => Some(map),
            _ => None,
        }
    }
}

/// One row of the author table.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: CellValue,
    pub affiliation: CellValue,
    pub interests: CellValue,
    pub cited_by: CellValue,
    pub h_index: CellValue,
    pub i10_index: CellValue,
    pub citations_per_year: CitationHistory,
}

impl Author {
    fn from_row(table: &Table, row: usize, citations_per_year: CitationHistory) -> Self {
        Author {
            name: table.owned_cell(row, "Name"),
            affiliation: table.owned_cell(row, "Affiliation"),
            interests: table.owned_cell(row, "Interests"),
            cited_by: table.owned_cell(row, "Cited by"),
            h_index: table.owned_cell(row, "H-Index"),
            i10_index: table.owned_cell(row, "i10-Index"),
            citations_per_year,
        }
    }
}

/// The loaded authors: the full frame plus one typed record per row.
#[derive(Debug, Clone, Default)]
pub struct AuthorSet {
    pub table: Table,
    pub records: Vec<Author>,
}

impl AuthorSet {
    /// Build records, taking each author's history from `histories` (same order as rows).
    pub fn from_table(table: Table, histories: Vec<CitationHistory>) -> Self {
        let records = histories
            .into_iter()
            .enumerate()
            .map(|(row, history)| Author::from_row(&table, row, history))
            .collect();
        AuthorSet { table, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Notices – messages for the display surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Warning,
}

/// A user-visible message raised while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// A loaded dataset together with the notices raised while loading it.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome<T> {
    pub data: T,
    pub notices: Vec<Notice>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", CellValue::Null)]
    #[case("  ", CellValue::Null)]
    #[case("2019", CellValue::Integer(2019))]
    #[case("3.5", CellValue::Float(3.5))]
    #[case("true", CellValue::Bool(true))]
    #[case("nan", CellValue::String("nan".into()))]
    #[case("N/A", CellValue::String("N/A".into()))]
    #[case("{2019: 4}", CellValue::String("{2019: 4}".into()))]
    fn infers_cell_types(#[case] raw: &str, #[case] expected: CellValue) {
        assert_eq!(CellValue::infer(raw), expected);
    }

    #[test]
    fn spreadsheet_floats_are_years() {
        assert_eq!(CellValue::Float(2019.0).as_year(), Some(2019));
        assert_eq!(CellValue::Float(2019.5).as_year(), None);
        assert_eq!(CellValue::sentinel().as_year(), None);
    }

    #[rstest]
    #[case(CellValue::Float(3.14159), "3.14159")]
    #[case(CellValue::Float(0.5), "0.5")]
    #[case(CellValue::Float(2019.0), "2019")]
    #[case(CellValue::Integer(12), "12")]
    #[case(CellValue::Null, "<null>")]
    fn floats_display_without_rounding(#[case] cell: CellValue, #[case] expected: &str) {
        assert_eq!(cell.to_string(), expected);
    }

    #[test]
    fn missing_covers_null_and_sentinel() {
        assert!(CellValue::Null.is_missing());
        assert!(CellValue::sentinel().is_missing());
        assert!(!CellValue::Integer(0).is_missing());
        assert!(!CellValue::String("Oxford".into()).is_missing());
    }

    #[test]
    fn ensure_columns_fills_gaps_with_sentinel() {
        let mut table = Table::new(
            vec!["Title".into(), "Year".into()],
            vec![
                vec![CellValue::String("A".into()), CellValue::Integer(2019)],
                vec![CellValue::String("B".into()), CellValue::Integer(2020)],
            ],
        );

        let added = table.ensure_columns(&PUBLICATION_COLUMNS);

        assert_eq!(added, vec!["Authors", "Publisher", "Citations", "Link"]);
        assert_eq!(table.columns.len(), 6);
        for row in 0..table.len() {
            for col in PUBLICATION_COLUMNS {
                assert!(table.cell(row, col).is_some(), "row {row} lacks {col}");
            }
            assert_eq!(table.cell(row, "Link"), Some(&CellValue::sentinel()));
        }
        // Existing columns keep their position and values.
        assert_eq!(table.cell(1, "Year"), Some(&CellValue::Integer(2020)));
    }

    #[test]
    fn ensure_columns_on_complete_table_is_a_no_op() {
        let mut table = Table::new(
            PUBLICATION_COLUMNS.iter().map(|c| c.to_string()).collect(),
            vec![vec![CellValue::Null; 6]],
        );
        let before = table.clone();
        assert!(table.ensure_columns(&PUBLICATION_COLUMNS).is_empty());
        assert_eq!(table, before);
    }

    #[test]
    fn publication_records_follow_rows() {
        let mut table = Table::new(
            vec!["Year".into(), "Citations".into()],
            vec![vec![CellValue::Integer(2021), CellValue::Float(7.0)]],
        );
        table.ensure_columns(&PUBLICATION_COLUMNS);
        let set = PublicationSet::from_table(table);

        assert_eq!(set.len(), 1);
        let rec = &set.records[0];
        assert_eq!(rec.year(), Some(2021));
        assert_eq!(rec.citations(), Some(7.0));
        assert_eq!(rec.title, CellValue::sentinel());
    }
}
