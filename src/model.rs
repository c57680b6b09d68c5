//! Data structures describing the content of one report export.
//!
//! The types in this module form the caller-facing contract of the pipeline.
//! They intentionally avoid referencing the rendering crate so report pages
//! can assemble them from backend JSON without pulling in the PDF engine.
//! Every value is created fresh for a single export call and discarded once
//! the binary is produced.

use std::fmt;

/// One KPI tile: a label plus a pre-formatted display value.
///
/// Formatting (currency symbols, thousands separators) is the caller's
/// responsibility; the pipeline renders the strings verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryItem {
    pub label: String,
    pub value: String,
    pub sub: Option<String>,
}

impl SummaryItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            sub: None,
        }
    }

    pub fn with_sub(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }
}

/// A raster chart snapshot plus its caption.
///
/// The bytes hold an encoded PNG, either captured from a live chart through a
/// [`ChartSnapshotProvider`](crate::assets::ChartSnapshotProvider) or supplied
/// pre-rendered by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartImage {
    pub title: String,
    pub png: Vec<u8>,
}

impl ChartImage {
    pub fn new(title: impl Into<String>, png: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            png: png.into(),
        }
    }
}

/// A request to snapshot a live chart by its element id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartCaptureRequest {
    pub title: String,
    pub element_id: String,
}

impl ChartCaptureRequest {
    pub fn new(title: impl Into<String>, element_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            element_id: element_id.into(),
        }
    }
}

/// One table cell value.
///
/// `Empty` stands in for `null`/missing backend values and renders as an
/// em-dash placeholder, never as an empty string.
#[derive(Clone, Debug, PartialEq)]
pub enum TableCell {
    Text(String),
    Number(f64),
    Empty,
}

/// Placeholder shown for missing cell values.
pub const MISSING_CELL: &str = "\u{2014}";

impl TableCell {
    /// The literal text the cell renders as.
    pub fn display_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(value) => value.to_string(),
            Self::Empty => MISSING_CELL.to_string(),
        }
    }
}

impl fmt::Display for TableCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl From<String> for TableCell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for TableCell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for TableCell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for TableCell {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for TableCell {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<T> From<Option<T>> for TableCell
where
    T: Into<TableCell>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// A data table with optional per-column emphasis.
///
/// Column indices in `green_cols`/`red_cols`/`bold_cols` refer to positions in
/// `columns`; when an index appears in more than one set the precedence is
/// green over red over bold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportTable {
    pub title: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<TableCell>>,
    pub green_cols: Vec<usize>,
    pub red_cols: Vec<usize>,
    pub bold_cols: Vec<usize>,
}

impl ReportTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Appends a data row.
    pub fn push_row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<TableCell>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_green_cols(mut self, cols: impl Into<Vec<usize>>) -> Self {
        self.green_cols = cols.into();
        self
    }

    pub fn with_red_cols(mut self, cols: impl Into<Vec<usize>>) -> Self {
        self.red_cols = cols.into();
        self
    }

    pub fn with_bold_cols(mut self, cols: impl Into<Vec<usize>>) -> Self {
        self.bold_cols = cols.into();
        self
    }
}

/// The fully resolved input to the document composer.
///
/// Built once per export call, after asset acquisition has settled; never
/// mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportDocumentSpec {
    pub title: String,
    pub subtitle: Option<String>,
    pub period: String,
    pub logo: Option<Vec<u8>>,
    pub summary_items: Vec<SummaryItem>,
    pub charts: Vec<ChartImage>,
    pub tables: Vec<ReportTable>,
}

/// Caller-facing export request.
///
/// The exporter resolves `chart_specs` into captured [`ChartImage`]s and the
/// logo into bytes before building the [`ReportDocumentSpec`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportOptions {
    pub title: String,
    pub subtitle: Option<String>,
    pub period: String,
    pub summary_items: Vec<SummaryItem>,
    pub tables: Vec<ReportTable>,
    pub chart_specs: Vec<ChartCaptureRequest>,
    pub filename: Option<String>,
}

impl ExportOptions {
    pub fn new(title: impl Into<String>, period: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            period: period.into(),
            ..Self::default()
        }
    }

    /// Merges resolved assets into the composer input.
    pub fn into_spec(self, logo: Option<Vec<u8>>, charts: Vec<ChartImage>) -> ReportDocumentSpec {
        ReportDocumentSpec {
            title: self.title,
            subtitle: self.subtitle,
            period: self.period,
            logo,
            summary_items: self.summary_items,
            charts,
            tables: self.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_renders_the_placeholder() {
        assert_eq!(TableCell::Empty.display_text(), "\u{2014}");
        assert_ne!(TableCell::Empty.display_text(), "");
    }

    #[test]
    fn numbers_render_their_literal_form() {
        assert_eq!(TableCell::from(-50).display_text(), "-50");
        assert_eq!(TableCell::from(1200.5).display_text(), "1200.5");
    }

    #[test]
    fn options_convert_to_cells() {
        assert_eq!(TableCell::from(None::<f64>), TableCell::Empty);
        assert_eq!(TableCell::from(Some("A")), TableCell::Text("A".to_string()));
    }

    #[test]
    fn table_builder_collects_rows() {
        let table = ReportTable::new(["Date", "Cash In"])
            .with_title("Daily Breakdown")
            .push_row(["2025-01-01", "1200"])
            .with_green_cols(vec![1]);

        assert_eq!(table.title.as_deref(), Some("Daily Breakdown"));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.green_cols, vec![1]);
    }

    #[test]
    fn options_merge_into_spec() {
        let mut options = ExportOptions::new("Cashflow Report", "2025-01");
        options
            .summary_items
            .push(SummaryItem::new("Net Cash Flow", "Rs 45,200"));
        let spec = options.into_spec(Some(vec![1, 2, 3]), Vec::new());

        assert_eq!(spec.title, "Cashflow Report");
        assert_eq!(spec.logo.as_deref(), Some(&[1u8, 2, 3][..]));
        assert_eq!(spec.summary_items.len(), 1);
        assert!(spec.charts.is_empty());
    }
}
