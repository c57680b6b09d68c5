//! The composed document tree handed to the renderer.
//!
//! [`ReportDocument`] is the output of [`crate::compose`]: a fully resolved
//! layout description with fixed section ordering, uppercase transforms
//! applied, missing cells replaced by their placeholder and per-cell emphasis
//! already decided.  It references no rendering types, so layout decisions
//! can be asserted on directly in tests and the PDF engine stays swappable.

/// Company identity block shown in the header band.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompanyIdentity {
    pub name: String,
    pub tagline: String,
    pub address: String,
    pub contact: String,
}

/// Header band: optional logo plus identity on the left, generation stamp on
/// the right.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderBand {
    pub logo: Option<Vec<u8>>,
    pub company: CompanyIdentity,
    pub generated_label: String,
    pub generated_at: String,
}

/// Title, optional subtitle and the period badge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TitleBlock {
    pub title: String,
    pub subtitle: Option<String>,
    pub period_label: String,
    pub period: String,
}

/// Labeled divider introducing a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionHeading {
    pub text: String,
}

impl SectionHeading {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// One KPI card; the label is already uppercased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KpiCard {
    pub label: String,
    pub value: String,
    pub sub: Option<String>,
}

/// A captioned chart image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChartFigure {
    pub caption: String,
    pub png: Vec<u8>,
}

/// Emphasis resolved for a single cell.
///
/// Precedence when a column index appears in several sets: green over red
/// over bold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellEmphasis {
    #[default]
    Default,
    Green,
    Red,
    Bold,
}

/// A cell with its final display text and emphasis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledCell {
    pub text: String,
    pub emphasis: CellEmphasis,
}

/// A composed table: uppercase column captions plus emphasis-resolved rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableGrid {
    pub heading: Option<SectionHeading>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<StyledCell>>,
}

/// Document sections in their fixed order of appearance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Section {
    Kpis {
        heading: SectionHeading,
        cards: Vec<KpiCard>,
    },
    Charts {
        heading: SectionHeading,
        figures: Vec<ChartFigure>,
    },
    Table(TableGrid),
}

impl Section {
    /// Title shown for the section, used for outlines and headings.
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Kpis { heading, .. } | Self::Charts { heading, .. } => Some(&heading.text),
            Self::Table(grid) => grid.heading.as_ref().map(|heading| heading.text.as_str()),
        }
    }
}

/// Fixed footer content repeated on every page; the page numbers themselves
/// come from the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FooterBand {
    pub company_name: String,
    pub website: String,
    pub note: String,
}

/// The fully composed report document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportDocument {
    pub header: HeaderBand,
    pub title: TitleBlock,
    pub sections: Vec<Section>,
    pub footer: FooterBand,
}
