//! Pure document composition.
//!
//! `compose` turns a resolved [`ReportDocumentSpec`] and the branding record
//! into a [`ReportDocument`] tree with a fixed structural order: header band,
//! accent stripe, title block, KPI grid, chart figures, tables, repeating
//! footer.  Empty KPI or chart inputs omit their sections entirely rather
//! than rendering placeholders.  Composition performs no I/O and cannot fail;
//! the only ambient input, the generation timestamp, is injected through
//! [`compose_at`] so layouts stay reproducible in tests.

use chrono::{DateTime, Local};

use crate::branding::BrandingConfig;
use crate::document::{
    CellEmphasis, ChartFigure, CompanyIdentity, FooterBand, HeaderBand, KpiCard, ReportDocument,
    Section, SectionHeading, StyledCell, TableGrid, TitleBlock,
};
use crate::model::{ReportDocumentSpec, ReportTable, TableCell};

const KPI_SECTION_TITLE: &str = "Key Metrics";
const CHART_SECTION_TITLE: &str = "Charts & Analytics";
const GENERATED_LABEL: &str = "Generated";
const PERIOD_LABEL: &str = "Period";
const FOOTER_NOTE: &str = "Confidential";

/// Long-form generation stamp, e.g. `January 31, 2025 4:05 PM`.
const TIMESTAMP_FORMAT: &str = "%B %-d, %Y %-I:%M %p";

/// Composes the document with the current local time as generation stamp.
pub fn compose(spec: &ReportDocumentSpec, branding: &BrandingConfig) -> ReportDocument {
    compose_at(spec, branding, Local::now())
}

/// Composes the document with an explicit generation timestamp.
pub fn compose_at(
    spec: &ReportDocumentSpec,
    branding: &BrandingConfig,
    generated_at: DateTime<Local>,
) -> ReportDocument {
    let mut sections = Vec::new();

    if !spec.summary_items.is_empty() {
        sections.push(Section::Kpis {
            heading: SectionHeading::new(KPI_SECTION_TITLE),
            cards: spec
                .summary_items
                .iter()
                .map(|item| KpiCard {
                    label: item.label.to_uppercase(),
                    value: item.value.clone(),
                    sub: item.sub.clone(),
                })
                .collect(),
        });
    }

    if !spec.charts.is_empty() {
        sections.push(Section::Charts {
            heading: SectionHeading::new(CHART_SECTION_TITLE),
            figures: spec
                .charts
                .iter()
                .map(|chart| ChartFigure {
                    caption: chart.title.clone(),
                    png: chart.png.clone(),
                })
                .collect(),
        });
    }

    for table in &spec.tables {
        sections.push(Section::Table(compose_table(table)));
    }

    ReportDocument {
        header: HeaderBand {
            logo: spec.logo.clone(),
            company: CompanyIdentity {
                name: branding.name.clone(),
                tagline: branding.tagline.clone(),
                address: branding.address(),
                contact: format!(
                    "{} \u{2022} {} \u{2022} {}",
                    branding.phone, branding.email, branding.website
                ),
            },
            generated_label: GENERATED_LABEL.to_string(),
            generated_at: generated_at.format(TIMESTAMP_FORMAT).to_string(),
        },
        title: TitleBlock {
            title: spec.title.clone(),
            subtitle: spec.subtitle.clone(),
            period_label: PERIOD_LABEL.to_string(),
            period: spec.period.clone(),
        },
        sections,
        footer: FooterBand {
            company_name: branding.name.clone(),
            website: branding.website.clone(),
            note: FOOTER_NOTE.to_string(),
        },
    }
}

fn compose_table(table: &ReportTable) -> TableGrid {
    let width = table.columns.len();

    TableGrid {
        heading: table.title.as_ref().map(SectionHeading::new),
        columns: table
            .columns
            .iter()
            .map(|caption| caption.to_uppercase())
            .collect(),
        rows: table
            .rows
            .iter()
            .map(|row| compose_row(table, row, width))
            .collect(),
    }
}

/// Resolves one row to display cells, padding or truncating to the column
/// count so a malformed backend row cannot skew the grid.
fn compose_row(table: &ReportTable, row: &[TableCell], width: usize) -> Vec<StyledCell> {
    (0..width)
        .map(|col| StyledCell {
            text: row.get(col).unwrap_or(&TableCell::Empty).display_text(),
            emphasis: emphasis_for(table, col),
        })
        .collect()
}

/// Emphasis for a column index; green wins over red, red over bold.
fn emphasis_for(table: &ReportTable, col: usize) -> CellEmphasis {
    if table.green_cols.contains(&col) {
        CellEmphasis::Green
    } else if table.red_cols.contains(&col) {
        CellEmphasis::Red
    } else if table.bold_cols.contains(&col) {
        CellEmphasis::Bold
    } else {
        CellEmphasis::Default
    }
}
