//! Rendering adapter: composed document tree to A4 PDF bytes via `genpdf`.
//!
//! The adapter owns everything engine-specific: mapping theme attributes onto
//! `genpdf` styles, laying sections out with table/linear layouts, reserving
//! the repeating footer through a page decorator, and pagination.  The page
//! total is unknown until the document has paginated, so rendering runs
//! twice: the first pass counts pages, the second prints "Page X of Y"
//! against the real total.  The footer occupies a fixed reserved height in
//! both passes, which keeps the pagination identical between them.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use genpdf::elements::{Break, LinearLayout, Paragraph, TableLayout};
use genpdf::error::{Error, ErrorKind};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{Alignment, Element, Margins, Mm, PageDecorator, PaperSize, Position};

use crate::branding::Rgb;
use crate::document::{CellEmphasis, ReportDocument, Section, SectionHeading, TableGrid};
use crate::elements::{mm_from_f64, sized_image, AccentCard, BandedTable, CaptionedFigure, Rule};
use crate::error::ExportError;
use crate::theme::{StyleSheet, TextStyle, PAPER};

const A4_WIDTH_MM: f64 = 210.0;

/// A rendered document plus the pagination facts the renderer learned.
#[derive(Clone, Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    /// Total number of rendered pages; matches the footer's "of Y".
    pub pages: usize,
    /// 1-indexed start page per section, in section order.
    pub section_pages: Vec<Option<usize>>,
}

/// Renders the composed document to PDF bytes.
pub fn render_pdf(document: &ReportDocument, theme: &StyleSheet) -> Result<RenderedPdf, ExportError> {
    let probe = render_once(document, theme, None)?;
    let rendered = render_once(document, theme, Some(probe.pages))?;
    debug_assert_eq!(rendered.pages, probe.pages);
    Ok(rendered)
}

/// Renders the document and injects a PDF outline entry per titled section.
#[cfg(feature = "bookmarks")]
pub fn render_pdf_with_outline(
    document: &ReportDocument,
    theme: &StyleSheet,
) -> Result<RenderedPdf, ExportError> {
    let rendered = render_pdf(document, theme)?;
    let entries: Vec<(String, usize)> = document
        .sections
        .iter()
        .zip(&rendered.section_pages)
        .filter_map(|(section, page)| Some((section.title()?.to_string(), (*page)?)))
        .collect();
    let bytes = crate::bookmarks::apply_section_outline(&rendered.bytes, &entries)?;
    Ok(RenderedPdf { bytes, ..rendered })
}

fn render_once(
    document: &ReportDocument,
    theme: &StyleSheet,
    page_total: Option<usize>,
) -> Result<RenderedPdf, ExportError> {
    let pages_seen = Rc::new(Cell::new(0));
    let section_pages = Rc::new(RefCell::new(vec![None; document.sections.len()]));

    let doc = build_document(
        document,
        theme,
        page_total,
        Rc::clone(&pages_seen),
        Rc::clone(&section_pages),
    )?;

    let mut bytes = Vec::new();
    doc.render(&mut bytes)?;

    let section_pages = section_pages.borrow().clone();
    Ok(RenderedPdf {
        bytes,
        pages: pages_seen.get(),
        section_pages,
    })
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn text_style(text: TextStyle) -> Style {
    let mut style = Style::new();
    style.set_font_size(text.size);
    style.set_color(pdf_color(text.color));
    if text.bold {
        style.set_bold();
    }
    if text.italic {
        style.set_italic();
    }
    style
}

fn styled_line(text: &str, style: TextStyle) -> Paragraph {
    Paragraph::new(StyledString::new(text.to_string(), text_style(style)))
}

fn right_aligned(text: &str, style: TextStyle) -> Paragraph {
    let mut paragraph = styled_line(text, style);
    paragraph.set_alignment(Alignment::Right);
    paragraph
}

fn content_width_mm(theme: &StyleSheet) -> f64 {
    let [_, right, _, left] = theme.page.margins_mm;
    A4_WIDTH_MM - left - right
}

fn build_document(
    document: &ReportDocument,
    theme: &StyleSheet,
    page_total: Option<usize>,
    pages_seen: Rc<Cell<usize>>,
    section_pages: Rc<RefCell<Vec<Option<usize>>>>,
) -> Result<genpdf::Document, Error> {
    let font_family = crate::fonts::report_font_family()?;
    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(document.title.title.clone());
    doc.set_paper_size(PaperSize::A4);

    let [top, right, bottom, left] = theme.page.margins_mm;
    let decorator = ReportPageDecorator::new(
        Margins::trbl(
            mm_from_f64(top),
            mm_from_f64(right),
            mm_from_f64(bottom),
            mm_from_f64(left),
        ),
        FooterSpec::new(
            mm_from_f64(theme.page.footer_height_mm),
            footer_factory(document, theme, page_total),
        ),
        Rc::clone(&pages_seen),
    );
    doc.set_page_decorator(decorator);

    push_header_band(&mut doc, document, theme)?;
    push_title_block(&mut doc, document, theme)?;

    for (index, section) in document.sections.iter().enumerate() {
        doc.push(SectionMarker {
            index,
            pages_seen: Rc::clone(&pages_seen),
            section_pages: Rc::clone(&section_pages),
        });
        match section {
            Section::Kpis { heading, cards } => {
                push_heading(&mut doc, heading, theme);
                push_kpi_grid(&mut doc, cards, theme)?;
            }
            Section::Charts { heading, figures } => {
                push_heading(&mut doc, heading, theme);
                push_chart_figures(&mut doc, figures, theme)?;
            }
            Section::Table(grid) => {
                if let Some(heading) = &grid.heading {
                    push_heading(&mut doc, heading, theme);
                }
                push_table(&mut doc, grid, theme);
            }
        }
    }

    Ok(doc)
}

fn push_header_band(
    doc: &mut genpdf::Document,
    document: &ReportDocument,
    theme: &StyleSheet,
) -> Result<(), Error> {
    let band = &theme.header_band;
    let company = &document.header.company;

    let mut identity = LinearLayout::vertical();
    identity.push(styled_line(&company.name, band.company_name));
    identity.push(styled_line(&company.tagline, band.tagline));
    identity.push(styled_line(&company.address, band.detail));
    identity.push(styled_line(&company.contact, band.detail));

    let mut generated = LinearLayout::vertical();
    generated.push(right_aligned(&document.header.generated_label, band.generated_label));
    generated.push(right_aligned(&document.header.generated_at, band.timestamp));

    let header = match &document.header.logo {
        Some(bytes) => {
            let logo = sized_image(bytes, mm_from_f64(band.logo_width_mm))?;
            let mut table = TableLayout::new(vec![2, 5, 3]);
            let mut row = table.row();
            row.push_element(logo);
            row.push_element(identity);
            row.push_element(generated);
            row.push()?;
            table
        }
        None => {
            let mut table = TableLayout::new(vec![7, 3]);
            let mut row = table.row();
            row.push_element(identity);
            row.push_element(generated);
            row.push()?;
            table
        }
    };
    doc.push(header);

    doc.push(Break::new(band.spacing_after_mm / 4.0));
    let stripe = &theme.accent_stripe;
    doc.push(
        Rule::new(pdf_color(stripe.color), mm_from_f64(stripe.thickness_mm))
            .with_margin_bottom(mm_from_f64(stripe.spacing_after_mm)),
    );
    Ok(())
}

fn push_title_block(
    doc: &mut genpdf::Document,
    document: &ReportDocument,
    theme: &StyleSheet,
) -> Result<(), Error> {
    let block = &theme.title_block;

    let mut headline = LinearLayout::vertical();
    headline.push(styled_line(&document.title.title, block.title));
    if let Some(subtitle) = &document.title.subtitle {
        headline.push(styled_line(subtitle, block.subtitle));
    }

    let mut badge = LinearLayout::vertical();
    badge.push(right_aligned(&document.title.period_label, block.period_label));
    badge.push(right_aligned(&document.title.period, block.period_value));

    let mut table = TableLayout::new(vec![3, 1]);
    let mut row = table.row();
    row.push_element(headline);
    row.push_element(badge);
    row.push()?;
    doc.push(table);
    doc.push(Break::new(block.spacing_after_mm / 4.0));
    Ok(())
}

fn push_heading(doc: &mut genpdf::Document, heading: &SectionHeading, theme: &StyleSheet) {
    let style = &theme.section_heading;
    doc.push(styled_line(&heading.text, style.text));
    doc.push(
        Rule::new(pdf_color(style.bar_color), mm_from_f64(style.bar_thickness_mm))
            .with_margin_bottom(mm_from_f64(style.spacing_after_mm)),
    );
}

fn push_kpi_grid(
    doc: &mut genpdf::Document,
    cards: &[crate::document::KpiCard],
    theme: &StyleSheet,
) -> Result<(), Error> {
    let style = &theme.kpi_card;
    let columns = style.columns.max(1);

    for chunk in cards.chunks(columns) {
        let mut grid = TableLayout::new(vec![1; columns]);
        let mut row = grid.row();
        for card in chunk {
            let mut tile = LinearLayout::vertical();
            tile.push(styled_line(&card.label, style.label));
            tile.push(styled_line(&card.value, style.value));
            if let Some(sub) = &card.sub {
                tile.push(styled_line(sub, style.sub));
            }
            let pad = mm_from_f64(style.padding_mm);
            row.push_element(AccentCard::new(
                tile.padded(Margins::trbl(pad, pad, pad, pad)),
                pdf_color(style.accent),
                mm_from_f64(style.accent_width_mm),
                pad,
            ));
        }
        for _ in chunk.len()..columns {
            row.push_element(Paragraph::default());
        }
        row.push()?;
        doc.push(grid);
        doc.push(Break::new(0.4));
    }

    doc.push(Break::new(style.spacing_after_mm / 4.0));
    Ok(())
}

fn push_chart_figures(
    doc: &mut genpdf::Document,
    figures: &[crate::document::ChartFigure],
    theme: &StyleSheet,
) -> Result<(), Error> {
    let style = &theme.chart_figure;
    // Slight inset below the full content width so float rounding in the
    // image scale can never push the figure past the area edge.
    let width = content_width_mm(theme) - 3.0;

    for figure in figures {
        let caption = styled_line(&figure.caption, style.caption);
        let element = CaptionedFigure::from_bytes(&figure.png, caption)?
            .with_width(mm_from_f64(width));
        doc.push(element);
        doc.push(Break::new(style.spacing_after_mm / 4.0));
    }
    Ok(())
}

fn push_table(doc: &mut genpdf::Document, grid: &TableGrid, theme: &StyleSheet) {
    let style = &theme.table;
    let mut table = BandedTable::new(mm_from_f64(style.cell_padding_mm));

    table.push_row(
        grid.columns
            .iter()
            .map(|caption| StyledString::new(caption.clone(), text_style(style.header)))
            .collect(),
        Some(pdf_color(style.header_background)),
    );

    for (index, row) in grid.rows.iter().enumerate() {
        let shade = if index % 2 == 0 { style.row_even } else { style.row_odd };
        let band = (shade != PAPER).then(|| pdf_color(shade));
        table.push_row(
            row.iter()
                .map(|cell| {
                    let text = match cell.emphasis {
                        CellEmphasis::Default => style.cell,
                        CellEmphasis::Green => style.cell_green,
                        CellEmphasis::Red => style.cell_red,
                        CellEmphasis::Bold => style.cell_bold,
                    };
                    StyledString::new(cell.text.clone(), text_style(text))
                })
                .collect(),
            band,
        );
    }

    doc.push(table);
    doc.push(Break::new(style.spacing_after_mm / 4.0));
}

fn footer_factory(
    document: &ReportDocument,
    theme: &StyleSheet,
    page_total: Option<usize>,
) -> impl Fn(usize) -> Result<Box<dyn Element>, Error> + 'static {
    let footer = document.footer.clone();
    let style = theme.footer;

    move |page| {
        let mut layout = LinearLayout::vertical();
        layout.push(
            Rule::new(pdf_color(style.rule_color), mm_from_f64(0.3))
                .with_margin_bottom(mm_from_f64(1.4)),
        );

        let mut company = Paragraph::default();
        company.push(StyledString::new(footer.company_name.clone(), text_style(style.company)));
        company.push(StyledString::new(
            format!(" \u{2022} {} \u{2022} {}", footer.website, footer.note),
            text_style(style.detail),
        ));

        let numbering = match page_total {
            Some(total) => format!("Page {page} of {total}"),
            None => format!("Page {page}"),
        };

        let mut table = TableLayout::new(vec![3, 1]);
        let mut row = table.row();
        row.push_element(company);
        row.push_element(right_aligned(&numbering, style.page_number));
        row.push()?;
        layout.push(table);

        Ok(Box::new(layout) as Box<dyn Element>)
    }
}

/// Records the page a section starts on; renders nothing.
struct SectionMarker {
    index: usize,
    pages_seen: Rc<Cell<usize>>,
    section_pages: Rc<RefCell<Vec<Option<usize>>>>,
}

impl Element for SectionMarker {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        _area: genpdf::render::Area<'_>,
        _style: Style,
    ) -> Result<genpdf::RenderResult, Error> {
        let mut pages = self.section_pages.borrow_mut();
        if let Some(slot) = pages.get_mut(self.index) {
            if slot.is_none() {
                *slot = Some(self.pages_seen.get());
            }
        }
        Ok(genpdf::RenderResult::default())
    }
}

type FooterFactory = dyn Fn(usize) -> Result<Box<dyn Element>, Error>;

/// Definition of the repeating footer rendered through the page decorator.
struct FooterSpec {
    height: Mm,
    factory: Box<FooterFactory>,
}

impl FooterSpec {
    fn new<F>(height: Mm, factory: F) -> Self
    where
        F: Fn(usize) -> Result<Box<dyn Element>, Error> + 'static,
    {
        Self {
            height,
            factory: Box::new(factory),
        }
    }
}

/// Page decorator applying margins, counting pages and reserving the footer
/// band at the bottom of every page.
struct ReportPageDecorator {
    page: usize,
    margins: Margins,
    footer: FooterSpec,
    pages_seen: Rc<Cell<usize>>,
}

impl ReportPageDecorator {
    fn new(margins: Margins, footer: FooterSpec, pages_seen: Rc<Cell<usize>>) -> Self {
        Self {
            page: 0,
            margins,
            footer,
            pages_seen,
        }
    }
}

impl PageDecorator for ReportPageDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        self.page += 1;
        self.pages_seen.set(self.page);

        area.add_margins(self.margins);

        let available = area.size().height;
        if self.footer.height > available {
            return Err(Error::new(
                "Footer height exceeds available space",
                ErrorKind::InvalidData,
            ));
        }

        let mut footer_area = area.clone();
        footer_area.add_offset(Position::new(0, available - self.footer.height));
        let mut element = (self.footer.factory)(self.page)?;
        let result = element.render(context, footer_area, style)?;
        if result.has_more {
            return Err(Error::new(
                "Footer element does not fit into the reserved space",
                ErrorKind::PageSizeExceeded,
            ));
        }

        area.set_height(available - self.footer.height);
        Ok(area)
    }
}
