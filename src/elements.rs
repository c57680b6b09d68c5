//! Custom element implementations built on top of `genpdf` primitives.
//!
//! The renderer needs a few things the upstream crate does not ship: solid
//! color bands, a left accent bar for KPI cards, captioned figures and a
//! table with filled header/row banding.  `genpdf` exposes no filled-shape
//! primitive, only stroked lines, so bands and bars are built from stacked
//! hairline strokes.

use image::GenericImageView;

use genpdf::elements::{Image, Paragraph};
use genpdf::error::{Context as _, Error, ErrorKind};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Element, Mm, Position, RenderResult, Scale, Size};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
/// Vertical step between stacked hairlines; below the default stroke width so
/// adjacent strokes overlap into a solid fill.
const FILL_STEP_MM: f64 = 0.25;
const DEFAULT_CAPTION_SPACING_MM: f64 = 1.5;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * f64::from(px_width) / dpi;
    let height_mm = MM_PER_INCH * f64::from(px_height) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Decodes an image from in-memory bytes with a descriptive error.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<image::DynamicImage, Error> {
    image::load_from_memory(bytes.as_ref()).context("Failed to decode image from provided bytes")
}

fn image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<(Image, Size), Error> {
    let dynamic = decode_image_from_bytes(bytes)?;
    let size = estimated_image_size(&dynamic, DEFAULT_IMAGE_DPI);
    let image = Image::from_dynamic_image(dynamic)?;
    Ok((image, size))
}

/// Builds an image element scaled to the requested width, keeping the aspect
/// ratio.
pub fn sized_image(bytes: impl AsRef<[u8]>, width: Mm) -> Result<Image, Error> {
    let (mut image, natural) = image_from_bytes(bytes)?;
    let natural_width = mm_to_f64(natural.width);
    if natural_width > f64::EPSILON {
        let scale = mm_to_f64(width) / natural_width;
        image.set_scale(Scale::new(scale, scale));
    }
    Ok(image)
}

fn fill_band(area: &mut render::Area<'_>, width: Mm, height: Mm, color: Color) {
    let stroke = Style::new().with_color(color);
    let height = mm_to_f64(height);
    let mut offset = 0.0;
    while offset <= height {
        let y = mm_from_f64(offset);
        area.draw_line(
            vec![Position::new(0, y), Position::new(width, y)],
            stroke,
        );
        offset += FILL_STEP_MM;
    }
}

/// A solid horizontal rule, used for the accent stripe, section heading bars
/// and the footer divider.
pub struct Rule {
    color: Color,
    thickness: Mm,
    margin_bottom: Mm,
}

impl Rule {
    pub fn new(color: Color, thickness: Mm) -> Self {
        Self {
            color,
            thickness,
            margin_bottom: Mm::default(),
        }
    }

    /// Adds blank space after the rule and returns the updated element.
    pub fn with_margin_bottom(mut self, margin: Mm) -> Self {
        self.margin_bottom = margin;
        self
    }
}

impl Element for Rule {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        mut area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let total = self.thickness + self.margin_bottom;
        if total > area.size().height {
            result.has_more = true;
            return Ok(result);
        }

        let width = area.size().width;
        fill_band(&mut area, width, self.thickness, self.color);
        result.size = Size::new(width, total);
        Ok(result)
    }
}

/// Content with a solid vertical accent bar along its left edge.
pub struct AccentCard<E: Element> {
    inner: E,
    color: Color,
    bar_width: Mm,
    gutter: Mm,
}

impl<E: Element> AccentCard<E> {
    pub fn new(inner: E, color: Color, bar_width: Mm, gutter: Mm) -> Self {
        Self {
            inner,
            color,
            bar_width,
            gutter,
        }
    }
}

impl<E: Element> Element for AccentCard<E> {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let indent = self.bar_width + self.gutter;
        let mut content_area = area.clone();
        content_area.add_margins(genpdf::Margins::trbl(0, 0, 0, indent));
        let inner = self.inner.render(context, content_area, style)?;

        let stroke = Style::new().with_color(self.color);
        let bar = mm_to_f64(self.bar_width);
        let mut offset = 0.0;
        while offset <= bar {
            let x = mm_from_f64(offset);
            area.draw_line(
                vec![Position::new(x, 0), Position::new(x, inner.size.height)],
                stroke,
            );
            offset += FILL_STEP_MM;
        }

        let mut result = RenderResult::default();
        result.size = Size::new(inner.size.width + indent, inner.size.height);
        result.has_more = inner.has_more;
        Ok(result)
    }
}

/// A caption stacked above an image constrained to a target width.
pub struct CaptionedFigure {
    caption: Paragraph,
    image: Image,
    natural_size: Size,
    requested_width: Option<Mm>,
    spacing: Mm,
}

impl CaptionedFigure {
    /// Creates a figure from encoded image bytes.
    pub fn from_bytes(bytes: impl AsRef<[u8]>, caption: Paragraph) -> Result<Self, Error> {
        let (image, natural_size) = image_from_bytes(bytes)?;
        Ok(Self {
            caption,
            image,
            natural_size,
            requested_width: None,
            spacing: mm_from_f64(DEFAULT_CAPTION_SPACING_MM),
        })
    }

    /// Constrains the rendered image width while preserving the aspect ratio.
    pub fn with_width(mut self, width: impl Into<Option<Mm>>) -> Self {
        self.requested_width = width.into();
        self
    }

    fn apply_width(&mut self) {
        if let Some(width) = self.requested_width {
            let natural = mm_to_f64(self.natural_size.width);
            if natural > f64::EPSILON {
                let scale = mm_to_f64(width) / natural;
                self.image.set_scale(Scale::new(scale, scale));
            }
        } else {
            self.image.set_scale(Scale::new(1.0, 1.0));
        }
    }
}

impl Element for CaptionedFigure {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        self.apply_width();

        let mut result = RenderResult::default();
        let caption_result = self.caption.render(context, area.clone(), style)?;
        result.size = result.size.stack_vertical(caption_result.size);
        result.has_more |= caption_result.has_more;

        area.add_offset(Position::new(0, caption_result.size.height + self.spacing));
        result.size = result.size.stack_vertical(Size::new(0, self.spacing));

        let image_result = self.image.render(context, area, style)?;
        result.size = result.size.stack_vertical(image_result.size);
        result.has_more |= image_result.has_more;

        Ok(result)
    }
}

/// One prepared table row: styled cell strings plus an optional band fill.
pub struct BandedRow {
    pub cells: Vec<StyledString>,
    pub band: Option<Color>,
}

/// A table with filled row bands and per-cell styling.
///
/// Columns share the available width equally.  Cell text is printed as a
/// single line; values are expected to be short pre-formatted strings.  Rows
/// that do not fit the remaining page continue on the next page through the
/// `has_more` protocol.
pub struct BandedTable {
    rows: Vec<BandedRow>,
    cell_padding: Mm,
    next_row: usize,
    stalled: bool,
}

impl BandedTable {
    pub fn new(cell_padding: Mm) -> Self {
        Self {
            rows: Vec::new(),
            cell_padding,
            next_row: 0,
            stalled: false,
        }
    }

    /// Appends a row of prepared cells.
    pub fn push_row(&mut self, cells: Vec<StyledString>, band: Option<Color>) {
        self.rows.push(BandedRow { cells, band });
    }
}

impl Element for BandedTable {
    fn render(
        &mut self,
        context: &genpdf::Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let columns = self
            .rows
            .iter()
            .map(|row| row.cells.len())
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return Ok(result);
        }

        let total_width = area.size().width;
        let column_width = mm_to_f64(total_width) / columns as f64;
        let padding = mm_to_f64(self.cell_padding);
        let mut rendered_any = false;

        while self.next_row < self.rows.len() {
            let row = &self.rows[self.next_row];

            let mut line_height = style.line_height(&context.font_cache);
            for cell in &row.cells {
                let cell_style = style.and(cell.style);
                line_height = line_height.max(cell_style.line_height(&context.font_cache));
            }
            let row_height = line_height + mm_from_f64(2.0 * padding);

            if row_height > area.size().height {
                if !rendered_any {
                    if self.stalled {
                        return Err(Error::new(
                            "Table row exceeds the available page height",
                            ErrorKind::PageSizeExceeded,
                        ));
                    }
                    self.stalled = true;
                }
                result.has_more = true;
                return Ok(result);
            }

            if let Some(band) = row.band {
                fill_band(&mut area, total_width, row_height, band);
            }

            for (index, cell) in row.cells.iter().enumerate() {
                let x = mm_from_f64(column_width * index as f64 + padding);
                let cell_style = style.and(cell.style);
                let position = Position::new(x, mm_from_f64(padding));
                if let Some(mut section) =
                    area.text_section(&context.font_cache, position, cell_style)
                {
                    section.print_str(&cell.s, cell_style)?;
                } else {
                    result.has_more = true;
                    return Ok(result);
                }
            }

            area.add_offset(Position::new(0, row_height));
            result.size = result.size.stack_vertical(Size::new(total_width, row_height));
            rendered_any = true;
            self.stalled = false;
            self.next_row += 1;
        }

        Ok(result)
    }
}
