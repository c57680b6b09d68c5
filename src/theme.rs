//! Declarative style sheet derived from the branding palette.
//!
//! `theme` is a pure function: identical branding input always yields an
//! identical [`StyleSheet`], so themes can be compared structurally in tests
//! and no style state hides at module level.  The sheet only declares visual
//! attributes; mapping them onto the PDF engine is the renderer's job.

use crate::branding::{BrandingConfig, Rgb};

/// Neutral body-text ink.
pub const INK: Rgb = Rgb::new(0x24, 0x29, 0x33);
/// Muted ink for labels and secondary detail.
pub const MUTED: Rgb = Rgb::new(0x6b, 0x72, 0x80);
/// Page background white, used for banded rows and inverse text.
pub const PAPER: Rgb = Rgb::new(0xff, 0xff, 0xff);
/// Negative-emphasis red for table cells.
pub const NEGATIVE: Rgb = Rgb::new(0xc0, 0x39, 0x2b);

/// Font size, color and weight for one text role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextStyle {
    pub size: u8,
    pub color: Rgb,
    pub bold: bool,
    pub italic: bool,
}

impl TextStyle {
    const fn new(size: u8, color: Rgb) -> Self {
        Self {
            size,
            color,
            bold: false,
            italic: false,
        }
    }

    const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

/// Page geometry: A4 margins and the height reserved for the repeating footer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageStyle {
    /// Margins in mm, top/right/bottom/left.
    pub margins_mm: [f64; 4],
    pub footer_height_mm: f64,
}

/// Header band: logo plus company identity on the left, generation stamp on
/// the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderBandStyle {
    pub company_name: TextStyle,
    pub tagline: TextStyle,
    pub detail: TextStyle,
    pub generated_label: TextStyle,
    pub timestamp: TextStyle,
    pub logo_width_mm: f64,
    pub spacing_after_mm: f64,
}

/// Solid accent stripe under the header band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripeStyle {
    pub color: Rgb,
    pub thickness_mm: f64,
    pub spacing_after_mm: f64,
}

/// Report title, optional subtitle and the right-aligned period badge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TitleBlockStyle {
    pub title: TextStyle,
    pub subtitle: TextStyle,
    pub period_label: TextStyle,
    pub period_value: TextStyle,
    pub spacing_after_mm: f64,
}

/// Labeled divider introducing a KPI, chart or table block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionHeadingStyle {
    pub text: TextStyle,
    pub bar_color: Rgb,
    pub bar_thickness_mm: f64,
    pub spacing_after_mm: f64,
}

/// One KPI tile in the metrics grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KpiCardStyle {
    pub label: TextStyle,
    pub value: TextStyle,
    pub sub: TextStyle,
    pub accent: Rgb,
    pub accent_width_mm: f64,
    pub padding_mm: f64,
    /// Cards per grid row before wrapping.
    pub columns: usize,
    pub spacing_after_mm: f64,
}

/// Captioned chart snapshot scaled to the content width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartFigureStyle {
    pub caption: TextStyle,
    pub spacing_after_mm: f64,
}

/// Table band colors and the cell emphasis variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableStyle {
    pub header: TextStyle,
    pub header_background: Rgb,
    pub row_even: Rgb,
    pub row_odd: Rgb,
    pub cell: TextStyle,
    pub cell_green: TextStyle,
    pub cell_red: TextStyle,
    pub cell_bold: TextStyle,
    pub cell_padding_mm: f64,
    pub spacing_after_mm: f64,
}

/// Repeating footer: company line on the left, page numbers on the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FooterStyle {
    pub company: TextStyle,
    pub detail: TextStyle,
    pub page_number: TextStyle,
    pub rule_color: Rgb,
}

/// The full set of named visual regions used by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleSheet {
    pub page: PageStyle,
    pub header_band: HeaderBandStyle,
    pub accent_stripe: StripeStyle,
    pub title_block: TitleBlockStyle,
    pub section_heading: SectionHeadingStyle,
    pub kpi_card: KpiCardStyle,
    pub chart_figure: ChartFigureStyle,
    pub table: TableStyle,
    pub footer: FooterStyle,
}

/// Derives the style sheet for a branding configuration.
///
/// `primary_color` drives headline text and the table header band;
/// `accent_color` drives the stripe, KPI accents, section heading bars,
/// positive-emphasis cells and the footer company line.
pub fn theme(branding: &BrandingConfig) -> StyleSheet {
    let primary = branding.primary_color;
    let accent = branding.accent_color;

    StyleSheet {
        page: PageStyle {
            margins_mm: [14.0, 16.0, 14.0, 16.0],
            footer_height_mm: 14.0,
        },
        header_band: HeaderBandStyle {
            company_name: TextStyle::new(13, primary).bold(),
            tagline: TextStyle::new(8, MUTED).italic(),
            detail: TextStyle::new(8, MUTED),
            generated_label: TextStyle::new(7, MUTED),
            timestamp: TextStyle::new(8, INK),
            logo_width_mm: 26.0,
            spacing_after_mm: 3.0,
        },
        accent_stripe: StripeStyle {
            color: accent,
            thickness_mm: 1.2,
            spacing_after_mm: 5.0,
        },
        title_block: TitleBlockStyle {
            title: TextStyle::new(19, primary).bold(),
            subtitle: TextStyle::new(11, MUTED),
            period_label: TextStyle::new(7, MUTED),
            period_value: TextStyle::new(10, primary).bold(),
            spacing_after_mm: 6.0,
        },
        section_heading: SectionHeadingStyle {
            text: TextStyle::new(11, primary).bold(),
            bar_color: accent,
            bar_thickness_mm: 0.8,
            spacing_after_mm: 3.0,
        },
        kpi_card: KpiCardStyle {
            label: TextStyle::new(7, MUTED),
            value: TextStyle::new(14, INK).bold(),
            sub: TextStyle::new(7, MUTED),
            accent,
            accent_width_mm: 1.0,
            padding_mm: 2.5,
            columns: 3,
            spacing_after_mm: 5.0,
        },
        chart_figure: ChartFigureStyle {
            caption: TextStyle::new(9, INK).bold(),
            spacing_after_mm: 5.0,
        },
        table: TableStyle {
            header: TextStyle::new(8, PAPER).bold(),
            header_background: primary,
            row_even: PAPER,
            row_odd: tint(primary, 0.93),
            cell: TextStyle::new(8, INK),
            cell_green: TextStyle::new(8, accent).bold(),
            cell_red: TextStyle::new(8, NEGATIVE).bold(),
            cell_bold: TextStyle::new(8, INK).bold(),
            cell_padding_mm: 1.6,
            spacing_after_mm: 6.0,
        },
        footer: FooterStyle {
            company: TextStyle::new(8, accent).bold(),
            detail: TextStyle::new(7, MUTED),
            page_number: TextStyle::new(7, MUTED),
            rule_color: tint(INK, 0.8),
        },
    }
}

/// Mixes a color toward white; `amount` of 1.0 is fully white.
fn tint(color: Rgb, amount: f64) -> Rgb {
    let mix = |channel: u8| -> u8 {
        let base = f64::from(channel);
        (base + (255.0 - base) * amount).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(mix(color.r), mix(color.g), mix(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_branding_yields_identical_sheets() {
        let branding = BrandingConfig::default();
        assert_eq!(theme(&branding), theme(&branding));
    }

    #[test]
    fn palette_drives_the_expected_regions() {
        let branding = BrandingConfig::default();
        let sheet = theme(&branding);

        assert_eq!(sheet.title_block.title.color, branding.primary_color);
        assert_eq!(sheet.table.header_background, branding.primary_color);
        assert_eq!(sheet.accent_stripe.color, branding.accent_color);
        assert_eq!(sheet.kpi_card.accent, branding.accent_color);
        assert_eq!(sheet.section_heading.bar_color, branding.accent_color);
        assert_eq!(sheet.table.cell_green.color, branding.accent_color);
        assert_eq!(sheet.footer.company.color, branding.accent_color);
    }

    #[test]
    fn changing_the_palette_changes_the_sheet() {
        let branding = BrandingConfig::default();
        let recolored = BrandingConfig {
            primary_color: Rgb::new(0x80, 0x00, 0x20),
            ..branding.clone()
        };
        assert_ne!(theme(&branding), theme(&recolored));
    }

    #[test]
    fn tint_moves_channels_toward_white() {
        let shaded = tint(Rgb::new(0, 0, 0), 0.5);
        assert_eq!(shaded, Rgb::new(128, 128, 128));
        assert_eq!(tint(Rgb::new(10, 20, 30), 1.0), PAPER);
    }
}
