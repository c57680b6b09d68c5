//! Renders a sample cashflow report and delivers it to `target/demo_exports`.
//!
//! Fonts must be present under `assets/fonts` before running; see
//! `assets/fonts/README.md`.
//!
//! ```sh
//! cargo run --example report
//! ```

use std::error::Error;
use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};

use report_export::assets::{AssetFetcher, StaticChartProvider};
use report_export::branding::BrandingConfig;
use report_export::export::{FileDownloadSink, ReportExporter};
use report_export::fonts;
use report_export::model::{ChartCaptureRequest, ExportOptions, ReportTable, SummaryItem};

const OUTPUT_DIR: &str = "target/demo_exports";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    if !fonts::bundled_fonts_available() {
        eprintln!("Bundled fonts missing; see assets/fonts/README.md for setup.");
        std::process::exit(1);
    }

    let branding = BrandingConfig::default();
    let provider = StaticChartProvider::new()
        .with_image("cash-trend", gradient_png(220, 120, [46, 112, 84], [214, 236, 220])?)
        .with_image("balance", gradient_png(220, 120, [31, 78, 121], [204, 222, 240])?);
    let assets = AssetFetcher::for_branding(&branding, Arc::new(provider));
    let exporter = ReportExporter::new(branding, assets, FileDownloadSink::new(OUTPUT_DIR));

    let mut options = ExportOptions::new("Cashflow Report", "2025-01-01 \u{2013} 2025-01-31");
    options.subtitle = Some("Monthly summary".to_string());
    options.summary_items = vec![
        SummaryItem::new("Net Cash Flow", "Rs 45,200").with_sub("vs Rs 39,000 prior"),
        SummaryItem::new("Cash In", "Rs 128,400"),
        SummaryItem::new("Cash Out", "Rs 83,200"),
    ];
    options.chart_specs = vec![
        ChartCaptureRequest::new("Cash In vs Cash Out", "cash-trend"),
        ChartCaptureRequest::new("Daily Balance", "balance"),
    ];
    options.tables = vec![ReportTable::new(["Date", "Cash In", "Cash Out", "Balance"])
        .with_title("Daily Breakdown")
        .push_row(["2025-01-01", "1,200", "450", "750"])
        .push_row(["2025-01-02", "2,050", "600", "2,200"])
        .push_row(["2025-01-03", "980", "1,310", "1,870"])
        .with_green_cols(vec![1])
        .with_red_cols(vec![2])
        .with_bold_cols(vec![3])];

    exporter.export(options).await?;
    println!("Report delivered under {OUTPUT_DIR}/");
    Ok(())
}

/// Renders a diagonal gradient placeholder standing in for a live chart.
fn gradient_png(
    width: u32,
    height: u32,
    start: [u8; 3],
    end: [u8; 3],
) -> Result<Vec<u8>, image::ImageError> {
    let width_f = width.saturating_sub(1) as f32;
    let height_f = height.saturating_sub(1) as f32;
    let buffer = ImageBuffer::from_fn(width, height, |x, y| {
        let xf = if width_f > 0.0 { x as f32 / width_f } else { 0.0 };
        let yf = if height_f > 0.0 { y as f32 / height_f } else { 0.0 };
        let mix = (0.7 * xf + 0.3 * yf).clamp(0.0, 1.0);
        let mut channels = [0u8; 3];
        for (index, channel) in channels.iter_mut().enumerate() {
            let from = start[index] as f32;
            let to = end[index] as f32;
            *channel = (from + (to - from) * mix).round().clamp(0.0, 255.0) as u8;
        }
        Rgb(channels)
    });

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}
