use std::io::Cursor;

use chrono::{Local, TimeZone};
use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
use sha2::{Digest, Sha256};

use report_export::assets::{AssetFetcher, StaticChartProvider};
use report_export::branding::BrandingConfig;
use report_export::compose::compose_at;
use report_export::export::{FileDownloadSink, ReportExporter};
use report_export::fonts;
use report_export::model::{
    ChartCaptureRequest, ChartImage, ExportOptions, ReportDocumentSpec, ReportTable, SummaryItem,
};
use report_export::render::{render_pdf, RenderedPdf};
use report_export::theme::theme;

/// Renders a small PNG so chart embedding is exercised without fixture files.
fn chart_png() -> Vec<u8> {
    let buffer = ImageBuffer::from_fn(160, 90, |x, y| {
        let shade = ((x + y) % 255) as u8;
        Rgb([shade, 96, 160u8.saturating_sub(shade / 2)])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("encode chart png");
    bytes
}

fn sample_spec() -> ReportDocumentSpec {
    ReportDocumentSpec {
        title: "Cashflow Report".to_string(),
        subtitle: Some("Monthly summary".to_string()),
        period: "2025-01-01 \u{2013} 2025-01-31".to_string(),
        logo: None,
        summary_items: vec![
            SummaryItem::new("Net Cash Flow", "Rs 45,200").with_sub("vs Rs 39,000 prior"),
            SummaryItem::new("Cash In", "Rs 128,400"),
            SummaryItem::new("Cash Out", "Rs 83,200"),
        ],
        charts: vec![ChartImage::new("Cash In vs Cash Out", chart_png())],
        tables: vec![ReportTable::new(["Date", "Cash In", "Cash Out"])
            .with_title("Daily Breakdown")
            .push_row(["2025-01-01", "1,200", "450"])
            .push_row(["2025-01-02", "2,050", "600"])
            .with_green_cols(vec![1])
            .with_red_cols(vec![2])],
    }
}

fn render_sample() -> Option<RenderedPdf> {
    if !fonts::bundled_fonts_available() {
        eprintln!(
            "Skipping rendering test: bundled fonts missing. See assets/fonts/README.md for setup."
        );
        return None;
    }

    let branding = BrandingConfig::default();
    let stamp = Local.with_ymd_and_hms(2025, 1, 31, 16, 5, 0).unwrap();
    let document = compose_at(&sample_spec(), &branding, stamp);
    Some(render_pdf(&document, &theme(&branding)).expect("render sample report"))
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:InstanceID>",
        b"</xmpMM:InstanceID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let digest = Sha256::digest(scrub_pdf(bytes));
    digest.into()
}

#[test]
fn renders_non_empty_output() {
    let Some(rendered) = render_sample() else {
        return;
    };
    assert!(!rendered.bytes.is_empty());
    assert!(rendered.pages >= 1);
}

#[test]
fn rendering_is_deterministic() {
    let (Some(first), Some(second)) = (render_sample(), render_sample()) else {
        return;
    };

    assert_eq!(first.bytes.len(), second.bytes.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first.bytes),
        normalized_hash(&second.bytes),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn long_tables_paginate_with_live_totals() {
    if !fonts::bundled_fonts_available() {
        eprintln!("Skipping pagination test: bundled fonts missing.");
        return;
    }

    let mut table = ReportTable::new(["Date", "Cash In", "Cash Out"]).with_title("Daily Breakdown");
    for day in 0..160 {
        table = table.push_row([
            format!("2025-01-{:02}", day % 28 + 1),
            format!("{}", 1_000 + day * 3),
            format!("{}", 400 + day),
        ]);
    }
    let spec = ReportDocumentSpec {
        summary_items: Vec::new(),
        charts: Vec::new(),
        tables: vec![table],
        ..sample_spec()
    };

    let branding = BrandingConfig::default();
    let stamp = Local.with_ymd_and_hms(2025, 1, 31, 16, 5, 0).unwrap();
    let document = compose_at(&spec, &branding, stamp);
    let rendered = render_pdf(&document, &theme(&branding)).expect("render long report");

    assert!(
        rendered.pages >= 2,
        "160 rows should overflow a single A4 page, got {} page(s)",
        rendered.pages
    );
    assert_eq!(rendered.section_pages, vec![Some(1)]);
}

#[tokio::test]
async fn export_delivers_a_sanitized_dated_download() {
    if !fonts::bundled_fonts_available() {
        eprintln!("Skipping export test: bundled fonts missing.");
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let branding = BrandingConfig::default();
    // One of the two requested charts has no snapshot and must be dropped.
    let provider = StaticChartProvider::new().with_image("cash-trend", chart_png());
    let assets = AssetFetcher::new("not a url", std::sync::Arc::new(provider));
    let exporter = ReportExporter::new(branding, assets, FileDownloadSink::new(dir.path()));

    let mut options = ExportOptions::new("Cashflow  Report!", "2025-01-01 \u{2013} 2025-01-31");
    options
        .summary_items
        .push(SummaryItem::new("Net Cash Flow", "Rs 45,200"));
    options.tables.push(
        ReportTable::new(["Date", "Cash In"]).push_row(["2025-01-01", "1,200"]),
    );
    options.chart_specs = vec![
        ChartCaptureRequest::new("Cash Trend", "cash-trend"),
        ChartCaptureRequest::new("Missing Chart", "no-such-element"),
    ];

    exporter.export(options).await.expect("export succeeds");

    let expected = format!(
        "Cashflow_Report_{}.pdf",
        Local::now().date_naive().format("%Y-%m-%d")
    );
    let path = dir.path().join(&expected);
    assert!(path.exists(), "expected {expected} in the sink directory");
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}
