//! Export orchestration and download delivery.
//!
//! [`ReportExporter::export`] is the one entry point report pages call: it
//! gathers the logo and chart snapshots concurrently, composes and renders
//! the document once the whole batch has settled, derives the date-stamped
//! filename and hands the bytes to the configured [`DownloadSink`].  Failures
//! surface exactly once through the returned error; there is no retry at
//! this layer.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::assets::AssetFetcher;
use crate::branding::BrandingConfig;
use crate::compose;
use crate::error::ExportError;
use crate::model::ExportOptions;
use crate::render;
use crate::theme;

/// Delivery target for a rendered report.
///
/// The browser front-end this pipeline descends from triggered an anchor
/// download from a revocable object URL; hosts implement this trait with
/// whatever delivery fits their environment.
pub trait DownloadSink {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<(), ExportError>;
}

/// Sink writing downloads into a directory.
///
/// Bytes land in a transient `<filename>.part` first and are persisted with a
/// rename; the transient file is removed on every failure path, so repeated
/// or crashed deliveries never leave half-written reports behind.
pub struct FileDownloadSink {
    directory: PathBuf,
}

impl FileDownloadSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl DownloadSink for FileDownloadSink {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<(), ExportError> {
        fs::create_dir_all(&self.directory).map_err(|source| ExportError::Delivery {
            path: self.directory.clone(),
            source,
        })?;

        let target = self.directory.join(filename);
        let transient = self.directory.join(format!("{filename}.part"));
        let written = fs::write(&transient, bytes).and_then(|()| fs::rename(&transient, &target));
        if let Err(source) = written {
            let _ = fs::remove_file(&transient);
            return Err(ExportError::Delivery {
                path: target,
                source,
            });
        }

        log::info!("report delivered to {}", target.display());
        Ok(())
    }
}

/// Strips a report name down to filename-safe characters.
///
/// Everything outside `[A-Za-z0-9_\- ]` is removed, surrounding whitespace is
/// trimmed and internal whitespace runs collapse to single underscores.  The
/// function is idempotent; an input with nothing usable falls back to
/// `report`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    if collapsed.is_empty() {
        "report".to_string()
    } else {
        collapsed
    }
}

fn export_filename(stem: &str, date: NaiveDate) -> String {
    format!("{}_{}.pdf", sanitize_filename(stem), date.format("%Y-%m-%d"))
}

/// Orchestrates the end-to-end export flow.
pub struct ReportExporter<S> {
    branding: BrandingConfig,
    assets: AssetFetcher,
    sink: S,
}

impl<S: DownloadSink> ReportExporter<S> {
    pub fn new(branding: BrandingConfig, assets: AssetFetcher, sink: S) -> Self {
        Self {
            branding,
            assets,
            sink,
        }
    }

    /// Renders and delivers one report.
    ///
    /// The logo fetch and every chart capture start together; composition
    /// waits for the slowest of the batch so the document is built exactly
    /// once.  Failed captures are dropped silently, a failed logo fetch
    /// renders the header without a logo.
    pub async fn export(&self, options: ExportOptions) -> Result<(), ExportError> {
        let (logo, charts) = futures::join!(
            self.assets.fetch_logo(),
            self.assets.capture_charts(&options.chart_specs),
        );
        log::debug!(
            "resolved {} of {} chart snapshots",
            charts.len(),
            options.chart_specs.len()
        );

        let stem = options
            .filename
            .clone()
            .unwrap_or_else(|| options.title.clone());
        let filename = export_filename(&stem, Local::now().date_naive());

        let spec = options.into_spec(logo, charts);
        let document = compose::compose(&spec, &self.branding);
        let sheet = theme::theme(&self.branding);
        let rendered = render::render_pdf(&document, &sheet)?;

        self.sink.deliver(&filename, &rendered.bytes)?;
        log::info!(
            "exported '{}' as {filename} ({} pages)",
            spec.title,
            rendered.pages
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitization_is_idempotent() {
        for input in [
            "Cashflow Report",
            "P&L: Q1/2025",
            "  spaced   out  ",
            "already_clean-name",
            "###",
        ] {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn sanitization_strips_and_collapses() {
        assert_eq!(sanitize_filename("Cashflow   Report"), "Cashflow_Report");
        assert_eq!(sanitize_filename("P&L: Q1/2025"), "PL_Q12025");
        assert_eq!(sanitize_filename("  trimmed  "), "trimmed");
        assert_eq!(sanitize_filename("keep-this_name"), "keep-this_name");
    }

    #[test]
    fn unusable_names_fall_back() {
        assert_eq!(sanitize_filename("!!!"), "report");
        assert_eq!(sanitize_filename(""), "report");
    }

    #[test]
    fn filenames_are_date_stamped() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            export_filename("Cashflow Report", date),
            "Cashflow_Report_2025-01-31.pdf"
        );
    }

    #[test]
    fn file_sink_persists_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileDownloadSink::new(dir.path());

        sink.deliver("report.pdf", b"first").unwrap();
        sink.deliver("report.pdf", b"second").unwrap();

        assert_eq!(fs::read(dir.path().join("report.pdf")).unwrap(), b"second");
        assert!(!dir.path().join("report.pdf.part").exists());
    }

    #[test]
    fn file_sink_creates_the_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports/reports");
        let sink = FileDownloadSink::new(&nested);

        sink.deliver("out.pdf", b"bytes").unwrap();
        assert!(nested.join("out.pdf").exists());
    }
}
