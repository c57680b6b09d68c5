//! Bundled font loading for the PDF renderer.
//!
//! `genpdf` embeds TrueType fonts into every document, so the crate ships a
//! Roboto family under `assets/fonts`.  The font files are not committed; see
//! `assets/fonts/README.md` for where to obtain them.  [`bundled_fonts_available`]
//! lets demos and rendering tests skip gracefully on checkouts without the
//! assets.

use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};

/// Name of the bundled font family.
pub const FONT_FAMILY_NAME: &str = "Roboto";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

fn bundled_font_directory() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn missing_font_files(directory: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| directory.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

/// Loads the bundled report font family.
pub fn report_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = bundled_font_directory();
    let missing = missing_font_files(&directory);
    if !missing.is_empty() {
        let listing = missing
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(Error::new(
            format!(
                "Missing bundled font files: {listing}. See assets/fonts/README.md for setup."
            ),
            io::Error::new(io::ErrorKind::NotFound, "bundled fonts missing"),
        ));
    }

    fonts::from_files(&directory, FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {err}",
                FONT_FAMILY_NAME,
                directory.display()
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Whether all bundled font files are present on disk.
pub fn bundled_fonts_available() -> bool {
    missing_font_files(&bundled_font_directory()).is_empty()
}
