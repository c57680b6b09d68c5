//! Company branding configuration shared by the style theme and the composer.
//!
//! The configuration is literal data resolved once at startup, either from the
//! built-in defaults or from a TOML snippet.  Every generated report reads the
//! same record; nothing in the pipeline mutates it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// An RGB color parsed from a `#RRGGBB` hex literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Creates a color from raw channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` hex literal.
    pub fn from_hex(hex: &str) -> Result<Self, ExportError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ExportError::InvalidColor(hex.to_string()))?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ExportError::InvalidColor(hex.to_string()));
        }

        let r = u8::from_str_radix(&digits[0..2], 16).unwrap();
        let g = u8::from_str_radix(&digits[2..4], 16).unwrap();
        let b = u8::from_str_radix(&digits[4..6], 16).unwrap();
        Ok(Self { r, g, b })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ExportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// Static company identity and color palette used to brand every report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrandingConfig {
    pub name: String,
    pub tagline: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub phone: String,
    pub email: String,
    pub website: String,
    /// Origin the logo asset is resolved against, e.g. `https://erp.example.com`.
    pub origin: String,
    pub primary_color: Rgb,
    pub accent_color: Rgb,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            name: "Aurora Distribution Ltd".to_string(),
            tagline: "Enterprise Resource Planning".to_string(),
            address_line1: "14 Harbour Road".to_string(),
            address_line2: Some("Colombo 04".to_string()),
            phone: "+94 11 234 5678".to_string(),
            email: "reports@aurora.example.com".to_string(),
            website: "https://aurora.example.com".to_string(),
            origin: "https://erp.aurora.example.com".to_string(),
            primary_color: Rgb::new(0x1f, 0x4e, 0x79),
            accent_color: Rgb::new(0x2e, 0x9e, 0x6b),
        }
    }
}

impl BrandingConfig {
    /// Loads the configuration from a TOML snippet.
    ///
    /// Missing fields fall back to the defaults, so deployments only override
    /// what differs from the stock identity.
    pub fn from_toml_str(input: &str) -> Result<Self, ExportError> {
        Ok(toml::from_str(input)?)
    }

    /// Returns the absolute URL of the company logo.
    ///
    /// Pure string construction following the fixed `<origin>/logo.png`
    /// convention; no I/O happens here.
    pub fn resolve_logo_url(&self) -> String {
        format!("{}/logo.png", self.origin.trim_end_matches('/'))
    }

    /// Address lines joined for single-line display contexts.
    pub fn address(&self) -> String {
        match &self.address_line2 {
            Some(line2) => format!("{}, {}", self.address_line1, line2),
            None => self.address_line1.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        let color = Rgb::from_hex("#1F4E79").expect("parse succeeds");
        assert_eq!(color, Rgb::new(0x1f, 0x4e, 0x79));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Rgb::from_hex("1f4e79").is_err());
        assert!(Rgb::from_hex("#1f4e7").is_err());
        assert!(Rgb::from_hex("#1f4e7g").is_err());
    }

    #[test]
    fn hex_display_round_trips() {
        let color = Rgb::new(0x2e, 0x9e, 0x6b);
        assert_eq!(Rgb::from_hex(&color.to_string()).unwrap(), color);
    }

    #[test]
    fn logo_url_normalizes_trailing_slash() {
        let mut branding = BrandingConfig::default();
        branding.origin = "https://erp.example.com/".to_string();
        assert_eq!(branding.resolve_logo_url(), "https://erp.example.com/logo.png");
    }

    #[test]
    fn loads_partial_toml_over_defaults() {
        let branding = BrandingConfig::from_toml_str(
            r##"
            name = "Northwind Traders"
            primary_color = "#123456"
            "##,
        )
        .expect("parse succeeds");

        assert_eq!(branding.name, "Northwind Traders");
        assert_eq!(branding.primary_color, Rgb::new(0x12, 0x34, 0x56));
        assert_eq!(branding.accent_color, BrandingConfig::default().accent_color);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(BrandingConfig::from_toml_str("colour = \"#000000\"").is_err());
    }

    #[test]
    fn joins_address_lines() {
        let branding = BrandingConfig::default();
        assert!(branding.address().contains(", "));

        let single = BrandingConfig {
            address_line2: None,
            ..BrandingConfig::default()
        };
        assert_eq!(single.address(), single.address_line1);
    }
}
