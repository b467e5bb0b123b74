//! Render configuration: page geometry and where to look for image assets.
//!
//! Defaults reproduce the shop's A4 layout. A JSON file named by
//! `MOTORDOCS_CONFIG` can override any subset of fields, and
//! `MOTORDOCS_ASSET_DIR` is searched before the configured asset dirs.
//! A `.env` file in the working directory is honoured for both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DocError;
use crate::image_loader::AssetLocator;

pub const CONFIG_ENV: &str = "MOTORDOCS_CONFIG";
pub const ASSET_DIR_ENV: &str = "MOTORDOCS_ASSET_DIR";

/// Paper size in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Fixed page geometry for one render call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub size: PageSize,
    /// Left and right margin.
    pub margin_x: f64,
    /// Content may not extend below this y.
    pub bottom_margin: f64,
    /// Distance from the top edge used when a new page has no header.
    pub fallback_top: f64,
    /// x of the document identity panel in the header.
    pub identity_x: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin_x: 30.0,
            bottom_margin: 40.0,
            fallback_top: 50.0,
            identity_x: 340.0,
        }
    }
}

impl PageGeometry {
    pub fn width(&self) -> f64 {
        self.size.dimensions().0
    }

    pub fn height(&self) -> f64 {
        self.size.dimensions().1
    }

    pub fn left(&self) -> f64 {
        self.margin_x
    }

    pub fn right(&self) -> f64 {
        self.width() - self.margin_x
    }

    pub fn content_width(&self) -> f64 {
        self.right() - self.left()
    }

    /// Cursor for a page opened without a header.
    pub fn fallback_y(&self) -> f64 {
        self.height() - self.fallback_top
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub search_dirs: Vec<PathBuf>,
    pub logo: String,
    pub diagram: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            search_dirs: vec![PathBuf::from("assets")],
            logo: "logo.png".to_string(),
            diagram: "car_diagram.png".to_string(),
        }
    }
}

impl AssetConfig {
    pub fn locator(&self) -> AssetLocator {
        AssetLocator::new(self.search_dirs.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub page: PageGeometry,
    pub assets: AssetConfig,
}

impl RenderConfig {
    /// Defaults, then `MOTORDOCS_CONFIG`, then `MOTORDOCS_ASSET_DIR`.
    pub fn from_env() -> Result<Self, DocError> {
        dotenvy::dotenv().ok();

        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(ASSET_DIR_ENV) {
            config.assets.search_dirs.insert(0, PathBuf::from(dir));
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, DocError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DocError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
            .map_err(|e| DocError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_geometry() {
        let g = PageGeometry::default();
        assert_eq!(g.right(), 595.28 - 30.0);
        assert!((g.content_width() - 535.28).abs() < 1e-9);
        assert!((g.fallback_y() - 791.89).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = RenderConfig::from_json(
            r#"{ "page": { "size": { "Custom": { "width": 400, "height": 500 } } },
                 "assets": { "search_dirs": [] } }"#,
        )
        .unwrap();
        assert_eq!(cfg.page.height(), 500.0);
        assert_eq!(cfg.page.bottom_margin, 40.0);
        assert!(cfg.assets.search_dirs.is_empty());
        assert_eq!(cfg.assets.diagram, "car_diagram.png");
    }

    #[test]
    fn test_unreadable_file_is_config_error() {
        let err = RenderConfig::from_file(Path::new("/nonexistent/motordocs.json")).unwrap_err();
        assert!(matches!(err, DocError::Config(_)));
    }
}
