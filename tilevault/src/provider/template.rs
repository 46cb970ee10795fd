//! Tile server URL templates.
//!
//! The exact server scheme is configuration, not core contract: the engine
//! only needs a way to turn a tile coordinate into a URL. Templates use the
//! conventional `{x}`, `{y}`, `{z}` placeholders, e.g.
//! `https://tile.openstreetmap.org/{z}/{x}/{y}.png`.

use super::types::ProviderError;
use crate::coord::TileCoord;

const PLACEHOLDERS: [&str; 3] = ["{x}", "{y}", "{z}"];

/// A tile URL template with `{x}`, `{y}` and `{z}` placeholders.
///
/// # Example
///
/// ```
/// use tilevault::coord::TileCoord;
/// use tilevault::provider::UrlTemplate;
///
/// let template = UrlTemplate::new("https://tiles.test/{z}/{x}/{y}.png").unwrap();
/// let tile = TileCoord { x: 6689, y: 3356, zoom: 13 };
///
/// assert_eq!(template.url_for(&tile), "https://tiles.test/13/6689/3356.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Creates a template, verifying all three placeholders are present.
    pub fn new(template: impl Into<String>) -> Result<Self, ProviderError> {
        let template = template.into();
        for placeholder in PLACEHOLDERS {
            if !template.contains(placeholder) {
                return Err(ProviderError::InvalidTemplate(format!(
                    "'{}' is missing the {} placeholder",
                    template, placeholder
                )));
            }
        }
        Ok(Self { template })
    }

    /// Builds the URL for one tile.
    pub fn url_for(&self, tile: &TileCoord) -> String {
        self.template
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}
