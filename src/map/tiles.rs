//! Tile sources for each map theme.

use serde::Serialize;

use crate::domain::MapTheme;

const OSM_COPYRIGHT: &str = r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a>"#;

/// A raster tile layer: a Leaflet-style URL template and the attribution HTML
/// that must be shown with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSource {
    pub url_template: &'static str,
    pub attribution: &'static str,
}

impl TileSource {
    /// Tile layer for a map theme.
    #[must_use]
    pub const fn for_theme(theme: MapTheme) -> Self {
        match theme {
            MapTheme::Standard => Self {
                url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
                attribution: OSM_COPYRIGHT,
            },
            MapTheme::Satellite => Self {
                url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
                attribution: "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, \
                              Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community",
            },
            MapTheme::Dark => Self {
                url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
                attribution: r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors &copy; <a href="https://carto.com/attributions">CARTO</a>"#,
            },
            MapTheme::Topographic => Self {
                url_template: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
                attribution: r#"Map data: &copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors, <a href="http://viewfinderpanoramas.org">SRTM</a> | Map style: &copy; <a href="https://opentopomap.org">OpenTopoMap</a> (<a href="https://creativecommons.org/licenses/by-sa/3.0/">CC-BY-SA</a>)"#,
            },
        }
    }

    /// Fills in a concrete tile URL.
    ///
    /// `{s}` becomes subdomain `a` and `{r}` (retina suffix) is dropped.
    #[must_use]
    pub fn tile_url(&self, z: u32, x: u32, y: u32) -> String {
        self.url_template
            .replace("{s}", "a")
            .replace("{r}", "")
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl From<MapTheme> for TileSource {
    fn from(theme: MapTheme) -> Self {
        Self::for_theme(theme)
    }
}
