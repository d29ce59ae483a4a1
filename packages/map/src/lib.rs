#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map provider capability abstraction.
//!
//! The UI historically existed in two near-identical copies: one with a
//! static placeholder where the map should be, one with a real slippy-map
//! tile layer. Both collapse into a single [`MapProvider`] seam here,
//! selected by configuration instead of duplicated source. Tile content
//! is treated as opaque bytes from an external provider; nothing in this
//! crate interprets it.

use async_trait::async_trait;
use safepath_geo::Position;
use thiserror::Error;

/// Default viewport center: San Francisco.
pub const DEFAULT_CENTER: Position = Position::new(37.7749, -122.4194);
/// Default viewport zoom.
pub const DEFAULT_ZOOM: u8 = 13;
/// Zoom applied after a successful locate-me.
pub const LOCATE_ZOOM: u8 = 15;

/// OpenStreetMap tile URL template.
pub const OSM_TILE_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
/// Attribution required by the OSM tile usage policy.
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Tile subdomains rotated through the `{s}` template placeholder.
const TILE_SUBDOMAINS: &[&str] = &["a", "b", "c"];

/// Which provider variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// No tiles; the UI renders a placeholder panel.
    StaticPlaceholder,
    /// Real slippy-map tiles fetched from a tile service.
    InteractiveTiles,
}

/// Errors from fetching a map tile.
#[derive(Debug, Error)]
pub enum TileError {
    /// The HTTP request itself failed.
    #[error("tile request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The tile server answered with a non-success status.
    #[error("tile server returned status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },
}

/// The capability seam between the map UI and whatever renders it.
#[async_trait]
pub trait MapProvider: Send + Sync {
    /// Which variant this provider is.
    fn kind(&self) -> ProviderKind;

    /// Attribution line to render over the map, if any.
    fn attribution(&self) -> Option<&str>;

    /// URL of the tile at the given slippy-map coordinates, or `None`
    /// for providers without tiles.
    fn tile_url(&self, zoom: u8, x: u32, y: u32) -> Option<String>;

    /// Fetches the tile bytes at the given coordinates. Placeholder
    /// providers resolve to `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a [`TileError`] if the tile request fails or the server
    /// answers with a non-success status.
    async fn fetch_tile(&self, zoom: u8, x: u32, y: u32) -> Result<Option<Vec<u8>>, TileError>;
}

/// The no-map variant: a labeled panel where the map would be.
pub struct StaticPlaceholder;

#[async_trait]
impl MapProvider for StaticPlaceholder {
    fn kind(&self) -> ProviderKind {
        ProviderKind::StaticPlaceholder
    }

    fn attribution(&self) -> Option<&str> {
        None
    }

    fn tile_url(&self, _zoom: u8, _x: u32, _y: u32) -> Option<String> {
        None
    }

    async fn fetch_tile(&self, _zoom: u8, _x: u32, _y: u32) -> Result<Option<Vec<u8>>, TileError> {
        Ok(None)
    }
}

/// A slippy-map tile layer backed by an external tile service.
pub struct InteractiveTiles {
    template: String,
    attribution: String,
    client: reqwest::Client,
}

impl InteractiveTiles {
    /// Creates a provider for an arbitrary `{s}`/`{z}`/`{x}`/`{y}` URL
    /// template.
    #[must_use]
    pub fn new(template: impl Into<String>, attribution: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            attribution: attribution.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a provider for the public OpenStreetMap tile service.
    #[must_use]
    pub fn openstreetmap() -> Self {
        Self::new(OSM_TILE_TEMPLATE, OSM_ATTRIBUTION)
    }

    /// Expands the URL template for one tile. The `{s}` subdomain
    /// rotates deterministically by tile coordinate so neighboring
    /// requests spread across the provider's mirrors.
    fn expand(&self, zoom: u8, x: u32, y: u32) -> String {
        let subdomain = TILE_SUBDOMAINS[(x as usize + y as usize) % TILE_SUBDOMAINS.len()];
        self.template
            .replace("{s}", subdomain)
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

#[async_trait]
impl MapProvider for InteractiveTiles {
    fn kind(&self) -> ProviderKind {
        ProviderKind::InteractiveTiles
    }

    fn attribution(&self) -> Option<&str> {
        Some(&self.attribution)
    }

    fn tile_url(&self, zoom: u8, x: u32, y: u32) -> Option<String> {
        Some(self.expand(zoom, x, y))
    }

    async fn fetch_tile(&self, zoom: u8, x: u32, y: u32) -> Result<Option<Vec<u8>>, TileError> {
        let url = self.expand(zoom, x, y);
        log::debug!("Fetching tile {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TileError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(Some(bytes.to_vec()))
    }
}

/// Builds the configured provider from `SAFEPATH_MAP_PROVIDER`
/// (`placeholder` or `tiles`). Unset or unrecognized values fall back to
/// the placeholder, matching the UI variant that shipped first.
#[must_use]
pub fn provider_from_env() -> Box<dyn MapProvider> {
    match std::env::var("SAFEPATH_MAP_PROVIDER").as_deref() {
        Ok("tiles") => Box::new(InteractiveTiles::openstreetmap()),
        Ok(other) if other != "placeholder" => {
            log::warn!("Unknown SAFEPATH_MAP_PROVIDER {other:?}, using placeholder");
            Box::new(StaticPlaceholder)
        }
        _ => Box::new(StaticPlaceholder),
    }
}

/// The visible map window: a center position and a zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Center of the visible map.
    pub center: Position,
    /// Slippy-map zoom level.
    pub zoom: u8,
}

impl Viewport {
    /// Moves the viewport, as after a locate-me or a search jump.
    pub const fn set_view(&mut self, center: Position, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}
