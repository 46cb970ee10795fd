//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator tile coordinates, plus the covering-rectangle computation
//! used to enumerate the tiles of a bounding box at a given zoom level.

mod types;

pub use types::{
    BoundingBox, CoordError, TileCoord, ZoomRange, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON,
    MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 19)
///
/// # Returns
///
/// A `Result` containing the tile coordinates or an error if inputs are
/// outside the Web Mercator domain. Latitudes beyond the domain are rejected,
/// never clamped. The boundary meridian (lon = 180) and the southern domain
/// edge fall into the last tile of the grid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = 2.0_f64.powi(zoom as i32);

    // Longitude to tile X
    let x = ((lon + 180.0) / 360.0 * n) as u32;

    // Latitude to tile Y via the Web Mercator projection
    let lat_rad = lat * PI / 180.0;
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n) as u32;

    // Points on the closing edge of the domain project to index 2^zoom
    let last = (n as u32) - 1;
    Ok(TileCoord {
        x: x.min(last),
        y: y.min(last),
        zoom,
    })
}

/// Returns the geographic coordinates of a tile's center point.
///
/// Samples the center (x + 0.5, y + 0.5) rather than the northwest corner so
/// the result is representative for bounds testing: a corner sits on the
/// shared edge of four tiles, a center belongs to exactly one.
#[inline]
pub fn tile_center(tile: &TileCoord) -> (f64, f64) {
    let n = 2.0_f64.powi(tile.zoom as i32);

    let lon = (tile.x as f64 + 0.5) / n * 360.0 - 180.0;

    let y = (tile.y as f64 + 0.5) / n;
    let lat_rad = (PI * (1.0 - 2.0 * y)).sinh().atan();
    let lat = lat_rad * 180.0 / PI;

    (lat, lon)
}

/// The rectangle of tile indices covering a bounding box at one zoom level.
///
/// Because tile Y decreases as latitude increases, the projected corners of
/// the box are not ordered; [`TileRect::covering`] min/maxes them explicitly.
/// The rectangle is a superset of the in-bounds tile set: the box is not
/// tile-aligned, so callers filter by [`tile_center`] before downloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
    pub zoom: u8,
}

impl TileRect {
    /// Computes the covering rectangle for a bounding box at a zoom level.
    pub fn covering(bbox: &BoundingBox, zoom: u8) -> Result<Self, CoordError> {
        let a = to_tile_coords(bbox.min_lat(), bbox.min_lon(), zoom)?;
        let b = to_tile_coords(bbox.max_lat(), bbox.max_lon(), zoom)?;

        Ok(Self {
            x_min: a.x.min(b.x),
            x_max: a.x.max(b.x),
            y_min: a.y.min(b.y),
            y_max: a.y.max(b.y),
            zoom,
        })
    }

    /// Number of tiles in the rectangle.
    pub fn tile_count(&self) -> u64 {
        let width = (self.x_max - self.x_min + 1) as u64;
        let height = (self.y_max - self.y_min + 1) as u64;
        width * height
    }

    /// Returns an iterator over all tiles in the rectangle.
    ///
    /// Tiles are yielded in row-major order (all of row `y_min` west to
    /// east, then the next row).
    pub fn iter(&self) -> TileRectIterator {
        TileRectIterator {
            rect: *self,
            next_x: self.x_min,
            next_y: self.y_min,
            done: false,
        }
    }
}

impl IntoIterator for &TileRect {
    type Item = TileCoord;
    type IntoIter = TileRectIterator;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over all tiles of a [`TileRect`] in row-major order.
#[derive(Debug, Clone)]
pub struct TileRectIterator {
    rect: TileRect,
    next_x: u32,
    next_y: u32,
    done: bool,
}

impl Iterator for TileRectIterator {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let tile = TileCoord {
            x: self.next_x,
            y: self.next_y,
            zoom: self.rect.zoom,
        };

        if self.next_x < self.rect.x_max {
            self.next_x += 1;
        } else if self.next_y < self.rect.y_max {
            self.next_x = self.rect.x_min;
            self.next_y += 1;
        } else {
            self.done = true;
        }

        Some(tile)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let row_width = (self.rect.x_max - self.rect.x_min + 1) as usize;
        let full_rows = (self.rect.y_max - self.next_y) as usize;
        let in_row = (self.rect.x_max - self.next_x + 1) as usize;
        let remaining = full_rows * row_width + in_row;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileRectIterator {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let tile = to_tile_coords(40.7128, -74.0060, 16).unwrap();
        assert_eq!(tile.x, 19295);
        assert_eq!(tile.y, 24640);
        assert_eq!(tile.zoom, 16);
    }

    #[test]
    fn test_invalid_latitude() {
        let result = to_tile_coords(90.0, 0.0, 10);
        assert!(matches!(
            result.unwrap_err(),
            CoordError::InvalidLatitude(_)
        ));
    }

    #[test]
    fn test_invalid_zoom() {
        let result = to_tile_coords(40.0, -74.0, MAX_ZOOM + 1);
        assert!(matches!(result.unwrap_err(), CoordError::InvalidZoom(_)));
    }

    #[test]
    fn test_antimeridian_lands_in_grid() {
        let tile = to_tile_coords(0.0, 180.0, 5).unwrap();
        assert_eq!(tile.x, 31);

        let tile = to_tile_coords(MIN_LAT, 0.0, 5).unwrap();
        assert_eq!(tile.y, 31);
    }

    #[test]
    fn test_tile_center_is_inside_tile() {
        let tile = TileCoord {
            x: 19295,
            y: 24640,
            zoom: 16,
        };

        let (lat, lon) = tile_center(&tile);

        // Re-projecting the center must land on the same tile
        let reprojected = to_tile_coords(lat, lon, 16).unwrap();
        assert_eq!(reprojected, tile);
    }

    #[test]
    fn test_roundtrip_stability_at_different_zooms() {
        // project -> center -> re-project must be a fixed point
        let lat = 51.5074; // London
        let lon = -0.1278;

        for zoom in [1, 5, 10, 13, 16, 19] {
            let tile = to_tile_coords(lat, lon, zoom).unwrap();
            let (center_lat, center_lon) = tile_center(&tile);
            let again = to_tile_coords(center_lat, center_lon, zoom).unwrap();
            assert_eq!(
                tile, again,
                "Zoom {}: center re-projection moved to a different tile",
                zoom
            );
        }
    }

    #[test]
    fn test_covering_orders_corners() {
        // Y decreases as latitude increases, so the north corner projects
        // to the smaller Y index.
        let bbox = BoundingBox::new(34.2667, 112.7211, 34.9895, 114.2209).unwrap();
        let rect = TileRect::covering(&bbox, 13).unwrap();

        assert!(rect.x_min <= rect.x_max);
        assert!(rect.y_min <= rect.y_max);

        let north = to_tile_coords(bbox.max_lat(), bbox.min_lon(), 13).unwrap();
        assert_eq!(rect.y_min, north.y);
    }

    #[test]
    fn test_covering_henan_box_at_zoom_13() {
        // End-to-end example box: nonempty and bounded
        let bbox = BoundingBox::new(34.2667, 112.7211, 34.9895, 114.2209).unwrap();
        let rect = TileRect::covering(&bbox, 13).unwrap();

        assert!(rect.tile_count() > 0);
        assert!(rect.tile_count() < 10_000);
        assert_eq!(rect.iter().count() as u64, rect.tile_count());
    }

    #[test]
    fn test_rect_iterator_row_major() {
        let rect = TileRect {
            x_min: 2,
            x_max: 3,
            y_min: 5,
            y_max: 6,
            zoom: 4,
        };

        let tiles: Vec<_> = rect.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(tiles, vec![(2, 5), (3, 5), (2, 6), (3, 6)]);
    }

    #[test]
    fn test_rect_iterator_single_tile() {
        let rect = TileRect {
            x_min: 7,
            x_max: 7,
            y_min: 9,
            y_max: 9,
            zoom: 4,
        };

        let tiles: Vec<_> = rect.iter().collect();
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0], TileCoord { x: 7, y: 9, zoom: 4 });
    }

    #[test]
    fn test_rect_iterator_size_hint() {
        let rect = TileRect {
            x_min: 0,
            x_max: 4,
            y_min: 0,
            y_max: 2,
            zoom: 6,
        };

        let mut iter = rect.iter();
        assert_eq!(iter.len(), 15);
        iter.next();
        assert_eq!(iter.len(), 14);
        assert_eq!(iter.count(), 14);
    }

    #[test]
    fn test_in_bounds_filter_matches_brute_force() {
        // The enumerated in-bounds set must equal the set of all grid tiles
        // whose center satisfies contains().
        let bbox = BoundingBox::new(30.1, 110.2, 36.7, 115.9).unwrap();
        let zoom = 7;

        let enumerated: Vec<_> = TileRect::covering(&bbox, zoom)
            .unwrap()
            .iter()
            .filter(|tile| {
                let (lat, lon) = tile_center(tile);
                bbox.contains(lat, lon)
            })
            .collect();

        let n = 1u32 << zoom;
        let mut brute_force = Vec::new();
        for y in 0..n {
            for x in 0..n {
                let tile = TileCoord { x, y, zoom };
                let (lat, lon) = tile_center(&tile);
                if bbox.contains(lat, lon) {
                    brute_force.push(tile);
                }
            }
        }

        assert!(!enumerated.is_empty());
        assert_eq!(enumerated.len(), brute_force.len());
        for tile in &brute_force {
            assert!(enumerated.contains(tile), "missing in-bounds tile {:?}", tile);
        }
    }
}
