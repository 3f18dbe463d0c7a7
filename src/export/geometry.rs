//! Conversions between editor pixel space and engine space.
//!
//! The editor measures in pixels with y pointing down. The engine measures
//! tiles in units of one tile with y pointing up, and addresses sprite
//! textures with normalized UV coordinates.

use serde::Serialize;

/// Default UV inset keeping samples away from neighbouring atlas cells.
pub const UV_EPSILON: f64 = 0.001;

/// A 2D vector as the engine's descriptors spell it (`x:`/`y:` keys).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Normalized texture rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl UvRect {
    /// The whole texture.
    pub const FULL: UvRect = UvRect {
        min: Vec2::new(0.0, 0.0),
        max: Vec2::new(1.0, 1.0),
    };
}

/// Pixel layout of an atlas image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasLayout {
    pub image_width: u32,
    pub image_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub spacing: u32,
}

impl AtlasLayout {
    /// Whole cells that fit in one image row.
    pub fn columns(&self) -> u32 {
        self.image_width / (self.tile_width + self.spacing).max(1)
    }

    /// Inset UV rectangle of a tile; `None` when no column fits.
    pub fn uv(&self, tile_id: u32, epsilon: f64) -> Option<UvRect> {
        let columns = self.columns();
        if columns == 0 {
            return None;
        }

        let column = tile_id % columns;
        let row = tile_id / columns;

        let x0 = (column * (self.tile_width + self.spacing)) as f64;
        let y0 = (row * (self.tile_height + self.spacing)) as f64;
        let x1 = x0 + self.tile_width as f64;
        let y1 = y0 + self.tile_height as f64;

        let w = self.image_width as f64;
        let h = self.image_height as f64;

        Some(UvRect {
            min: Vec2::new(epsilon + x0 / w, epsilon + y0 / h),
            max: Vec2::new(-epsilon + x1 / w, -epsilon + y1 / h),
        })
    }
}

/// Half size in world units of a loose-image sprite.
pub fn loose_half_size(width: f64, height: f64, scale_divider: f64) -> Vec2 {
    Vec2::new(0.5 * width / scale_divider, 0.5 * height / scale_divider)
}

/// Half size of an atlas sprite: one tile is one world unit.
pub const ATLAS_HALF_SIZE: Vec2 = Vec2::new(0.5, 0.5);

/// Centre of a shape relative to its tile's centre, in tile units, y up.
pub fn shape_translation(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    tile_width: f64,
    tile_height: f64,
) -> Vec2 {
    Vec2::new(
        (x + width / 2.0) / tile_width - 0.5,
        0.5 - (y + height / 2.0) / tile_height,
    )
}

/// Rectangle half extents in tile units.
pub fn box_half_extents(width: f64, height: f64, tile_width: f64, tile_height: f64) -> Vec2 {
    Vec2::new((width / 2.0) / tile_width, (height / 2.0) / tile_height)
}

/// Map tile size and layer offset shared by every placement on a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub tile_width: f64,
    pub tile_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    /// Location of a free-form object, in map tiles.
    pub fn object(&self, x: f64, y: f64, width: f64, height: f64) -> Vec2 {
        Vec2::new(
            (width * 0.5 + x + self.offset_x) / self.tile_width,
            (height * 0.5 - y - self.offset_y) / self.tile_height,
        )
    }

    /// Centre of grid cell `(x, y)`, in map tiles.
    pub fn cell(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            x as f64 + 0.5 + self.offset_x / self.tile_width,
            -(y as f64) - 0.5 - self.offset_y / self.tile_height,
        )
    }
}
