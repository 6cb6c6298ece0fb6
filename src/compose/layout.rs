//! Layout table mapping photo counts to cell geometry
//!
//! Every strategy works in canvas pixels with fractional coordinates; cells are
//! snapped to whole pixels only when drawn, so the geometry stays exact.

use crate::io::configuration::{
    CANVAS_HEIGHT, CANVAS_WIDTH, FIVE_BANNER_HEIGHT, HEADER_HEIGHT, HERO_WIDTH, PADDING,
    SEVEN_BANNER_HEIGHT,
};
use std::collections::BTreeMap;

/// Canvas dimensions shared by the header and body layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasGeometry {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Header band height
    pub header_height: u32,
    /// Gap between cells and around the body
    pub padding: u32,
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            header_height: HEADER_HEIGHT,
            padding: PADDING,
        }
    }
}

impl CanvasGeometry {
    /// Top edge of the body area
    pub fn body_top(&self) -> f64 {
        f64::from(self.header_height + self.padding)
    }

    /// Height of the body area (canvas below the header, less one padding)
    pub fn body_height(&self) -> f64 {
        f64::from(self.height) - f64::from(self.header_height) - f64::from(self.padding)
    }

    fn pad(&self) -> f64 {
        f64::from(self.padding)
    }

    fn width_f(&self) -> f64 {
        f64::from(self.width)
    }

    fn height_f(&self) -> f64 {
        f64::from(self.height)
    }

    // Hand-authored lengths are defined at the default canvas size
    fn scale_x(&self, length: u32) -> f64 {
        f64::from(length) * self.width_f() / f64::from(CANVAS_WIDTH)
    }

    fn scale_y(&self, length: u32) -> f64 {
        f64::from(length) * self.height_f() / f64::from(CANVAS_HEIGHT)
    }
}

/// One placement rectangle in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// A cell snapped to whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge
    pub x: i64,
    /// Top edge
    pub y: i64,
    /// Width (at least one pixel)
    pub width: u32,
    /// Height (at least one pixel)
    pub height: u32,
}

impl Cell {
    /// Build a cell from its origin and size
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Snap to pixels so that adjacent cells keep a consistent gap
    ///
    /// Edges are rounded independently and the size is the distance between
    /// rounded edges.
    pub fn to_pixels(&self) -> PixelRect {
        let left = self.x.round();
        let top = self.y.round();
        let right = (self.x + self.width).round();
        let bottom = (self.y + self.height).round();
        PixelRect {
            x: left as i64,
            y: top as i64,
            width: (right - left).max(1.0) as u32,
            height: (bottom - top).max(1.0) as u32,
        }
    }
}

/// Produces the body cells for one photo count
pub trait LayoutStrategy: Send + Sync {
    /// Cells in draw order; the first photo goes into the first cell
    fn cells(&self, geometry: &CanvasGeometry) -> Vec<Cell>;
}

/// Uniform grid filling the whole body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformGrid {
    /// Number of columns
    pub cols: usize,
    /// Number of rows
    pub rows: usize,
    /// Number of cells to emit, row-major (may leave the last row short)
    pub count: usize,
}

impl UniformGrid {
    /// Square-ish grid for an arbitrary count
    ///
    /// Up to three photos sit in a single row; beyond that the column count is
    /// the ceiling of the square root.
    pub fn square_for(count: usize) -> Self {
        let count = count.max(1);
        let cols = if count <= 3 {
            count
        } else {
            (count as f64).sqrt().ceil() as usize
        };
        let rows = count.div_ceil(cols);
        Self { cols, rows, count }
    }
}

fn grid_cells(
    geometry: &CanvasGeometry,
    cols: usize,
    rows: usize,
    count: usize,
    top: f64,
    height: f64,
) -> Vec<Cell> {
    let pad = geometry.pad();
    let cols_f = cols as f64;
    let rows_f = rows as f64;
    let cell_w = (geometry.width_f() - (cols_f + 1.0) * pad) / cols_f;
    let cell_h = (height - (rows_f + 1.0) * pad) / rows_f;

    (0..count)
        .map(|i| {
            let row = (i / cols) as f64;
            let col = (i % cols) as f64;
            Cell::new(
                pad + col * (cell_w + pad),
                top + pad + row * (cell_h + pad),
                cell_w,
                cell_h,
            )
        })
        .collect()
}

impl LayoutStrategy for UniformGrid {
    fn cells(&self, geometry: &CanvasGeometry) -> Vec<Cell> {
        grid_cells(
            geometry,
            self.cols.max(1),
            self.rows.max(1),
            self.count,
            geometry.body_top(),
            geometry.body_height(),
        )
    }
}

/// Four photos: a tall hero on the left and three stacked cells on the right
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroWithStack;

impl LayoutStrategy for HeroWithStack {
    fn cells(&self, geometry: &CanvasGeometry) -> Vec<Cell> {
        let pad = geometry.pad();
        let hero_w = geometry.scale_x(HERO_WIDTH);
        let side_w = geometry.width_f() - hero_w - pad;
        let hero_h = geometry.height_f() - f64::from(geometry.header_height) - 2.0 * pad;
        let side_h = (hero_h - 2.0 * pad) / 3.0;
        let top = geometry.body_top();

        let mut cells = vec![Cell::new(pad, top, hero_w - pad, hero_h)];
        cells.extend((0..3).map(|k| {
            let k = f64::from(k);
            Cell::new(hero_w, top + k * (side_h + pad), side_w - pad, side_h)
        }));
        cells
    }
}

/// Five photos: a full-width banner over a two-by-two block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerOverPairs;

impl LayoutStrategy for BannerOverPairs {
    fn cells(&self, geometry: &CanvasGeometry) -> Vec<Cell> {
        let pad = geometry.pad();
        let width = geometry.width_f();
        let top = geometry.body_top();
        let banner_h = geometry.scale_y(FIVE_BANNER_HEIGHT);

        let bottom_y = top + banner_h + pad;
        let bottom_h = geometry.height_f() - bottom_y - pad;
        let cell_w = (width - 3.0 * pad) / 2.0;
        let cell_h = bottom_h / 2.0 - pad / 2.0;
        let second_row = bottom_y + bottom_h / 2.0 + pad / 2.0;

        vec![
            Cell::new(pad, top, width - 2.0 * pad, banner_h),
            Cell::new(pad, bottom_y, cell_w, cell_h),
            Cell::new(pad + cell_w + pad, bottom_y, cell_w, cell_h),
            Cell::new(pad, second_row, cell_w, cell_h),
            Cell::new(pad + cell_w + pad, second_row, cell_w, cell_h),
        ]
    }
}

/// Seven photos: a full-width banner over a three-by-two grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerOverGrid;

impl LayoutStrategy for BannerOverGrid {
    fn cells(&self, geometry: &CanvasGeometry) -> Vec<Cell> {
        let pad = geometry.pad();
        let top = geometry.body_top();
        let banner_h = geometry.scale_y(SEVEN_BANNER_HEIGHT);
        let grid_y = top + banner_h + pad;
        let grid_h = geometry.height_f() - grid_y - pad;

        let mut cells = vec![Cell::new(pad, top, geometry.width_f() - 2.0 * pad, banner_h)];
        cells.extend(grid_cells(geometry, 3, 2, 6, grid_y, grid_h));
        cells
    }
}

/// Strategies keyed by photo count, with a square-grid fallback
pub struct LayoutTable {
    strategies: BTreeMap<usize, Box<dyn LayoutStrategy>>,
}

impl Default for LayoutTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register(4, HeroWithStack);
        table.register(5, BannerOverPairs);
        table.register(
            6,
            UniformGrid {
                cols: 3,
                rows: 2,
                count: 6,
            },
        );
        table.register(7, BannerOverGrid);
        table
    }
}

impl LayoutTable {
    /// Table with no hand-authored entries; every count uses the fallback grid
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// Install or replace the strategy for one photo count
    pub fn register(&mut self, count: usize, strategy: impl LayoutStrategy + 'static) {
        self.strategies.insert(count, Box::new(strategy));
    }

    /// Whether a hand-authored strategy exists for this count
    pub fn has_strategy(&self, count: usize) -> bool {
        self.strategies.contains_key(&count)
    }

    /// Body cells for `count` photos
    pub fn cells_for(&self, count: usize, geometry: &CanvasGeometry) -> Vec<Cell> {
        self.strategies.get(&count).map_or_else(
            || UniformGrid::square_for(count).cells(geometry),
            |strategy| strategy.cells(geometry),
        )
    }
}

impl std::fmt::Debug for LayoutTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutTable")
            .field("counts", &self.strategies.keys().collect::<Vec<_>>())
            .finish()
    }
}
