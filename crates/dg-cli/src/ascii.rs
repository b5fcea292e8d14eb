//! Character-grid renderer
//!
//! Rasterises a floor plan onto a grid where one cell covers `scale` layout
//! units on each axis. Rooms are filled by role; corridors are drawn only
//! through empty cells. A scale too fine for the plan's extent is coarsened
//! so neither side exceeds [`MAX_GRID_SIDE`] cells.

use crossterm::style::Stylize;
use dg_core::{FloorPlan, Point, Renderer, Room};

use crate::display::{GlyphSet, GraphicsMode, Tile};

/// Longest grid side; finer scales are coarsened to fit
pub const MAX_GRID_SIDE: usize = 1000;

pub struct AsciiRenderer {
    scale: f64,
    glyphs: Box<dyn GlyphSet>,
    color: bool,
    output: String,
}

impl AsciiRenderer {
    /// `scale` must be positive
    pub fn new(scale: f64, mode: GraphicsMode, color: bool) -> Self {
        Self {
            scale,
            glyphs: mode.glyphs(),
            color,
            output: String::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn paint(&self, tile: Tile) -> String {
        let ch = self.glyphs.tile_char(tile);
        match tile.color() {
            Some(color) if self.color => ch.with(color).to_string(),
            _ => ch.to_string(),
        }
    }
}

impl Renderer for AsciiRenderer {
    fn render(&mut self, plan: &FloorPlan) {
        let grid = Grid::covering(plan, self.scale);
        let mut out = String::new();
        for row in grid.cells.chunks(grid.width.max(1)) {
            let line: String = row.iter().map(|&t| self.paint(t)).collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
        self.output = out;
    }
}

struct Grid {
    origin: Point,
    scale: f64,
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl Grid {
    fn covering(plan: &FloorPlan, scale: f64) -> Self {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for room in &plan.rooms {
            min = Point::new(min.x.min(room.x), min.y.min(room.y));
            max = Point::new(max.x.max(room.right()), max.y.max(room.bottom()));
        }

        let extent = max - min;
        let scale = if plan.rooms.is_empty() {
            scale
        } else {
            scale.max(extent.x.max(extent.y) / MAX_GRID_SIDE as f64)
        };

        let (width, height) = if plan.rooms.is_empty() {
            (0, 0)
        } else {
            (
                (extent.x / scale).ceil().clamp(1.0, MAX_GRID_SIDE as f64) as usize,
                (extent.y / scale).ceil().clamp(1.0, MAX_GRID_SIDE as f64) as usize,
            )
        };

        let mut grid = Self {
            origin: min,
            scale,
            width,
            height,
            cells: vec![Tile::Empty; width * height],
        };

        for (idx, room) in plan.rooms.iter().enumerate() {
            let tile = if plan.promoted.contains(&idx) {
                Tile::Connector
            } else if room.is_primary() {
                Tile::Hub
            } else {
                Tile::Ordinary
            };
            grid.fill_room(room, tile);
        }
        for corridor in &plan.corridors {
            for segment in corridor.segments() {
                grid.draw_line(segment.start(), segment.end());
            }
        }
        grid
    }

    fn column(&self, x: f64) -> isize {
        ((x - self.origin.x) / self.scale).floor() as isize
    }

    fn row(&self, y: f64) -> isize {
        ((y - self.origin.y) / self.scale).floor() as isize
    }

    fn index(&self, col: isize, row: isize) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }

    fn fill_room(&mut self, room: &Room, tile: Tile) {
        let first_col = self.column(room.x);
        let last_col = (((room.right() - self.origin.x) / self.scale).ceil() as isize - 1).max(first_col);
        let first_row = self.row(room.y);
        let last_row = (((room.bottom() - self.origin.y) / self.scale).ceil() as isize - 1).max(first_row);

        for row in first_row..=last_row {
            for col in first_col..=last_col {
                if let Some(i) = self.index(col, row) {
                    self.cells[i] = tile;
                }
            }
        }
    }

    fn draw_line(&mut self, start: Point, end: Point) {
        let step = self.scale / 2.0;
        let steps = ((end - start).length() / step).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let p = Point::new(start.x + (end.x - start.x) * t, start.y + (end.y - start.y) * t);
            if let Some(idx) = self.index(self.column(p.x), self.row(p.y)) {
                if self.cells[idx] == Tile::Empty {
                    self.cells[idx] = Tile::Corridor;
                }
            }
        }
    }
}
