use super::{LayoutStrategy, ScanAxis, grid_extent, or_defaults, scan_place, stack_extent};
use crate::config::LayoutKind;
use crate::model::{Dimensions, Rect, Sprite};

/// Places sprites in a row, or in several rows of `limit` sprites each.
#[derive(Debug, Clone)]
pub struct HorizontalLayout {
    max_pass: u32,
    /// Sprites per row; 0 means a single row.
    col_limit: u32,
}

impl HorizontalLayout {
    pub fn new(max_pass: u32) -> Self {
        Self {
            max_pass,
            col_limit: 0,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.col_limit = limit;
        self
    }

    pub fn limit(&self) -> u32 {
        self.col_limit
    }
}

impl Default for HorizontalLayout {
    fn default() -> Self {
        Self::new(2)
    }
}

impl LayoutStrategy for HorizontalLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Horizontal
    }

    fn max_pass(&self) -> u32 {
        self.max_pass
    }

    /// Transpose of the vertical estimate.
    fn dimensions(&self, sprites: &[Sprite], defaults: Dimensions) -> Dimensions {
        let limit = self.col_limit as usize;
        let (height, width) = if limit > 0 && limit < sprites.len() {
            grid_extent(sprites, limit, ScanAxis::Rows)
        } else {
            stack_extent(sprites, ScanAxis::Rows)
        };
        or_defaults(width, height, defaults)
    }

    fn place_sprite(
        &self,
        sprite: &mut Sprite,
        placed: &mut Vec<Rect>,
        dims: &mut Dimensions,
    ) -> bool {
        scan_place(sprite, placed, dims, self.max_pass, ScanAxis::Rows)
    }

    fn is_limitable(&self) -> bool {
        true
    }

    fn set_limit(&mut self, limit: u32) {
        self.col_limit = limit;
    }
}
