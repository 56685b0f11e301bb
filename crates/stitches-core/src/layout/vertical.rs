use super::{LayoutStrategy, ScanAxis, grid_extent, or_defaults, scan_place, stack_extent};
use crate::config::LayoutKind;
use crate::model::{Dimensions, Rect, Sprite};

/// Places sprites in a column, or in several columns of `limit` sprites each.
#[derive(Debug, Clone)]
pub struct VerticalLayout {
    max_pass: u32,
    /// Sprites per column; 0 means a single column.
    row_limit: u32,
}

impl VerticalLayout {
    pub fn new(max_pass: u32) -> Self {
        Self {
            max_pass,
            row_limit: 0,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.row_limit = limit;
        self
    }

    pub fn limit(&self) -> u32 {
        self.row_limit
    }
}

impl Default for VerticalLayout {
    fn default() -> Self {
        Self::new(2)
    }
}

impl LayoutStrategy for VerticalLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Vertical
    }

    fn max_pass(&self) -> u32 {
        self.max_pass
    }

    /// Single column: widest sprite by summed heights. With an active limit,
    /// `ceil(n / limit)` columns: summed column widths by the tallest column.
    fn dimensions(&self, sprites: &[Sprite], defaults: Dimensions) -> Dimensions {
        let limit = self.row_limit as usize;
        let (width, height) = if limit > 0 && limit < sprites.len() {
            grid_extent(sprites, limit, ScanAxis::Columns)
        } else {
            stack_extent(sprites, ScanAxis::Columns)
        };
        or_defaults(width, height, defaults)
    }

    fn place_sprite(
        &self,
        sprite: &mut Sprite,
        placed: &mut Vec<Rect>,
        dims: &mut Dimensions,
    ) -> bool {
        scan_place(sprite, placed, dims, self.max_pass, ScanAxis::Columns)
    }

    fn is_limitable(&self) -> bool {
        true
    }

    fn set_limit(&mut self, limit: u32) {
        self.row_limit = limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprites(sizes: &[(u32, u32)]) -> Vec<Sprite> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| Sprite::new(format!("s{i}"), w, h))
            .collect()
    }

    #[test]
    fn unlimited_stacks_heights() {
        let layout = VerticalLayout::default();
        let dims = layout.dimensions(
            &sprites(&[(30, 30), (20, 20), (10, 10)]),
            Dimensions::new(1, 1),
        );
        assert_eq!(dims, Dimensions::new(30, 60));
    }

    #[test]
    fn limit_splits_into_columns() {
        let layout = VerticalLayout::default().with_limit(2);
        // columns: [(30,30),(20,20)] and [(10,10)]
        let dims = layout.dimensions(
            &sprites(&[(30, 30), (20, 20), (10, 10)]),
            Dimensions::new(1, 1),
        );
        assert_eq!(dims, Dimensions::new(40, 50));
    }

    #[test]
    fn limit_at_or_above_count_is_inactive() {
        let set = sprites(&[(30, 30), (20, 20)]);
        let limited = VerticalLayout::default().with_limit(2);
        let plain = VerticalLayout::default();
        let d = Dimensions::new(1, 1);
        assert_eq!(limited.dimensions(&set, d), plain.dimensions(&set, d));
    }

    #[test]
    fn set_limit_installs_limit() {
        let mut layout = VerticalLayout::default();
        assert!(layout.is_limitable());
        layout.set_limit(4);
        assert_eq!(layout.limit(), 4);
    }
}
