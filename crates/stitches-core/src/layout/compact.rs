use super::{LayoutStrategy, ScanAxis, or_defaults, scan_place};
use crate::config::LayoutKind;
use crate::model::{Dimensions, Rect, Sprite};

/// Square-ish layout: the canvas starts near `sqrt(total area)` and sprites
/// are scanned column by column across it.
#[derive(Debug, Clone)]
pub struct CompactLayout {
    max_pass: u32,
}

impl CompactLayout {
    pub fn new(max_pass: u32) -> Self {
        Self { max_pass }
    }
}

impl Default for CompactLayout {
    fn default() -> Self {
        Self::new(2)
    }
}

impl LayoutStrategy for CompactLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Compact
    }

    fn max_pass(&self) -> u32 {
        self.max_pass
    }

    fn dimensions(&self, sprites: &[Sprite], defaults: Dimensions) -> Dimensions {
        let mut area = 0u64;
        let mut widest = 0u32;
        let mut tallest = 0u32;
        for s in sprites {
            area += s.area();
            widest = widest.max(s.width());
            tallest = tallest.max(s.height());
        }
        let side = (area as f64).sqrt().ceil().min(u32::MAX as f64) as u32;
        or_defaults(side.max(widest), side.max(tallest), defaults)
    }

    fn place_sprite(
        &self,
        sprite: &mut Sprite,
        placed: &mut Vec<Rect>,
        dims: &mut Dimensions,
    ) -> bool {
        scan_place(sprite, placed, dims, self.max_pass, ScanAxis::Columns)
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
    fn estimate_is_square_root_of_area() {
        let layout = CompactLayout::default();
        let dims = layout.dimensions(&sprites(&[(10, 10); 4]), Dimensions::new(1, 1));
        assert_eq!(dims, Dimensions::new(20, 20));
    }

    #[test]
    fn estimate_never_smaller_than_largest_side() {
        let layout = CompactLayout::default();
        let dims = layout.dimensions(&sprites(&[(100, 2), (3, 3)]), Dimensions::new(1, 1));
        assert_eq!(dims.width, 100);
        assert!(dims.height >= 15);
    }

    #[test]
    fn empty_set_uses_defaults() {
        let layout = CompactLayout::default();
        let dims = layout.dimensions(&[], Dimensions::new(64, 32));
        assert_eq!(dims, Dimensions::new(64, 32));
        assert!(!layout.is_limitable());
    }
}
