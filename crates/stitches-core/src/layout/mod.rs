use crate::config::{LayoutConfig, LayoutKind};
use crate::intersection::find_intersection;
use crate::model::{Dimensions, Rect, Sprite};
use tracing::{debug, trace};

pub mod compact;
pub mod horizontal;
pub mod vertical;

pub use compact::CompactLayout;
pub use horizontal::HorizontalLayout;
pub use vertical::VerticalLayout;

/// A layout strategy sizes the starting canvas and places sprites one at a time.
///
/// Implementations must never place a sprite overlapping anything in `placed`.
/// `place_sprite` may grow `dims`; it returns `false` when the sprite could not
/// be positioned, leaving the sprite at its reset position.
pub trait LayoutStrategy {
    fn kind(&self) -> LayoutKind;
    /// Canvas growth retries allowed per sprite.
    fn max_pass(&self) -> u32;
    /// Estimated canvas for `sprites`, falling back to `defaults` per axis when
    /// the estimate is zero.
    fn dimensions(&self, sprites: &[Sprite], defaults: Dimensions) -> Dimensions;
    fn place_sprite(&self, sprite: &mut Sprite, placed: &mut Vec<Rect>, dims: &mut Dimensions)
    -> bool;
    /// Whether rows/columns can be limited.
    fn is_limitable(&self) -> bool {
        false
    }
    /// Installs a row/column limit; 0 means unlimited. Ignored when not limitable.
    fn set_limit(&mut self, _limit: u32) {}
}

/// Builds the strategy selected by `cfg`, with its limit installed.
pub fn build_strategy(cfg: &LayoutConfig) -> Box<dyn LayoutStrategy> {
    let mut strategy: Box<dyn LayoutStrategy> = match cfg.layout {
        LayoutKind::Compact => Box::new(CompactLayout::new(cfg.max_pass)),
        LayoutKind::Horizontal => Box::new(HorizontalLayout::new(cfg.max_pass)),
        LayoutKind::Vertical => Box::new(VerticalLayout::new(cfg.max_pass)),
    };
    if strategy.is_limitable() {
        strategy.set_limit(cfg.effective_limit().unwrap_or(0));
    }
    strategy
}

/// Order in which candidate positions are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAxis {
    /// x outer, y inner: fills a column top to bottom before moving right.
    Columns,
    /// y outer, x inner: fills a row left to right before moving down.
    Rows,
}

/// Bounded grow-and-rescan placement shared by all strategies.
///
/// The canvas is scanned from the origin. On an obstacle the inner coordinate
/// jumps to the obstacle's far edge; after a column (row) the outer coordinate
/// jumps to the far edge of the last obstacle met in it. When a scan finds
/// nothing, both canvas sides grow by the sprite's size and the canvas is
/// scanned again, at most `max_pass` times. `max_pass == 0` fails without
/// scanning.
pub fn scan_place(
    sprite: &mut Sprite,
    placed: &mut Vec<Rect>,
    dims: &mut Dimensions,
    max_pass: u32,
    axis: ScanAxis,
) -> bool {
    if max_pass == 0 {
        return false;
    }
    let (w, h) = (sprite.width(), sprite.height());
    for pass in 0..=max_pass {
        if let Some(frame) = scan(w, h, placed, *dims, axis) {
            trace!(name = %sprite.name, x = frame.x, y = frame.y, pass, "placed");
            sprite.frame = frame;
            sprite.placed = true;
            placed.push(frame);
            return true;
        }
        if pass == max_pass {
            break;
        }
        dims.grow_by(w, h);
        debug!(
            name = %sprite.name,
            pass,
            width = dims.width,
            height = dims.height,
            "no free position, canvas grown"
        );
    }
    false
}

fn scan(w: u32, h: u32, placed: &[Rect], dims: Dimensions, axis: ScanAxis) -> Option<Rect> {
    let (outer_len, outer_size, inner_len, inner_size) = match axis {
        ScanAxis::Columns => (dims.width, w, dims.height, h),
        ScanAxis::Rows => (dims.height, h, dims.width, w),
    };
    if outer_size > outer_len || inner_size > inner_len {
        return None;
    }
    let outer_max = outer_len - outer_size;
    let inner_max = inner_len - inner_size;

    let mut outer = 0u32;
    while outer <= outer_max {
        let mut inner = 0u32;
        let mut last_hit = None;
        while inner <= inner_max {
            let candidate = match axis {
                ScanAxis::Columns => Rect::new(outer, inner, w, h),
                ScanAxis::Rows => Rect::new(inner, outer, w, h),
            };
            match find_intersection(&candidate, placed) {
                None => return Some(candidate),
                Some(hit) => {
                    // The hit overlaps the candidate, so its far edge is past `inner`.
                    inner = match axis {
                        ScanAxis::Columns => hit.bottom(),
                        ScanAxis::Rows => hit.right(),
                    };
                    last_hit = Some(*hit);
                }
            }
        }
        // The inner loop ran at least once and every candidate was blocked.
        let hit = last_hit?;
        outer = match axis {
            ScanAxis::Columns => hit.right(),
            ScanAxis::Rows => hit.bottom(),
        };
    }
    None
}

/// Single stack extent as `(across, along)`: widest sprite and summed heights
/// for `Columns`, tallest sprite and summed widths for `Rows`.
pub(crate) fn stack_extent(sprites: &[Sprite], axis: ScanAxis) -> (u32, u32) {
    let mut across = 0u32;
    let mut along = 0u32;
    for s in sprites {
        let (a, b) = match axis {
            ScanAxis::Columns => (s.width(), s.height()),
            ScanAxis::Rows => (s.height(), s.width()),
        };
        across = across.max(a);
        along = along.saturating_add(b);
    }
    (across, along)
}

/// Grid estimate for limited stacks: `sprites` is cut into groups of `limit`
/// placed side by side. Returns `(across, along)` like `stack_extent`, with
/// `across` summed over groups and `along` the longest group.
pub(crate) fn grid_extent(sprites: &[Sprite], limit: usize, axis: ScanAxis) -> (u32, u32) {
    let mut across = 0u32;
    let mut along = 0u32;
    for group in sprites.chunks(limit) {
        let (a, b) = stack_extent(group, axis);
        across = across.saturating_add(a);
        along = along.max(b);
    }
    (across, along)
}

pub(crate) fn or_defaults(width: u32, height: u32, defaults: Dimensions) -> Dimensions {
    Dimensions::new(
        if width == 0 { defaults.width } else { width },
        if height == 0 { defaults.height } else { height },
    )
}
