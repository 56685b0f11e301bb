use crate::error::StitchError;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }
    pub fn area(&self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }
    /// Strict overlap test; rectangles sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
}

/// External sprite descriptor: a unique name and a positive size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteInput {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl SpriteInput {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

impl From<&SpriteInput> for SpriteInput {
    fn from(input: &SpriteInput) -> Self {
        input.clone()
    }
}

impl<K: Into<String>> From<(K, u32, u32)> for SpriteInput {
    fn from((name, width, height): (K, u32, u32)) -> Self {
        Self::new(name, width, height)
    }
}

/// Working record for one sprite during a run. The frame's position is
/// written by the active strategy; `placed` is set once it is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub name: String,
    pub frame: Rect,
    pub placed: bool,
}

impl Sprite {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            frame: Rect::new(0, 0, width, height),
            placed: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.frame.w
    }

    pub fn height(&self) -> u32 {
        self.frame.h
    }

    pub fn area(&self) -> u64 {
        self.frame.area()
    }

    /// Discards any previous placement.
    pub fn reset(&mut self) {
        self.frame.x = 0;
        self.frame.y = 0;
        self.placed = false;
    }
}

impl From<&SpriteInput> for Sprite {
    fn from(input: &SpriteInput) -> Self {
        Sprite::new(input.name.clone(), input.width, input.height)
    }
}

/// Working canvas bounds for one run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn grow_by(&mut self, width: u32, height: u32) {
        self.width = self.width.saturating_add(width);
        self.height = self.height.saturating_add(height);
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Final position of one accepted sprite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub name: String,
    pub frame: Rect,
    pub placed: bool,
}

/// Why a sprite is missing from the sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Zero width or height.
    InvalidSprite { reason: String },
    /// Another sprite in the same run already uses this name.
    DuplicateName,
    /// No free position after every growth pass.
    PlacementExhausted { passes: u32 },
    /// The run was cancelled before this sprite was attempted.
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteFailure {
    pub name: String,
    pub reason: FailureReason,
}

impl SpriteFailure {
    pub fn to_error(&self) -> StitchError {
        let name = self.name.clone();
        match &self.reason {
            FailureReason::InvalidSprite { reason } => StitchError::InvalidSprite {
                name,
                reason: reason.clone(),
            },
            FailureReason::DuplicateName => StitchError::DuplicateName(name),
            FailureReason::PlacementExhausted { passes } => StitchError::PlacementExhausted {
                name,
                passes: *passes,
            },
            FailureReason::Cancelled => StitchError::Cancelled(name),
        }
    }

    /// True if the sprite never entered placement (rejected during validation).
    pub fn is_rejected(&self) -> bool {
        matches!(
            self.reason,
            FailureReason::InvalidSprite { .. } | FailureReason::DuplicateName
        )
    }
}

/// Result of one packing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Trimmed canvas width (or the default width when nothing was placed).
    pub width: u32,
    /// Trimmed canvas height (or the default height when nothing was placed).
    pub height: u32,
    /// One entry per accepted sprite, in input order.
    pub sprites: Vec<Placement>,
    /// Indices into `sprites`, in the order sprites were placed.
    pub order: Vec<usize>,
    /// Rejected, exhausted and cancelled sprites.
    pub failures: Vec<SpriteFailure>,
}

impl Layout {
    pub fn all_placed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn placed_count(&self) -> usize {
        self.order.len()
    }

    pub fn get(&self, name: &str) -> Option<&Placement> {
        self.sprites.iter().find(|p| p.name == name)
    }

    /// Placed sprites in placement order.
    pub fn placed(&self) -> impl Iterator<Item = &Placement> {
        self.order.iter().map(move |&i| &self.sprites[i])
    }

    pub fn placed_frames(&self) -> Vec<Rect> {
        self.placed().map(|p| p.frame).collect()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Computes packing statistics for this layout.
    pub fn stats(&self) -> LayoutStats {
        let canvas_area = self.dimensions().area();
        let used_area: u64 = self.placed().map(|p| p.frame.area()).sum();
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        LayoutStats {
            num_sprites: self.sprites.len(),
            num_placed: self.placed_count(),
            num_failed: self.failures.len(),
            width: self.width,
            height: self.height,
            canvas_area,
            used_area,
            occupancy,
        }
    }
}

/// Statistics about sheet packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Accepted sprites (rejected inputs are not counted).
    pub num_sprites: usize,
    pub num_placed: usize,
    /// Rejected, exhausted and cancelled sprites.
    pub num_failed: usize,
    pub width: u32,
    pub height: u32,
    pub canvas_area: u64,
    /// Sum of placed sprite areas.
    pub used_area: u64,
    /// used_area / canvas_area (0.0 to 1.0).
    pub occupancy: f64,
}

impl LayoutStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Canvas: {}x{}, Sprites: {}/{} placed, Failed: {}, Occupancy: {:.2}%, Used Area: {} px²",
            self.width,
            self.height,
            self.num_placed,
            self.num_sprites,
            self.num_failed,
            self.occupancy * 100.0,
            self.used_area,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.canvas_area > 0 {
            (self.wasted_area() as f64 / self.canvas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
