//! Layout engine for sprite sheets.
//!
//! - Strategies: Compact (square-ish), Horizontal (rows), Vertical (columns), with optional row/column limits
//! - Pipeline: `pack_layout` sorts sprites (area desc, name desc), sizes a starting canvas, places
//!   sprites greedily with bounded canvas growth, then trims to the placed content
//! - Only geometry goes in and out; rendering (`compositing`, feature `image`) and CSS/JSON export are helpers.
//!
//! Quick example:
//! ```
//! use stitches_core::{LayoutConfig, LayoutKind, SpriteInput, pack_layout};
//! # fn main() -> stitches_core::Result<()> {
//! let sprites = vec![
//!     SpriteInput::new("large", 30, 30),
//!     SpriteInput::new("medium", 20, 20),
//!     SpriteInput::new("small", 10, 10),
//! ];
//! let cfg = LayoutConfig::builder().layout(LayoutKind::Vertical).build();
//! let layout = pack_layout(sprites, &cfg)?;
//! assert_eq!((layout.width, layout.height), (30, 60));
//! assert!(layout.all_placed());
//! # Ok(()) }
//! ```

#[cfg(feature = "image")]
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod intersection;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod stylesheet;

pub use config::*;
pub use error::*;
pub use export::*;
pub use intersection::*;
pub use layout::*;
pub use model::*;
pub use pipeline::*;
pub use progress::*;
pub use stylesheet::*;

/// Convenience prelude for common types and functions.
/// Importing `stitches_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{LayoutConfig, LayoutConfigBuilder, LayoutKind};
    pub use crate::layout::{CompactLayout, HorizontalLayout, LayoutStrategy, VerticalLayout};
    pub use crate::model::{
        Dimensions, FailureReason, Layout, LayoutStats, Placement, Rect, Sprite, SpriteFailure,
        SpriteInput,
    };
    pub use crate::progress::{CancelFlag, Cancellable, Progress};
    pub use crate::stylesheet::StylesheetOptions;
    pub use crate::{
        best_layout, compare_layouts, pack_layout, pack_layout_with_progress, place_sprites,
    };
}
