use crate::config::{LayoutConfig, LayoutKind};
use crate::error::Result;
use crate::layout::{LayoutStrategy, build_strategy};
use crate::model::{
    Dimensions, FailureReason, Layout, Placement, Sprite, SpriteFailure, SpriteInput,
};
use crate::progress::Progress;
use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of [`place_sprites`]. Indices refer to the sprite slice after sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementRun {
    /// Successfully placed sprites, in placement order.
    pub order: Vec<usize>,
    /// Sprites left unplaced and why.
    pub unplaced: Vec<(usize, FailureReason)>,
    /// Working canvas after all growth, before trimming.
    pub working: Dimensions,
    /// Trimmed canvas.
    pub dimensions: Dimensions,
}

/// Sorts by area descending, then by name descending.
pub fn sort_sprites(sprites: &mut [Sprite]) {
    sprites.sort_by(|a, b| {
        b.area()
            .cmp(&a.area())
            .then_with(|| b.name.cmp(&a.name))
    });
}

/// Tight bounding box of the placed sprites, or `defaults` when nothing was placed.
pub fn trim(sprites: &[Sprite], defaults: Dimensions) -> Dimensions {
    let mut w = 0u32;
    let mut h = 0u32;
    for s in sprites.iter().filter(|s| s.placed) {
        w = w.max(s.frame.right());
        h = h.max(s.frame.bottom());
    }
    Dimensions::new(
        if w == 0 { defaults.width } else { w },
        if h == 0 { defaults.height } else { h },
    )
}

/// Runs one placement pass over `sprites` with `strategy`.
///
/// Every sprite is reset, the slice is sorted in place, the strategy sizes the
/// starting canvas and then places sprites one by one. Sprites that cannot be
/// placed stay at `(0, 0)` with `placed == false`; the run continues with the
/// canvas as grown so far. `progress` receives `placed / total` after each
/// attempt and is polled for cancellation between sprites.
pub fn place_sprites<P: Progress + ?Sized>(
    sprites: &mut [Sprite],
    strategy: &dyn LayoutStrategy,
    defaults: Dimensions,
    progress: &mut P,
) -> PlacementRun {
    for s in sprites.iter_mut() {
        s.reset();
    }
    sort_sprites(sprites);

    let mut dims = strategy.dimensions(sprites, defaults);
    debug!(
        layout = %strategy.kind(),
        width = dims.width,
        height = dims.height,
        "initial canvas"
    );

    let total = sprites.len();
    let mut placed = Vec::with_capacity(total);
    let mut order = Vec::with_capacity(total);
    let mut unplaced = Vec::new();

    for i in 0..total {
        if progress.is_cancelled() {
            warn!(remaining = total - i, "placement cancelled");
            unplaced.extend((i..total).map(|j| (j, FailureReason::Cancelled)));
            break;
        }
        let sprite = &mut sprites[i];
        if strategy.place_sprite(sprite, &mut placed, &mut dims) {
            order.push(i);
        } else {
            warn!(
                name = %sprite.name,
                width = sprite.width(),
                height = sprite.height(),
                "sprite could not be placed"
            );
            unplaced.push((
                i,
                FailureReason::PlacementExhausted {
                    passes: strategy.max_pass(),
                },
            ));
        }
        notify(progress, order.len() as f32 / total as f32);
    }

    PlacementRun {
        order,
        unplaced,
        working: dims,
        dimensions: trim(sprites, defaults),
    }
}

fn notify<P: Progress + ?Sized>(progress: &mut P, fraction: f32) {
    if catch_unwind(AssertUnwindSafe(|| progress.report(fraction))).is_err() {
        warn!(fraction, "progress sink panicked; ignoring");
    }
}

#[instrument(skip_all, fields(layout = %cfg.layout))]
/// Packs sprite descriptors into one sheet and returns placements and the trimmed canvas.
///
/// Notes:
/// - Sprites with a zero side or a repeated name are rejected up front and listed in `failures`.
/// - An empty (or fully rejected) input yields the configured default dimensions.
/// - Only an invalid configuration is returned as `Err`.
pub fn pack_layout<I, S>(inputs: I, cfg: &LayoutConfig) -> Result<Layout>
where
    I: IntoIterator<Item = S>,
    S: Into<SpriteInput>,
{
    pack_layout_with_progress(inputs, cfg, &mut ())
}

#[instrument(skip_all, fields(layout = %cfg.layout))]
/// Like [`pack_layout`], reporting progress to `progress`.
pub fn pack_layout_with_progress<I, S, P>(
    inputs: I,
    cfg: &LayoutConfig,
    progress: &mut P,
) -> Result<Layout>
where
    I: IntoIterator<Item = S>,
    S: Into<SpriteInput>,
    P: Progress + ?Sized,
{
    cfg.validate()?;

    let (accepted, mut failures) = validate_inputs(inputs.into_iter().map(Into::into));
    let strategy = build_strategy(cfg);

    let mut working: Vec<Sprite> = accepted.clone();
    let run = place_sprites(&mut working, strategy.as_ref(), cfg.default_dimensions(), progress);

    // Map sorted positions back to input order.
    let input_pos: HashMap<&str, usize> = accepted
        .iter()
        .enumerate()
        .map(|(i, s)| (s.name.as_str(), i))
        .collect();
    let mut sprites: Vec<Placement> = accepted
        .iter()
        .map(|s| Placement {
            name: s.name.clone(),
            frame: s.frame,
            placed: false,
        })
        .collect();
    for s in &working {
        let p = &mut sprites[input_pos[s.name.as_str()]];
        p.frame = s.frame;
        p.placed = s.placed;
    }
    let order = run
        .order
        .iter()
        .map(|&i| input_pos[working[i].name.as_str()])
        .collect();
    failures.extend(run.unplaced.into_iter().map(|(i, reason)| SpriteFailure {
        name: working[i].name.clone(),
        reason,
    }));

    let layout = Layout {
        width: run.dimensions.width,
        height: run.dimensions.height,
        sprites,
        order,
        failures,
    };
    info!(
        placed = layout.placed_count(),
        failed = layout.failures.len(),
        width = layout.width,
        height = layout.height,
        "layout computed"
    );
    Ok(layout)
}

/// Splits inputs into accepted sprites (input order) and rejections.
fn validate_inputs(inputs: impl Iterator<Item = SpriteInput>) -> (Vec<Sprite>, Vec<SpriteFailure>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut accepted = Vec::new();
    let mut failures = Vec::new();
    for input in inputs {
        let reason = if input.width == 0 || input.height == 0 {
            Some(FailureReason::InvalidSprite {
                reason: format!("non-positive size {}x{}", input.width, input.height),
            })
        } else if seen.contains(&input.name) {
            Some(FailureReason::DuplicateName)
        } else {
            None
        };
        match reason {
            Some(reason) => {
                warn!(name = %input.name, ?reason, "sprite rejected");
                failures.push(SpriteFailure {
                    name: input.name,
                    reason,
                });
            }
            None => {
                seen.insert(input.name.clone());
                accepted.push(Sprite::from(&input));
            }
        }
    }
    (accepted, failures)
}

/// Packs the same inputs with every layout kind, each run on independent state.
///
/// With feature "parallel" and `cfg.parallel`, candidates are evaluated on the rayon pool.
pub fn compare_layouts(
    inputs: &[SpriteInput],
    cfg: &LayoutConfig,
) -> Vec<(LayoutKind, Result<Layout>)> {
    let run_one = |kind: LayoutKind| {
        let mut c = cfg.clone();
        c.layout = kind;
        (kind, pack_layout(inputs, &c))
    };

    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            return LayoutKind::ALL.par_iter().map(|&k| run_one(k)).collect();
        }
    }

    LayoutKind::ALL.iter().map(|&k| run_one(k)).collect()
}

/// Picks the smallest canvas among [`compare_layouts`] results that placed everything.
/// Ties keep the earlier kind (compact, horizontal, vertical).
pub fn best_layout(inputs: &[SpriteInput], cfg: &LayoutConfig) -> Result<(LayoutKind, Layout)> {
    let mut best: Option<(LayoutKind, Layout)> = None;
    let mut fallback: Option<(LayoutKind, Layout)> = None;
    for (kind, res) in compare_layouts(inputs, cfg) {
        let layout = res?;
        if !layout.all_placed() {
            if fallback.is_none() {
                fallback = Some((kind, layout));
            }
            continue;
        }
        let area = layout.dimensions().area();
        match &best {
            Some((_, b)) if b.dimensions().area() <= area => {}
            _ => best = Some((kind, layout)),
        }
    }
    match best.or(fallback) {
        Some(b) => Ok(b),
        // compare_layouts always yields one entry per kind
        None => pack_layout(inputs, cfg).map(|l| (cfg.layout, l)),
    }
}
