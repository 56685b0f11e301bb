use crate::model::Rect;

/// Returns the first rectangle in `placed` that overlaps `candidate`.
///
/// `placed` is scanned in insertion order, so the reported obstacle is the
/// earliest-placed one. The layout scan jumps past whichever obstacle this
/// returns, which makes the order part of the placement result.
pub fn find_intersection<'a>(candidate: &Rect, placed: &'a [Rect]) -> Option<&'a Rect> {
    placed.iter().find(|r| candidate.overlaps(r))
}
