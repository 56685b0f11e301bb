use crate::model::Layout;
use crate::stylesheet::class_names;
use serde_json::{Value, json};

/// Serialize the layout as `{ width, height, sprites, failures }`.
/// `sprites` lists placed sprites in placement order with their CSS class fragment.
pub fn to_json(layout: &Layout) -> Value {
    let classes = class_names(layout);
    let sprites: Vec<Value> = layout
        .placed()
        .map(|p| {
            json!({
                "name": p.name,
                "class": classes[p.name.as_str()],
                "x": p.frame.x,
                "y": p.frame.y,
                "width": p.frame.w,
                "height": p.frame.h,
            })
        })
        .collect();
    json!({
        "width": layout.width,
        "height": layout.height,
        "sprites": sprites,
        "failures": &layout.failures,
    })
}
