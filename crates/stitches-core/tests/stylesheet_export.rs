use stitches_core::prelude::*;
use stitches_core::{class_names, to_css, to_json};

fn layout() -> Layout {
    let cfg = LayoutConfig::builder().layout(LayoutKind::Vertical).build();
    pack_layout(
        vec![
            SpriteInput::new("zeta.png", 10, 10),
            SpriteInput::new("alpha.png", 20, 20),
            SpriteInput::new("broken", 0, 5),
        ],
        &cfg,
    )
    .unwrap()
}

#[test]
fn css_lists_sprites_by_name_with_offsets() {
    let css = to_css(&layout(), &StylesheetOptions::default());
    assert!(css.starts_with(".sprite {\n    background: url(spritesheet.png) no-repeat;\n}\n"));

    let alpha = css.find(".sprite-alpha {").expect("alpha rule");
    let zeta = css.find(".sprite-zeta {").expect("zeta rule");
    assert!(alpha < zeta);
    assert!(css.contains("    width: 20px;\n    height: 20px;\n    background-position: -0px -0px;"));
    assert!(css.contains("    width: 10px;\n    height: 10px;\n    background-position: -0px -20px;"));
    assert!(!css.contains("broken"));
}

#[test]
fn css_uses_custom_prefix_and_url() {
    let opts = StylesheetOptions {
        prefix: "icon".into(),
        image_url: "data:image/png;base64,AAAA".into(),
    };
    let css = to_css(&layout(), &opts);
    assert!(css.contains("url(data:image/png;base64,AAAA)"));
    assert!(css.contains(".icon-alpha {"));
}

#[test]
fn json_carries_sprites_and_failures() {
    let v = to_json(&layout());
    assert_eq!(v["width"], 20);
    assert_eq!(v["height"], 30);
    let sprites = v["sprites"].as_array().unwrap();
    assert_eq!(sprites.len(), 2);
    assert_eq!(sprites[0]["name"], "alpha.png");
    assert_eq!(sprites[0]["class"], "alpha");
    assert_eq!(sprites[1]["y"], 20);
    let failures = v["failures"].as_array().unwrap();
    assert_eq!(failures[0]["name"], "broken");
    assert_eq!(failures[0]["reason"]["kind"], "invalid_sprite");
}

#[test]
fn same_file_name_in_different_folders_gets_distinct_classes() {
    let cfg = LayoutConfig::builder().layout(LayoutKind::Vertical).build();
    let layout = pack_layout(
        vec![
            SpriteInput::new("ui/icon.png", 10, 10),
            SpriteInput::new("game/icon.png", 20, 20),
        ],
        &cfg,
    )
    .unwrap();
    let css = to_css(&layout, &StylesheetOptions::default());
    assert_eq!(css.matches(".sprite-ui-icon {").count(), 1);
    assert_eq!(css.matches(".sprite-game-icon {").count(), 1);
    assert!(!css.contains(".sprite-icon {"));
    assert!(css.contains(
        ".sprite-game-icon {\n    width: 20px;\n    height: 20px;\n    background-position: -0px -0px;"
    ));
    assert!(css.contains(
        ".sprite-ui-icon {\n    width: 10px;\n    height: 10px;\n    background-position: -0px -20px;"
    ));
}

#[test]
fn names_that_sanitise_alike_get_numbered_classes() {
    let cfg = LayoutConfig::builder().layout(LayoutKind::Vertical).build();
    let layout = pack_layout(
        vec![
            SpriteInput::new("arrow left.png", 10, 10),
            SpriteInput::new("arrow-left.png", 10, 10),
        ],
        &cfg,
    )
    .unwrap();
    let classes = class_names(&layout);
    assert_eq!(classes["arrow left.png"], "arrow-left");
    assert_eq!(classes["arrow-left.png"], "arrow-left-2");

    let css = to_css(&layout, &StylesheetOptions::default());
    assert_eq!(css.matches(".sprite-arrow-left {").count(), 1);
    assert_eq!(css.matches(".sprite-arrow-left-2 {").count(), 1);

    let v = to_json(&layout);
    let mut json_classes: Vec<&str> = v["sprites"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["class"].as_str().unwrap())
        .collect();
    json_classes.sort_unstable();
    assert_eq!(json_classes, ["arrow-left", "arrow-left-2"]);
}

#[cfg(feature = "image")]
#[test]
fn css_can_embed_the_rendered_sheet() {
    use image::{Rgba, RgbaImage};
    use std::collections::HashMap;
    use stitches_core::compositing::{png_data_uri, render_sheet};

    let layout = layout();
    let mut images = HashMap::new();
    images.insert("alpha.png".to_string(), RgbaImage::from_pixel(20, 20, Rgba([255, 0, 0, 255])));
    images.insert("zeta.png".to_string(), RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255])));
    let sheet = render_sheet(&layout, &images).unwrap();

    let opts = StylesheetOptions {
        image_url: png_data_uri(&sheet).unwrap(),
        ..StylesheetOptions::default()
    };
    let css = to_css(&layout, &opts);
    assert!(css.starts_with(".sprite {\n    background: url(data:image/png;base64,iVBORw0KGgo"));
    assert!(css.contains(") no-repeat;\n}\n"));
    assert!(css.contains(".sprite-zeta {"));
}
