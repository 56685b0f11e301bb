use stitches_core::error::StitchError;
use stitches_core::prelude::*;

#[test]
fn empty_input_returns_defaults() {
    let cfg = LayoutConfig::builder()
        .with_default_dimensions(100, 100)
        .build();
    let layout = pack_layout(Vec::<SpriteInput>::new(), &cfg).unwrap();
    assert_eq!((layout.width, layout.height), (100, 100));
    assert!(layout.sprites.is_empty());
    assert!(layout.order.is_empty());
    assert!(layout.all_placed());
}

#[test]
fn empty_input_for_every_kind() {
    for kind in LayoutKind::ALL {
        let cfg = LayoutConfig::builder()
            .layout(kind)
            .with_default_dimensions(64, 48)
            .build();
        let layout = pack_layout(Vec::<SpriteInput>::new(), &cfg).unwrap();
        assert_eq!(layout.dimensions(), Dimensions::new(64, 48), "{kind}");
    }
}

#[test]
fn fully_rejected_input_returns_defaults() {
    let cfg = LayoutConfig::builder().with_default_dimensions(32, 32).build();
    let layout = pack_layout(vec![SpriteInput::new("flat", 10, 0)], &cfg).unwrap();
    assert_eq!((layout.width, layout.height), (32, 32));
    assert_eq!(layout.placed_count(), 0);
    assert_eq!(layout.failures.len(), 1);
}

#[test]
fn zero_default_dimensions_are_a_config_error() {
    let cfg = LayoutConfig::builder().with_default_dimensions(0, 0).build();
    match pack_layout(vec![SpriteInput::new("a", 1, 1)], &cfg) {
        Err(StitchError::InvalidConfig(msg)) => assert!(msg.contains("default dimensions")),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}
