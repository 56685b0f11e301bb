use rand::{Rng, SeedableRng};
use stitches_core::prelude::*;

#[test]
fn equal_area_breaks_ties_by_name_descending() {
    let inputs = vec![SpriteInput::new("a", 10, 10), SpriteInput::new("b", 10, 10)];
    let cfg = LayoutConfig::builder().layout(LayoutKind::Vertical).build();
    let layout = pack_layout(inputs.clone(), &cfg).unwrap();
    // "b" sorts first and takes the origin
    assert_eq!(layout.order, vec![1, 0]);
    assert_eq!(layout.get("b").unwrap().frame, Rect::new(0, 0, 10, 10));
    assert_eq!(layout.get("a").unwrap().frame, Rect::new(0, 10, 10, 10));

    let again = pack_layout(inputs, &cfg).unwrap();
    assert_eq!(layout.sprites, again.sprites);
    assert_eq!(layout.order, again.order);
}

#[test]
fn input_order_does_not_matter() {
    let cfg = LayoutConfig::default();
    let forward = vec![
        SpriteInput::new("x", 8, 8),
        SpriteInput::new("y", 8, 8),
        SpriteInput::new("z", 16, 4),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();
    let a = pack_layout(forward, &cfg).unwrap();
    let b = pack_layout(reversed, &cfg).unwrap();
    assert_eq!((a.width, a.height), (b.width, b.height));
    for p in &a.sprites {
        assert_eq!(b.get(&p.name).unwrap().frame, p.frame);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let inputs: Vec<SpriteInput> = (0..80)
        .map(|i| SpriteInput::new(format!("s{i}"), rng.gen_range(1..=40), rng.gen_range(1..=40)))
        .collect();
    for kind in LayoutKind::ALL {
        let cfg = LayoutConfig::builder().layout(kind).build();
        let a = pack_layout(inputs.clone(), &cfg).unwrap();
        let b = pack_layout(inputs.clone(), &cfg).unwrap();
        assert_eq!(a.sprites, b.sprites, "{kind}");
        assert_eq!(a.order, b.order, "{kind}");
        assert_eq!((a.width, a.height), (b.width, b.height), "{kind}");
    }
}

#[test]
fn reused_sprites_are_reset_between_runs() {
    let strategy = VerticalLayout::new(2);
    let mut sprites = vec![Sprite::new("a", 5, 5), Sprite::new("b", 6, 6)];
    let first = place_sprites(&mut sprites, &strategy, Dimensions::new(1, 1), &mut ());
    let frames: Vec<Rect> = sprites.iter().map(|s| s.frame).collect();
    let second = place_sprites(&mut sprites, &strategy, Dimensions::new(1, 1), &mut ());
    assert_eq!(first, second);
    assert_eq!(frames, sprites.iter().map(|s| s.frame).collect::<Vec<_>>());
}
