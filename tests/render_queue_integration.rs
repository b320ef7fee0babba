//! Render queue integration tests.
//!
//! Exercises the [`Manager`] queue operations end to end against the
//! headless [`RecordingBackend`]: ordering, reordering by name, visibility,
//! hit testing and texture lifetime.
//!
//! ```sh
//! cargo test --test render_queue_integration
//! ```

use proptest::prelude::*;

use spritequeue::backend::recording::RecordingBackend;
use spritequeue::components::color::Color;
use spritequeue::components::rect::Rect;
use spritequeue::error::SpriteError;
use spritequeue::resources::manager::{Manager, Toggle};

// =============================================================================
// Helpers
// =============================================================================

/// Manager with one 10x10 solid sprite per name, queued in order.
fn queued(names: &[&str]) -> (Manager, RecordingBackend) {
    let mut backend = RecordingBackend::new();
    let mut manager = Manager::new("queue", 200, 100);
    for name in names {
        manager
            .create_texture_from_rectangle(name, 10, 10, Color::WHITE, &mut backend)
            .unwrap();
        manager.append_to_render_queue(name, 0).unwrap();
    }
    (manager, backend)
}

fn order(manager: &Manager) -> Vec<String> {
    manager
        .render_queue()
        .iter()
        .map(|item| format!("{}{}", item.sprite_name(), item.destination()))
        .collect()
}

fn drawn(backend: &RecordingBackend) -> Vec<String> {
    backend
        .last_frame()
        .unwrap_or_default()
        .iter()
        .map(|call| call.sprite.clone())
        .collect()
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn swap_first_and_last_of_three() {
    let (mut manager, _) = queued(&["A", "B", "C"]);
    manager.swap_in_render_queue(0, 2).unwrap();
    assert_eq!(order(&manager), ["C0", "B0", "A0"]);
}

#[test]
fn draw_order_follows_queue_order() {
    let (mut manager, mut backend) = queued(&["A", "B", "C"]);
    manager.render(&mut backend).unwrap();
    assert_eq!(drawn(&backend), ["A", "B", "C"]);

    manager.swap_in_render_queue(0, 2).unwrap();
    manager.render(&mut backend).unwrap();
    assert_eq!(drawn(&backend), ["C", "B", "A"]);
    assert_eq!(backend.frames().len(), 2);
}

#[test]
fn same_sprite_queued_at_several_destinations() {
    let (mut manager, mut backend) = queued(&["tile"]);
    manager
        .manipulation()
        .apply("tile", "addDestination 20 0")
        .unwrap();
    manager.append_to_render_queue("tile", 1).unwrap();
    manager.append_to_render_queue("tile", 0).unwrap();
    assert_eq!(order(&manager), ["tile0", "tile1", "tile0"]);

    manager.render(&mut backend).unwrap();
    let frame = backend.last_frame().unwrap();
    assert_eq!(frame.len(), 3);
    assert_eq!(frame[1].destination, Rect::new(20, 0, 10, 10));
    assert_eq!(frame[0], frame[2]);
}

#[test]
fn mutation_after_queueing_is_visible_when_drawn() {
    let (mut manager, mut backend) = queued(&["A"]);
    manager
        .manipulation()
        .apply("A", "setOrigin 100%w-10 100%h-10")
        .unwrap();
    manager.render(&mut backend).unwrap();
    assert_eq!(
        backend.last_frame().unwrap()[0].destination,
        Rect::new(190, 90, 10, 10)
    );
}

#[test]
fn index_operations_report_errors() {
    let (mut manager, _) = queued(&["A", "B"]);
    let a = manager.sprites().get("A").unwrap();

    assert_eq!(
        manager.swap_in_render_queue(5, 0).unwrap_err(),
        SpriteError::IndexOutOfRange { index: 5, size: 2 }
    );
    assert!(matches!(
        manager.swap_in_render_queue_at_position(2, &a, 0),
        Err(SpriteError::IndexOutOfRange { index: 2, .. })
    ));
    assert!(matches!(
        manager.swap_in_render_queue_at_position(1, &a, 1),
        Err(SpriteError::InvalidDestination { index: 1, .. })
    ));
    assert_eq!(order(&manager), ["A0", "B0"]);

    let replaced = manager.swap_in_render_queue_at_position(1, &a, 0).unwrap();
    assert_eq!(replaced.sprite_name(), "B");
    assert_eq!(order(&manager), ["A0", "A0"]);
}

#[test]
fn name_based_reordering() {
    let (mut manager, mut backend) = queued(&["sky", "ground", "hud"]);
    manager
        .create_texture_from_rectangle("hero", 4, 4, Color::BLACK, &mut backend)
        .unwrap();
    manager
        .create_texture_from_rectangle("cloud", 4, 4, Color::WHITE, &mut backend)
        .unwrap();

    manager
        .insert_in_render_queue_after("hero", "ground", 0, 0)
        .unwrap();
    manager
        .insert_in_render_queue_before("cloud", "ground", 0, 0)
        .unwrap();
    assert_eq!(order(&manager), ["sky0", "cloud0", "ground0", "hero0", "hud0"]);

    manager.move_in_render_queue_after("sky", "hud", 0, 0).unwrap();
    assert_eq!(order(&manager), ["cloud0", "ground0", "hero0", "hud0", "sky0"]);

    manager
        .move_in_render_queue_before("sky", "cloud", 0, 0)
        .unwrap();
    assert_eq!(order(&manager), ["sky0", "cloud0", "ground0", "hero0", "hud0"]);

    assert_eq!(manager.find_in_render_queue("hero", 0), Some(3));
    assert_eq!(manager.find_in_render_queue("hero", 1), None);

    manager
        .swap_in_render_queue_by_name("hero", "cloud", 0, 0)
        .unwrap();
    manager.remove_from_render_queue("hud", 0).unwrap();
    assert_eq!(order(&manager), ["sky0", "hero0", "ground0", "hero0"]);
}

#[test]
fn missing_anchor_leaves_queue_unchanged() {
    let (mut manager, _) = queued(&["A", "B"]);
    let before = order(&manager);
    assert!(matches!(
        manager.move_in_render_queue_after("A", "Z", 0, 0),
        Err(SpriteError::RenderItemNotFound { .. })
    ));
    assert!(matches!(
        manager.insert_in_render_queue_before("Z", "A", 0, 0),
        Err(SpriteError::UnknownSprite(_))
    ));
    assert!(matches!(
        manager.remove_from_render_queue("B", 3),
        Err(SpriteError::RenderItemNotFound { destination: 3, .. })
    ));
    assert_eq!(order(&manager), before);
}

// =============================================================================
// Visibility and hit testing
// =============================================================================

#[test]
fn hidden_items_keep_their_place() {
    let (mut manager, mut backend) = queued(&["A", "B", "C"]);
    manager.toggle_render("B", 0, Toggle::Off).unwrap();
    manager.render(&mut backend).unwrap();
    assert_eq!(drawn(&backend), ["A", "C"]);
    assert_eq!(manager.find_in_render_queue("B", 0), Some(1));

    manager.toggle_render("B", 0, Toggle::On).unwrap();
    manager.render(&mut backend).unwrap();
    assert_eq!(drawn(&backend), ["A", "B", "C"]);
}

#[test]
fn item_at_picks_topmost_visible() {
    let (mut manager, _) = queued(&["low", "high"]);
    manager.manipulation().apply("high", "setOrigin 5 5").unwrap();

    assert_eq!(manager.item_at(7, 7).unwrap().sprite_name(), "high");
    assert_eq!(manager.item_at(2, 2).unwrap().sprite_name(), "low");
    // right and bottom edges are exclusive
    assert!(manager.item_at(15, 15).is_none());

    manager.toggle_render("high", 0, Toggle::Flip).unwrap();
    assert_eq!(manager.item_at(7, 7).unwrap().sprite_name(), "low");
}

#[test]
fn item_at_near_the_right_edge_of_the_coordinate_space() {
    let (mut manager, _) = queued(&["edge"]);
    manager
        .manipulation()
        .apply("edge", "setOrigin 2147483640 0")
        .unwrap();

    assert_eq!(
        manager.item_at(2147483645, 5).unwrap().sprite_name(),
        "edge"
    );
    assert!(manager.item_at(2147483639, 5).is_none());
    assert!(manager.item_at(i32::MAX, 10).is_none());
}

// =============================================================================
// Texture lifetime
// =============================================================================

#[test]
fn texture_refcount_acquire_twice_release_once() {
    let mut backend = RecordingBackend::new().with_file("sheet.png", 64, 32);
    let mut manager = Manager::new("textures", 100, 100);
    manager
        .create_sprite("left", "sheet.png", Rect::new(0, 0, 32, 32), &mut backend)
        .unwrap();
    manager
        .create_sprite("right", "sheet.png", Rect::new(32, 0, 32, 32), &mut backend)
        .unwrap();
    assert_eq!(manager.textures().refcount("sheet.png"), 2);

    manager.delete_sprite("left", &mut backend).unwrap();
    assert_eq!(manager.textures().refcount("sheet.png"), 1);
    assert!(manager.textures().get("sheet.png").is_some());

    manager.delete_sprite("right", &mut backend).unwrap();
    assert_eq!(manager.textures().refcount("sheet.png"), 0);
    assert!(manager.textures().get("sheet.png").is_none());
    assert_eq!(backend.loads(), 1);
    assert_eq!(backend.unloads(), 1);
}

#[test]
fn queued_sprite_outlives_registry_entry() {
    let (mut manager, mut backend) = queued(&["ghost"]);
    manager.delete_sprite("ghost", &mut backend).unwrap();
    assert!(manager.sprites().find("ghost").is_none());

    manager.render(&mut backend).unwrap();
    assert_eq!(drawn(&backend), ["ghost"]);

    manager.clear_render_queue();
    assert_eq!(manager.release_retired(&mut backend).unwrap(), 1);
    assert_eq!(backend.live_textures(), 0);
}

// =============================================================================
// Properties
// =============================================================================

const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

proptest! {
    #[test]
    fn swap_is_its_own_inverse(len in 1usize..6, i in 0usize..6, j in 0usize..6) {
        let (mut manager, _) = queued(&NAMES[..len]);
        let (i, j) = (i % len, j % len);
        let before = order(&manager);
        manager.swap_in_render_queue(i, j).unwrap();
        manager.swap_in_render_queue(i, j).unwrap();
        prop_assert_eq!(order(&manager), before);
    }

    #[test]
    fn out_of_range_swap_leaves_queue_unchanged(len in 0usize..6, i in 0usize..12, extra in 0usize..6) {
        let (mut manager, _) = queued(&NAMES[..len]);
        let before = order(&manager);
        let bad = len + extra;
        let result = manager.swap_in_render_queue(i, bad);
        prop_assert_eq!(result, Err(SpriteError::IndexOutOfRange {
            index: if i >= len { i } else { bad },
            size: len,
        }));
        prop_assert_eq!(order(&manager), before);
    }
}
