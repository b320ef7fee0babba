//! ECS integration tests.
//!
//! The [`Manager`] lives in a bevy_ecs [`World`] as a non-send resource. These
//! tests run the schedule and the render pass the same way the binary does.

use bevy_ecs::prelude::*;

use spritequeue::backend::recording::RecordingBackend;
use spritequeue::components::color::Color;
use spritequeue::components::rect::Rect;
use spritequeue::resources::displayconfig::DisplayConfig;
use spritequeue::resources::manager::Manager;
use spritequeue::resources::screensize::ScreenSize;
use spritequeue::systems::render::render_pass;
use spritequeue::systems::screensize::sync_screen_size;

fn make_world(backend: &mut RecordingBackend) -> World {
    let config = DisplayConfig::new();
    let screen = config.screen_size();
    let mut manager = Manager::new(config.title.clone(), screen.w, screen.h);
    manager
        .create_texture_from_rectangle("box", 40, 20, Color::WHITE, backend)
        .unwrap();
    manager.append_to_render_queue("box", 0).unwrap();

    let mut world = World::new();
    world.insert_resource(screen);
    world.insert_resource(config);
    world.insert_non_send_resource(manager);
    world
}

fn box_destination(world: &World) -> Rect {
    world
        .non_send_resource::<Manager>()
        .sprites()
        .get("box")
        .unwrap()
        .borrow()
        .destination(0)
        .unwrap()
}

#[test]
fn render_pass_draws_every_frame() {
    let mut backend = RecordingBackend::new();
    let mut world = make_world(&mut backend);

    for _ in 0..3 {
        assert_eq!(render_pass(&mut world, &mut backend).unwrap(), 1);
    }
    assert_eq!(backend.frames().len(), 3);
    assert_eq!(backend.last_frame().unwrap()[0].sprite, "box");
}

#[test]
fn screen_size_change_reaches_the_parser() {
    let mut backend = RecordingBackend::new();
    let mut world = make_world(&mut backend);
    let mut schedule = Schedule::default();
    schedule.add_systems(sync_screen_size);
    schedule.run(&mut world);
    assert_eq!(
        world.non_send_resource::<Manager>().screen_size(),
        ScreenSize::new(800, 600)
    );

    *world.resource_mut::<ScreenSize>() = ScreenSize::new(320, 240);
    schedule.run(&mut world);

    {
        let manager = world.non_send_resource::<Manager>();
        assert_eq!(manager.screen_size(), ScreenSize::new(320, 240));
        manager
            .manipulation()
            .apply("box", "centerIn 0 0 100%w 100%h")
            .unwrap();
    }
    assert_eq!(box_destination(&world), Rect::new(140, 110, 40, 20));

    render_pass(&mut world, &mut backend).unwrap();
    assert_eq!(
        backend.last_frame().unwrap()[0].destination,
        Rect::new(140, 110, 40, 20)
    );
}

#[test]
fn directives_from_a_system() {
    fn wobble(mut manager: NonSendMut<Manager>) {
        manager
            .manipulation()
            .apply("box", "moveBy 1 2")
            .unwrap();
        manager.queue_manipulation().apply("box", "toggle").unwrap();
    }

    let mut backend = RecordingBackend::new();
    let mut world = make_world(&mut backend);
    let mut schedule = Schedule::default();
    schedule.add_systems(wobble);

    schedule.run(&mut world);
    assert_eq!(render_pass(&mut world, &mut backend).unwrap(), 0);
    schedule.run(&mut world);
    assert_eq!(render_pass(&mut world, &mut backend).unwrap(), 1);
    assert_eq!(box_destination(&world), Rect::new(2, 4, 40, 20));
}

#[test]
fn render_pass_releases_retired_textures() {
    let mut backend = RecordingBackend::new();
    let mut world = make_world(&mut backend);
    world
        .non_send_resource_mut::<Manager>()
        .delete_sprite("box", &mut backend)
        .unwrap();
    assert_eq!(render_pass(&mut world, &mut backend).unwrap(), 1);
    assert_eq!(backend.live_textures(), 1);

    world
        .non_send_resource_mut::<Manager>()
        .remove_from_render_queue("box", 0)
        .unwrap();
    assert_eq!(render_pass(&mut world, &mut backend).unwrap(), 0);
    assert_eq!(backend.live_textures(), 0);
    assert_eq!(
        world
            .non_send_resource::<Manager>()
            .textures()
            .refcount("box"),
        0
    );
}
