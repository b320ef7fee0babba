use bevy_ecs::prelude::*;

use crate::backend::{RenderBackend, TextureLoader};
use crate::error::Result;
use crate::resources::manager::Manager;

/// Draw one frame of the [`Manager`] render queue.
///
/// Walks the queue back to front and issues one draw call per visible item,
/// then releases the textures of deleted sprites that are no longer queued.
/// Runs outside the schedule, like any exclusive pass that needs the
/// backend: call it once per frame after the schedule has run.
///
/// Returns the number of items drawn.
pub fn render_pass<B>(world: &mut World, backend: &mut B) -> Result<usize>
where
    B: RenderBackend + TextureLoader,
{
    let mut manager = world.non_send_resource_mut::<Manager>();
    let drawn = manager.render(backend)?;
    manager.release_retired(backend)?;
    Ok(drawn)
}
