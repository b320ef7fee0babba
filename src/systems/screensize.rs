//! Screen size propagation.
//!
//! The host updates the [`ScreenSize`] resource when the window changes; this
//! system copies the new size into the [`Manager`] so screen-relative
//! directive values (`screenWidth`, `50%h`, ...) follow the window.

use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::manager::Manager;
use crate::resources::screensize::ScreenSize;

pub fn sync_screen_size(screen: Res<ScreenSize>, mut manager: NonSendMut<Manager>) {
    if !screen.is_changed() || manager.screen_size() == *screen {
        return;
    }
    debug!(
        "screen size changed to {}x{}, resizing manager",
        screen.w, screen.h
    );
    manager.resize(screen.w, screen.h);
}
