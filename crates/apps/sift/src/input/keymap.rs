//! Keyboard shortcut definitions

use gpui::KeyBinding;

use super::actions::*;
use crate::components::search_box;

/// Returns all keybindings to register with GPUI
pub fn bindings() -> Vec<KeyBinding> {
    vec![
        // ===== Global (SiftApp context) =====
        KeyBinding::new("/", FocusSearch, Some("SiftApp")),
        KeyBinding::new("cmd-k", FocusSearch, Some("SiftApp")),
        KeyBinding::new("cmd-r", Refresh, Some("SiftApp")),
        KeyBinding::new("?", ShowFilterHelp, Some("SiftApp")),
        KeyBinding::new("escape", GoBack, Some("SiftApp")),
        // ===== Overlays =====
        KeyBinding::new("escape", CloseOverlay, Some("Overlay")),
        // ===== Search box =====
        KeyBinding::new("tab", search_box::AcceptSuggestion, Some("SearchBox")),
        KeyBinding::new("escape", search_box::DismissSuggestion, Some("SearchBox")),
        // ===== Email list =====
        KeyBinding::new("j", MoveDown, Some("EmailListView")),
        KeyBinding::new("down", MoveDown, Some("EmailListView")),
        KeyBinding::new("k", MoveUp, Some("EmailListView")),
        KeyBinding::new("up", MoveUp, Some("EmailListView")),
        KeyBinding::new("enter", OpenSelected, Some("EmailListView")),
        KeyBinding::new("delete", DeleteSelected, Some("EmailListView")),
        KeyBinding::new("]", NextPage, Some("EmailListView")),
        KeyBinding::new("[", PrevPage, Some("EmailListView")),
        // ===== Message view =====
        KeyBinding::new("i", ToggleImages, Some("EmailView")),
        KeyBinding::new("r", Release, Some("EmailView")),
    ]
}
