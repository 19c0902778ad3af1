//! GPUI action definitions for keyboard shortcuts
//!
//! Actions are organized by context where they apply.

use gpui::actions;

// List navigation (email list)
actions!(
    sift,
    [
        MoveUp,         // K or Up arrow - select previous message
        MoveDown,       // J or Down arrow - select next message
        OpenSelected,   // Enter - open selected message
        DeleteSelected, // Delete - delete selected message
        NextPage,       // ] - next page
        PrevPage,       // [ - previous page
    ]
);

// Message view
actions!(
    sift,
    [
        GoBack,       // Escape - back to the list
        ToggleImages, // I - show/hide external images
        Release,      // R - open the release dialog
    ]
);

// Global
actions!(
    sift,
    [
        FocusSearch,    // / or Cmd-K - focus the search box
        Refresh,        // Cmd-R - reload the current page
        ShowFilterHelp, // ? - show filter syntax
        CloseOverlay,   // Escape - close dialog or help
    ]
);
