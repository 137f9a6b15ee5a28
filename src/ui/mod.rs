/// UI layer: side-panel selectors and the central chart sections.
///
/// `panels` owns everything that mutates [`crate::state::AppState`] (the
/// selector widgets and the open-file dialog); `charts` reads the state,
/// runs the view queries, and draws.

pub mod charts;
pub mod panels;
