//! Terminal plotting for the history view.

mod ascii;

pub use ascii::render_history_plot;
