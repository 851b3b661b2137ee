//! API route handlers

pub mod health;
pub mod identify;
pub mod species;
pub mod ui;

pub use health::health_routes;
pub use identify::identify_routes;
pub use species::species_routes;
pub use ui::ui_routes;
