pub mod chart_svg;
pub mod pages;
pub mod routes;

pub use routes::{routes, AppState};
