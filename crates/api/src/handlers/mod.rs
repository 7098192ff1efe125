pub mod generation;
pub mod preferences;
pub mod videos;
