pub mod config;
pub mod params;
pub mod scale;
pub mod song;
