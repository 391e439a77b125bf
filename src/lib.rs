mod engine;
mod error;
mod midi_exporter;
mod model;
mod util;

pub use engine::*;
pub use error::*;
pub use midi_exporter::*;
pub use model::config::*;
pub use model::params::*;
pub use model::scale::*;
pub use model::song::*;
pub use util::*;
