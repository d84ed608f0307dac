pub mod record;
pub mod selection;

pub use record::*;
pub use selection::*;
