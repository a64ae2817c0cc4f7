mod load;
mod types;

pub use load::{is_truthy, load_default, load_from};
pub use types::*;
