mod ids;
mod stored;

pub use ids::*;
pub use stored::*;
