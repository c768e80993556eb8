pub mod column;
pub mod settings;
pub mod task;

pub use column::*;
pub use settings::*;
pub use task::*;
