mod association;
mod conflict;
mod department;
mod panel;
mod product;
mod view;

pub use association::*;
pub use conflict::*;
pub use department::*;
pub use panel::*;
pub use product::*;
pub use view::*;

/// 1-based display slot index. Signed so that invalid user input
/// (zero, negatives) can be represented and rejected by validation.
pub type Position = i64;
