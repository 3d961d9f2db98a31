//! Pure layout logic: conflict detection, position validation and
//! suggestions, and the TV grid. Nothing here does I/O.

pub mod conflict;
pub mod grid;
pub mod stats;
pub mod suggest;
pub mod validator;

pub use conflict::{ConflictReport, NO_DEPARTMENT, detect_conflicts, detect_panel_conflicts};
pub use grid::{
    GRID_COLUMNS, GRID_ROWS, GRID_SLOTS, GridCell, PositionalGrid, create_positional_grid,
    organize_by_position,
};
pub use stats::{PanelStats, format_price};
pub use suggest::{
    DEFAULT_SUGGESTION_LIMIT, SUGGESTION_CEILING, suggest_available_positions,
    suggest_next_position,
};
pub use validator::{PositionCheck, PositionValidator, check_position};
