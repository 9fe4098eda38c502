pub mod config;
pub mod content;
pub mod dice;
pub mod entity;
pub mod grid;
pub mod particle;
pub mod pathfinding;
pub mod room;
pub mod run;
pub mod types;

pub use config::{ConfigError, RoomConfig};
pub use content::{Doors, RoomBlueprint, RoomLayout, RoomObject};
pub use dice::Dice;
pub use entity::Entity;
pub use grid::Grid;
pub use pathfinding::{Pathfinder, Route, SpatialQuery};
pub use room::{RoomState, build_room};
pub use run::{RunProgress, RunState};
pub use types::*;
