pub mod commands;
pub mod controller;
pub mod engine;
pub mod error;
pub mod playlist;
pub mod port;
pub mod rate;

pub use commands::{PlayerCommand, PlayerResponse, PlayerSnapshot};
pub use controller::{Direction, PlayerController};
pub use engine::{PlayerEngine, PlayerHandle};
pub use error::PlayerError;
pub use playlist::{Playlist, Track};
pub use port::{MediaEvent, MediaPort};
pub use rate::PlaybackRate;
