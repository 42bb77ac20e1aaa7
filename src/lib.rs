//! Voxel world core: a chunked block map streamed around the player, two
//! light channels, ray picking and block edits, and swept player collision.
#![forbid(unsafe_code)]

pub mod config;
pub mod event;
pub mod facade;
pub mod picker;
pub mod player;
pub mod render;
pub mod sound;

pub use config::{GameConfig, PickerConfig, PlayerConfig};
pub use event::{Event, EventQueue, RebuildCause};
pub use facade::{WorldFacade, WorldParts, WorldStats};
pub use picker::{BlockRef, Camera, Target, pick_target};
pub use player::{MoveInput, Player, PlayerStep};
pub use render::{BlockRenderer, LogRenderer, RenderInstance};
pub use sound::{LogSound, NullSound, SoundSink};
