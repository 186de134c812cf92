//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod index;
mod link;
mod search;
mod serve;
mod tracks;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use index::run_index;
pub use link::run_link;
pub use search::run_search;
pub use serve::run_serve;
pub use tracks::run_tracks;
