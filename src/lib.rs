pub mod config;
pub mod demo_season;
pub mod error;
pub mod excitement;
pub mod game_index;
pub mod http_client;
pub mod record_store;
pub mod selection;
pub mod series;
pub mod state;
pub mod teams;
