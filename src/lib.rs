//! Terminal client for a personalised song feed server.
//!
//! The feed is loaded through [`controller::SongFeedController`], cached on
//! disk, and rendered with ratatui by [`view::AppView`].

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod settings;
pub mod view;

mod sync;

pub use config::AppConfig;
pub use controller::{AppController, FeedConfig, SongFeedController};
pub use error::FeedError;
