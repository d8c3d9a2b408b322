pub mod config;
pub mod logging;

pub mod catalog;
pub mod control;
pub mod downloader;
pub mod header;
pub mod installer;
pub mod pipeline;
pub mod state;
