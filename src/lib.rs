#![forbid(unsafe_code)]

pub mod assemble;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod formats;
pub mod logging;
pub mod publish;
pub mod render;
pub mod resolve;
pub mod subtitles;
pub mod templates;
pub mod upload;
