#![allow(dead_code)]

pub mod config;
pub mod mock_storage;
pub mod mock_tts;
pub mod server;
