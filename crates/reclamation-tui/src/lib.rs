pub mod app;
pub mod config;
pub mod controller;
pub mod host;
pub mod photos;
