#![deny(warnings)]

pub mod app;
pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod messages;
pub mod prefs;
pub mod speech;
pub mod status;
pub mod translate;
