#![warn(clippy::all, rust_2018_idioms)]

//! OAM admin console: the data table and pagination widgets, the asset
//! and user management pages built on them, and the eframe application.

pub mod app;
pub mod pages;
pub mod widgets;

pub use app::{ActivePage, OamApp};
