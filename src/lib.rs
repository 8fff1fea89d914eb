//! A small Space Invaders clone for the terminal.
//!
//! The simulation (`entities`, `compute`) is pure and runs in logical
//! pixels; `input`, `display` and `sound` adapt it to a crossterm terminal.

pub mod assets;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod input;
pub mod sound;
