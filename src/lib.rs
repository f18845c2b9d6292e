//! A keypad calculator with a scientific mode, calculation history and an
//! optional AI solver for free-text math questions.

pub mod ai;
pub mod calculator;
pub mod config;
pub mod history;
pub mod ui;
