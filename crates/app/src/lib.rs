#![warn(clippy::pedantic)]

pub mod chart;
pub mod color;
pub mod interaction;

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    System,
    Light,
    Dark,
}
