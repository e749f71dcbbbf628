// src/models/mod.rs

pub mod attempt;
pub mod evaluation;
pub mod question;
pub mod quiz;
pub mod user;
