// src/lib.rs

//! VALD Hub screenshot, analysis and training program pipeline.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod portal;
pub mod services;
pub mod storage;
pub mod utils;
