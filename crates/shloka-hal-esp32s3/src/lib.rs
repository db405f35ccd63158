#![no_std]

//! ESP32-S3 board glue for the Shloka verse frame.

pub mod entropy;
pub mod input;
pub mod platform;
pub mod storage;
