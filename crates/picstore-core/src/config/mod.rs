//! Configuration types shared by picstore front ends.

pub mod settings;
