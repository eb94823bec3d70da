pub mod bits;
pub mod codes;
pub mod compressor;
pub mod config;
pub mod decompressor;
pub mod error;
pub mod frequency;
pub mod hash;
pub mod tree;

pub use compressor::*;
pub use decompressor::*;
