#![allow(dead_code)]

pub mod builders;
pub mod errors;
pub mod strategies;

pub use builders::*;
pub use errors::*;
