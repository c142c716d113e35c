pub mod classify;
pub mod cli;
pub mod collect;
pub mod error;
pub mod git;
pub mod model;
pub mod render;
pub mod util;
