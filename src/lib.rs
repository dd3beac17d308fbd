pub mod config;
pub mod seed;
pub mod sql;
pub mod theme;
