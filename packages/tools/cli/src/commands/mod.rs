//! CLI 명령어 구현

pub mod apply;
pub mod config;
pub mod context;
pub mod schema;
