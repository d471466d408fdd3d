//! CLI Commands

pub mod add;
pub mod export;
pub mod import;
pub mod status;
