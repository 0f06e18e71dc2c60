pub mod app;
pub mod commands;
pub mod dispatch;
pub mod env;
pub mod generate;
pub mod info;
pub mod output;
pub mod query;
pub mod runtime;
pub mod tree;
