pub mod bingo;
pub mod catalog;
pub mod config;
pub mod error;
pub mod library;
pub mod lookup;
pub mod models;
pub mod persistence;
pub mod quotes;
pub mod recommend;
pub mod session;
pub mod stats;
pub mod view;
