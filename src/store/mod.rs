pub mod db;
pub mod lists;
pub mod plans;
pub mod tags;
pub mod tasks;
pub mod users;

pub use db::Store;
