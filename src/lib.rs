pub mod api;
pub mod bot;
pub mod chain;
pub mod constants;
pub mod db;
pub mod errors;
pub mod portfolio;
pub mod session;
pub mod trading;
pub mod utils;
pub mod wallet;
