mod commands;
mod context;
mod telegram;
pub mod handlers;

pub use commands::Command;
pub use context::BotContext;
pub use telegram::TelegramBot;
