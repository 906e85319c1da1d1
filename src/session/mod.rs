pub mod dispatch;
pub mod state;
pub mod store;

pub use dispatch::{
    dispatch, Action, CallbackAction, IncomingMessage, Mnemonic, Prompt, Rejection, UserCommand,
};
pub use state::{Awaiting, UserSession};
pub use store::SessionStore;
