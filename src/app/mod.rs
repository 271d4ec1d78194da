pub mod messages;
pub mod state;
pub mod update;
pub mod view;

pub use messages::Message;
pub use state::App;
