pub mod dispatcher;
pub mod events;
