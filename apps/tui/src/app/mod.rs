// App module for crimewatch
// Handles application state, input, and the upload/poll coordination.

pub mod input;
pub mod poll;
pub mod state;
pub mod upload;

pub use input::handle_input;
pub use state::App;
