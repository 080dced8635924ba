pub mod form;
pub mod graphql;
pub mod logging;
pub mod model;
pub mod port;
pub mod store;
pub mod tui;
mod tui_form;
