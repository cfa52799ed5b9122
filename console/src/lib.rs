//! Terminal front end for the customer records: cached list, cards, filter,
//! the add/edit form and refill reminders.

pub mod api;
pub mod app;
pub mod form;
pub mod prompt;
pub mod reminders;
pub mod render;
pub mod state;
