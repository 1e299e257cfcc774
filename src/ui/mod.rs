//! User interface components for the assistant.
//!
//! The page variants live in `home`; everything else is presentational and
//! receives its data and callbacks through props.

mod answer;        // Markdown answer and inline error box
mod chat_input;    // Question textarea and submit button
mod collapsible;   // Expand/collapse wrapper
mod history_sidebar;
mod history_stack;
pub mod home;      // Sidebar and stacked pages (public for routing)
mod spinner;
pub mod toaster;
