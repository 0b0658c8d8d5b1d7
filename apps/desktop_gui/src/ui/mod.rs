//! UI layer for desktop GUI: app shell and the Add/Get panels.

pub mod app;
mod panels;

pub use app::SurveyFormApp;
