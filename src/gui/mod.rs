//! User interface: a single egui window driving the logging session

pub mod app;
