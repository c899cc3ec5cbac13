// Library root for the fairdeal command-line front end: configuration,
// selection, argument parsing and report rendering.

pub mod cli;
pub mod config;
pub mod report;
pub mod selection;
