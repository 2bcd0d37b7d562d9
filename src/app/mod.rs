//! Command line front end: serve generation requests or inspect chunks

mod cli;

pub use cli::run;
