//! Input and output formats of the command line front end.

pub mod csv;
pub mod state;
