//! Subcommands of the tigert CLI.
//!
//! Each subcommand lives in its own file and exposes an args struct plus a
//! `run_*` function.

pub mod common;

pub mod layout;
pub mod link;
pub mod run;

pub use layout::{run_layout, LayoutArgs};
pub use link::{run_link, LinkArgs};
pub use run::{run_program, RunArgs};
