//! `tctool`: inspect and build the composition tables.

pub mod commands;
pub mod trace_init;
