use anyhow::Result;

#[macro_use]
extern crate serde_derive;

mod catalog;
mod chart;
mod cli;
mod common;
mod config;
mod entry;
mod report;
mod source;

fn main() -> Result<()> {
    crate::cli::main()
}
