//! Trait definitions for the whodunit toolkit.
//!
//! The workflow only talks to a [`CompletionDriver`] and the CLI only talks to
//! a [`NovelRepository`], so either side can be swapped for a test double.

mod driver;
mod repository;

pub use driver::CompletionDriver;
pub use repository::NovelRepository;
