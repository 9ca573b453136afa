//! Contracted Procedure Integration Tests
//!
//! End-to-end behaviour of definition, binding, name resolution and the
//! three execution strategies, through the public `tacit` facade.

#[path = "../common/mod.rs"]
mod common;

mod async_strategies;
mod blocks;
mod config;
mod definition;
mod inherit;
mod isolation;
mod recursion;
