//! Pokelist - infinite-scroll catalog browser over PokeAPI
//!
//! The library exposes the app's modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod loader;
pub mod projection;
pub mod reducer;
pub mod route;
pub mod state;
