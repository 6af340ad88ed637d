pub mod airborne;
pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod scene;
pub mod systems;
