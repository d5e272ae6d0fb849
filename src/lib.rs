//! Rentline - Rental Marketplace Backend Services
//!
//! This crate backs the Rentline mobile app with the pieces that live outside
//! the app itself: the Paymob escrow payment integration, availability
//! calendar state, and operator tooling for chat document maintenance.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
