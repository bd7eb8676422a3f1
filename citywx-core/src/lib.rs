//! Core library for the `citywx` city weather lookup.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - OpenWeatherMap geocoding and current-weather clients
//! - The presenter mapping conditions onto a fixed weather card
//! - The interaction controller driving one search at a time
//!
//! It is used by `citywx-cli`, but the controller and presenter only depend
//! on the [`Surface`] trait, so other front ends can host them too.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod surface;

pub use config::{Config, Endpoints};
pub use controller::{Controller, UiState};
pub use error::{ValidationError, WeatherError};
pub use model::{CurrentConditions, Location};
pub use presenter::{Background, Presenter};
pub use provider::{Geocoder, OpenWeatherClient, WeatherSource};
pub use surface::{Layout, MemorySurface, Slot, Surface};
