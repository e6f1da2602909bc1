pub mod client;
pub mod models;

pub use client::UpstreamClient;
pub use models::{LocationDataPayload, Measurement, SensorReading};
