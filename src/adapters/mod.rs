//! Implementations of the image generator port.
//!
//! `live` calls the provider APIs, `recording` wraps a live adapter and
//! captures its calls, `replaying` answers from a captured cassette.

pub mod live;
pub mod recording;
pub mod replaying;
