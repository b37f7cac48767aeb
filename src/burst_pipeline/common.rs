//! Common utilities module
//!
//! This module contains the error type and the image buffer shared by every
//! stage of the burst pipeline.

pub mod error;
pub mod image;

pub use error::{BurstError, Result};
pub use image::{Image, PixelRange};
