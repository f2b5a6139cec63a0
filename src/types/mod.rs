// ABOUTME: Domain value types shared across modules.
// ABOUTME: Image reference parsing lives here.

mod image_ref;

pub use image_ref::{ImageReference, ParseImageError, strip_tag};
