//! Service layer
//!
//! Entry points shared by every outer surface.

mod shortener;

pub use shortener::{Shortener, parse_category};
