//! Astrolabe Core Types and Definitions
//!
//! This crate provides the foundational types used by the Astrolabe diagram
//! renderer. It includes:
//!
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Draw**: Drawable elements that emit SVG nodes ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
