//! The library code for the `weight-tracker` page generator. It renders a
//! personal health log (body-weight measurements, meals, exercise, notes and
//! photos) kept as a JSON array into a static set of browsable HTML pages. The
//! architecture breaks down into three steps:
//!
//! 1. Loading entries from the data file and ordering them newest first
//!    ([`crate::entry`])
//! 2. Rendering the index page and one detail page per entry
//!    ([`crate::render`], with template values built in [`crate::value`])
//! 3. Writing the pages to disk ([`crate::write`])
//!
//! [`crate::build::build_site`] runs the three steps in order. Rendering is a
//! pure function of the entries and the templates, so running a build twice
//! over the same input produces byte-identical output.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod entry;
pub mod format;
pub mod render;
pub mod util;
pub mod value;
pub mod write;
