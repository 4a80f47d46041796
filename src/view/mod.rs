//! UI-agnostic view models.
//!
//! [`build_table_view`] and [`build_detail_view`] turn a controller's state
//! into plain data; any frontend maps them to its own widgets. The text
//! renderer used by the command-line tool lives in [`text`].

pub mod common;
pub mod text;

mod builder;

pub use builder::{build_detail_view, build_table_view};
pub use common::{DetailViewModel, TableViewModel, ViewRow};
pub use text::{render_detail, render_table};
