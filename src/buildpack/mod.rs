//! Managing the ordered buildpack list attached to an app.

mod command;
pub mod list;
pub mod resolver;

pub use command::{AppKind, BuildpackCommand, announce_change, describe};
pub use list::{BuildpackEntry, BuildpackList, Operation, Target, mutate, validate_index};
pub use resolver::{Resolver, is_url, url_to_display_name, validate_slug};
