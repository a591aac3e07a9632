//! Navigator state driven by the command shell

mod navigator;
mod options;

pub use navigator::{Navigator, Ranked};
pub use options::{IndexKind, NavigatorOptions};
