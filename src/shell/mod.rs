//! Line protocol driving a [`Navigator`](crate::engine::Navigator)

pub mod command;
pub mod protocol;
