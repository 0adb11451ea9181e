pub mod brief;
pub mod manuscript;
pub mod role;
