//! Application services - use cases orchestrated over the ports.

mod blog;

pub use blog::BlogService;
