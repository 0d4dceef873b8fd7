pub mod clean;
pub mod compile;
pub mod declare;
pub mod prepare;
pub mod transform;
pub mod version;
pub mod watch;
