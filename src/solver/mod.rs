mod core;
pub mod retry;
pub mod video;

pub use self::core::Solver;
pub use retry::RetryPolicy;
pub use video::VideoLookup;
