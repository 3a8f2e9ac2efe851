pub mod opacity;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use opacity::*;
pub use time::*;
