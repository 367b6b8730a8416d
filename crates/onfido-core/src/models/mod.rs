pub mod live_photo;

pub use live_photo::*;
