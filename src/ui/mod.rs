//! Interactive progress rendering

mod progress;

pub use progress::{shorten_path, TransferBar};
