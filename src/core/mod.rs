mod error;

pub use error::{MergeError, MergeResult};
