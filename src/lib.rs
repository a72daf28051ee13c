#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

mod cache;
mod error;
mod operator;
mod relationship;
mod version;

pub use cache::*;
pub use error::*;
pub use operator::*;
pub use relationship::*;
pub use version::*;
