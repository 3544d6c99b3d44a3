//! Text formats read and written by the survey converters.
use crate::*;

pub mod asc;
pub mod column;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
