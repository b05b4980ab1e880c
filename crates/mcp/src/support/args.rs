#![forbid(unsafe_code)]

mod ids;
mod numbers;
mod strings;

pub(crate) use ids::*;
pub(crate) use numbers::*;
pub(crate) use strings::*;
