#![forbid(unsafe_code)]

mod stdio;

pub(crate) use stdio::run_stdio;

#[cfg(test)]
pub(crate) use stdio::serve;
