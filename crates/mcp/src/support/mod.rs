#![forbid(unsafe_code)]

mod ai;
mod args;
mod jsonrpc;
mod wire;

pub(crate) use ai::*;
pub(crate) use args::*;
pub(crate) use jsonrpc::*;
pub(crate) use wire::*;
