#![forbid(unsafe_code)]

mod definitions;
mod dispatch;
mod reorder;
mod taxonomies;
mod terms;

pub(crate) use definitions::tool_definitions;
pub(crate) use dispatch::dispatch_tool;
