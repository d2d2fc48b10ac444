mod dispatch;
mod errors;
mod forward;
mod headers;
mod middleware;
mod preflight;
mod proxy;
mod relay;
pub(crate) mod state;
mod static_files;

pub(crate) use dispatch::app;
