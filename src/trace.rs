//! Debug trace sink.
//!
//! Mirrors the legacy `#ifdef _MALLOC_DEBUG` / `debug()` helper in
//! `malloc.c`: when the `trace` feature is off, these macros expand to
//! nothing, so there is no runtime cost and no observable effect. When the
//! feature is on, they forward to the
//! `log` crate so the trace can be captured by whatever subscriber the
//! embedding program installs (typically going to standard error, as the
//! legacy sink did).

#[cfg(feature = "trace")]
macro_rules! trace_event {
  ($($arg:tt)*) => { log::trace!($($arg)*) };
}
#[cfg(not(feature = "trace"))]
macro_rules! trace_event {
  ($($arg:tt)*) => {};
}

#[cfg(feature = "trace")]
macro_rules! debug_event {
  ($($arg:tt)*) => { log::debug!($($arg)*) };
}
#[cfg(not(feature = "trace"))]
macro_rules! debug_event {
  ($($arg:tt)*) => {};
}

#[cfg(feature = "trace")]
macro_rules! warn_event {
  ($($arg:tt)*) => { log::warn!($($arg)*) };
}
#[cfg(not(feature = "trace"))]
macro_rules! warn_event {
  ($($arg:tt)*) => {};
}

#[cfg(feature = "trace")]
macro_rules! error_event {
  ($($arg:tt)*) => { log::error!($($arg)*) };
}
#[cfg(not(feature = "trace"))]
macro_rules! error_event {
  ($($arg:tt)*) => {};
}

pub(crate) use debug_event;
pub(crate) use error_event;
pub(crate) use trace_event;
pub(crate) use warn_event;
