#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `vc_jsv` in doc testing.
// But `macro_utils::Manifest` can only choose one, so we must have an
// `extern self` to ensure `vc_jsv` can be used as an alias for `crate`.
extern crate self as vc_jsv;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod reflect;
mod serializer;

pub mod access;
pub mod codec;
pub mod config;
pub mod custom;
pub mod dispatch;
pub mod format;
pub mod impls;
pub mod info;
pub mod registry;
pub mod state;
pub mod time;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use error::{Error, Result};
pub use reflect::Reflect;
pub use serializer::{JsonSerializer, TypeSerializer};
pub use serializer::{from_json, from_jsv, to_json, to_jsv};
pub use vc_jsv_derive as derive;
