#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use vc_jsv as jsv;
pub use vc_utils as utils;
