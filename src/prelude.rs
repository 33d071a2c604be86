//! Commonly used imports for working with `psdscope`.
//!
//! Brings the decode entry points, configuration and core types into scope with
//! a single import:
//!
//! ```rust
//! use psdscope::prelude::*;
//!
//! let mut out = Vec::new();
//! let result = descriptor_to_xml(&[], &mut out, DecodeOptions::default());
//! assert!(result.is_err()); // an empty region holds no descriptor
//! ```

pub use crate::{
    additional_info_to_xml, descriptor_to_xml, extra::additional_info, layer_blend_mode,
    BlendModeInfo, Context, DecodeOptions, DictDecoder, DictEntry, Error, LayerFlags, OsType,
    Parser, Result, Verbosity,
};
