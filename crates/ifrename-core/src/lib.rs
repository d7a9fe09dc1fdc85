//! # ifrename-core
//!
//! Static naming rules for network interface renaming.
//!
//! A static rule binds an interface name (`eth<N>`) to a physical NIC found
//! by MAC address, PCI location, physical port name or SMBIOS label. This
//! crate provides:
//!
//! - [`parse_lines`] / [`parse_str`] turning rule text into a [`FormulaSet`]
//! - [`resolve`] matching formulae against discovered NICs to produce
//!   [`MacPci`] binding records
//! - [`serialize`] rendering a [`FormulaSet`] back to canonical text
//! - [`StaticRules`] tying the above to a file on disk
//!
//! Diagnostics go to a caller-supplied [`DiagnosticSink`].
//!
//! ## Example
//!
//! ```
//! use ifrename_core::{parse_str, resolve, Collector, NicDescriptor};
//!
//! let mut sink = Collector::new();
//! let formulae = parse_str("eth0=\"de:ad:c0:de:00:00\"\n", &mut sink);
//! let nics = [NicDescriptor::new("de:ad:c0:de:00:00", "0000:01:00.0")];
//! let rules = resolve(&formulae, &nics, &mut sink);
//! assert_eq!(rules[0].target(), "eth0");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod model;
mod nic;
mod parser;
mod resolver;
mod serializer;
mod sink;
mod source;
mod types;

/// Value validators for each identification method.
pub mod validate;

pub use config::{Config, ConfigError, Format, OutputConfig, RulesConfig, DEFAULT_RULES_PATH};
pub use model::{Formula, FormulaSet, Method, ModelError, Target};
pub use nic::{BindingError, MacPci, NicDescriptor};
pub use parser::{parse_lines, parse_str};
pub use resolver::{has_ppn_quirks, resolve};
pub use serializer::{serialize, SAVE_HEADER};
pub use sink::{Collector, DiagnosticSink, NullSink, TracingSink};
pub use source::{SourceError, StaticRules};
pub use types::{Diagnostic, DiagnosticKind, Level};
