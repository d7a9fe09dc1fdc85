//! Discovered NICs and the binding records resolved from them.

use crate::validate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One physical NIC as reported by discovery.
///
/// Only read by this crate; discovery itself happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicDescriptor {
    /// MAC address.
    pub mac: String,
    /// PCI bus location.
    pub pci: String,
    /// Physical port name, when the naming policy produced one.
    #[serde(default)]
    pub ppn: Option<String>,
    /// SMBIOS label, when the firmware provides one.
    #[serde(default)]
    pub label: Option<String>,
}

impl NicDescriptor {
    /// Creates a descriptor without ppn or label.
    #[must_use]
    pub fn new(mac: impl Into<String>, pci: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            pci: pci.into(),
            ppn: None,
            label: None,
        }
    }

    /// Sets the physical port name.
    #[must_use]
    pub fn with_ppn(mut self, ppn: impl Into<String>) -> Self {
        self.ppn = Some(ppn.into());
        self
    }

    /// Sets the SMBIOS label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A resolved naming decision: the NIC at `mac`/`pci` becomes `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacPci {
    mac: String,
    pci: String,
    target: String,
}

impl MacPci {
    /// Creates a binding record. The MAC is normalised to lowercase.
    ///
    /// # Errors
    ///
    /// Returns error if the MAC or PCI address is malformed or the target is
    /// empty.
    pub fn new(mac: &str, pci: &str, target: &str) -> Result<Self, BindingError> {
        if !validate::is_mac(mac) {
            return Err(BindingError::InvalidMac {
                mac: mac.to_string(),
            });
        }
        if !validate::is_pci(pci) {
            return Err(BindingError::InvalidPci {
                pci: pci.to_string(),
            });
        }
        if target.is_empty() {
            return Err(BindingError::EmptyTarget);
        }
        Ok(Self {
            mac: mac.to_ascii_lowercase(),
            pci: pci.to_string(),
            target: target.to_string(),
        })
    }

    /// Returns the MAC address (lowercase).
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Returns the PCI bus location.
    #[must_use]
    pub fn pci(&self) -> &str {
        &self.pci
    }

    /// Returns the interface name to assign.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl fmt::Display for MacPci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.mac, self.pci, self.target)
    }
}

/// Why a binding record could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// MAC address is malformed.
    #[error("invalid MAC address '{mac}'")]
    InvalidMac {
        /// The malformed MAC.
        mac: String,
    },

    /// PCI address is malformed.
    #[error("invalid PCI address '{pci}'")]
    InvalidPci {
        /// The malformed PCI address.
        pci: String,
    },

    /// Target name is empty.
    #[error("target name must not be empty")]
    EmptyTarget,
}
