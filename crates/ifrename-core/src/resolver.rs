//! Formulae + NIC snapshot → binding records.

use crate::model::{Formula, FormulaSet, Method, Target};
use crate::nic::{BindingError, MacPci, NicDescriptor};
use crate::sink::DiagnosticSink;
use crate::types::DiagnosticKind;
use std::collections::HashSet;

/// Resolves each formula against the NICs, first match wins.
///
/// Output follows target order. When two NICs share a ppn, every
/// ppn formula is skipped for this pass.
pub fn resolve(
    formulae: &FormulaSet,
    nics: &[NicDescriptor],
    sink: &mut dyn DiagnosticSink,
) -> Vec<MacPci> {
    let ppn_quirks = has_ppn_quirks(nics);
    if ppn_quirks {
        sink.warn(
            DiagnosticKind::PpnQuirk,
            "Discovered physical policy naming quirks in provided state. \
             Disabling 'method=ppn' generation"
                .to_string(),
        );
    }

    let mut rules = Vec::new();

    for (target, formula) in formulae {
        if ppn_quirks && formula.method() == Method::Ppn {
            sink.info(
                DiagnosticKind::PpnQuirk,
                format!("Not considering formula for '{target}' due to ppn quirks"),
            );
            continue;
        }

        let Some(nic) = nics.iter().find(|nic| nic_matches(nic, formula)) else {
            sink.warn(
                DiagnosticKind::NotFound,
                format!(
                    "No NIC found with {} of '{}' for the {target} static rule",
                    describe(formula.method()),
                    formula.value()
                ),
            );
            continue;
        };

        match bind(nic, target) {
            Ok(rule) => rules.push(rule),
            Err(e) => sink.warn(
                DiagnosticKind::BindingFailed,
                format!("Error creating rule for {target}: {e}"),
            ),
        }
    }

    rules
}

/// Returns true if two NICs report the same ppn.
#[must_use]
pub fn has_ppn_quirks(nics: &[NicDescriptor]) -> bool {
    let mut seen = HashSet::new();
    nics.iter()
        .filter_map(|nic| nic.ppn.as_deref())
        .any(|ppn| !seen.insert(ppn))
}

fn nic_matches(nic: &NicDescriptor, formula: &Formula) -> bool {
    let value = formula.value();
    match formula.method() {
        Method::Mac => nic.mac.eq_ignore_ascii_case(value),
        Method::Pci => nic.pci.eq_ignore_ascii_case(value),
        Method::Ppn => nic.ppn.as_deref() == Some(value),
        Method::Label => nic.label.as_deref() == Some(value),
    }
}

fn bind(nic: &NicDescriptor, target: &Target) -> Result<MacPci, BindingError> {
    MacPci::new(&nic.mac, &nic.pci, target.as_str())
}

fn describe(method: Method) -> &'static str {
    match method {
        Method::Mac => "a MAC address",
        Method::Pci => "a PCI ID",
        Method::Ppn => "a ppn",
        Method::Label => "an SMBios Label",
    }
}
