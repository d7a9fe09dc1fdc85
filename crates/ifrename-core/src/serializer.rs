//! [`FormulaSet`] → canonical rules text.

use crate::model::FormulaSet;
use crate::sink::DiagnosticSink;
use crate::types::DiagnosticKind;

/// Banner written above the rules when a header is requested.
pub const SAVE_HEADER: &str = "\
# Static rules. Autogenerated by the installer from the answerfile or previous install
# WARNING - rules in this file override the 'lastboot' assignment of names,
#           so editing it may cause unexpected renaming on next boot

# Rules are of the form:
#   target name: id method = \"value\"

# target name must be in the form eth*
# id methods are:
#   mac: value should be the mac address of a device (e.g. DE:AD:C0:DE:00:00)
#   pci: value should be the pci bus location of the device (e.g. 0000:01:01.1)
#   ppn: value should be the result of the biosdevname physical naming policy of a device (e.g. p1p1)
#   label: value should be the SMBios label of a device (for SMBios 2.6 or above)

";

/// Renders the formulae as `<target>:<method>="<value>"` lines in numeric
/// target order.
///
/// Formulae whose value no longer validates are reported and omitted.
pub fn serialize(formulae: &FormulaSet, header: bool, sink: &mut dyn DiagnosticSink) -> String {
    let mut out = String::new();
    if header {
        out.push_str(SAVE_HEADER);
    }

    for (target, formula) in formulae {
        if let Err(e) = formula.validate() {
            sink.warn(
                DiagnosticKind::InvalidValue,
                format!("{e} for {target}. Ignoring"),
            );
            continue;
        }
        out.push_str(&format!(
            "{target}:{}=\"{}\"\n",
            formula.method(),
            formula.value()
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Formula, Method, Target};
    use crate::parser::parse_str;
    use crate::sink::{Collector, NullSink};

    fn entry(t: &str, m: Method, v: &str) -> (Target, Formula) {
        (Target::new(t).unwrap(), Formula::new(m, v))
    }

    fn sample() -> FormulaSet {
        [
            entry("eth10", Method::Label, "Slot3 NIC"),
            entry("eth2", Method::Pci, "0000:01:01.1"),
            entry("eth1", Method::Mac, "DE:AD:C0:DE:00:00"),
            entry("eth3", Method::Ppn, "p1p1"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn canonical_output() {
        let text = serialize(&sample(), false, &mut NullSink);
        insta::assert_snapshot!(text, @r#"
        eth1:mac="DE:AD:C0:DE:00:00"
        eth2:pci="0000:01:01.1"
        eth3:ppn="p1p1"
        eth10:label="Slot3 NIC"
        "#);
    }

    #[test]
    fn header_is_prepended() {
        let text = serialize(&sample(), true, &mut NullSink);
        assert!(text.starts_with(SAVE_HEADER));
        assert!(text.ends_with("eth10:label=\"Slot3 NIC\"\n"));
    }

    #[test]
    fn header_lines_are_comments() {
        assert!(SAVE_HEADER
            .lines()
            .all(|l| l.trim().is_empty() || l.starts_with('#')));
    }

    #[test]
    fn empty_set_without_header_is_empty() {
        assert_eq!(serialize(&FormulaSet::new(), false, &mut NullSink), "");
    }

    #[test]
    fn invalid_entries_are_omitted() {
        let mut formulae = sample();
        formulae.insert_or_replace(
            Target::new("eth4").unwrap(),
            Formula::new(Method::Mac, "not-a-mac"),
        );
        let mut sink = Collector::new();
        let text = serialize(&formulae, false, &mut sink);
        assert!(!text.contains("eth4"));
        assert_eq!(text.lines().count(), 4);
        assert_eq!(sink.of_kind(DiagnosticKind::InvalidValue).len(), 1);
    }

    #[test]
    fn label_quotes_are_always_double() {
        let set = parse_str("eth0:label='Slot 1'", &mut NullSink);
        assert_eq!(
            serialize(&set, false, &mut NullSink),
            "eth0:label=\"Slot 1\"\n"
        );
    }

    #[test]
    fn round_trip_is_stable() {
        let original = sample();
        let text = serialize(&original, false, &mut NullSink);
        let mut sink = Collector::new();
        let reparsed = parse_str(&text, &mut sink);
        assert_eq!(reparsed, original);
        assert!(sink.diagnostics().is_empty());
        assert_eq!(serialize(&reparsed, false, &mut NullSink), text);
    }

    #[test]
    fn header_output_parses_back() {
        let original = sample();
        let text = serialize(&original, true, &mut NullSink);
        assert_eq!(parse_str(&text, &mut NullSink), original);
    }

    #[test]
    fn serialize_is_idempotent() {
        let formulae = sample();
        assert_eq!(
            serialize(&formulae, true, &mut NullSink),
            serialize(&formulae, true, &mut NullSink)
        );
    }
}
