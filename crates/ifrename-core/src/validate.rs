use regex::Regex;
use std::sync::LazyLock;

/// Six colon-separated two-digit hex octets.
static VALID_MAC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[[:xdigit:]]{2}:){5}[[:xdigit:]]{2}$").expect("MAC pattern is valid")
});

/// `[segment:]bus:device.function`, the segment being optional.
static VALID_PCI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[[:xdigit:]]{4}:)?[[:xdigit:]]{2}:[[:xdigit:]]{2}\.[[:xdigit:]]$")
        .expect("PCI pattern is valid")
});

/// Embedded (`emN`) or slot (`pNpM`, legacy `pciNpM`) physical port names.
static VALID_PPN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:em\d+|p(?:ci)?\d+p\d+)$").expect("ppn pattern is valid")
});

/// Returns true if `value` is a colon-separated MAC address.
#[must_use]
pub fn is_mac(value: &str) -> bool {
    VALID_MAC.is_match(value)
}

/// Returns true if `value` is a PCI bus address (`0000:01:01.1`).
#[must_use]
pub fn is_pci(value: &str) -> bool {
    VALID_PCI.is_match(value)
}

/// Returns true if `value` is a physical port name.
#[must_use]
pub fn is_ppn(value: &str) -> bool {
    VALID_PPN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mac_accepts_either_case() {
        assert!(is_mac("DE:AD:C0:DE:00:00"));
        assert!(is_mac("00:de:ad:be:ef:00"));
    }

    #[test]
    fn mac_rejects_malformed() {
        assert!(!is_mac("not-a-mac"));
        assert!(!is_mac("DE:AD:C0:DE:00"));
        assert!(!is_mac("DE:AD:C0:DE:00:00:11"));
        assert!(!is_mac("DE-AD-C0-DE-00-00"));
        assert!(!is_mac("D:AD:C0:DE:00:00"));
        assert!(!is_mac("GG:AD:C0:DE:00:00"));
    }

    #[test]
    fn pci_accepts_with_and_without_segment() {
        assert!(is_pci("0000:01:01.1"));
        assert!(is_pci("01:00.0"));
        assert!(is_pci("0000:af:1F.7"));
    }

    #[test]
    fn pci_rejects_malformed() {
        assert!(!is_pci("0000:01:01"));
        assert!(!is_pci("000:01:01.1"));
        assert!(!is_pci("0000:01:01.10"));
        assert!(!is_pci("p1p1"));
    }

    #[test]
    fn ppn_accepts_new_and_legacy_forms() {
        assert!(is_ppn("em1"));
        assert!(is_ppn("p1p1"));
        assert!(is_ppn("p12p3"));
        assert!(is_ppn("pci0p1"));
    }

    #[test]
    fn ppn_rejects_malformed() {
        assert!(!is_ppn("em"));
        assert!(!is_ppn("p1"));
        assert!(!is_ppn("eth0"));
        assert!(!is_ppn("p1p1 "));
    }

    #[test]
    fn validators_do_not_overlap_on_samples() {
        for v in ["DE:AD:C0:DE:00:00", "0000:01:01.1", "p1p1"] {
            let hits = [is_mac(v), is_pci(v), is_ppn(v)]
                .iter()
                .filter(|b| **b)
                .count();
            assert_eq!(hits, 1, "{v}");
        }
    }
}
