//! Device field validation
//!
//! Pure checks for IP and MAC syntax, plus `validate_device` which trims and
//! checks a whole form submission or import row.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::types::DeviceInput;
use crate::errors::ValidationError;

/// Six two-digit hex groups separated by ':' or '-'
static STRICT_MAC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").expect("static MAC pattern")
});

// =============================================================================
// POLICY
// =============================================================================

/// How MAC addresses are checked
///
/// The two policies are never combined; the configured one is the only check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MacPolicy {
    /// Six hex-digit pairs separated by ':' or '-'
    #[default]
    Strict,
    /// Six ':'-separated groups of exactly two characters, hex not checked
    Loose,
}

impl MacPolicy {
    pub fn accepts(&self, text: &str) -> bool {
        match self {
            MacPolicy::Strict => is_valid_mac(text),
            MacPolicy::Loose => is_valid_mac_loose(text),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MacPolicy::Strict => "strict",
            MacPolicy::Loose => "loose",
        }
    }
}

// =============================================================================
// FIELD CHECKS
// =============================================================================

/// True iff `text` is an IPv4 dotted-quad or IPv6 literal
///
/// No CIDR suffixes, no hostnames, no surrounding whitespace.
pub fn is_valid_ip(text: &str) -> bool {
    text.parse::<IpAddr>().is_ok()
}

/// Strict MAC check
pub fn is_valid_mac(text: &str) -> bool {
    STRICT_MAC.is_match(text)
}

/// Loose MAC check
pub fn is_valid_mac_loose(text: &str) -> bool {
    let groups: Vec<&str> = text.split(':').collect();
    groups.len() == 6 && groups.iter().all(|g| g.chars().count() == 2)
}

// =============================================================================
// DEVICE VALIDATION
// =============================================================================

/// Trim and validate a device submission
///
/// Reports the first problem: a missing field, then the IP, then the MAC.
/// Returns the trimmed input on success.
pub fn validate_device(
    input: &DeviceInput,
    policy: MacPolicy,
) -> Result<DeviceInput, ValidationError> {
    let input = input.trimmed();

    if input.ip_address.is_empty() {
        return Err(ValidationError::MissingField("IP address"));
    }
    if input.mac_address.is_empty() {
        return Err(ValidationError::MissingField("MAC address"));
    }
    if input.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if !is_valid_ip(&input.ip_address) {
        return Err(ValidationError::InvalidIp(input.ip_address));
    }
    if !policy.accepts(&input.mac_address) {
        return Err(ValidationError::InvalidMac(input.mac_address));
    }

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_table() {
        let valid = ["192.168.0.1", "10.0.0.5", "0.0.0.0", "::1", "fe80::1", "2001:db8::ff00:42:8329"];
        let invalid = [
            "192.168.0.256",
            "00:1A:2B:3C:4D:5E",
            "192.168.0",
            "10.0.0.0/24",
            "localhost",
            "",
            " 10.0.0.1",
        ];

        for ip in valid {
            assert!(is_valid_ip(ip), "{} should be valid", ip);
        }
        for ip in invalid {
            assert!(!is_valid_ip(ip), "{} should be invalid", ip);
        }
    }

    #[test]
    fn test_strict_mac() {
        assert!(is_valid_mac("00:1A:2B:3C:4D:5E"));
        assert!(is_valid_mac("00-1a-2b-3c-4d-5e"));
        assert!(!is_valid_mac("00:1A:2B:3C:4D"));
        assert!(!is_valid_mac("GG:1A:2B:3C:4D:5E"));
        assert!(!is_valid_mac("00:1A:2B:3C:4D:5E:6F"));
        assert!(!is_valid_mac("001A.2B3C.4D5E"));
        assert!(!is_valid_mac("00:1A:2B:3C:4D:5E\n"));
    }

    #[test]
    fn test_loose_mac() {
        assert!(is_valid_mac_loose("00:1A:2B:3C:4D:5E"));
        assert!(is_valid_mac_loose("GG:1A:2B:3C:4D:5E"));
        assert!(!is_valid_mac_loose("00:1A:2B:3C:4D"));
        assert!(!is_valid_mac_loose("00-1A-2B-3C-4D-5E"));
        assert!(!is_valid_mac_loose("000:1A:2B:3C:4D:5E"));
    }

    #[test]
    fn test_policy_dispatch() {
        assert!(!MacPolicy::Strict.accepts("GG:1A:2B:3C:4D:5E"));
        assert!(MacPolicy::Loose.accepts("GG:1A:2B:3C:4D:5E"));
        assert_eq!(MacPolicy::default(), MacPolicy::Strict);
    }

    #[test]
    fn test_validate_device_trims_and_orders_checks() {
        let ok = validate_device(
            &DeviceInput::new(" 10.0.0.5 ", "AA:BB:CC:DD:EE:FF ", " Printer"),
            MacPolicy::Strict,
        )
        .unwrap();
        assert_eq!(ok, DeviceInput::new("10.0.0.5", "AA:BB:CC:DD:EE:FF", "Printer"));

        let err = validate_device(&DeviceInput::new("", "bad", ""), MacPolicy::Strict).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("IP address"));

        let err = validate_device(&DeviceInput::new("10.0.0.5", "bad", "   "), MacPolicy::Strict)
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);

        let err = validate_device(&DeviceInput::new("10.0.0.300", "bad", "x"), MacPolicy::Strict)
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidIp("10.0.0.300".to_string()));

        let err = validate_device(
            &DeviceInput::new("10.0.0.3", "GG:1A:2B:3C:4D:5E", "x"),
            MacPolicy::Strict,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidMac("GG:1A:2B:3C:4D:5E".to_string()));
    }
}
