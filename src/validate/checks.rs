// src/validate/checks.rs

//! Field-level predicates shared by validators and generators.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9.]+$").expect("valid name pattern"));

static SHELL_SAFE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^|;&$<>]*$").expect("valid shell pattern"));

static COMMUNITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(additive|internet|local-AS|no-advertise|no-export|none|\d+:\d+)$")
        .expect("valid community pattern")
});

static STANDARD_COMMUNITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(internet|local-AS|no-advertise|no-export|\d+:\d+)$")
        .expect("valid standard community pattern")
});

pub fn is_ipv4_address(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6_address(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

pub fn is_ipv4_cidr(s: &str) -> bool {
    split_cidr(s).is_some_and(|(addr, len)| is_ipv4_address(addr) && len <= 32)
}

pub fn is_ipv6_cidr(s: &str) -> bool {
    split_cidr(s).is_some_and(|(addr, len)| is_ipv6_address(addr) && len <= 128)
}

fn split_cidr(s: &str) -> Option<(&str, u8)> {
    let (addr, len) = s.split_once('/')?;
    if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((addr, len.parse().ok()?))
}

/// `local` or an IPv4/IPv6 address.
pub fn is_peer(s: &str) -> bool {
    s == "local" || is_ipv4_address(s) || is_ipv6_address(s)
}

/// Policy element names: letters, digits, `-` and `.`.
pub fn is_element_name(s: &str) -> bool {
    NAME_RE.is_match(s)
}

pub fn is_shell_safe(s: &str) -> bool {
    SHELL_SAFE_RE.is_match(s)
}

pub fn is_community(s: &str) -> bool {
    COMMUNITY_RE.is_match(s)
}

pub fn is_standard_community(s: &str) -> bool {
    STANDARD_COMMUNITY_RE.is_match(s)
}

/// Up to 24 whitespace separated AS numbers, each 1..=4294967294.
pub fn is_as_path_prepend(s: &str) -> bool {
    let mut count = 0;
    for asn in s.split_whitespace() {
        if !crate::policy::in_range(asn, 1, 4_294_967_294) {
            return false;
        }
        count += 1;
    }
    count <= 24
}

/// An integer with an optional leading `+` or `-`.
pub fn is_signed_metric(s: &str) -> bool {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && crate::policy::in_range(digits, 0, 4_294_967_295)
}
