//! Structural address validation.
//!
//! A practical, RFC-aligned subset suitable for real-world SMTP: dot-atom
//! local parts and DNS-label domains, ASCII only. Quoted local parts,
//! IP-literal domains, and internationalized (SMTPUTF8) addresses are
//! rejected outright.

mod domain;
mod local;
mod types;

pub use types::SyntaxResult;

use domain::check_domain;
use local::check_local;

/// Validate an address and extract its domain.
///
/// The first violated rule wins; the returned [`SyntaxResult`] carries either
/// the domain (on success) or a human-readable reason (on failure).
pub fn validate_address(address: &str) -> SyntaxResult {
    if address.trim().is_empty() {
        return SyntaxResult::failure("Email is empty");
    }

    if !address.is_ascii() {
        return SyntaxResult::failure("Non-ASCII characters are not supported");
    }

    if address.len() > 254 {
        return SyntaxResult::failure("Email exceeds maximum length (254 characters)");
    }

    let Some((local, domain)) = split_single_at(address) else {
        return SyntaxResult::failure("Email must contain exactly one '@' symbol");
    };

    let mut message = None;
    check_local(local, &mut message);
    if message.is_none() {
        check_domain(domain, &mut message);
    }

    match message {
        Some(reason) => SyntaxResult::failure(reason),
        None => SyntaxResult::success(domain),
    }
}

fn split_single_at(input: &str) -> Option<(&str, &str)> {
    let mut parts = input.split('@');
    let local = parts.next()?;
    let domain = parts.next()?;
    if parts.next().is_some() || local.is_empty() || domain.is_empty() {
        return None;
    }
    Some((local, domain))
}
