use super::local::set_once;

/// DNS-label syntax checks for the domain part. First failure wins.
pub(crate) fn check_domain(domain: &str, message: &mut Option<String>) {
    if domain.is_empty() {
        set_once(message, "Domain part is empty");
        return;
    }
    if domain.len() > 253 {
        set_once(
            message,
            "Domain part exceeds maximum length (253 characters)",
        );
        return;
    }
    if domain.starts_with('[') && domain.ends_with(']') {
        set_once(message, "IP-literal domains are not supported");
        return;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        set_once(message, "Domain cannot start or end with a dot");
        return;
    }
    if domain.contains("..") {
        set_once(message, "Domain cannot contain consecutive dots");
        return;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    for label in &labels {
        if label.is_empty() {
            set_once(message, "Domain contains an empty label");
            return;
        }
        if label.len() > 63 {
            set_once(
                message,
                "Domain label exceeds maximum length (63 characters)",
            );
            return;
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            set_once(message, "Domain label contains illegal characters");
            return;
        }
        if label.starts_with('-') || label.ends_with('-') {
            set_once(message, "Domain label cannot start or end with a hyphen");
            return;
        }
    }

    // Practical constraint: the final label must look like a TLD.
    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        set_once(message, "Top-level domain is invalid");
    }
}
