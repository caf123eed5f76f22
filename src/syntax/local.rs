/// atext ASCII plus '.', with '.' not initial/terminal and no "..".
pub(crate) fn check_local(local: &str, message: &mut Option<String>) {
    if local.is_empty() {
        set_once(message, "Local part is empty");
        return;
    }
    if local.len() > 64 {
        set_once(
            message,
            "Local part exceeds maximum length (64 characters)",
        );
        return;
    }
    if local.starts_with('.') || local.ends_with('.') {
        set_once(message, "Local part cannot start or end with a dot");
        return;
    }
    if local.contains("..") {
        set_once(message, "Local part cannot contain consecutive dots");
        return;
    }
    if !local.chars().all(is_atext_or_dot) {
        set_once(message, "Local part contains illegal characters");
    }
}

fn is_atext_or_dot(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
                | '.'
        )
}

pub(crate) fn set_once(message: &mut Option<String>, text: &str) {
    if message.is_none() {
        *message = Some(text.to_string());
    }
}
