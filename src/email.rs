use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;
const MAX_DOMAIN_LEN: usize = 253;

const DISPOSABLE_DOMAINS: &[&str] = &[
    "tempmail.com",
    "throwaway.email",
    "10minutemail.com",
    "guerrillamail.com",
];

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .unwrap();
}

// `null`, `false`, `0` and `""` count as no email at all
pub fn sanitize(raw: &Value) -> Option<String> {
    let missing = match raw {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if missing {
        return None;
    }

    let text = as_text(raw);
    let cleaned: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '(' | ')' | '{' | '}' | '[' | ']' | '\\' | '/'))
        .take(MAX_EMAIL_LEN)
        .collect();

    if cleaned.is_empty() { None } else { Some(cleaned) }
}

// text form of a submitted value; arrays are joined with ',' so
// `["a@b.io"]` reads as `a@b.io`
fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(as_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

pub fn is_valid(email: &str) -> bool {
    if !EMAIL_RE.is_match(email) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }
    if domain.starts_with('-') || domain.ends_with('-') || !domain.contains('.') {
        return false;
    }

    !is_disposable(domain)
}

// exact domain or a subdomain of it; `tempmail.com.example.org` is not blocked
fn is_disposable(domain: &str) -> bool {
    DISPOSABLE_DOMAINS.iter().any(|d| {
        domain == *d
            || domain
                .strip_suffix(d)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}
