//! Naming conventions for discovered actions.

use praxis_core::HttpMethod;

/// Splits an optional HTTP method suffix off a file stem.
///
/// The last dot-separated segment is treated as a method when it names one
/// (case-insensitively); anything else stays part of the name and the method
/// defaults to POST.
///
/// ```
/// use praxis_codegen::parse_method_suffix;
/// use praxis_core::HttpMethod;
///
/// assert_eq!(parse_method_suffix("get-user.get"), ("get-user".to_string(), HttpMethod::Get));
/// assert_eq!(parse_method_suffix("create-post"), ("create-post".to_string(), HttpMethod::Post));
/// assert_eq!(parse_method_suffix("v1.2"), ("v1.2".to_string(), HttpMethod::Post));
/// ```
pub fn parse_method_suffix(stem: &str) -> (String, HttpMethod) {
    if let Some(dot) = stem.rfind('.').filter(|&dot| dot > 0) {
        if let Some(method) = HttpMethod::from_suffix(&stem[dot + 1..]) {
            return (stem[..dot].to_string(), method);
        }
    }
    (stem.to_string(), HttpMethod::default())
}

const fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Converts a kebab-case or slash-separated action name to camelCase.
///
/// A `/` or `-` followed by a word character is removed and the character
/// upper-cased; the first character is lower-cased.
///
/// ```
/// use praxis_codegen::to_camel_case;
///
/// assert_eq!(to_camel_case("create-post"), "createPost");
/// assert_eq!(to_camel_case("auth/login"), "authLogin");
/// assert_eq!(to_camel_case("nested/deep-action"), "nestedDeepAction");
/// ```
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(&next) if (c == '/' || c == '-') && is_word(next) => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }

    let mut chars = out.chars();
    match chars.next() {
        Some(first) if is_word(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        _ => out,
    }
}

/// Derives the generated module name for an action.
///
/// Every non-word character becomes `_` and the result is lower-cased; a
/// leading digit gets a `_` prefix.
pub fn module_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if is_word(c) { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Returns whether `ident` is a usable Rust identifier (not a keyword).
pub fn is_identifier(ident: &str) -> bool {
    syn::parse_str::<syn::Ident>(ident).is_ok()
}
