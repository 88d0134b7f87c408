use std::str::FromStr;

/// Parses an optional query value, falling back to `default` when it is
/// missing, malformed or fails `accept`.
pub fn parse_or_default<T: FromStr>(raw: Option<&str>, default: T, accept: impl Fn(&T) -> bool) -> T {
    raw.and_then(|value| value.trim().parse::<T>().ok())
        .filter(|value| accept(value))
        .unwrap_or(default)
}
