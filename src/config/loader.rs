/*!
 * Config File Loader
 * `key value` lines into a serde map
 */

use crate::core::errors::{ConfigError, ConfigResult};
use serde_json::{Map, Value};

/// Split config text into a key/value map
///
/// Quoted values stay strings; bare decimal values become numbers so the
/// typed deserializer can reject e.g. `num-cpu four` with a type error.
pub fn parse_pairs(text: &str) -> ConfigResult<Map<String, Value>> {
    let mut map = Map::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = match raw_line.split_once('#') {
            Some((before, _)) => before,
            None => raw_line,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once(char::is_whitespace)
            .map(|(k, v)| (k.trim(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
            .ok_or_else(|| ConfigError::MalformedLine {
                line: idx + 1,
                text: raw_line.to_string(),
            })?;

        if map.contains_key(key) {
            return Err(ConfigError::Invalid(format!("duplicate key `{}`", key)));
        }
        map.insert(key.to_string(), to_value(value));
    }

    Ok(map)
}

fn to_value(token: &str) -> Value {
    if let Some(inner) = unquote(token) {
        return Value::String(inner.to_string());
    }
    match token.parse::<u64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::String(token.to_string()),
    }
}

fn unquote(token: &str) -> Option<&str> {
    token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blank_lines() {
        let map = parse_pairs("# header\n\nnum-cpu 2  # two cores\n").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["num-cpu"], Value::from(2u64));
    }

    #[test]
    fn test_quoted_value() {
        let map = parse_pairs("scheduler \"fcfs\"").unwrap();
        assert_eq!(map["scheduler"], Value::String("fcfs".into()));
    }

    #[test]
    fn test_missing_value() {
        assert!(matches!(
            parse_pairs("num-cpu"),
            Err(ConfigError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_key() {
        assert!(matches!(
            parse_pairs("num-cpu 1\nnum-cpu 2"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
