//! Plain-text representation of configuration blocks.
//!
//! One entry per line, `key = value  # description`. Values round-trip
//! exactly: writing a block and parsing the result yields a block equal in
//! keys and values. Strings are quoted on output; unquoted tokens that do not
//! parse as a bool or number are accepted as strings on input.

use crate::block::ConfigBlock;
use crate::error::ConfigError;
use crate::value::ConfigValue;

/// Render a block as configuration text.
pub fn write_config_string(block: &ConfigBlock) -> String {
    let mut out = String::new();
    for (key, value, description) in block.iter() {
        out.push_str(key);
        out.push_str(" = ");
        out.push_str(&format_value(value));
        if !description.is_empty() {
            out.push_str("  # ");
            out.push_str(&description.replace('\n', " "));
        }
        out.push('\n');
    }
    out
}

/// Parse configuration text into a block.
///
/// Blank lines and lines starting with `#` are ignored. A key occurring more
/// than once keeps the last value.
pub fn parse_config_string(text: &str) -> Result<ConfigBlock, ConfigError> {
    let mut block = ConfigBlock::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line_no = idx + 1;
        let (key, rest) = line.split_once('=').ok_or_else(|| ConfigError::Parse {
            line: line_no,
            message: "expected 'key = value'".to_string(),
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Parse {
                line: line_no,
                message: "empty key".to_string(),
            });
        }
        let (value, description) = parse_value(rest.trim_start(), line_no)?;
        match value {
            ConfigValue::Bool(v) => block.set_value(key, v, &description),
            ConfigValue::Int(v) => block.set_value(key, v, &description),
            ConfigValue::Float(v) => block.set_value(key, v, &description),
            ConfigValue::Str(v) => block.set_value(key, v, &description),
        }
    }
    Ok(block)
}

fn format_value(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Bool(v) => v.to_string(),
        ConfigValue::Int(v) => v.to_string(),
        // Debug formatting of f64 is the shortest representation that parses
        // back to the identical value.
        ConfigValue::Float(v) => format!("{v:?}"),
        ConfigValue::Str(v) => quote(v),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn parse_value(rest: &str, line_no: usize) -> Result<(ConfigValue, String), ConfigError> {
    if let Some(quoted) = rest.strip_prefix('"') {
        return parse_quoted(quoted, line_no);
    }

    let (token, description) = match rest.split_once('#') {
        Some((tok, desc)) => (tok.trim(), desc.trim().to_string()),
        None => (rest.trim(), String::new()),
    };
    if token.is_empty() {
        return Err(ConfigError::Parse {
            line: line_no,
            message: "missing value".to_string(),
        });
    }
    Ok((parse_token(token), description))
}

fn parse_token(token: &str) -> ConfigValue {
    match token {
        "true" => return ConfigValue::Bool(true),
        "false" => return ConfigValue::Bool(false),
        _ => {}
    }
    if let Ok(v) = token.parse::<i64>() {
        return ConfigValue::Int(v);
    }
    if let Ok(v) = token.parse::<f64>() {
        return ConfigValue::Float(v);
    }
    ConfigValue::Str(token.to_string())
}

fn parse_quoted(body: &str, line_no: usize) -> Result<(ConfigValue, String), ConfigError> {
    let mut value = String::new();
    let mut chars = body.chars();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some('"') => value.push('"'),
                Some('\\') => value.push('\\'),
                Some('n') => value.push('\n'),
                _ => {
                    return Err(ConfigError::Parse {
                        line: line_no,
                        message: "invalid escape in quoted string".to_string(),
                    })
                }
            },
            Some('"') => break,
            Some(c) => value.push(c),
            None => {
                return Err(ConfigError::Parse {
                    line: line_no,
                    message: "unterminated quoted string".to_string(),
                })
            }
        }
    }
    let tail = chars.as_str().trim_start();
    let description = match tail.strip_prefix('#') {
        Some(desc) => desc.trim().to_string(),
        None if tail.is_empty() => String::new(),
        None => {
            return Err(ConfigError::Parse {
                line: line_no,
                message: "unexpected text after quoted string".to_string(),
            })
        }
    };
    Ok((ConfigValue::Str(value), description))
}
