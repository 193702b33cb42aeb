// Raw metrics document as written by the producing agent. Every field is optional
// and every leaf may arrive as a number or a numeric-looking string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub cpu: Option<RawCpu>,
    #[serde(default)]
    pub ram: Option<RawRam>,
    #[serde(default)]
    pub disks: Option<Vec<RawDisk>>,
    #[serde(default)]
    pub network: Option<RawNetwork>,
    #[serde(default)]
    pub gpus: Option<Vec<RawGpu>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCpu {
    pub usage: Option<Value>,
    pub name: Option<Value>,
    pub speed: Option<Value>,
    pub procs: Option<Value>,
    pub uptime: Option<Value>,
    pub temp: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRam {
    pub usage: Option<Value>,
    pub total: Option<Value>,
    pub used: Option<Value>,
    pub committed: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDisk {
    pub name: Option<Value>,
    pub usage: Option<Value>,
    pub read: Option<Value>,
    pub write: Option<Value>,
    pub resp: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNetwork {
    pub usage: Option<Value>,
    pub name: Option<Value>,
    pub send: Option<Value>,
    pub recv: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGpu {
    pub usage: Option<Value>,
    pub name: Option<Value>,
    pub temp: Option<Value>,
    pub driver: Option<Value>,
    pub ram: Option<Value>,
}

impl RawSnapshot {
    /// A document that is valid JSON but not an object (`42`, `[]`, `null`) has no
    /// sections and yields an empty snapshot.
    pub fn from_value(value: Value) -> Result<Self, FetchError> {
        if !value.is_object() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Parse a document body: drop a leading BOM, trim, reject empty, parse JSON.
pub fn parse_document(bytes: &[u8]) -> Result<Value, FetchError> {
    let text = std::str::from_utf8(bytes).map_err(|_| FetchError::NotUtf8)?;
    let text = text.strip_prefix(BOM).unwrap_or(text).trim();
    if text.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(serde_json::from_str(text)?)
}

pub fn parse_snapshot(bytes: &[u8]) -> Result<RawSnapshot, FetchError> {
    RawSnapshot::from_value(parse_document(bytes)?)
}

/// Served in place of a missing, empty, or unparseable backing file.
pub fn default_document() -> Value {
    serde_json::json!({
        "cpu": { "usage": 0, "name": "Waiting for data..." },
        "ram": { "usage": 0, "total": "0 GB" },
        "disks": [],
        "gpus": [],
        "network": { "usage": 0, "name": "Network" },
    })
}

/// Display form of a loose value with `suffix` appended, or `"--"` when the value is
/// absent, null, or an empty string.
pub fn format_value(value: Option<&Value>, suffix: &str) -> String {
    match value.and_then(display) {
        Some(s) => format!("{s}{suffix}"),
        None => "--".into(),
    }
}

fn display(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() => format_number(f),
            _ => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

/// Integral values print without a fraction (`45.0` -> `"45"`).
pub fn format_number(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}

/// Numeric reading of a loose value: numbers, or strings that parse as a number after trimming.
pub fn as_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Leading-integer reading: `"85.9"` -> 85, `" 81C"` -> 81, `80.9` -> 80.
pub fn parse_int_prefix(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64),
        },
        Value::String(s) => {
            let s = s.trim_start();
            let (sign, digits) = match s.as_bytes().first() {
                Some(b'-') => (-1, &s[1..]),
                Some(b'+') => (1, &s[1..]),
                _ => (1, s),
            };
            let end = digits
                .bytes()
                .position(|b| !b.is_ascii_digit())
                .unwrap_or(digits.len());
            digits[..end].parse::<i64>().ok().map(|n| sign * n)
        }
        _ => None,
    }
}
