//! flag::value
//!
//! Typed flag values and the shared handles flags are bound to.
//!
//! # Design
//!
//! A [`Flag<T>`] is a cloneable handle to the storage a flag writes into.
//! The [`FlagSet`](super::FlagSet) keeps one clone and the command keeps
//! another, so values parsed during resolution are visible to the action
//! that runs afterwards.

use std::fmt;
use std::num::IntErrorKind;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::duration;

/// Reason reported for values that cannot be parsed.
pub(crate) const PARSE_ERROR: &str = "parse error";

/// Reason reported for numbers that do not fit the flag type.
pub(crate) const RANGE_ERROR: &str = "value out of range";

/// A type that can be stored in a flag.
pub trait FlagValue: Clone + Send + 'static {
    /// Placeholder shown after the flag name in usage output.
    const TYPE_NAME: &'static str;

    /// Boolean flags need no value on the command line.
    const IS_BOOL: bool = false;

    /// Defaults of this type are quoted in usage output.
    const QUOTED: bool = false;

    /// Parse a command-line value.
    fn parse_value(raw: &str) -> Result<Self, String>;

    /// Render the value for usage output.
    fn format_value(&self) -> String;

    /// Zero values are not shown as defaults.
    fn is_zero(&self) -> bool;
}

impl FlagValue for bool {
    const TYPE_NAME: &'static str = "";
    const IS_BOOL: bool = true;

    fn parse_value(raw: &str) -> Result<Self, String> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(PARSE_ERROR.to_string()),
        }
    }

    fn format_value(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl FlagValue for String {
    const TYPE_NAME: &'static str = "string";
    const QUOTED: bool = true;

    fn parse_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn format_value(&self) -> String {
        self.clone()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl FlagValue for i64 {
    const TYPE_NAME: &'static str = "int";

    fn parse_value(raw: &str) -> Result<Self, String> {
        let (negative, digits) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };
        let magnitude = i128::from(parse_unsigned(digits)?);
        let value = if negative { -magnitude } else { magnitude };
        i64::try_from(value).map_err(|_| RANGE_ERROR.to_string())
    }

    fn format_value(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl FlagValue for u64 {
    const TYPE_NAME: &'static str = "uint";

    fn parse_value(raw: &str) -> Result<Self, String> {
        parse_unsigned(raw)
    }

    fn format_value(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl FlagValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn parse_value(raw: &str) -> Result<Self, String> {
        raw.parse().map_err(|_| PARSE_ERROR.to_string())
    }

    fn format_value(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl FlagValue for Duration {
    const TYPE_NAME: &'static str = "duration";

    fn parse_value(raw: &str) -> Result<Self, String> {
        duration::parse(raw).map_err(|_| PARSE_ERROR.to_string())
    }

    fn format_value(&self) -> String {
        duration::format(*self)
    }

    fn is_zero(&self) -> bool {
        *self == Duration::ZERO
    }
}

/// Parse an unsigned integer with an optional `0x`, `0o`, `0b`, or leading-`0`
/// radix prefix. Prefixed numbers may use `_` as a digit separator.
fn parse_unsigned(raw: &str) -> Result<u64, String> {
    let (radix, body) = if let Some(rest) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        (16, rest)
    } else if let Some(rest) = raw.strip_prefix("0o").or_else(|| raw.strip_prefix("0O")) {
        (8, rest)
    } else if let Some(rest) = raw.strip_prefix("0b").or_else(|| raw.strip_prefix("0B")) {
        (2, rest)
    } else if raw.len() > 1 && raw.starts_with('0') {
        (8, &raw[1..])
    } else {
        (10, raw)
    };

    let cleaned = if radix == 10 {
        body.to_string()
    } else {
        body.replace('_', "")
    };
    if !cleaned.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(PARSE_ERROR.to_string());
    }

    u64::from_str_radix(&cleaned, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => RANGE_ERROR.to_string(),
        _ => PARSE_ERROR.to_string(),
    })
}

/// Shared storage for a flag's value.
pub struct Flag<T> {
    slot: Arc<Mutex<T>>,
}

impl<T: FlagValue> Flag<T> {
    /// Create a handle holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            slot: Arc::new(Mutex::new(initial)),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.lock().clone()
    }

    /// Replace the current value.
    pub fn set(&self, value: T) {
        *self.lock() = value;
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        // A panic while holding the lock cannot leave a plain value half-written.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Clone for Flag<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: FlagValue + Default> Default for Flag<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: FlagValue + fmt::Debug> fmt::Debug for Flag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Flag").field(&*self.lock()).finish()
    }
}

/// Type-erased write access to a flag's storage.
pub(crate) trait Slot: Send {
    fn set(&mut self, raw: &str) -> Result<(), String>;
}

pub(crate) struct TypedSlot<T>(pub(crate) Flag<T>);

impl<T: FlagValue> Slot for TypedSlot<T> {
    fn set(&mut self, raw: &str) -> Result<(), String> {
        let value = T::parse_value(raw)?;
        self.0.set(value);
        Ok(())
    }
}

pub(crate) struct FuncSlot<F>(pub(crate) F);

impl<F> Slot for FuncSlot<F>
where
    F: FnMut(&str) -> Result<(), String> + Send,
{
    fn set(&mut self, raw: &str) -> Result<(), String> {
        (self.0)(raw)
    }
}
