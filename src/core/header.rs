// Key-value text header shared by all DACQ files

use crate::core::constants::*;
use crate::core::error::{DacqError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// A single header value.
///
/// Values are numeric only when their text is made of digits and whitespace;
/// anything else (signs, decimal points, units) stays a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl HeaderValue {
    /// Applies the digits-and-whitespace rule to raw header text.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        let numeric = !trimmed.is_empty()
            && trimmed.chars().all(|c| c.is_ascii_digit() || c.is_whitespace());

        if numeric {
            if let Ok(n) = trimmed.parse::<i64>() {
                return HeaderValue::Int(n);
            }
        }
        HeaderValue::Text(raw.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Int(n) => Some(*n as f64),
            HeaderValue::Float(x) => Some(*x),
            HeaderValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Int(n) => Some(*n),
            HeaderValue::Float(x) if x.fract() == 0.0 => Some(*x as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Int(n) => write!(f, "{}", n),
            HeaderValue::Float(x) => write!(f, "{}", x),
            HeaderValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for HeaderValue {
    fn from(n: i64) -> Self {
        HeaderValue::Int(n)
    }
}

impl From<i32> for HeaderValue {
    fn from(n: i32) -> Self {
        HeaderValue::Int(n as i64)
    }
}

impl From<usize> for HeaderValue {
    fn from(n: usize) -> Self {
        HeaderValue::Int(n as i64)
    }
}

impl From<f64> for HeaderValue {
    fn from(x: f64) -> Self {
        HeaderValue::Float(x)
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::Text(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::Text(s)
    }
}

/// Ordered header mapping. Insertion order is the order lines are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Header {
    entries: IndexMap<String, HeaderValue>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses header text (everything before the start sentinel).
    pub fn parse(text: &str) -> Result<Self> {
        let mut entries = IndexMap::new();

        for (idx, raw_line) in text.split('\n').enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }

            let (key, rest) = match line.split_once(char::is_whitespace) {
                Some((key, rest)) => (key, rest.trim_start()),
                None => (line, ""),
            };
            if key.is_empty() {
                return Err(DacqError::MalformedHeader {
                    line: line_no,
                    reason: "line starts with whitespace, no key".to_string(),
                });
            }
            if rest.is_empty() {
                return Err(DacqError::MalformedHeader {
                    line: line_no,
                    reason: format!("key {:?} has no value", key),
                });
            }

            let raw = if HZ_KEYS.contains(&key) {
                rest.trim_end().strip_suffix(HZ_SUFFIX).unwrap_or(rest)
            } else {
                rest
            };

            if entries
                .insert(key.to_string(), HeaderValue::from_raw(raw))
                .is_some()
            {
                return Err(DacqError::MalformedHeader {
                    line: line_no,
                    reason: format!("duplicate key {:?}", key),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Parses raw header bytes; the header must be ASCII/UTF-8 text.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            let line = bytes[..e.valid_up_to()]
                .iter()
                .filter(|&&b| b == b'\n')
                .count()
                + 1;
            DacqError::MalformedHeader {
                line,
                reason: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
            }
        })?;
        Self::parse(text)
    }

    /// Renders one `"key value\n"` line per entry, in insertion order.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push(' ');
            out.push_str(&value.to_string());
            if HZ_KEYS.contains(&key.as_str()) {
                out.push_str(HZ_SUFFIX);
            }
            out.push('\n');
        }
        out
    }

    /// Checks that `serialize` output parses back to this header.
    pub fn validate(&self) -> Result<()> {
        for (idx, (key, value)) in self.entries.iter().enumerate() {
            let line = idx + 1;
            if key.is_empty() || key.contains(char::is_whitespace) {
                return Err(DacqError::MalformedHeader {
                    line,
                    reason: format!("key {:?} is empty or contains whitespace", key),
                });
            }

            let text = value.to_string();
            if text.trim().is_empty() {
                return Err(DacqError::MalformedHeader {
                    line,
                    reason: format!("key {:?} has no value", key),
                });
            }
            if text.contains(['\r', '\n']) {
                return Err(DacqError::MalformedHeader {
                    line,
                    reason: format!("value of {:?} contains a line break", key),
                });
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries.get(key)
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<HeaderValue>,
    ) -> Option<HeaderValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<HeaderValue> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Timestamp tick rate in Hz.
    pub fn timebase(&self) -> Result<f64> {
        let value = self
            .get(KEY_TIMEBASE)
            .ok_or(DacqError::MissingHeaderKey(KEY_TIMEBASE))?;
        value
            .as_f64()
            .filter(|tb| *tb > 0.0)
            .ok_or_else(|| DacqError::InvalidHeaderValue {
                key: KEY_TIMEBASE,
                value: value.to_string(),
            })
    }

    pub fn sample_rate(&self) -> Option<f64> {
        self.get(KEY_SAMPLE_RATE).and_then(HeaderValue::as_f64)
    }

    /// Continuous sample width: 1 or 2 bytes.
    pub fn bytes_per_sample(&self) -> Result<usize> {
        match self.get(KEY_BYTES_PER_SAMPLE) {
            None => Err(DacqError::MissingHeaderKey(KEY_BYTES_PER_SAMPLE)),
            Some(HeaderValue::Int(1)) => Ok(1),
            Some(HeaderValue::Int(2)) => Ok(2),
            Some(other) => Err(DacqError::UnsupportedSampleWidth(other.to_string())),
        }
    }

    pub fn num_spikes(&self) -> Option<usize> {
        self.get(KEY_NUM_SPIKES)
            .and_then(HeaderValue::as_i64)
            .and_then(|n| usize::try_from(n).ok())
    }

    /// Recording start from `trial_date` ("Thursday, 14 Dec 2017") and `trial_time` ("12:30:05").
    pub fn trial_datetime(&self) -> Option<NaiveDateTime> {
        let date = self.get(KEY_TRIAL_DATE)?.as_str()?.trim();
        let time = self.get(KEY_TRIAL_TIME)?.as_str()?.trim();

        let date = NaiveDate::parse_from_str(date, "%A, %d %b %Y").ok()?;
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S").ok()?;
        Some(date.and_time(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_heuristic() {
        assert_eq!(HeaderValue::from_raw("96000"), HeaderValue::Int(96000));
        assert_eq!(HeaderValue::from_raw(" 12 "), HeaderValue::Int(12));
        assert_eq!(
            HeaderValue::from_raw("unit mode"),
            HeaderValue::Text("unit mode".to_string())
        );
        // signs and decimals are never numeric
        assert_eq!(HeaderValue::from_raw("-5"), HeaderValue::Text("-5".to_string()));
        assert_eq!(HeaderValue::from_raw("4.8"), HeaderValue::Text("4.8".to_string()));
        assert_eq!(HeaderValue::from_raw("1e3"), HeaderValue::Text("1e3".to_string()));
        // digits split by whitespace pass the test but do not form one number
        assert_eq!(HeaderValue::from_raw("12 34"), HeaderValue::Text("12 34".to_string()));
    }

    #[test]
    fn test_parse_strips_hz() {
        let header =
            Header::parse("timebase 96000 hz\r\nsample_rate 48000 hz\r\nmode unit mode").unwrap();
        assert_eq!(header.get("timebase"), Some(&HeaderValue::Int(96000)));
        assert_eq!(header.get("sample_rate"), Some(&HeaderValue::Int(48000)));
        assert_eq!(header.get("mode"), Some(&HeaderValue::Text("unit mode".to_string())));
        assert_eq!(header.timebase().unwrap(), 96000.0);
    }

    #[test]
    fn test_hz_only_stripped_for_rate_keys() {
        let header = Header::parse("filter_freq 300 hz").unwrap();
        assert_eq!(
            header.get("filter_freq"),
            Some(&HeaderValue::Text("300 hz".to_string()))
        );
    }

    #[test]
    fn test_decimal_sample_rate_stays_text() {
        let header = Header::parse("sample_rate 250.0 hz").unwrap();
        assert_eq!(header.get("sample_rate"), Some(&HeaderValue::Text("250.0".to_string())));
        assert_eq!(header.sample_rate(), Some(250.0));
    }

    #[test]
    fn test_hz_stripped_before_trailing_space() {
        let header = Header::parse("timebase 96000 hz \r\nsample_rate 48000 hz\t\r\n").unwrap();
        assert_eq!(header.get("timebase"), Some(&HeaderValue::Int(96000)));
        assert_eq!(header.get("sample_rate"), Some(&HeaderValue::Int(48000)));
        assert_eq!(header.timebase().unwrap(), 96000.0);
    }

    #[test]
    fn test_invalid_timebase_is_not_missing() {
        let header = Header::parse("timebase fast").unwrap();
        assert!(matches!(
            header.timebase(),
            Err(DacqError::InvalidHeaderValue { key: KEY_TIMEBASE, value }) if value == "fast"
        ));

        let header = Header::parse("timebase 0 hz").unwrap();
        assert!(matches!(header.timebase(), Err(DacqError::InvalidHeaderValue { .. })));

        assert!(matches!(
            Header::new().timebase(),
            Err(DacqError::MissingHeaderKey(KEY_TIMEBASE))
        ));
    }

    #[test]
    fn test_validate() {
        let parsed = Header::parse("timebase 96000 hz\nmode unit mode").unwrap();
        assert!(parsed.validate().is_ok());

        let cases: [(&str, HeaderValue); 5] = [
            ("comments", HeaderValue::from("")),
            ("comments", HeaderValue::from("  ")),
            ("", HeaderValue::from(1i64)),
            ("two words", HeaderValue::from(1i64)),
            ("note", HeaderValue::from("a\r\ndata_start")),
        ];
        for (key, value) in cases {
            let mut header = parsed.clone();
            header.insert(key, value);
            assert!(
                matches!(header.validate(), Err(DacqError::MalformedHeader { line: 3, .. })),
                "{key:?} accepted"
            );
        }
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = Header::parse("a 1\nb 2\na 3").unwrap_err();
        match err {
            DacqError::MalformedHeader { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_value_rejected() {
        assert!(matches!(
            Header::parse("trial_date\r\n"),
            Err(DacqError::MalformedHeader { line: 1, .. })
        ));
        assert!(matches!(
            Header::parse("comments   \r\n"),
            Err(DacqError::MalformedHeader { line: 1, .. })
        ));
    }

    #[test]
    fn test_serialize_preserves_order() {
        let text =
            "trial_date Thursday, 14 Dec 2017\ntimebase 96000 hz\nnum_spikes 3\nmode unit mode\n";
        let header = Header::parse(text).unwrap();
        let keys: Vec<_> = header.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["trial_date", "timebase", "num_spikes", "mode"]);
        assert_eq!(header.serialize(), text);
    }

    #[test]
    fn test_serialize_float() {
        let mut header = Header::new();
        header.insert("gain", 0.5);
        header.insert("scale", 2.0);
        assert_eq!(header.serialize(), "gain 0.5\nscale 2\n");
    }

    #[test]
    fn test_bytes_per_sample() {
        assert_eq!(Header::parse("bytes_per_sample 2").unwrap().bytes_per_sample().unwrap(), 2);
        assert!(matches!(
            Header::parse("bytes_per_sample 4").unwrap().bytes_per_sample(),
            Err(DacqError::UnsupportedSampleWidth(v)) if v == "4"
        ));
        assert!(matches!(
            Header::new().bytes_per_sample(),
            Err(DacqError::MissingHeaderKey(KEY_BYTES_PER_SAMPLE))
        ));
    }

    #[test]
    fn test_trial_datetime() {
        let header =
            Header::parse("trial_date Thursday, 14 Dec 2017\ntrial_time 12:30:05").unwrap();
        let expected = NaiveDate::from_ymd_opt(2017, 12, 14)
            .unwrap()
            .and_hms_opt(12, 30, 5)
            .unwrap();
        assert_eq!(header.trial_datetime(), Some(expected));
    }

    #[test]
    fn test_to_json() {
        let header = Header::parse("timebase 96000 hz\nmode unit mode").unwrap();
        let value: serde_json::Value = serde_json::from_str(&header.to_json().unwrap()).unwrap();
        assert_eq!(value["timebase"], 96000);
        assert_eq!(value["mode"], "unit mode");
    }
}
