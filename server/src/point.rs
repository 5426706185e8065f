//! Time-series points and their InfluxDB line-protocol encoding.

use chrono::{DateTime, Utc};

/// One stored price observation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint {
    pub job_id: i64,
    pub title: String,
    pub url: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl NormalizedPoint {
    /// Encodes the point as one line-protocol line (no trailing newline).
    ///
    /// Tags with empty values are left out, the write API rejects them.
    pub fn to_line(&self, measurement: &str) -> String {
        let mut line = escape_measurement(measurement);

        let job_id = self.job_id.to_string();
        for (key, value) in [
            ("job_id", job_id.as_str()),
            ("item_title", self.title.as_str()),
            ("item_url", self.url.as_str()),
        ] {
            let value = escape_tag(value);
            if value.is_empty() {
                continue;
            }
            line.push(',');
            line.push_str(key);
            line.push('=');
            line.push_str(&value);
        }

        line.push_str(" price=");
        line.push_str(&format_float(self.price));

        if let Some(nanos) = self.timestamp.timestamp_nanos_opt() {
            line.push(' ');
            line.push_str(&nanos.to_string());
        }
        line
    }
}

/// Encodes a set of points as a line-protocol body.
pub fn encode_lines(measurement: &str, points: &[NormalizedPoint]) -> String {
    points
        .iter()
        .map(|p| p.to_line(measurement))
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_measurement(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ',' | ' ' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

fn escape_tag(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    // Line breaks cannot be escaped in tag values.
    let flattened = value.replace(['\n', '\r'], " ");
    let trimmed = flattened.trim();
    for c in trimmed.chars() {
        match c {
            ',' | ' ' | '=' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Float field values always carry a decimal part so the field type stays
/// float even for whole prices.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(title: &str, url: &str, price: f64) -> NormalizedPoint {
        NormalizedPoint {
            job_id: 4,
            title: title.to_string(),
            url: url.to_string(),
            price,
            timestamp: Utc.timestamp_opt(1_700_000_000, 5).unwrap(),
        }
    }

    #[test]
    fn test_line_basic() {
        let line = point("Kolo", "/inzerat/1", 1250.0).to_line("item_prices");
        assert_eq!(
            line,
            concat!(
                "item_prices,job_id=4,item_title=Kolo,item_url=/inzerat/1",
                " price=1250.0 1700000000000000005"
            )
        );
    }

    #[test]
    fn test_line_escapes_tag_values() {
        let line = point("BMW E30, door=left", "/a b", 99.0).to_line("item_prices");
        assert!(line.contains(r"item_title=BMW\ E30\,\ door\=left"), "{line}");
        assert!(line.contains(r"item_url=/a\ b"), "{line}");
    }

    #[test]
    fn test_line_flattens_newlines() {
        let line = point("two\nlines", "/x", 1.0).to_line("item_prices");
        assert!(line.contains(r"item_title=two\ lines"), "{line}");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_line_omits_empty_tags() {
        let line = point("", "/x", 1.0).to_line("item_prices");
        assert!(!line.contains("item_title"), "{line}");
        assert!(line.starts_with("item_prices,job_id=4,item_url=/x "));
    }

    #[test]
    fn test_line_escapes_measurement() {
        let line = point("a", "b", 2.5).to_line("item prices");
        assert!(line.starts_with(r"item\ prices,"), "{line}");
        assert!(line.contains(" price=2.5 "));
    }

    #[test]
    fn test_encode_lines_joins_points() {
        let body = encode_lines("m", &[point("a", "b", 1.0), point("c", "d", 2.0)]);
        assert_eq!(body.lines().count(), 2);
    }
}
