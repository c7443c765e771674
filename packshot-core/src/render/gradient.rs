//! Parser for the `linear-gradient(<angle>, <stop>[, <stop>...])` strings
//! carried by pack-tier metadata. Pure string → spec; rendering lives in the
//! banner compositor.

/// One color stop. The color is kept as its source text; unparseable colors
/// are dropped at fill time, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient axis, normally in `[0, 1]`.
    pub offset: f64,
    pub color: String,
}

/// Parsed gradient: an angle plus stops in the order the author wrote them.
/// Stops are never re-sorted, so a non-monotonic source order is reproduced
/// faithfully.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientSpec {
    pub angle_radians: f64,
    pub stops: Vec<GradientStop>,
}

/// Parse a CSS-like linear gradient string.
///
/// Returns `None` when the input is not a gradient at all; the caller then
/// treats the string as a plain fill color. A malformed angle fails closed
/// to `0`, and a stop without an explicit percentage gets the evenly spaced
/// offset `index / (count - 1)` (a lone offsetless stop sits at `0`).
pub fn parse_linear_gradient(input: &str) -> Option<GradientSpec> {
    let rest = input.trim().strip_prefix("linear-gradient")?;
    let rest = rest.trim_start().strip_prefix('(')?;
    let body = rest.trim_end().strip_suffix(')')?;

    // The angle/stop boundary is the first *top-level* comma: stop colors
    // like rgba(...) contain commas of their own.
    let (angle_text, stops_text) = split_top_level_once(body)?;
    let angle_radians = parse_angle(angle_text.trim());

    let tokens: Vec<&str> = split_top_level(stops_text)
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return None;
    }

    let count = tokens.len();
    let stops = tokens
        .into_iter()
        .enumerate()
        .map(|(index, token)| {
            let (color, explicit) = split_stop_token(token);
            let offset = explicit.unwrap_or_else(|| {
                if count <= 1 {
                    0.0
                } else {
                    index as f64 / (count - 1) as f64
                }
            });
            GradientStop { offset, color }
        })
        .collect();

    Some(GradientSpec {
        angle_radians,
        stops,
    })
}

fn parse_angle(token: &str) -> f64 {
    if let Some(degrees) = token.strip_suffix("deg") {
        degrees
            .trim()
            .parse::<f64>()
            .map(f64::to_radians)
            .unwrap_or(0.0)
    } else {
        // Bare number: already radians.
        token.parse::<f64>().unwrap_or(0.0)
    }
}

fn split_top_level_once(s: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return Some((&s[..i], &s[i + 1..])),
            _ => {}
        }
    }
    None
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split a stop token into its color text and optional position. The
/// position accepts `NN%` or a bare number, both scaled by 100 (matching
/// the site's historical parser).
fn split_stop_token(token: &str) -> (String, Option<f64>) {
    let (color, rest) = if let Some(close) = token.find(')') {
        token.split_at(close + 1)
    } else {
        match token.find(char::is_whitespace) {
            Some(i) => token.split_at(i),
            None => (token, ""),
        }
    };

    let rest = rest.trim();
    let offset = if rest.is_empty() {
        None
    } else {
        rest.strip_suffix('%')
            .unwrap_or(rest)
            .trim()
            .parse::<f64>()
            .ok()
            .map(|percent| percent / 100.0)
    };

    (color.trim().to_string(), offset)
}
