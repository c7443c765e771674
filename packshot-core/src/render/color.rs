use image::Rgba;

/// Parse a CSS color literal (`#rgb`, `#rrggbb`, `rgb(...)`, `rgba(...)`, or
/// a keyword) into straight-alpha RGBA8. Returns `None` for anything
/// unparseable; callers degrade to transparent or drop the gradient stop.
pub fn parse_css_color(input: &str) -> Option<Rgba<u8>> {
    let input = input.trim();
    if let Some(hex) = input.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = input.to_ascii_lowercase();
    if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
        return parse_rgb_func(&lower);
    }
    keyword(&lower)
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    fn byte(pair: &str) -> Option<u8> {
        u8::from_str_radix(pair, 16).ok()
    }

    // Length checks below count bytes; multi-byte input must not reach the
    // fixed-index slices.
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let mut channels = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = byte(&c.to_string())?;
                channels[i] = v << 4 | v;
            }
            Some(Rgba([channels[0], channels[1], channels[2], 255]))
        }
        6 => Some(Rgba([
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            255,
        ])),
        _ => None,
    }
}

fn parse_rgb_func(lower: &str) -> Option<Rgba<u8>> {
    let open = lower.find('(')?;
    let close = lower.rfind(')')?;
    let args: Vec<&str> = lower.get(open + 1..close)?.split(',').collect();
    if args.len() != 3 && args.len() != 4 {
        return None;
    }

    let mut channels = [0u8; 3];
    for (slot, arg) in channels.iter_mut().zip(&args) {
        let v: f64 = arg.trim().parse().ok()?;
        *slot = v.clamp(0.0, 255.0).round() as u8;
    }
    let alpha = if args.len() == 4 {
        let a: f64 = args[3].trim().parse().ok()?;
        (a.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };
    Some(Rgba([channels[0], channels[1], channels[2], alpha]))
}

fn keyword(lower: &str) -> Option<Rgba<u8>> {
    let (r, g, b, a) = match lower {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "green" => (0, 128, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "pink" => (255, 192, 203, 255),
        "cyan" | "aqua" => (0, 255, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        "silver" => (192, 192, 192, 255),
        "gold" => (255, 215, 0, 255),
        "brown" => (165, 42, 42, 255),
        "lime" => (0, 255, 0, 255),
        "navy" => (0, 0, 128, 255),
        "teal" => (0, 128, 128, 255),
        "maroon" => (128, 0, 0, 255),
        "olive" => (128, 128, 0, 255),
        _ => return None,
    };
    Some(Rgba([r, g, b, a]))
}
