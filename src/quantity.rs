//! Ingredient quantity parsing and scaling.
//!
//! An ingredient line is free text with an optional leading quantity, e.g.
//! `"1 ½ cups flour"`. This module finds that quantity, multiplies it and
//! renders the result back in kitchen notation, preferring simple fractions
//! such as `3/4` over decimals.
//!
//! Nothing here can fail. Unparseable input always degrades to plausible
//! text so a caller can display the result of any user-entered line.

use log::trace;

/// Single-character vulgar fractions and the values they stand for.
///
/// Thirds, sixths, sevenths and ninths are truncated to kitchen precision.
pub const FRACTION_GLYPHS: &[(char, f64)] = &[
    ('¼', 0.25),
    ('½', 0.5),
    ('¾', 0.75),
    ('⅐', 0.142),
    ('⅑', 0.111),
    ('⅒', 0.1),
    ('⅓', 0.333),
    ('⅔', 0.666),
    ('⅕', 0.2),
    ('⅖', 0.4),
    ('⅗', 0.6),
    ('⅘', 0.8),
    ('⅙', 0.166),
    ('⅚', 0.833),
    ('⅛', 0.125),
    ('⅜', 0.375),
    ('⅝', 0.625),
    ('⅞', 0.875),
];

/// Largest denominator still rendered as a fraction.
pub const MAX_DENOMINATOR: f64 = 16.0;

/// Relative tolerance for the convergent search.
const TOLERANCE: f64 = 1.0e-6;

/// Hard cap on convergent iterations. A double has far fewer significant
/// continued-fraction terms than this.
const MAX_ITERATIONS: usize = 64;

/// Look up the value of a vulgar-fraction glyph.
pub fn glyph_value(glyph: char) -> Option<f64> {
    FRACTION_GLYPHS
        .iter()
        .find(|(g, _)| *g == glyph)
        .map(|(_, value)| *value)
}

/// Result of scanning an ingredient line for a leading quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedQuantity<'a> {
    /// The line does not start with a quantity; holds the line unchanged.
    NoQuantity(&'a str),
    /// A leading quantity and the trimmed text that follows it.
    Quantity { value: f64, remainder: &'a str },
}

/// Quantity and description of an ingredient line.
///
/// Lines without a leading quantity report a quantity of `1` and the full
/// line as `unit_and_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIngredient {
    pub quantity: f64,
    pub unit_and_name: String,
}

/// Split an ingredient line into its quantity and the rest of the text.
pub fn parse_quantity(line: &str) -> ParsedQuantity<'_> {
    let Some(end) = match_quantity(line) else {
        return ParsedQuantity::NoQuantity(line);
    };

    let value: f64 = line[..end].split_whitespace().map(piece_value).sum();
    let remainder = line[end..].trim();
    trace!("parsed {:?} as {} + {:?}", line, value, remainder);

    ParsedQuantity::Quantity { value, remainder }
}

/// Parse an ingredient line, reporting `1` when no quantity is present.
///
/// Use [`parse_quantity`] to tell "no quantity" apart from an explicit one.
pub fn parse_ingredient(line: &str) -> ParsedIngredient {
    match parse_quantity(line) {
        ParsedQuantity::NoQuantity(text) => ParsedIngredient {
            quantity: 1.0,
            unit_and_name: text.to_string(),
        },
        ParsedQuantity::Quantity { value, remainder } => ParsedIngredient {
            quantity: value,
            unit_and_name: remainder.to_string(),
        },
    }
}

/// Scale the leading quantity of an ingredient line.
///
/// # Example
/// ```
/// use recipe_digitizer::quantity::multiply_ingredient;
///
/// assert_eq!(multiply_ingredient("¾ tsp salt", 2.0), "1 1/2 tsp salt");
/// assert_eq!(multiply_ingredient("pinch of salt", 3.0), "pinch of salt");
/// ```
pub fn multiply_ingredient(line: &str, multiplier: f64) -> String {
    if multiplier == 1.0 {
        return line.to_string();
    }

    let (quantity, remainder) = match parse_quantity(line) {
        ParsedQuantity::NoQuantity(text) => return text.to_string(),
        ParsedQuantity::Quantity { value, remainder } => (value, remainder),
    };

    if quantity == 0.0 {
        return remainder.to_string();
    }

    let scaled = quantity * multiplier;
    // Zero, negative, NaN and infinite products all drop the number.
    if !(scaled > 0.0 && scaled.is_finite()) {
        return remainder.to_string();
    }

    let rendered = render_quantity(scaled);
    if remainder.is_empty() {
        rendered
    } else {
        format!("{} {}", rendered, remainder)
    }
}

/// Render a positive quantity as a whole number, a fraction with a
/// denominator of at most 16, a mixed number, or a two-decimal fallback.
pub fn render_quantity(value: f64) -> String {
    let (mut h1, mut h2, mut k1, mut k2) = (1.0_f64, 0.0_f64, 0.0_f64, 1.0_f64);
    let mut b = value;

    for _ in 0..MAX_ITERATIONS {
        let a = b.floor();
        (h1, h2) = (a * h1 + h2, h1);
        (k1, k2) = (a * k1 + k2, k1);

        if (value - h1 / k1).abs() <= value * TOLERANCE || k1 > MAX_DENOMINATOR {
            break;
        }

        let frac = b - a;
        if frac.abs() <= f64::EPSILON {
            break;
        }
        b = 1.0 / frac;
    }

    if k1 > MAX_DENOMINATOR {
        return render_decimal(value);
    }

    if h1 % k1 == 0.0 {
        return format!("{}", h1 / k1);
    }

    let whole = (h1 / k1).floor();
    let numerator = h1 % k1;
    if whole == 0.0 {
        format!("{}/{}", numerator, k1)
    } else {
        format!("{} {}/{}", whole, numerator, k1)
    }
}

fn render_decimal(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    match fixed.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => fixed,
    }
}

/// Byte length of the quantity token at the start of `line`, if any.
///
/// Accepts an optional whole number followed by whitespace, then one of: a
/// fraction `n/d`, a decimal (digits, any one separator, digits), an integer,
/// or a vulgar-fraction glyph.
fn match_quantity(line: &str) -> Option<usize> {
    let digits = digit_run(line, 0);
    if digits > 0 {
        let spaced = skip_whitespace(line, digits);
        if spaced > digits {
            if let Some(end) = match_amount(line, spaced) {
                return Some(end);
            }
        }
    }
    match_amount(line, 0)
}

fn match_amount(line: &str, start: usize) -> Option<usize> {
    let rest = &line[start..];
    let digits = digit_run(rest, 0);

    if digits == 0 {
        let glyph = rest.chars().next().filter(|c| glyph_value(*c).is_some())?;
        return Some(start + glyph.len_utf8());
    }

    let mut tail = rest[digits..].chars();
    match tail.next() {
        Some('/') => {
            let after = digits + 1;
            let denominator = digit_run(rest, after);
            if denominator > 0 {
                return Some(start + after + denominator);
            }
        }
        Some(sep) => {
            let after = digits + sep.len_utf8();
            let decimals = digit_run(rest, after);
            if decimals > 0 {
                return Some(start + after + decimals);
            }
        }
        _ => {}
    }

    Some(start + digits)
}

fn digit_run(s: &str, from: usize) -> usize {
    s[from..].bytes().take_while(u8::is_ascii_digit).count()
}

fn skip_whitespace(s: &str, from: usize) -> usize {
    let ws: usize = s[from..]
        .chars()
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    from + ws
}

/// Numeric value of one whitespace-separated piece of a quantity token.
/// Malformed pieces count as zero.
fn piece_value(piece: &str) -> f64 {
    let mut chars = piece.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if let Some(value) = glyph_value(c) {
            return value;
        }
    }

    if piece.contains('/') {
        return parse_fraction(piece).unwrap_or(0.0);
    }

    piece
        .parse()
        .ok()
        .or_else(|| leading_number(piece))
        .unwrap_or(0.0)
}

fn parse_fraction(piece: &str) -> Option<f64> {
    let (numerator, denominator) = piece.split_once('/')?;
    let numerator: f64 = numerator.trim().parse().ok()?;
    let denominator: f64 = denominator.trim().parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

/// Parse the longest `digits[.digits]` prefix of `piece`.
fn leading_number(piece: &str) -> Option<f64> {
    let whole = digit_run(piece, 0);
    if whole == 0 {
        return None;
    }
    let mut end = whole;
    if piece[whole..].starts_with('.') {
        let decimals = digit_run(piece, whole + 1);
        if decimals > 0 {
            end = whole + 1 + decimals;
        }
    }
    piece[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_integer() {
        let parsed = parse_ingredient("2 cups flour");
        assert_eq!(parsed.quantity, 2.0);
        assert_eq!(parsed.unit_and_name, "cups flour");
    }

    #[test]
    fn test_parse_fraction() {
        let parsed = parse_ingredient("1/3 cup butter");
        assert!(approx(parsed.quantity, 1.0 / 3.0));
        assert_eq!(parsed.unit_and_name, "cup butter");
    }

    #[test]
    fn test_parse_mixed_number() {
        let parsed = parse_ingredient("1 1/2 cups sugar");
        assert_eq!(parsed.quantity, 1.5);
        assert_eq!(parsed.unit_and_name, "cups sugar");
    }

    #[test]
    fn test_parse_whole_and_glyph() {
        let parsed = parse_ingredient("1 ½ cups flour");
        assert_eq!(parsed.quantity, 1.5);
        assert_eq!(parsed.unit_and_name, "cups flour");
    }

    #[test]
    fn test_parse_glyph_only() {
        let parsed = parse_ingredient("¾ tsp salt");
        assert_eq!(parsed.quantity, 0.75);
        assert_eq!(parsed.unit_and_name, "tsp salt");
    }

    #[test]
    fn test_parse_decimal() {
        let parsed = parse_ingredient("2.5 kg potatoes");
        assert_eq!(parsed.quantity, 2.5);
        assert_eq!(parsed.unit_and_name, "kg potatoes");
    }

    #[test]
    fn test_parse_decimal_with_odd_separator_takes_leading_number() {
        // "1,5" is matched as one token but only "1" is numeric.
        let parsed = parse_ingredient("1,5 l milk");
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit_and_name, "l milk");
    }

    #[test]
    fn test_parse_range_keeps_first_number() {
        let parsed = parse_ingredient("1-2 cloves garlic");
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit_and_name, "cloves garlic");
    }

    #[test]
    fn test_parse_exponent_token() {
        let parsed = parse_ingredient("1e3 g");
        assert_eq!(parsed.quantity, 1000.0);
        assert_eq!(parsed.unit_and_name, "g");
        assert_eq!(multiply_ingredient("1e3 g", 2.0), "2000 g");
        assert_eq!(multiply_ingredient("1e3 eggs", 0.5), "500 eggs");
    }

    #[test]
    fn test_parse_no_quantity() {
        assert_eq!(
            parse_quantity("pinch of salt"),
            ParsedQuantity::NoQuantity("pinch of salt")
        );
        let parsed = parse_ingredient("pinch of salt");
        assert_eq!(parsed.quantity, 1.0);
        assert_eq!(parsed.unit_and_name, "pinch of salt");
    }

    #[test]
    fn test_parse_leading_space_is_not_a_quantity() {
        assert!(matches!(
            parse_quantity(" 2 eggs"),
            ParsedQuantity::NoQuantity(" 2 eggs")
        ));
    }

    #[test]
    fn test_parse_zero_denominator_contributes_zero() {
        assert_eq!(
            parse_quantity("1/0 cup water"),
            ParsedQuantity::Quantity {
                value: 0.0,
                remainder: "cup water"
            }
        );
    }

    #[test]
    fn test_parse_whole_number_without_fraction_falls_back() {
        // "2 eggs" must not swallow the space as a mixed-number prefix.
        assert_eq!(
            parse_quantity("2 eggs"),
            ParsedQuantity::Quantity {
                value: 2.0,
                remainder: "eggs"
            }
        );
    }

    #[test]
    fn test_parse_quantity_only() {
        assert_eq!(
            parse_quantity("3"),
            ParsedQuantity::Quantity {
                value: 3.0,
                remainder: ""
            }
        );
    }

    #[test]
    fn test_parse_two_whole_numbers_are_summed() {
        assert_eq!(
            parse_quantity("2 3 eggs"),
            ParsedQuantity::Quantity {
                value: 5.0,
                remainder: "eggs"
            }
        );
    }

    #[test]
    fn test_glyph_table_lookup() {
        assert_eq!(glyph_value('½'), Some(0.5));
        assert_eq!(glyph_value('⅞'), Some(0.875));
        assert_eq!(glyph_value('x'), None);
        assert_eq!(FRACTION_GLYPHS.len(), 18);
    }

    #[test]
    fn test_render_whole() {
        assert_eq!(render_quantity(3.0), "3");
        assert_eq!(render_quantity(12.0), "12");
    }

    #[test]
    fn test_render_fraction() {
        assert_eq!(render_quantity(0.75), "3/4");
        assert_eq!(render_quantity(0.5), "1/2");
        assert_eq!(render_quantity(1.0 / 3.0), "1/3");
        assert_eq!(render_quantity(0.0625), "1/16");
    }

    #[test]
    fn test_render_mixed() {
        assert_eq!(render_quantity(1.5), "1 1/2");
        assert_eq!(render_quantity(2.25), "2 1/4");
    }

    #[test]
    fn test_render_decimal_fallback() {
        assert_eq!(render_quantity(0.111 * 2.0), "0.22");
        // 1/32 needs a denominator above 16.
        assert_eq!(render_quantity(1.0 / 32.0), "0.03");
    }

    #[test]
    fn test_render_decimal_fallback_strips_zero_cents() {
        // ⅓ × 3 lands just below 1 and cannot be a clean fraction.
        assert_eq!(render_quantity(0.333 * 3.0), "1");
    }

    #[test]
    fn test_multiply_identity() {
        assert_eq!(multiply_ingredient("1 ½ cups flour", 1.0), "1 ½ cups flour");
    }

    #[test]
    fn test_multiply_basic() {
        assert_eq!(multiply_ingredient("2 cups flour", 2.0), "4 cups flour");
        assert_eq!(multiply_ingredient("1 1/2 cups sugar", 2.0), "3 cups sugar");
        assert_eq!(multiply_ingredient("¾ tsp salt", 2.0), "1 1/2 tsp salt");
        assert_eq!(multiply_ingredient("2 eggs", 0.5), "1 eggs");
    }

    #[test]
    fn test_multiply_no_quantity_passthrough() {
        assert_eq!(multiply_ingredient("pinch of salt", 3.0), "pinch of salt");
    }

    #[test]
    fn test_multiply_zero_quantity_drops_number() {
        assert_eq!(multiply_ingredient("0 cups flour", 2.0), "cups flour");
    }

    #[test]
    fn test_multiply_by_zero_or_negative() {
        assert_eq!(multiply_ingredient("2 cups flour", 0.0), "cups flour");
        assert_eq!(multiply_ingredient("2 cups flour", -1.0), "cups flour");
    }

    #[test]
    fn test_multiply_non_finite() {
        assert_eq!(multiply_ingredient("2 cups flour", f64::NAN), "cups flour");
        assert_eq!(
            multiply_ingredient("2 cups flour", f64::INFINITY),
            "cups flour"
        );
    }

    #[test]
    fn test_multiply_without_remainder_has_no_trailing_space() {
        assert_eq!(multiply_ingredient("3", 2.0), "6");
    }
}
