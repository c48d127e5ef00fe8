//! Numeric conversions shared by every component.
//!
//! These are the pure halves of ToNumber / ToString for the Number type,
//! the integer wrap-around conversions, and the digit generators behind
//! `Number.prototype.toFixed`, `toExponential`, `toPrecision` and
//! `toString(radix)`.

use num_traits::ToPrimitive;

const RADIX_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 2^32 as a double
const TWO_POW_32: f64 = 4_294_967_296.0;

/// 2^53, the first double above which not every integer is representable
const TWO_POW_53: f64 = 9_007_199_254_740_992.0;

// =============================================================================
// Integer conversions
// =============================================================================

/// ToInteger: NaN becomes 0, everything else truncates toward zero.
pub fn to_integer(n: f64) -> f64 {
    if n.is_nan() {
        0.0
    } else if n.is_infinite() || n == 0.0 {
        n
    } else {
        n.trunc()
    }
}

/// ToUint32: modulo 2^32, with NaN and the infinities mapping to 0.
pub fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(TWO_POW_32).to_u32().unwrap_or(0)
}

/// ToInt32: ToUint32 reinterpreted as two's complement.
pub fn to_int32(n: f64) -> i32 {
    to_uint32(n) as i32
}

/// ToUint16: modulo 2^16.
pub fn to_uint16(n: f64) -> u16 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(65_536.0).to_u16().unwrap_or(0)
}

/// ToInt16
pub fn to_int16(n: f64) -> i16 {
    to_uint16(n) as i16
}

/// ToUint8: modulo 2^8.
pub fn to_uint8(n: f64) -> u8 {
    to_uint32(n) as u8
}

/// ToInt8
pub fn to_int8(n: f64) -> i8 {
    to_uint32(n) as u8 as i8
}

/// ToUint8Clamp: saturate to `[0, 255]`, rounding ties to even.
pub fn to_uint8_clamp(n: f64) -> u8 {
    if n.is_nan() || n <= 0.0 {
        return 0;
    }
    if n >= 255.0 {
        return 255;
    }
    let floor = n.floor();
    let rounded = if floor + 0.5 < n {
        floor + 1.0
    } else if n < floor + 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };
    rounded.to_u8().unwrap_or(255)
}

// =============================================================================
// String -> Number
// =============================================================================

/// WhiteSpace or LineTerminator, the characters trimmed by ToNumber,
/// `parseInt`, `parseFloat` and `String.prototype.trim`.
pub fn is_whitespace(unit: u16) -> bool {
    matches!(
        unit,
        0x0009
            | 0x000A
            | 0x000B
            | 0x000C
            | 0x000D
            | 0x0020
            | 0x00A0
            | 0x1680
            | 0x2000..=0x200A
            | 0x2028
            | 0x2029
            | 0x202F
            | 0x205F
            | 0x3000
            | 0xFEFF
    )
}

/// Strip leading and trailing whitespace
pub fn trim_whitespace(units: &[u16]) -> &[u16] {
    trim_end_whitespace(trim_start_whitespace(units))
}

/// Strip leading whitespace
pub fn trim_start_whitespace(units: &[u16]) -> &[u16] {
    let start = units
        .iter()
        .position(|&u| !is_whitespace(u))
        .unwrap_or(units.len());
    &units[start..]
}

/// Strip trailing whitespace
pub fn trim_end_whitespace(units: &[u16]) -> &[u16] {
    let end = units
        .iter()
        .rposition(|&u| !is_whitespace(u))
        .map_or(0, |i| i + 1);
    &units[..end]
}

/// The longest ASCII prefix of `units`, as bytes
fn ascii_prefix(units: &[u16]) -> Vec<u8> {
    units
        .iter()
        .take_while(|&&u| u < 0x80)
        .map(|&u| u as u8)
        .collect()
}

/// Length of the longest prefix of `text` matching StrDecimalLiteral
/// (without the `Infinity` forms), or 0 when there is none.
fn decimal_literal_len(text: &[u8]) -> usize {
    let len = text.len();
    let mut i = 0;
    if i < len && (text[i] == b'+' || text[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < len && text[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let mut frac_digits = 0;
    if i < len && text[i] == b'.' {
        let mut j = i + 1;
        while j < len && text[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - i - 1;
        if int_digits > 0 || frac_digits > 0 {
            i = j;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }
    if i < len && (text[i] == b'e' || text[i] == b'E') {
        let mut j = i + 1;
        if j < len && (text[j] == b'+' || text[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && text[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

fn parse_decimal(text: &[u8]) -> f64 {
    std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Interpret a run of digits in `radix`; `None` when empty or invalid.
fn parse_radix_digits(text: &[u8], radix: u32) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    if radix == 10 {
        return text
            .iter()
            .all(u8::is_ascii_digit)
            .then(|| parse_decimal(text));
    }
    let mut exact: Option<u128> = Some(0);
    let mut approx = 0.0_f64;
    for &b in text {
        let digit = char::from(b).to_digit(radix)?;
        exact = exact
            .and_then(|v| v.checked_mul(u128::from(radix)))
            .and_then(|v| v.checked_add(u128::from(digit)));
        approx = approx * f64::from(radix) + f64::from(digit);
    }
    Some(exact.map_or(approx, |v| v as f64))
}

/// ToNumber applied to a string value.
///
/// # Examples
///
/// ```
/// use core_types::number::string_to_number;
///
/// let units = |s: &str| s.encode_utf16().collect::<Vec<u16>>();
/// assert_eq!(string_to_number(&units("  12.5e1 ")), 125.0);
/// assert_eq!(string_to_number(&units("0x1F")), 31.0);
/// assert_eq!(string_to_number(&units("")), 0.0);
/// assert!(string_to_number(&units("12px")).is_nan());
/// ```
pub fn string_to_number(units: &[u16]) -> f64 {
    let trimmed = trim_whitespace(units);
    if trimmed.is_empty() {
        return 0.0;
    }
    let text = ascii_prefix(trimmed);
    if text.len() != trimmed.len() {
        return f64::NAN;
    }
    if let Some(hex) = text.strip_prefix(b"0x").or_else(|| text.strip_prefix(b"0X")) {
        return parse_radix_digits(hex, 16).unwrap_or(f64::NAN);
    }
    match text.as_slice() {
        b"Infinity" | b"+Infinity" => return f64::INFINITY,
        b"-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if decimal_literal_len(&text) == text.len() {
        parse_decimal(&text)
    } else {
        f64::NAN
    }
}

/// The global `parseInt(string, radix)` after `radix` went through ToInt32.
pub fn parse_int(units: &[u16], radix: i32) -> f64 {
    let text = ascii_prefix(trim_start_whitespace(units));
    let mut rest = text.as_slice();
    let mut sign = 1.0;
    if let Some((&first, tail)) = rest.split_first() {
        if first == b'-' {
            sign = -1.0;
        }
        if first == b'-' || first == b'+' {
            rest = tail;
        }
    }
    let mut strip_prefix = true;
    let mut radix = radix;
    if radix != 0 {
        if !(2..=36).contains(&radix) {
            return f64::NAN;
        }
        if radix != 16 {
            strip_prefix = false;
        }
    } else {
        radix = 10;
    }
    if strip_prefix && (rest.starts_with(b"0x") || rest.starts_with(b"0X")) {
        rest = &rest[2..];
        radix = 16;
    }
    let radix = radix as u32;
    let end = rest
        .iter()
        .position(|&b| char::from(b).to_digit(radix).is_none())
        .unwrap_or(rest.len());
    match parse_radix_digits(&rest[..end], radix) {
        Some(value) => sign * value,
        None => f64::NAN,
    }
}

/// The global `parseFloat(string)`.
pub fn parse_float(units: &[u16]) -> f64 {
    let text = ascii_prefix(trim_start_whitespace(units));
    if text.starts_with(b"Infinity") || text.starts_with(b"+Infinity") {
        return f64::INFINITY;
    }
    if text.starts_with(b"-Infinity") {
        return f64::NEG_INFINITY;
    }
    match decimal_literal_len(&text) {
        0 => f64::NAN,
        len => parse_decimal(&text[..len]),
    }
}

// =============================================================================
// Number -> String
// =============================================================================

/// Shortest round-trip digits of finite `v > 0`, with `n` such that
/// `v = 0.d1d2..dk * 10^n`.
fn shortest_digits(v: f64) -> (Vec<u8>, i32) {
    let mut buffer = ryu::Buffer::new();
    let text = buffer.format_finite(v);
    let (mantissa, exponent) = match text.find(|c| c == 'e' || c == 'E') {
        Some(pos) => (&text[..pos], text[pos + 1..].parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };
    let point = mantissa.find('.').unwrap_or(mantissa.len()) as i32;
    let mut digits: Vec<u8> = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    let leading = digits.iter().take_while(|&&d| d == 0).count();
    digits.drain(..leading);
    while digits.last() == Some(&0) {
        digits.pop();
    }
    (digits, point + exponent - leading as i32)
}

fn push_digits(out: &mut String, digits: &[u8]) {
    out.extend(digits.iter().map(|&d| char::from(b'0' + d)));
}

fn push_exponent(out: &mut String, e: i32) {
    out.push('e');
    out.push(if e >= 0 { '+' } else { '-' });
    out.push_str(&e.unsigned_abs().to_string());
}

/// ToString applied to a number.
///
/// # Examples
///
/// ```
/// use core_types::number::number_to_string;
///
/// assert_eq!(number_to_string(1.0), "1");
/// assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(number_to_string(1e21), "1e+21");
/// assert_eq!(number_to_string(-1.5e-7), "-1.5e-7");
/// assert_eq!(number_to_string(-0.0), "0");
/// ```
pub fn number_to_string(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let mut out = String::new();
    if x < 0.0 {
        out.push('-');
    }
    let (digits, n) = shortest_digits(x.abs());
    let k = digits.len() as i32;
    if k <= n && n <= 21 {
        push_digits(&mut out, &digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        push_digits(&mut out, &digits[..n as usize]);
        out.push('.');
        push_digits(&mut out, &digits[n as usize..]);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        push_digits(&mut out, &digits);
    } else {
        push_digits(&mut out, &digits[..1]);
        if k > 1 {
            out.push('.');
            push_digits(&mut out, &digits[1..]);
        }
        push_exponent(&mut out, n - 1);
    }
    out
}

/// Exact decimal expansion of finite `v >= 0` as (integer digits, fraction
/// digits without trailing zeros).
fn exact_decimal(v: f64) -> (Vec<u8>, Vec<u8>) {
    // 1074 fractional digits is enough to spell out the smallest subnormal.
    let text = format!("{:.1074}", v);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let int_digits = int_part.bytes().map(|b| b - b'0').collect();
    let mut frac_digits: Vec<u8> = frac_part.bytes().map(|b| b - b'0').collect();
    while frac_digits.last() == Some(&0) {
        frac_digits.pop();
    }
    (int_digits, frac_digits)
}

/// Add one unit in the last place; returns true on carry out of the top digit.
fn increment(digits: &mut [u8]) -> bool {
    for d in digits.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return false;
        }
    }
    true
}

/// `v > 0` rounded half-up to `count` significant digits, with the decimal
/// exponent `e` of the first digit (`v ~ d.ddd * 10^e`).
fn round_significant(v: f64, count: usize) -> (Vec<u8>, i32) {
    let (int_digits, frac_digits) = exact_decimal(v);
    let point = int_digits.len() as i32;
    let mut all = int_digits;
    all.extend(frac_digits);
    let leading = all.iter().take_while(|&&d| d == 0).count();
    let significant = &all[leading..];
    let mut e = point - leading as i32 - 1;
    let mut digits: Vec<u8> = significant.iter().take(count).copied().collect();
    digits.resize(count, 0);
    if significant.get(count).map_or(false, |&d| d >= 5) && increment(&mut digits) {
        digits.insert(0, 1);
        digits.truncate(count);
        e += 1;
    }
    (digits, e)
}

/// `Number.prototype.toFixed` for a validated digit count in `0..=20`.
pub fn to_fixed(x: f64, fraction_digits: usize) -> String {
    if !x.is_finite() || x.abs() >= 1e21 {
        return number_to_string(x);
    }
    let mut out = String::new();
    if x < 0.0 {
        out.push('-');
    }
    let (int_digits, frac) = exact_decimal(x.abs());
    let mut int_len = int_digits.len();
    let mut digits = int_digits;
    digits.extend((0..fraction_digits).map(|i| frac.get(i).copied().unwrap_or(0)));
    if frac.get(fraction_digits).map_or(false, |&d| d >= 5) && increment(&mut digits) {
        digits.insert(0, 1);
        int_len += 1;
    }
    push_digits(&mut out, &digits[..int_len]);
    if fraction_digits > 0 {
        out.push('.');
        push_digits(&mut out, &digits[int_len..]);
    }
    out
}

/// `Number.prototype.toExponential`; `None` asks for as many digits as
/// needed to identify the value uniquely.
pub fn to_exponential(x: f64, fraction_digits: Option<usize>) -> String {
    if !x.is_finite() {
        return number_to_string(x);
    }
    let mut out = String::new();
    if x < 0.0 {
        out.push('-');
    }
    let v = x.abs();
    let (digits, e) = if v == 0.0 {
        (vec![0; fraction_digits.unwrap_or(0) + 1], 0)
    } else {
        match fraction_digits {
            Some(f) => round_significant(v, f + 1),
            None => {
                let (digits, n) = shortest_digits(v);
                (digits, n - 1)
            }
        }
    };
    push_digits(&mut out, &digits[..1]);
    if digits.len() > 1 {
        out.push('.');
        push_digits(&mut out, &digits[1..]);
    }
    push_exponent(&mut out, e);
    out
}

/// `Number.prototype.toPrecision` for a validated precision in `1..=21`.
pub fn to_precision(x: f64, precision: usize) -> String {
    if !x.is_finite() {
        return number_to_string(x);
    }
    let mut out = String::new();
    if x < 0.0 {
        out.push('-');
    }
    let v = x.abs();
    let (digits, e) = if v == 0.0 {
        (vec![0; precision], 0)
    } else {
        round_significant(v, precision)
    };
    let p = precision as i32;
    if e < -6 || e >= p {
        push_digits(&mut out, &digits[..1]);
        if precision > 1 {
            out.push('.');
            push_digits(&mut out, &digits[1..]);
        }
        push_exponent(&mut out, e);
    } else if e == p - 1 {
        push_digits(&mut out, &digits);
    } else if e >= 0 {
        let split = (e + 1) as usize;
        push_digits(&mut out, &digits[..split]);
        out.push('.');
        push_digits(&mut out, &digits[split..]);
    } else {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-(e + 1)) as usize));
        push_digits(&mut out, &digits);
    }
    out
}

fn next_up(v: f64) -> f64 {
    f64::from_bits(v.to_bits() + 1)
}

/// `Number.prototype.toString(radix)` for a validated radix in `2..=36`.
///
/// Fractions are emitted only as far as needed to distinguish the value from
/// its neighbouring doubles.
pub fn number_to_string_radix(x: f64, radix: u32) -> String {
    if radix == 10 || !x.is_finite() {
        return number_to_string(x);
    }
    if x == 0.0 {
        return "0".to_string();
    }
    let r = f64::from(radix);
    let v = x.abs();
    let mut integer = v.floor();
    let mut fraction = v - integer;
    let mut delta = (0.5 * (next_up(v) - v)).max(next_up(0.0));
    let mut frac_digits: Vec<u32> = Vec::new();
    if fraction >= delta {
        loop {
            fraction *= r;
            delta *= r;
            let digit = fraction.to_u32().unwrap_or(0);
            frac_digits.push(digit);
            fraction -= f64::from(digit);
            if (fraction > 0.5 || (fraction == 0.5 && digit & 1 == 1)) && fraction + delta > 1.0 {
                loop {
                    match frac_digits.pop() {
                        None => {
                            integer += 1.0;
                            break;
                        }
                        Some(d) if d + 1 < radix => {
                            frac_digits.push(d + 1);
                            break;
                        }
                        Some(_) => {}
                    }
                }
                break;
            }
            if fraction < delta {
                break;
            }
        }
    }

    let mut int_digits: Vec<u8> = Vec::new();
    while integer / r >= TWO_POW_53 {
        integer /= r;
        int_digits.push(b'0');
    }
    loop {
        let rem = integer % r;
        int_digits.push(RADIX_DIGITS[rem.to_usize().unwrap_or(0)]);
        integer = (integer - rem) / r;
        if integer < 1.0 {
            break;
        }
    }

    let mut out = String::new();
    if x < 0.0 {
        out.push('-');
    }
    out.extend(int_digits.iter().rev().map(|&b| char::from(b)));
    if !frac_digits.is_empty() {
        out.push('.');
        out.extend(frac_digits.iter().map(|&d| char::from(RADIX_DIGITS[d as usize])));
    }
    out
}
