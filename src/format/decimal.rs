//! Exact decimal text
//!
//! Two renderings that must never round:
//!
//! - two's-complement big-endian unscaled integers with a decimal scale
//! - binary floating point, expanded to every digit it represents
//!
//! Both go through [`Magnitude`], an unsigned integer stored as base 10^9
//! limbs so the final text is a concatenation of limbs.

const LIMB_BASE: u64 = 1_000_000_000;
const LIMB_DIGITS: usize = 9;

/// 5^13, the largest power of five below 2^32
const FIVE_POW_13: u32 = 1_220_703_125;

/// Unsigned arbitrary-precision integer, least significant limb first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Magnitude {
    limbs: Vec<u32>,
}

impl Magnitude {
    fn from_u64(mut value: u64) -> Self {
        let mut limbs = Vec::new();
        while value > 0 {
            limbs.push((value % LIMB_BASE) as u32);
            value /= LIMB_BASE;
        }
        Self { limbs }
    }

    /// Interprets big-endian bytes as an unsigned integer
    fn from_be_bytes(bytes: &[u8]) -> Self {
        let mut magnitude = Self::default();
        for &byte in bytes {
            magnitude.mul_small(256);
            magnitude.add_small(u32::from(byte));
        }
        magnitude
    }

    fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&limb| limb == 0)
    }

    fn mul_small(&mut self, factor: u32) {
        let mut carry = 0u64;
        for limb in &mut self.limbs {
            let product = u64::from(*limb) * u64::from(factor) + carry;
            *limb = (product % LIMB_BASE) as u32;
            carry = product / LIMB_BASE;
        }
        while carry > 0 {
            self.limbs.push((carry % LIMB_BASE) as u32);
            carry /= LIMB_BASE;
        }
    }

    fn add_small(&mut self, addend: u32) {
        let mut carry = u64::from(addend);
        for limb in &mut self.limbs {
            if carry == 0 {
                return;
            }
            let sum = u64::from(*limb) + carry;
            *limb = (sum % LIMB_BASE) as u32;
            carry = sum / LIMB_BASE;
        }
        while carry > 0 {
            self.limbs.push((carry % LIMB_BASE) as u32);
            carry /= LIMB_BASE;
        }
    }

    /// Multiplies by 2^exp
    fn shl(&mut self, mut exp: u32) {
        while exp > 0 {
            let step = exp.min(31);
            self.mul_small(1 << step);
            exp -= step;
        }
    }

    /// Multiplies by 5^exp
    fn mul_pow5(&mut self, mut exp: u32) {
        while exp > 0 {
            let step = exp.min(13);
            self.mul_small(if step == 13 { FIVE_POW_13 } else { 5u32.pow(step) });
            exp -= step;
        }
    }

    fn to_digits(&self) -> String {
        let mut limbs = self.limbs.iter().rev().skip_while(|&&limb| limb == 0);
        let Some(first) = limbs.next() else {
            return "0".to_string();
        };
        let mut out = first.to_string();
        for limb in limbs {
            out.push_str(&format!("{:0width$}", limb, width = LIMB_DIGITS));
        }
        out
    }
}

/// Places a decimal point `scale` digits from the right of `digits`
fn apply_scale(negative: bool, digits: &str, scale: usize) -> String {
    let mut out = String::with_capacity(digits.len() + scale + 3);
    if negative {
        out.push('-');
    }
    if scale == 0 {
        out.push_str(digits);
        return out;
    }
    if digits.len() <= scale {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take(scale - digits.len()));
        out.push_str(digits);
    } else {
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Renders a two's-complement big-endian unscaled integer with `scale`
/// fractional digits, in plain notation.
///
/// An empty byte sequence is zero.
pub fn decimal_to_string(unscaled: &[u8], scale: u32) -> String {
    let negative = unscaled.first().map_or(false, |&b| b & 0x80 != 0);
    let magnitude = if negative {
        // negate: invert every bit, then add one
        let mut inverted: Vec<u8> = unscaled.iter().map(|b| !b).collect();
        for byte in inverted.iter_mut().rev() {
            let (sum, overflow) = byte.overflowing_add(1);
            *byte = sum;
            if !overflow {
                break;
            }
        }
        Magnitude::from_be_bytes(&inverted)
    } else {
        Magnitude::from_be_bytes(unscaled)
    };
    apply_scale(negative && !magnitude.is_zero(), &magnitude.to_digits(), scale as usize)
}

/// Renders the exact decimal value of a double, without exponent and
/// without trailing fractional zeros. Non-finite values render as `NaN`,
/// `Infinity` and `-Infinity`.
pub fn f64_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let bits = value.to_bits();
    let negative = bits >> 63 == 1;
    let biased_exp = ((bits >> 52) & 0x7FF) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mut mantissa, mut exp) = if biased_exp == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exp - 1075)
    };
    // an odd mantissa leaves no trailing zeros after the point
    let zeros = mantissa.trailing_zeros();
    mantissa >>= zeros;
    exp += zeros as i32;

    let mut magnitude = Magnitude::from_u64(mantissa);
    if exp >= 0 {
        magnitude.shl(exp as u32);
        apply_scale(negative, &magnitude.to_digits(), 0)
    } else {
        // m / 2^k == m * 5^k / 10^k
        let k = exp.unsigned_abs();
        magnitude.mul_pow5(k);
        apply_scale(negative, &magnitude.to_digits(), k as usize)
    }
}

/// Renders the exact decimal value of a float
pub fn f32_to_string(value: f32) -> String {
    f64_to_string(f64::from(value))
}
