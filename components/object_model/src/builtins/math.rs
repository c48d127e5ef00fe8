//! The Math object (ES5 15.8)

use std::f64::consts;

use super::{arg, method};
use crate::conversions::to_number;
use crate::exception::JsResult;
use crate::property::PropertyFlags;
use crate::realm::Realm;
use crate::value::Value;

/// Math object with static methods
pub struct MathObject;

macro_rules! unary {
    ($($(#[$doc:meta])* $name:ident => $op:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
                let op: fn(f64) -> f64 = $op;
                Ok(Value::from(op(to_number(realm, &arg(args, 0))?)))
            }
        )*
    };
}

impl MathObject {
    unary! {
        /// Math.abs(x)
        abs => f64::abs;
        /// Math.acos(x)
        acos => f64::acos;
        /// Math.asin(x)
        asin => f64::asin;
        /// Math.atan(x)
        atan => f64::atan;
        /// Math.ceil(x)
        ceil => f64::ceil;
        /// Math.cos(x)
        cos => f64::cos;
        /// Math.exp(x)
        exp => f64::exp;
        /// Math.floor(x)
        floor => f64::floor;
        /// Math.log(x), the natural logarithm
        log => f64::ln;
        /// Math.round(x)
        round => round;
        /// Math.sin(x)
        sin => f64::sin;
        /// Math.sqrt(x)
        sqrt => f64::sqrt;
        /// Math.tan(x)
        tan => f64::tan;
    }

    /// Math.atan2(y, x)
    pub fn atan2(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let y = to_number(realm, &arg(args, 0))?;
        let x = to_number(realm, &arg(args, 1))?;
        Ok(Value::from(y.atan2(x)))
    }

    /// Math.pow(x, y)
    pub fn pow(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let base = to_number(realm, &arg(args, 0))?;
        let exponent = to_number(realm, &arg(args, 1))?;
        Ok(Value::from(pow(base, exponent)))
    }

    /// Math.max(...values)
    pub fn max(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        Ok(Value::from(fold(realm, args, f64::NEG_INFINITY, |candidate, best| {
            candidate > best || (candidate == 0.0 && best == 0.0 && best.is_sign_negative())
        })?))
    }

    /// Math.min(...values)
    pub fn min(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        Ok(Value::from(fold(realm, args, f64::INFINITY, |candidate, best| {
            candidate < best || (candidate == 0.0 && best == 0.0 && candidate.is_sign_negative())
        })?))
    }

    /// Math.random()
    pub fn random(_realm: &Realm, _this: &Value, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::from(rand::random::<f64>()))
    }
}

/// Round half up, keeping -0 for inputs in [-0.5, -0]
fn round(x: f64) -> f64 {
    if !x.is_finite() || x.fract() == 0.0 {
        return x;
    }
    let floor = x.floor();
    let rounded = if x - floor >= 0.5 { floor + 1.0 } else { floor };
    if rounded == 0.0 && x < 0.0 {
        -0.0
    } else {
        rounded
    }
}

/// Exponentiation where a NaN exponent or a unit base raised to an infinity is NaN
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// Every argument is converted before NaN short-circuits the result
fn fold(realm: &Realm, args: &[Value], initial: f64, better: fn(f64, f64) -> bool) -> JsResult<f64> {
    let mut best = initial;
    let mut saw_nan = false;
    for value in args {
        let n = to_number(realm, value)?;
        if n.is_nan() {
            saw_nan = true;
        } else if better(n, best) {
            best = n;
        }
    }
    Ok(if saw_nan { f64::NAN } else { best })
}

const CONSTANTS: [(&str, f64); 8] = [
    ("E", consts::E),
    ("LN10", consts::LN_10),
    ("LN2", consts::LN_2),
    ("LOG2E", consts::LOG2_E),
    ("LOG10E", consts::LOG10_E),
    ("PI", consts::PI),
    ("SQRT1_2", consts::FRAC_1_SQRT_2),
    ("SQRT2", consts::SQRT_2),
];

pub(crate) fn install(realm: &Realm) {
    let math = realm.new_namespace("Math");
    for (name, value) in CONSTANTS {
        math.insert(name, Value::from(value), PropertyFlags::CONSTANT);
    }
    method(realm, &math, "abs", 1, MathObject::abs);
    method(realm, &math, "acos", 1, MathObject::acos);
    method(realm, &math, "asin", 1, MathObject::asin);
    method(realm, &math, "atan", 1, MathObject::atan);
    method(realm, &math, "atan2", 2, MathObject::atan2);
    method(realm, &math, "ceil", 1, MathObject::ceil);
    method(realm, &math, "cos", 1, MathObject::cos);
    method(realm, &math, "exp", 1, MathObject::exp);
    method(realm, &math, "floor", 1, MathObject::floor);
    method(realm, &math, "log", 1, MathObject::log);
    method(realm, &math, "max", 2, MathObject::max);
    method(realm, &math, "min", 2, MathObject::min);
    method(realm, &math, "pow", 2, MathObject::pow);
    method(realm, &math, "random", 0, MathObject::random);
    method(realm, &math, "round", 1, MathObject::round);
    method(realm, &math, "sin", 1, MathObject::sin);
    method(realm, &math, "sqrt", 1, MathObject::sqrt);
    method(realm, &math, "tan", 1, MathObject::tan);
    realm.global().insert("Math", Value::Object(math), PropertyFlags::HIDDEN);
}
