//! Number constructor, constants and Number.prototype methods (ES5 15.7)

use core_types::number::{number_to_string, number_to_string_radix, to_exponential, to_fixed, to_precision};

use super::{arg, constructor, method};
use crate::conversions::{to_integer, to_number};
use crate::exception::{range_error, type_error, JsResult};
use crate::object::ObjectKind;
use crate::property::PropertyFlags;
use crate::realm::Realm;
use crate::value::Value;

fn this_number(this: &Value, what: &str) -> JsResult<f64> {
    match this {
        Value::Number(n) => Ok(*n),
        Value::Object(obj) => match obj.borrow().kind {
            ObjectKind::Number(n) => Ok(n),
            _ => type_error(format!("{} requires that 'this' be a Number", what)),
        },
        _ => type_error(format!("{} requires that 'this' be a Number", what)),
    }
}

fn call(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
    match args.first() {
        None => Ok(Value::from(0.0)),
        Some(value) => Ok(Value::from(to_number(realm, value)?)),
    }
}

fn construct(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let n = match args.first() {
        None => 0.0,
        Some(value) => to_number(realm, value)?,
    };
    Ok(Value::Object(realm.new_number_object(n)))
}

/// Number.prototype methods
pub struct NumberPrototype;

impl NumberPrototype {
    /// Number.prototype.toString(radix)
    pub fn to_string(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let x = this_number(this, "Number.prototype.toString")?;
        let radix = match arg(args, 0) {
            Value::Undefined => 10.0,
            other => to_integer(realm, &other)?,
        };
        if !(2.0..=36.0).contains(&radix) {
            return range_error("toString() radix must be between 2 and 36");
        }
        if radix == 10.0 {
            return Ok(Value::from(number_to_string(x)));
        }
        Ok(Value::from(number_to_string_radix(x, radix as u32)))
    }

    /// Number.prototype.toLocaleString()
    pub fn to_locale_string(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let x = this_number(this, "Number.prototype.toLocaleString")?;
        Ok(Value::from(number_to_string(x)))
    }

    /// Number.prototype.valueOf()
    pub fn value_of(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::from(this_number(this, "Number.prototype.valueOf")?))
    }

    /// Number.prototype.toFixed(fractionDigits)
    pub fn to_fixed(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let x = this_number(this, "Number.prototype.toFixed")?;
        let digits = to_integer(realm, &arg(args, 0))?;
        if !(0.0..=20.0).contains(&digits) {
            return range_error("toFixed() digits argument must be between 0 and 20");
        }
        Ok(Value::from(to_fixed(x, digits as usize)))
    }

    /// Number.prototype.toExponential(fractionDigits)
    pub fn to_exponential(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let x = this_number(this, "Number.prototype.toExponential")?;
        let requested = arg(args, 0);
        let digits = to_integer(realm, &requested)?;
        if !x.is_finite() {
            return Ok(Value::from(number_to_string(x)));
        }
        if !(0.0..=20.0).contains(&digits) {
            return range_error("toExponential() argument must be between 0 and 20");
        }
        let digits = if requested.is_undefined() { None } else { Some(digits as usize) };
        Ok(Value::from(to_exponential(x, digits)))
    }

    /// Number.prototype.toPrecision(precision)
    pub fn to_precision(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let x = this_number(this, "Number.prototype.toPrecision")?;
        let requested = arg(args, 0);
        if requested.is_undefined() {
            return Ok(Value::from(number_to_string(x)));
        }
        let precision = to_integer(realm, &requested)?;
        if !x.is_finite() {
            return Ok(Value::from(number_to_string(x)));
        }
        if !(1.0..=21.0).contains(&precision) {
            return range_error("toPrecision() argument must be between 1 and 21");
        }
        Ok(Value::from(to_precision(x, precision as usize)))
    }
}

pub(crate) fn install(realm: &Realm) {
    let proto = &realm.intrinsics().number_prototype;
    let ctor = constructor(realm, "Number", 1, call, construct, proto);
    for (name, value) in [
        ("MAX_VALUE", f64::MAX),
        ("MIN_VALUE", 5e-324),
        ("NaN", f64::NAN),
        ("NEGATIVE_INFINITY", f64::NEG_INFINITY),
        ("POSITIVE_INFINITY", f64::INFINITY),
    ] {
        ctor.insert(name, Value::from(value), PropertyFlags::CONSTANT);
    }

    method(realm, proto, "toString", 1, NumberPrototype::to_string);
    method(realm, proto, "toLocaleString", 0, NumberPrototype::to_locale_string);
    method(realm, proto, "valueOf", 0, NumberPrototype::value_of);
    method(realm, proto, "toFixed", 1, NumberPrototype::to_fixed);
    method(realm, proto, "toExponential", 1, NumberPrototype::to_exponential);
    method(realm, proto, "toPrecision", 1, NumberPrototype::to_precision);
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::ErrorKind;

    fn call(realm: &Realm, x: f64, name: &str, args: &[Value]) -> JsResult<Value> {
        realm.invoke(&Value::from(x), name, args)
    }

    #[test]
    fn test_radix_bounds() {
        let realm = Realm::default();
        assert_eq!(call(&realm, 255.0, "toString", &[Value::from(16.0)]).unwrap(), Value::from("ff"));
        assert_eq!(call(&realm, -0.5, "toString", &[Value::from(2.0)]).unwrap(), Value::from("-0.1"));
        let err = call(&realm, 1.0, "toString", &[Value::from(37.0)]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::RangeError));
    }

    #[test]
    fn test_digit_methods() {
        let realm = Realm::default();
        assert_eq!(call(&realm, 12.3456, "toFixed", &[Value::from(2.0)]).unwrap(), Value::from("12.35"));
        assert_eq!(call(&realm, 123.456, "toExponential", &[Value::from(2.0)]).unwrap(), Value::from("1.23e+2"));
        assert_eq!(call(&realm, 123.456, "toPrecision", &[Value::from(4.0)]).unwrap(), Value::from("123.5"));
        assert_eq!(call(&realm, f64::INFINITY, "toExponential", &[Value::from(50.0)]).unwrap(), Value::from("Infinity"));
        assert!(call(&realm, 1.0, "toFixed", &[Value::from(21.0)]).is_err());
        assert!(call(&realm, 1.0, "toPrecision", &[Value::from(0.0)]).is_err());
    }

    #[test]
    fn test_constants_are_read_only() {
        let realm = Realm::default();
        let ctor = realm.global_value("Number").unwrap();
        let ctor = ctor.as_object().unwrap();
        assert_eq!(realm.get(ctor, "MIN_VALUE").unwrap(), Value::from(5e-324));
        realm.put(ctor, "MAX_VALUE", Value::from(1.0)).unwrap();
        assert_eq!(realm.get(ctor, "MAX_VALUE").unwrap(), Value::from(f64::MAX));
    }

    #[test]
    fn test_wrapper_unwraps() {
        let realm = Realm::default();
        let wrapper = Value::Object(realm.new_number_object(7.0));
        assert_eq!(NumberPrototype::value_of(&realm, &wrapper, &[]).unwrap(), Value::from(7.0));
        assert!(NumberPrototype::value_of(&realm, &Value::from("7"), &[]).is_err());
    }
}
