//! Date constructor and Date.prototype methods (ES5 15.9)
//!
//! Calendar arithmetic and the string formats live in [`date_math`]; this
//! module only reads and writes the time value held by Date objects.

use core_types::PropertyKey;

use super::{arg, constructor, method};
use crate::conversions::{to_number, to_object, to_primitive, to_string, Hint};
use crate::date_math::{
    self, format_date, format_date_time, format_iso, format_locale_time, format_time, format_utc,
    legacy_year, local_time, make_date, make_day, make_time, time_clip, time_within_day, utc, year_from_time,
    DateFields,
};
use crate::exception::{range_error, type_error, JsResult};
use crate::function::NativeFn;
use crate::object::{JsObject, ObjectKind};
use crate::realm::Realm;
use crate::value::Value;

/// Current time in milliseconds since the epoch
fn now() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64
}

fn this_time(this: &Value, what: &str) -> JsResult<(JsObject, f64)> {
    if let Value::Object(obj) = this {
        if let ObjectKind::Date(t) = obj.borrow().kind {
            return Ok((obj.clone(), t));
        }
    }
    type_error(format!("{} called on incompatible receiver", what))
}

fn store(obj: &JsObject, time: f64) -> Value {
    obj.borrow_mut().kind = ObjectKind::Date(time);
    Value::from(time)
}

fn formatted(text: Option<String>) -> Value {
    Value::from(text.unwrap_or_else(|| "Invalid Date".to_string()))
}

/// Numeric constructor arguments: year, month[, date[, hours[, minutes[, seconds[, ms]]]]]
fn components(realm: &Realm, args: &[Value]) -> JsResult<f64> {
    let mut fields = [f64::NAN, f64::NAN, 1.0, 0.0, 0.0, 0.0, 0.0];
    for (slot, value) in fields.iter_mut().zip(args) {
        *slot = to_number(realm, value)?;
    }
    let [year, month, date, hour, minute, second, ms] = fields;
    Ok(make_date(
        make_day(legacy_year(year), month, date),
        make_time(hour, minute, second, ms),
    ))
}

fn call(realm: &Realm, _this: &Value, _args: &[Value]) -> JsResult<Value> {
    Ok(formatted(format_date_time(now(), realm.config().timezone)))
}

fn construct(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let tz = realm.config().timezone;
    let time = match args {
        [] => now(),
        [value] => match to_primitive(realm, value, None)? {
            Value::String(s) => date_math::parse(&s.to_rust_string(), tz),
            other => to_number(realm, &other)?,
        },
        _ => utc(components(realm, args)?, tz),
    };
    Ok(Value::Object(realm.new_date(time_clip(time))))
}

/// Date constructor functions
pub struct DateConstructor;

impl DateConstructor {
    /// Date.now()
    pub fn now(_realm: &Realm, _this: &Value, _args: &[Value]) -> JsResult<Value> {
        Ok(Value::from(now()))
    }

    /// Date.parse(string)
    pub fn parse(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        let text = to_string(realm, &arg(args, 0))?;
        Ok(Value::from(date_math::parse(&text.to_rust_string(), realm.config().timezone)))
    }

    /// Date.UTC(year, month[, date[, hours[, minutes[, seconds[, ms]]]]])
    pub fn utc(realm: &Realm, _this: &Value, args: &[Value]) -> JsResult<Value> {
        Ok(Value::from(time_clip(components(realm, args)?)))
    }
}

/// Position of a field in the [year, month, date, hour, minute, second, ms] row
#[derive(Clone, Copy)]
enum Field {
    FullYear = 0,
    Month = 1,
    Date = 2,
    Hours = 3,
    Minutes = 4,
    Seconds = 5,
    Milliseconds = 6,
}

fn field_row(t: f64) -> [f64; 7] {
    let f = DateFields::from_time(t);
    [
        f.year as f64,
        f64::from(f.month),
        f64::from(f.date),
        f64::from(f.hour),
        f64::from(f.minute),
        f64::from(f.second),
        f64::from(f.millisecond),
    ]
}

fn get_field(realm: &Realm, this: &Value, local: bool, what: &str, read: fn(&DateFields) -> f64) -> JsResult<Value> {
    let (_, t) = this_time(this, what)?;
    if t.is_nan() {
        return Ok(Value::from(f64::NAN));
    }
    let t = if local { local_time(t, realm.config().timezone) } else { t };
    Ok(Value::from(read(&DateFields::from_time(t))))
}

/// The shared body of the setters: `first` is the field named by the method;
/// the optional arguments after it fill the following fields up to the end
/// of the date part or the time part.
fn set_fields(realm: &Realm, this: &Value, args: &[Value], local: bool, first: Field, what: &str) -> JsResult<Value> {
    let (obj, t) = this_time(this, what)?;
    let first = first as usize;
    let last = if first <= Field::Date as usize { Field::Date as usize } else { Field::Milliseconds as usize };
    let mut given = Vec::with_capacity(last - first + 1);
    given.push(to_number(realm, &arg(args, 0))?);
    for value in args.iter().take(last - first + 1).skip(1) {
        given.push(to_number(realm, value)?);
    }

    let tz = realm.config().timezone;
    let base = if t.is_nan() {
        if first != Field::FullYear as usize {
            return Ok(store(&obj, f64::NAN));
        }
        0.0
    } else if local {
        local_time(t, tz)
    } else {
        t
    };

    let mut row = field_row(base);
    row[first..first + given.len()].copy_from_slice(&given);
    let [year, month, date, hour, minute, second, ms] = row;
    let new = make_date(make_day(year, month, date), make_time(hour, minute, second, ms));
    let new = if local { utc(new, tz) } else { new };
    Ok(store(&obj, time_clip(new)))
}

macro_rules! date_getters {
    ($($js:literal: $local:ident, $universal:ident => $read:expr;)*) => {
        $(
            #[doc = concat!("Date.prototype.get", $js, "()")]
            pub fn $local(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
                get_field(realm, this, true, concat!("Date.prototype.get", $js), $read)
            }

            #[doc = concat!("Date.prototype.getUTC", $js, "()")]
            pub fn $universal(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
                get_field(realm, this, false, concat!("Date.prototype.getUTC", $js), $read)
            }
        )*
    };
}

macro_rules! date_setters {
    ($($js:literal: $local:ident, $universal:ident => $field:ident;)*) => {
        $(
            #[doc = concat!("Date.prototype.set", $js)]
            pub fn $local(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
                set_fields(realm, this, args, true, Field::$field, concat!("Date.prototype.set", $js))
            }

            #[doc = concat!("Date.prototype.setUTC", $js)]
            pub fn $universal(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
                set_fields(realm, this, args, false, Field::$field, concat!("Date.prototype.setUTC", $js))
            }
        )*
    };
}

/// Date.prototype methods
pub struct DatePrototype;

impl DatePrototype {
    date_getters! {
        "FullYear": get_full_year, get_utc_full_year => |f| f.year as f64;
        "Month": get_month, get_utc_month => |f| f64::from(f.month);
        "Date": get_date, get_utc_date => |f| f64::from(f.date);
        "Day": get_day, get_utc_day => |f| f64::from(f.week_day);
        "Hours": get_hours, get_utc_hours => |f| f64::from(f.hour);
        "Minutes": get_minutes, get_utc_minutes => |f| f64::from(f.minute);
        "Seconds": get_seconds, get_utc_seconds => |f| f64::from(f.second);
        "Milliseconds": get_milliseconds, get_utc_milliseconds => |f| f64::from(f.millisecond);
    }

    date_setters! {
        "FullYear": set_full_year, set_utc_full_year => FullYear;
        "Month": set_month, set_utc_month => Month;
        "Date": set_date, set_utc_date => Date;
        "Hours": set_hours, set_utc_hours => Hours;
        "Minutes": set_minutes, set_utc_minutes => Minutes;
        "Seconds": set_seconds, set_utc_seconds => Seconds;
        "Milliseconds": set_milliseconds, set_utc_milliseconds => Milliseconds;
    }

    /// Date.prototype.valueOf() and getTime()
    pub fn value_of(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.valueOf")?;
        Ok(Value::from(t))
    }

    /// Date.prototype.setTime(time)
    pub fn set_time(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let (obj, _) = this_time(this, "Date.prototype.setTime")?;
        let time = to_number(realm, &arg(args, 0))?;
        Ok(store(&obj, time_clip(time)))
    }

    /// Date.prototype.getYear(): the full year minus 1900
    pub fn get_year(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.getYear")?;
        if t.is_nan() {
            return Ok(Value::from(f64::NAN));
        }
        let year = year_from_time(local_time(t, realm.config().timezone));
        Ok(Value::from((year - 1900) as f64))
    }

    /// Date.prototype.setYear(year)
    pub fn set_year(realm: &Realm, this: &Value, args: &[Value]) -> JsResult<Value> {
        let (obj, t) = this_time(this, "Date.prototype.setYear")?;
        let tz = realm.config().timezone;
        let t = if t.is_nan() { 0.0 } else { local_time(t, tz) };
        let year = to_number(realm, &arg(args, 0))?;
        if year.is_nan() {
            return Ok(store(&obj, f64::NAN));
        }
        let f = DateFields::from_time(t);
        let days = make_day(legacy_year(year), f64::from(f.month), f64::from(f.date));
        Ok(store(&obj, time_clip(utc(make_date(days, time_within_day(t)), tz))))
    }

    /// Date.prototype.getTimezoneOffset(): minutes west of UTC
    pub fn get_timezone_offset(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.getTimezoneOffset")?;
        if t.is_nan() {
            return Ok(Value::from(f64::NAN));
        }
        Ok(Value::from((t - local_time(t, realm.config().timezone)) / 60_000.0))
    }

    /// Date.prototype.toString()
    pub fn to_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.toString")?;
        Ok(formatted(format_date_time(t, realm.config().timezone)))
    }

    /// Date.prototype.toDateString() and toLocaleDateString()
    pub fn to_date_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.toDateString")?;
        Ok(formatted(format_date(t, realm.config().timezone)))
    }

    /// Date.prototype.toTimeString()
    pub fn to_time_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.toTimeString")?;
        Ok(formatted(format_time(t, realm.config().timezone)))
    }

    /// Date.prototype.toLocaleString()
    pub fn to_locale_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.toLocaleString")?;
        let tz = realm.config().timezone;
        let text = format_date(t, tz).zip(format_locale_time(t, tz)).map(|(d, c)| format!("{} {}", d, c));
        Ok(formatted(text))
    }

    /// Date.prototype.toLocaleTimeString()
    pub fn to_locale_time_string(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.toLocaleTimeString")?;
        Ok(formatted(format_locale_time(t, realm.config().timezone)))
    }

    /// Date.prototype.toUTCString() and toGMTString()
    pub fn to_utc_string(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.toUTCString")?;
        Ok(formatted(format_utc(t)))
    }

    /// Date.prototype.toISOString()
    pub fn to_iso_string(_realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let (_, t) = this_time(this, "Date.prototype.toISOString")?;
        match format_iso(t) {
            Some(text) => Ok(Value::from(text)),
            None => range_error("Invalid time value"),
        }
    }

    /// Date.prototype.toJSON(key); generic over any object with a toISOString method
    pub fn to_json(realm: &Realm, this: &Value, _args: &[Value]) -> JsResult<Value> {
        let obj = to_object(realm, this)?;
        let receiver = Value::Object(obj.clone());
        if let Value::Number(n) = to_primitive(realm, &receiver, Some(Hint::Number))? {
            if !n.is_finite() {
                return Ok(Value::Null);
            }
        }
        let to_iso = obj.get(realm, &PropertyKey::from("toISOString"))?;
        if !to_iso.is_callable() {
            return type_error("toISOString is not a function");
        }
        realm.call(&to_iso, receiver, &[])
    }
}

pub(crate) fn install(realm: &Realm) {
    let proto = &realm.intrinsics().date_prototype;
    let ctor = constructor(realm, "Date", 7, call, construct, proto);
    method(realm, &ctor, "now", 0, DateConstructor::now);
    method(realm, &ctor, "parse", 1, DateConstructor::parse);
    method(realm, &ctor, "UTC", 7, DateConstructor::utc);

    let methods: &[(&str, u32, NativeFn)] = &[
        ("toString", 0, DatePrototype::to_string),
        ("toDateString", 0, DatePrototype::to_date_string),
        ("toTimeString", 0, DatePrototype::to_time_string),
        ("toLocaleString", 0, DatePrototype::to_locale_string),
        ("toLocaleDateString", 0, DatePrototype::to_date_string),
        ("toLocaleTimeString", 0, DatePrototype::to_locale_time_string),
        ("toUTCString", 0, DatePrototype::to_utc_string),
        ("toGMTString", 0, DatePrototype::to_utc_string),
        ("toISOString", 0, DatePrototype::to_iso_string),
        ("toJSON", 1, DatePrototype::to_json),
        ("valueOf", 0, DatePrototype::value_of),
        ("getTime", 0, DatePrototype::value_of),
        ("setTime", 1, DatePrototype::set_time),
        ("getYear", 0, DatePrototype::get_year),
        ("setYear", 1, DatePrototype::set_year),
        ("getTimezoneOffset", 0, DatePrototype::get_timezone_offset),
        ("getFullYear", 0, DatePrototype::get_full_year),
        ("getUTCFullYear", 0, DatePrototype::get_utc_full_year),
        ("getMonth", 0, DatePrototype::get_month),
        ("getUTCMonth", 0, DatePrototype::get_utc_month),
        ("getDate", 0, DatePrototype::get_date),
        ("getUTCDate", 0, DatePrototype::get_utc_date),
        ("getDay", 0, DatePrototype::get_day),
        ("getUTCDay", 0, DatePrototype::get_utc_day),
        ("getHours", 0, DatePrototype::get_hours),
        ("getUTCHours", 0, DatePrototype::get_utc_hours),
        ("getMinutes", 0, DatePrototype::get_minutes),
        ("getUTCMinutes", 0, DatePrototype::get_utc_minutes),
        ("getSeconds", 0, DatePrototype::get_seconds),
        ("getUTCSeconds", 0, DatePrototype::get_utc_seconds),
        ("getMilliseconds", 0, DatePrototype::get_milliseconds),
        ("getUTCMilliseconds", 0, DatePrototype::get_utc_milliseconds),
        ("setFullYear", 3, DatePrototype::set_full_year),
        ("setUTCFullYear", 3, DatePrototype::set_utc_full_year),
        ("setMonth", 2, DatePrototype::set_month),
        ("setUTCMonth", 2, DatePrototype::set_utc_month),
        ("setDate", 1, DatePrototype::set_date),
        ("setUTCDate", 1, DatePrototype::set_utc_date),
        ("setHours", 4, DatePrototype::set_hours),
        ("setUTCHours", 4, DatePrototype::set_utc_hours),
        ("setMinutes", 3, DatePrototype::set_minutes),
        ("setUTCMinutes", 3, DatePrototype::set_utc_minutes),
        ("setSeconds", 2, DatePrototype::set_seconds),
        ("setUTCSeconds", 2, DatePrototype::set_utc_seconds),
        ("setMilliseconds", 1, DatePrototype::set_milliseconds),
        ("setUTCMilliseconds", 1, DatePrototype::set_utc_milliseconds),
    ];
    for &(name, length, f) in methods {
        method(realm, proto, name, length, f);
    }
}
