//! Realms: the builtin object graph and the factories that allocate into it.
//!
//! Every operation that needs "the current `Object.prototype`" takes a
//! `&Realm`. A realm is created in two phases: first the bare prototype
//! objects are allocated so that they can refer to each other, then
//! [`builtins::install`](crate::builtins::install) populates them and the
//! global object.

use std::rc::Rc;

use core_types::{ErrorKind, JsError, JsString, PropertyKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::array_data::ArrayData;
use crate::builtins;
use crate::exception::{range_error, type_error, JsResult};
use crate::function::{self, FunctionData, HostFn, NativeFn};
use crate::object::{ArgumentsData, Binding, DataViewData, JsObject, ObjectKind, TypedArrayData, TypedArrayKind};
use crate::property::{PropertyFlags, PropertyMap};
use crate::regexp_engine::RegExpMatcher;
use crate::value::Value;

/// Largest ArrayBuffer the realm will allocate
pub const MAX_BUFFER_LENGTH: usize = i32::MAX as usize;

/// Time zone used for Date local-time conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZone {
    /// Coordinated Universal Time
    Utc,
    /// The host's zone, including its daylight saving rules
    #[default]
    Local,
    /// A fixed offset in minutes east of UTC
    Fixed(i32),
}

/// Per-realm settings.
///
/// # Examples
///
/// ```
/// use object_model::{RealmConfig, TimeZone};
///
/// let config = RealmConfig::from_json(r#"{ "timezone": { "fixed": 60 } }"#).unwrap();
/// assert_eq!(config.timezone, TimeZone::Fixed(60));
/// assert_eq!(config.max_prototype_depth, 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealmConfig {
    /// Zone for Date local-time conversions
    pub timezone: TimeZone,
    /// Prototype walks give up after this many links
    pub max_prototype_depth: usize,
    /// Nesting limit for `JSON.stringify` and `JSON.parse` reviver walks
    pub max_json_depth: usize,
    /// Whether [`Realm::put`] uses strict-mode [[Put]]
    pub strict_by_default: bool,
}

impl Default for RealmConfig {
    fn default() -> Self {
        RealmConfig {
            timezone: TimeZone::Local,
            max_prototype_depth: 10_000,
            max_json_depth: 512,
            strict_by_default: false,
        }
    }
}

/// Failure to load a [`RealmConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The text is not a valid configuration document
    #[error("invalid realm configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl RealmConfig {
    /// Parse a configuration from JSON; absent fields take their defaults
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// The builtin prototypes every object kind inherits from.
pub struct Intrinsics {
    /// `Object.prototype`
    pub object_prototype: JsObject,
    /// `Function.prototype`
    pub function_prototype: JsObject,
    /// `Array.prototype`
    pub array_prototype: JsObject,
    /// `Boolean.prototype`
    pub boolean_prototype: JsObject,
    /// `Number.prototype`
    pub number_prototype: JsObject,
    /// `String.prototype`
    pub string_prototype: JsObject,
    /// `Date.prototype`
    pub date_prototype: JsObject,
    /// `RegExp.prototype`
    pub regexp_prototype: JsObject,
    /// `ArrayBuffer.prototype`
    pub array_buffer_prototype: JsObject,
    /// `DataView.prototype`
    pub data_view_prototype: JsObject,
    /// The shared `[[ThrowTypeError]]` function of strict arguments objects
    pub throw_type_error: JsObject,
    error_prototypes: [JsObject; 7],
    typed_array_prototypes: [JsObject; 9],
}

impl Intrinsics {
    /// The prototype of errors of `kind`
    pub fn error_prototype(&self, kind: ErrorKind) -> &JsObject {
        &self.error_prototypes[kind as usize]
    }

    /// The prototype of typed arrays of `kind`
    pub fn typed_array_prototype(&self, kind: TypedArrayKind) -> &JsObject {
        &self.typed_array_prototypes[kind as usize]
    }
}

/// An isolated global environment.
pub struct Realm {
    config: RealmConfig,
    root_map: Rc<PropertyMap>,
    global: JsObject,
    intrinsics: Intrinsics,
}

fn empty_function(_: &Realm, _: &Value, _: &[Value]) -> JsResult<Value> {
    Ok(Value::Undefined)
}

fn restricted_access(_: &Realm, _: &Value, _: &[Value]) -> JsResult<Value> {
    type_error("'caller' and 'callee' may not be accessed on strict mode arguments objects")
}

impl Realm {
    /// Create a realm with every builtin installed
    pub fn new(config: RealmConfig) -> Self {
        let root_map = PropertyMap::root();
        let object_prototype = JsObject::from_parts(Rc::clone(&root_map), None, ObjectKind::Ordinary);
        let derive = |kind: ObjectKind| JsObject::from_parts(Rc::clone(&root_map), Some(object_prototype.clone()), kind);

        let function_prototype = derive(ObjectKind::Function(FunctionData::Native {
            call: empty_function,
            construct: None,
        }));
        let error_root = derive(ObjectKind::Error(ErrorKind::Error));
        let error_prototypes = ErrorKind::ALL.map(|kind| match kind {
            ErrorKind::Error => error_root.clone(),
            other => JsObject::from_parts(Rc::clone(&root_map), Some(error_root.clone()), ObjectKind::Error(other)),
        });
        let throw_type_error = JsObject::from_parts(
            Rc::clone(&root_map),
            Some(function_prototype.clone()),
            ObjectKind::Function(FunctionData::Native {
                call: restricted_access,
                construct: None,
            }),
        );
        throw_type_error.insert("length", Value::from(0), PropertyFlags::CONSTANT);
        throw_type_error.prevent_extensions();

        let intrinsics = Intrinsics {
            function_prototype,
            array_prototype: derive(ObjectKind::Array { length_writable: true }),
            boolean_prototype: derive(ObjectKind::Boolean(false)),
            number_prototype: derive(ObjectKind::Number(0.0)),
            string_prototype: derive(ObjectKind::String(JsString::empty())),
            date_prototype: derive(ObjectKind::Date(f64::NAN)),
            regexp_prototype: derive(ObjectKind::Ordinary),
            array_buffer_prototype: derive(ObjectKind::Ordinary),
            data_view_prototype: derive(ObjectKind::Ordinary),
            typed_array_prototypes: TypedArrayKind::ALL.map(|_| derive(ObjectKind::Ordinary)),
            throw_type_error,
            error_prototypes,
            object_prototype: object_prototype.clone(),
        };
        let global = derive(ObjectKind::Ordinary);

        let realm = Realm {
            config,
            root_map,
            global,
            intrinsics,
        };
        builtins::install(&realm);
        debug!(
            timezone = ?realm.config.timezone,
            globals = realm.global.property_map().len(),
            "realm initialised"
        );
        realm
    }

    /// The settings this realm was created with
    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    /// The global object
    pub fn global(&self) -> &JsObject {
        &self.global
    }

    /// The builtin prototypes
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    fn allocate(&self, prototype: &JsObject, kind: ObjectKind) -> JsObject {
        JsObject::from_parts(Rc::clone(&self.root_map), Some(prototype.clone()), kind)
    }

    // =========================================================================
    // Calls
    // =========================================================================

    /// [[Call]] `callee` with the given `this`
    pub fn call(&self, callee: &Value, this: Value, args: &[Value]) -> JsResult<Value> {
        function::call(self, callee, this, args)
    }

    /// [[Construct]] via `new callee(...args)`
    pub fn construct(&self, callee: &Value, args: &[Value]) -> JsResult<Value> {
        function::construct(self, callee, args)
    }

    // =========================================================================
    // Convenience access
    // =========================================================================

    /// `obj[name]`
    pub fn get(&self, obj: &JsObject, name: &str) -> JsResult<Value> {
        obj.get(self, &PropertyKey::from(name))
    }

    /// `obj[name] = value`, strict according to the realm configuration
    pub fn put(&self, obj: &JsObject, name: &str, value: Value) -> JsResult<()> {
        obj.put(self, PropertyKey::from(name), value, self.config.strict_by_default)
    }

    /// A property of the global object, e.g. `realm.global_value("JSON")`
    pub fn global_value(&self, name: &str) -> JsResult<Value> {
        self.get(&self.global, name)
    }

    /// Call `obj[name](...args)` with `obj` as `this`
    pub fn invoke(&self, obj: &Value, name: &str, args: &[Value]) -> JsResult<Value> {
        let method = crate::conversions::get_value(self, obj, &PropertyKey::from(name))?;
        self.call(&method, obj.clone(), args)
    }

    // =========================================================================
    // Object factories
    // =========================================================================

    /// `{}`
    pub fn new_object(&self) -> JsObject {
        self.allocate(&self.intrinsics.object_prototype, ObjectKind::Ordinary)
    }

    /// A singleton such as `JSON`, whose class name is `name`
    pub(crate) fn new_namespace(&self, name: &'static str) -> JsObject {
        self.allocate(&self.intrinsics.object_prototype, ObjectKind::Namespace(name))
    }

    /// `Object.create(prototype)`
    pub fn new_object_with_proto(&self, prototype: Option<JsObject>) -> JsObject {
        JsObject::from_parts(Rc::clone(&self.root_map), prototype, ObjectKind::Ordinary)
    }

    /// An array literal
    pub fn new_array(&self, values: Vec<Value>) -> JsObject {
        self.array_from_data(ArrayData::from_values(values))
    }

    /// `new Array(length)`: all holes
    pub fn new_array_with_length(&self, length: u32) -> JsObject {
        self.array_from_data(ArrayData::with_length(length))
    }

    pub(crate) fn array_from_data(&self, elements: ArrayData) -> JsObject {
        JsObject::with_elements(
            Rc::clone(&self.root_map),
            Some(self.intrinsics.array_prototype.clone()),
            ObjectKind::Array { length_writable: true },
            elements,
        )
    }

    /// `new Boolean(b)`
    pub fn new_boolean_object(&self, b: bool) -> JsObject {
        self.allocate(&self.intrinsics.boolean_prototype, ObjectKind::Boolean(b))
    }

    /// `new Number(n)`
    pub fn new_number_object(&self, n: f64) -> JsObject {
        self.allocate(&self.intrinsics.number_prototype, ObjectKind::Number(n))
    }

    /// `new String(s)`
    pub fn new_string_object(&self, s: JsString) -> JsObject {
        self.allocate(&self.intrinsics.string_prototype, ObjectKind::String(s))
    }

    /// `new Date(t)` for an already clipped time value
    pub fn new_date(&self, time: f64) -> JsObject {
        self.allocate(&self.intrinsics.date_prototype, ObjectKind::Date(time))
    }

    /// `new RegExp(pattern, flags)`
    pub fn new_regexp(&self, pattern: &JsString, flags: &JsString) -> JsResult<JsObject> {
        let matcher = RegExpMatcher::new(pattern, flags)?;
        let source = matcher.source().clone();
        let (global, ignore_case, multiline) = (matcher.global(), matcher.ignore_case(), matcher.multiline());
        let obj = self.allocate(&self.intrinsics.regexp_prototype, ObjectKind::RegExp(Rc::new(matcher)));
        obj.insert("source", Value::String(source), PropertyFlags::CONSTANT);
        obj.insert("global", Value::Boolean(global), PropertyFlags::CONSTANT);
        obj.insert("ignoreCase", Value::Boolean(ignore_case), PropertyFlags::CONSTANT);
        obj.insert("multiline", Value::Boolean(multiline), PropertyFlags::CONSTANT);
        obj.insert("lastIndex", Value::from(0), PropertyFlags::data(true, false, false));
        Ok(obj)
    }

    /// An Error object of `kind`; an empty message leaves `message` inherited
    pub fn create_error(&self, kind: ErrorKind, message: &str) -> JsObject {
        let obj = self.allocate(self.intrinsics.error_prototype(kind), ObjectKind::Error(kind));
        if !message.is_empty() {
            obj.insert("message", Value::from(message), PropertyFlags::HIDDEN);
        }
        obj
    }

    /// Materialise an engine error as a catchable Error object
    pub fn create_error_from(&self, error: &JsError) -> JsObject {
        let obj = self.create_error(error.kind, &error.message);
        if !error.stack.is_empty() {
            let mut text = error.to_string();
            for frame in &error.stack {
                text.push('\n');
                text.push_str(&frame.to_string());
            }
            obj.insert("stack", Value::from(text), PropertyFlags::HIDDEN);
        }
        obj
    }

    /// An arguments object for a call of `callee` with `args`.
    ///
    /// In non-strict code the first `min(args.len(), bindings.len())`
    /// indices are linked to `bindings`, the formal parameters' variables.
    pub fn create_arguments(&self, callee: &JsObject, args: &[Value], bindings: &[Binding], strict: bool) -> JsObject {
        let mapped = if strict {
            Vec::new()
        } else {
            bindings.iter().take(args.len()).cloned().map(Some).collect()
        };
        let obj = JsObject::with_elements(
            Rc::clone(&self.root_map),
            Some(self.intrinsics.object_prototype.clone()),
            ObjectKind::Arguments(ArgumentsData::new(mapped)),
            ArrayData::from_values(args.to_vec()),
        );
        obj.insert("length", Value::from(args.len()), PropertyFlags::HIDDEN);
        if strict {
            let thrower = Value::Object(self.intrinsics.throw_type_error.clone());
            for name in ["caller", "callee"] {
                obj.insert_accessor(name, thrower.clone(), thrower.clone(), PropertyFlags::accessor(false, false));
            }
        } else {
            obj.insert("callee", Value::Object(callee.clone()), PropertyFlags::HIDDEN);
        }
        obj
    }

    /// `new ArrayBuffer(length)`, zero filled
    pub fn new_array_buffer(&self, length: usize) -> JsResult<JsObject> {
        if length > MAX_BUFFER_LENGTH {
            return range_error("Invalid array buffer length");
        }
        Ok(self.array_buffer_from_bytes(vec![0; length]))
    }

    pub(crate) fn array_buffer_from_bytes(&self, bytes: Vec<u8>) -> JsObject {
        self.allocate(
            &self.intrinsics.array_buffer_prototype,
            ObjectKind::ArrayBuffer(Rc::new(std::cell::RefCell::new(bytes))),
        )
    }

    /// A typed array over `buffer` starting at `byte_offset`. Without a
    /// `length` the view extends to the end of the buffer.
    pub fn new_typed_array(
        &self,
        kind: TypedArrayKind,
        buffer: &JsObject,
        byte_offset: usize,
        length: Option<usize>,
    ) -> JsResult<JsObject> {
        let bytes = match &buffer.borrow().kind {
            ObjectKind::ArrayBuffer(bytes) => Rc::clone(bytes),
            _ => return type_error(format!("{:?} is not an ArrayBuffer", buffer)),
        };
        let size = kind.element_size();
        let buffer_length = bytes.borrow().len();
        if byte_offset % size != 0 {
            return range_error(format!("Start offset of {} should be a multiple of {}", kind.name(), size));
        }
        if byte_offset > buffer_length {
            return range_error(format!("Start offset {} is outside the bounds of the buffer", byte_offset));
        }
        let length = match length {
            Some(length) => {
                let fits = length
                    .checked_mul(size)
                    .and_then(|bytes| bytes.checked_add(byte_offset))
                    .map_or(false, |end| end <= buffer_length);
                if !fits {
                    return range_error(format!("Invalid typed array length: {}", length));
                }
                length
            }
            None => {
                let available = buffer_length - byte_offset;
                if available % size != 0 {
                    return range_error(format!("Byte length of {} should be a multiple of {}", kind.name(), size));
                }
                available / size
            }
        };
        let view = TypedArrayData::new(kind, buffer.clone(), bytes, byte_offset, length);
        Ok(self.allocate(self.intrinsics.typed_array_prototype(kind), ObjectKind::TypedArray(view)))
    }

    /// A typed array of `length` zeroed elements over a fresh buffer
    pub fn new_typed_array_with_length(&self, kind: TypedArrayKind, length: usize) -> JsResult<JsObject> {
        let byte_length = length
            .checked_mul(kind.element_size())
            .filter(|bytes| *bytes <= MAX_BUFFER_LENGTH);
        match byte_length {
            Some(byte_length) => {
                let buffer = self.new_array_buffer(byte_length)?;
                self.new_typed_array(kind, &buffer, 0, Some(length))
            }
            None => range_error(format!("Invalid typed array length: {}", length)),
        }
    }

    /// `new DataView(buffer, byteOffset, byteLength)`
    pub fn new_data_view(&self, buffer: &JsObject, byte_offset: usize, byte_length: Option<usize>) -> JsResult<JsObject> {
        let bytes = match &buffer.borrow().kind {
            ObjectKind::ArrayBuffer(bytes) => Rc::clone(bytes),
            _ => return type_error(format!("{:?} is not an ArrayBuffer", buffer)),
        };
        let buffer_length = bytes.borrow().len();
        if byte_offset > buffer_length {
            return range_error(format!("Start offset {} is outside the bounds of the buffer", byte_offset));
        }
        let byte_length = match byte_length {
            Some(length) if length > buffer_length - byte_offset => {
                return range_error(format!("Invalid DataView length {}", length));
            }
            Some(length) => length,
            None => buffer_length - byte_offset,
        };
        let view = DataViewData::new(buffer.clone(), bytes, byte_offset, byte_length);
        Ok(self.allocate(&self.intrinsics.data_view_prototype, ObjectKind::DataView(view)))
    }

    // =========================================================================
    // Function factories
    // =========================================================================

    fn new_function(&self, name: &str, length: u32, data: FunctionData) -> JsObject {
        let obj = self.allocate(&self.intrinsics.function_prototype, ObjectKind::Function(data));
        obj.insert("length", Value::from(length), PropertyFlags::CONSTANT);
        obj.insert("name", Value::from(name), PropertyFlags::CONSTANT);
        obj
    }

    /// A builtin function
    pub fn new_native_function(&self, name: &str, length: u32, call: NativeFn) -> JsObject {
        self.new_function(name, length, FunctionData::Native { call, construct: None })
    }

    /// A builtin constructor wired to `prototype` in both directions
    pub(crate) fn new_native_constructor(
        &self,
        name: &str,
        length: u32,
        call: NativeFn,
        construct: NativeFn,
        prototype: &JsObject,
    ) -> JsObject {
        let ctor = self.new_function(
            name,
            length,
            FunctionData::Native {
                call,
                construct: Some(construct),
            },
        );
        ctor.insert("prototype", Value::Object(prototype.clone()), PropertyFlags::CONSTANT);
        prototype.insert("constructor", Value::Object(ctor.clone()), PropertyFlags::HIDDEN);
        ctor
    }

    /// A function backed by an embedder closure
    pub fn new_host_function(
        &self,
        name: &str,
        length: u32,
        f: impl Fn(&Realm, &Value, &[Value]) -> JsResult<Value> + 'static,
    ) -> JsObject {
        let call: HostFn = Rc::new(f);
        self.new_function(name, length, FunctionData::Host { call, constructor: false })
    }

    /// A constructible function backed by an embedder closure, with a fresh
    /// `prototype` object the way script function declarations get one
    pub fn new_host_constructor(
        &self,
        name: &str,
        length: u32,
        f: impl Fn(&Realm, &Value, &[Value]) -> JsResult<Value> + 'static,
    ) -> JsObject {
        let call: HostFn = Rc::new(f);
        let ctor = self.new_function(name, length, FunctionData::Host { call, constructor: true });
        let prototype = self.new_object();
        prototype.insert("constructor", Value::Object(ctor.clone()), PropertyFlags::HIDDEN);
        ctor.insert("prototype", Value::Object(prototype), PropertyFlags::data(true, false, false));
        ctor
    }

    /// `target.bind(this, ...args)`
    pub fn new_bound_function(&self, target: &JsObject, this: Value, args: Vec<Value>) -> JsResult<JsObject> {
        let target_length = match target.get(self, &PropertyKey::from("length"))? {
            Value::Number(n) => n,
            _ => 0.0,
        };
        let length = (target_length - args.len() as f64).max(0.0);
        let obj = self.new_function(
            "bound",
            length as u32,
            FunctionData::Bound {
                target: target.clone(),
                this,
                args,
            },
        );
        let thrower = Value::Object(self.intrinsics.throw_type_error.clone());
        for name in ["caller", "arguments"] {
            obj.insert_accessor(name, thrower.clone(), thrower.clone(), PropertyFlags::accessor(false, false));
        }
        Ok(obj)
    }
}

impl Default for Realm {
    fn default() -> Self {
        Realm::new(RealmConfig::default())
    }
}
