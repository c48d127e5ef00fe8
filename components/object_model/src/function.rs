//! Callable objects.
//!
//! Script functions are compiled and invoked by the layer above; from the
//! object model's side every callable is one of three things: a builtin
//! implemented as a plain `fn`, a host closure supplied by the embedder
//! (which is how compiled script functions enter the object graph), or a
//! bound function produced by `Function.prototype.bind`.

use std::fmt;
use std::rc::Rc;

use core_types::PropertyKey;

use crate::exception::{type_error, JsResult};
use crate::object::{JsObject, ObjectKind};
use crate::realm::Realm;
use crate::value::Value;

/// A builtin: `(realm, this, arguments) -> result`
pub type NativeFn = fn(&Realm, &Value, &[Value]) -> JsResult<Value>;

/// An embedder-supplied function
pub type HostFn = Rc<dyn Fn(&Realm, &Value, &[Value]) -> JsResult<Value>>;

/// Internal state of a function object.
#[derive(Clone)]
pub enum FunctionData {
    /// A builtin. `construct`, when present, is invoked for `new` with an
    /// undefined `this` and builds its own result object.
    Native {
        /// [[Call]]
        call: NativeFn,
        /// [[Construct]]
        construct: Option<NativeFn>,
    },
    /// An embedder closure. Constructible ones are invoked for `new` on a
    /// fresh object inheriting from their `prototype` property.
    Host {
        /// [[Call]]
        call: HostFn,
        /// Whether `new` is allowed
        constructor: bool,
    },
    /// The result of `Function.prototype.bind`
    Bound {
        /// [[TargetFunction]]
        target: JsObject,
        /// [[BoundThis]]
        this: Value,
        /// [[BoundArgs]]
        args: Vec<Value>,
    },
}

impl fmt::Debug for FunctionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionData::Native { construct, .. } => f
                .debug_struct("Native")
                .field("constructor", &construct.is_some())
                .finish(),
            FunctionData::Host { constructor, .. } => {
                f.debug_struct("Host").field("constructor", constructor).finish()
            }
            FunctionData::Bound { target, args, .. } => f
                .debug_struct("Bound")
                .field("target", target)
                .field("args", &args.len())
                .finish(),
        }
    }
}

fn function_data(value: &Value) -> Option<FunctionData> {
    let obj = value.as_object()?;
    let data = obj.borrow();
    match &data.kind {
        ObjectKind::Function(function) => Some(function.clone()),
        _ => None,
    }
}

/// [[Call]]
pub(crate) fn call(realm: &Realm, callee: &Value, this: Value, args: &[Value]) -> JsResult<Value> {
    match function_data(callee) {
        None => type_error(format!("{:?} is not a function", callee)),
        Some(FunctionData::Native { call, .. }) => call(realm, &this, args),
        Some(FunctionData::Host { call, .. }) => call(realm, &this, args),
        Some(FunctionData::Bound {
            target,
            this: bound_this,
            args: bound_args,
        }) => {
            let full: Vec<Value> = bound_args.iter().chain(args).cloned().collect();
            call(realm, &Value::Object(target), bound_this, &full)
        }
    }
}

/// Whether `value` has a [[Construct]] internal method
pub fn is_constructor(value: &Value) -> bool {
    match function_data(value) {
        Some(FunctionData::Native { construct, .. }) => construct.is_some(),
        Some(FunctionData::Host { constructor, .. }) => constructor,
        Some(FunctionData::Bound { target, .. }) => is_constructor(&Value::Object(target)),
        None => false,
    }
}

/// [[Construct]]
pub(crate) fn construct(realm: &Realm, callee: &Value, args: &[Value]) -> JsResult<Value> {
    match function_data(callee) {
        Some(FunctionData::Native {
            construct: Some(construct),
            ..
        }) => construct(realm, &Value::Undefined, args),
        Some(FunctionData::Host {
            call,
            constructor: true,
        }) => {
            let ctor = callee.as_object().cloned();
            let prototype = match &ctor {
                Some(ctor) => ctor.get(realm, &PropertyKey::from("prototype"))?,
                None => Value::Undefined,
            };
            let proto = match prototype {
                Value::Object(proto) => proto,
                _ => realm.intrinsics().object_prototype.clone(),
            };
            let instance = Value::Object(realm.new_object_with_proto(Some(proto)));
            let result = call(realm, &instance, args)?;
            Ok(if result.is_object() { result } else { instance })
        }
        Some(FunctionData::Bound {
            target,
            args: bound_args,
            ..
        }) => {
            let full: Vec<Value> = bound_args.iter().chain(args).cloned().collect();
            construct(realm, &Value::Object(target), &full)
        }
        _ => type_error(format!("{:?} is not a constructor", callee)),
    }
}
