use crate::consecutive::ConsecutiveMap;
use crate::expected::Expectation;
use std::rc::Rc;
use stubkit_mock::{
    Behavior, Callback, Instance, ReturnArgument, ReturnCallback, ReturnSelf, ReturnValue,
    ThrowError, Value,
};

/// What a stubbed method answers with: a literal, a callback over the call
/// arguments, or a ready-made behavior.
#[derive(Clone)]
pub enum Reply {
    Value(Value),
    Callback(Callback),
    Behavior(Rc<dyn Behavior>),
}

impl Reply {
    pub fn into_behavior(self) -> Rc<dyn Behavior> {
        match self {
            Reply::Value(value) => Rc::new(ReturnValue(value)),
            Reply::Callback(callback) => Rc::new(ReturnCallback(callback)),
            Reply::Behavior(behavior) => behavior,
        }
    }
}

/// Caller-supplied replacement for one method or property.
#[derive(Clone)]
pub enum Override {
    Value(Value),
    Callback(Callback),
    Sequence(ConsecutiveMap),
    Expected(Expectation),
}

impl Override {
    pub fn kind(&self) -> &'static str {
        match self {
            Override::Value(_) => "value",
            Override::Callback(_) => "callback",
            Override::Sequence(_) => "sequence",
            Override::Expected(_) => "expectation",
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Override::Value(value) => Some(value),
            _ => None,
        }
    }
}

macro_rules! impl_from_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Reply {
                fn from(value: $ty) -> Self {
                    Reply::Value(Value::from(value))
                }
            }

            impl From<$ty> for Override {
                fn from(value: $ty) -> Self {
                    Override::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_from_literal!((), bool, i32, i64, u32, f64, &str, String, Instance, &Instance, Vec<Value>);

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Value(value)
    }
}

impl From<Value> for Override {
    fn from(value: Value) -> Self {
        Override::Value(value)
    }
}

impl From<Callback> for Reply {
    fn from(callback: Callback) -> Self {
        Reply::Callback(callback)
    }
}

impl From<Callback> for Override {
    fn from(callback: Callback) -> Self {
        Override::Callback(callback)
    }
}

impl From<Rc<dyn Behavior>> for Reply {
    fn from(behavior: Rc<dyn Behavior>) -> Self {
        Reply::Behavior(behavior)
    }
}

macro_rules! impl_from_behavior {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Reply {
                fn from(behavior: $ty) -> Self {
                    Reply::Behavior(Rc::new(behavior))
                }
            }
        )*
    };
}

impl_from_behavior!(ReturnSelf, ReturnArgument, ThrowError, ReturnValue, ReturnCallback);

/// A sequence used as a reply is shared, not copied: every call through any
/// holder consumes the same queue.
impl From<ConsecutiveMap> for Reply {
    fn from(map: ConsecutiveMap) -> Self {
        Reply::Behavior(Rc::new(map))
    }
}

impl From<ConsecutiveMap> for Override {
    fn from(map: ConsecutiveMap) -> Self {
        Override::Sequence(map)
    }
}

impl From<Expectation> for Override {
    fn from(expectation: Expectation) -> Self {
        Override::Expected(expectation)
    }
}

/// Ordered name → override mapping. Inserting an existing name replaces its
/// value in place.
#[derive(Clone, Default)]
pub struct OverrideMap {
    entries: Vec<(String, Override)>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Override>) -> &mut Self {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
        self
    }

    /// Builder form of [`OverrideMap::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Override>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Override> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Override)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for OverrideMap
where
    K: Into<String>,
    V: Into<Override>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OverrideMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Builds an [`OverrideMap`] from `name => value` pairs.
///
/// ```
/// use stubkit::{expected, overrides};
///
/// let params = overrides! {
///     "name" => "davert",
///     "save" => expected::once(true),
/// };
/// assert_eq!(params.len(), 2);
/// ```
#[macro_export]
macro_rules! overrides {
    () => {
        $crate::OverrideMap::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::OverrideMap::new();
        $(
            map.insert($name, $value);
        )+
        map
    }};
}
