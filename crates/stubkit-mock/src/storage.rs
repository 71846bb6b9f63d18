use crate::value::Value;

/// Per-object property storage: slots for declared properties plus a
/// side-table for properties written at runtime that the class never
/// declared.
#[derive(Clone, Debug, Default)]
pub struct PropertyStore {
    declared: Vec<(String, Value)>,
    dynamic: Vec<(String, Value)>,
}

impl PropertyStore {
    pub fn from_defaults(defaults: Vec<(String, Value)>) -> Self {
        Self {
            declared: defaults,
            dynamic: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.get_declared(name).or_else(|| self.get_dynamic(name))
    }

    pub fn get_declared(&self, name: &str) -> Option<&Value> {
        self.declared.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn get_dynamic(&self, name: &str) -> Option<&Value> {
        self.dynamic.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Writes a declared slot, creating it if the object was allocated before
    /// the declaration was known.
    pub fn set_declared(&mut self, name: &str, value: Value) {
        Self::upsert(&mut self.declared, name, value);
    }

    pub fn set_dynamic(&mut self, name: &str, value: Value) {
        Self::upsert(&mut self.dynamic, name, value);
    }

    pub fn dynamic_names(&self) -> Vec<String> {
        self.dynamic.iter().map(|(k, _)| k.clone()).collect()
    }

    fn upsert(slots: &mut Vec<(String, Value)>, name: &str, value: Value) {
        match slots.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => slots.push((name.to_string(), value)),
        }
    }
}
