/// A generic real-time metric sample, emitted by the REST transport (spec C6 item 6) and
/// consumable by whatever metrics backend the caller wires up. `xt-core` never links a concrete
/// backend - metrics collection itself is out of scope (spec §1).
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: &'static str,
    pub time: u64,
    pub tags: Vec<Tag>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: &'static str,
    pub value: String,
}

impl Tag {
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub value: u64,
}

impl Field {
    pub fn new(key: &'static str, value: u64) -> Self {
        Self { key, value }
    }
}
