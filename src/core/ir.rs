//! The intermediate representation every conversion funnels through.

use crate::core::errors::{DoctransError, Result};
use crate::core::values::{DefaultValue, FunctionKind};
use crate::syntax::{Expr, Keyword, Stmt};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Key under which the return value is stored
pub const RETURN_KEY: &str = "return_type";

/// One parameter or return value
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParamVal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

impl ParamVal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_typ(mut self, typ: impl Into<String>) -> Self {
        self.typ = Some(typ.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// True when none of `typ`, `doc`, `default` is present
    pub fn is_empty(&self) -> bool {
        self.typ.is_none() && self.doc.is_none() && self.default.is_none()
    }
}

/// Ordered mapping from parameter name to [`ParamVal`].
///
/// Insertion order is declaration order; re-inserting an existing name
/// replaces the value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamMap {
    entries: Vec<(String, ParamVal)>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ParamVal> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ParamVal> {
        self.position(name).map(move |i| &mut self.entries[i].1)
    }

    /// Insert or replace; returns the previous value for `name`
    pub fn insert(&mut self, name: impl Into<String>, param: ParamVal) -> Option<ParamVal> {
        let name = name.into();
        match self.position(&name) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, param)),
            None => {
                self.entries.push((name, param));
                None
            }
        }
    }

    /// Insert `name` at `index` (clamped to the end); an existing entry is
    /// replaced where it stands
    pub fn insert_at(&mut self, index: usize, name: impl Into<String>, param: ParamVal) {
        let name = name.into();
        match self.position(&name) {
            Some(i) => self.entries[i].1 = param,
            None => {
                let index = index.min(self.entries.len());
                self.entries.insert(index, (name, param));
            }
        }
    }

    /// Index of `name` in declaration order
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.position(name)
    }

    /// Existing entry for `name`, or a fresh empty one appended at the end
    pub fn entry(&mut self, name: &str) -> &mut ParamVal {
        let i = match self.position(name) {
            Some(i) => i,
            None => {
                self.entries.push((name.to_string(), ParamVal::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    /// Remove preserving the order of the remaining entries
    pub fn remove(&mut self, name: &str) -> Option<ParamVal> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Rename in place; false when `from` is absent or `to` already exists
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if self.contains_key(to) {
            return false;
        }
        match self.position(from) {
            Some(i) => {
                self.entries[i].0 = to.to_string();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamVal)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut ParamVal)> {
        self.entries.iter_mut().map(|(n, p)| (n.as_str(), p))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl FromIterator<(String, ParamVal)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (String, ParamVal)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (name, param) in iter {
            map.insert(name, param);
        }
        map
    }
}

impl IntoIterator for ParamMap {
    type Item = (String, ParamVal);
    type IntoIter = std::vec::IntoIter<(String, ParamVal)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, param) in &self.entries {
            map.serialize_entry(name, param)?;
        }
        map.end()
    }
}

/// One callable or record signature
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IntermediateRepr {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<FunctionKind>,
    pub doc: Option<String>,
    pub params: ParamMap,
    #[serde(serialize_with = "serialize_returns")]
    pub returns: Option<ParamVal>,
    /// Statements carried through conversions unchanged
    #[serde(skip)]
    pub body: Vec<Stmt>,
    /// Decorators, async-ness and bases of the parsed construct
    #[serde(skip)]
    pub header: Header,
}

/// Parts of a `def`/`class` header the signature does not describe.
///
/// Only the emitter for the same kind of construct reproduces them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Header {
    #[default]
    Bare,
    Function {
        decorators: Vec<Expr>,
        is_async: bool,
    },
    Class {
        decorators: Vec<Expr>,
        bases: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
}

impl Header {
    /// `Bare` unless there is a decorator or the function is async
    pub fn function(decorators: Vec<Expr>, is_async: bool) -> Self {
        if decorators.is_empty() && !is_async {
            return Self::Bare;
        }
        Self::Function {
            decorators,
            is_async,
        }
    }

    /// `Bare` unless there is a decorator, a keyword or a base other than
    /// `object`
    pub fn class(decorators: Vec<Expr>, bases: Vec<Expr>, keywords: Vec<Keyword>) -> Self {
        let bases: Vec<Expr> = bases
            .into_iter()
            .filter(|base| !matches!(base, Expr::Name(id) if id == "object"))
            .collect();
        if decorators.is_empty() && bases.is_empty() && keywords.is_empty() {
            return Self::Bare;
        }
        Self::Class {
            decorators,
            bases,
            keywords,
        }
    }
}

fn serialize_returns<S: Serializer>(
    returns: &Option<ParamVal>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match returns {
        Some(param) => {
            let mut map = serializer.serialize_map(Some(1))?;
            map.serialize_entry(RETURN_KEY, param)?;
            map.end()
        }
        None => serializer.serialize_none(),
    }
}

impl IntermediateRepr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, param: ParamVal) -> Self {
        self.params.insert(name, param);
        self
    }

    pub fn with_returns(mut self, returns: ParamVal) -> Self {
        self.returns = Some(returns);
        self
    }

    /// The returns entry, created empty when absent
    pub fn returns_mut(&mut self) -> &mut ParamVal {
        self.returns.get_or_insert_with(ParamVal::default)
    }

    /// Drop a returns entry that ended up carrying nothing
    pub fn prune_empty_returns(&mut self) {
        if self.returns.as_ref().is_some_and(ParamVal::is_empty) {
            self.returns = None;
        }
    }

    /// Check the "no fully empty ParamVal" invariant
    pub fn validate(&self) -> Result<()> {
        if let Some((name, _)) = self.params.iter().find(|(_, p)| p.is_empty()) {
            return Err(DoctransError::EmptyParam(name.to_string()));
        }
        if self.returns.as_ref().is_some_and(ParamVal::is_empty) {
            return Err(DoctransError::EmptyParam(RETURN_KEY.to_string()));
        }
        Ok(())
    }
}
