//! Region erasure and instantiation tracking for generic code.
//!
//! Before a universe-polymorphic declaration can be emitted, every region
//! annotation it carries is erased ("stripped") and the resulting concrete
//! argument list is looked up in an instantiation table keyed by
//! `(qualified name, [stripped type])`. The first caller to request a given
//! key allocates a fresh [`InstantiationId`]; every later caller with the
//! same key gets the same id back, so a generic function is only
//! monomorphized once per distinct argument shape.

use indexmap::IndexMap;

/// A type as it appears at a call site, before region erasure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Named(String, Vec<Type>),
    ReadRef(Box<Type>, String),
    WriteRef(Box<Type>, String),
    RawPointer(Box<Type>),
    Region(String),
}

/// A type with all region information erased. Two [`Type`]s that differ only
/// in their region arguments strip to the same [`Stripped`] value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stripped {
    Named(String, Vec<Stripped>),
    ReadRef(Box<Stripped>),
    WriteRef(Box<Stripped>),
    RawPointer(Box<Stripped>),
}

/// Erases region information from `ty`. Returns `None` for a bare
/// [`Type::Region`], since a region has no runtime representation and
/// disappears entirely rather than stripping to some residual shape.
///
/// Idempotent: stripping an already-stripped type (lifted back through
/// [`Stripped::into_type`]) yields the same [`Stripped`] value.
pub fn strip(ty: &Type) -> Option<Stripped> {
    match ty {
        Type::Region(_) => None,
        Type::Named(name, arguments) => {
            Some(Stripped::Named(name.clone(), arguments.iter().filter_map(strip).collect()))
        }
        Type::ReadRef(inner, _region) => strip(inner).map(|inner| Stripped::ReadRef(Box::new(inner))),
        Type::WriteRef(inner, _region) => strip(inner).map(|inner| Stripped::WriteRef(Box::new(inner))),
        Type::RawPointer(inner) => strip(inner).map(|inner| Stripped::RawPointer(Box::new(inner))),
    }
}

impl Stripped {
    /// Lifts a stripped type back into a region-free [`Type`], so it can be
    /// re-stripped to check idempotency.
    pub fn into_type(self) -> Type {
        match self {
            Stripped::Named(name, arguments) => Type::Named(name, arguments.into_iter().map(Stripped::into_type).collect()),
            Stripped::ReadRef(inner) => Type::ReadRef(Box::new(inner.into_type()), String::new()),
            Stripped::WriteRef(inner) => Type::WriteRef(Box::new(inner.into_type()), String::new()),
            Stripped::RawPointer(inner) => Type::RawPointer(Box::new(inner.into_type())),
        }
    }
}

/// Identifies a declaration together with the concrete, region-erased
/// arguments it is being instantiated with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstantiationKey {
    pub qident: String,
    pub arguments: Vec<Stripped>,
}

/// A stable handle into the instantiation table. Two requests with an equal
/// [`InstantiationKey`] always resolve to the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstantiationId(pub usize);

/// Maps `(qident, [stripped_type])` to the id of the single monomorphized
/// copy that should be emitted for that argument shape.
#[derive(Debug, Default)]
pub struct InstantiationTable {
    entries: IndexMap<InstantiationKey, usize>,
}

impl InstantiationTable {
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// Returns the id for `key`, allocating a new one on first encounter.
    pub fn instantiate(&mut self, key: InstantiationKey) -> InstantiationId {
        let next_id = self.entries.len();
        let id = *self.entries.entry(key).or_insert(next_id);
        InstantiationId(id)
    }

    /// Number of distinct instantiations recorded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates recorded instantiations as `(key, id)` pairs, for lowering
    /// into [`crate::tir::hir::Program`].
    pub fn entries(&self) -> impl Iterator<Item = (&InstantiationKey, InstantiationId)> {
        self.entries.iter().map(|(key, id)| (key, InstantiationId(*id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, arguments: Vec<Type>) -> Type {
        Type::Named(name.to_string(), arguments)
    }

    #[test]
    fn stripping_erases_region_arguments() {
        let ty = named("Box", vec![named("i32", vec![]), Type::Region("'r".to_string())]);
        let stripped = strip(&ty).unwrap();
        assert_eq!(stripped, Stripped::Named("Box".to_string(), vec![Stripped::Named("i32".to_string(), vec![])]));
    }

    #[test]
    fn stripping_a_bare_region_yields_nothing() {
        assert_eq!(strip(&Type::Region("'r".to_string())), None);
    }

    #[test]
    fn stripping_references_drops_their_region_but_keeps_the_pointee() {
        let ty = Type::ReadRef(Box::new(named("i32", vec![])), "'r".to_string());
        let stripped = strip(&ty).unwrap();
        assert_eq!(stripped, Stripped::ReadRef(Box::new(Stripped::Named("i32".to_string(), vec![]))));
    }

    #[test]
    fn stripping_is_idempotent() {
        let ty = named("Pair", vec![named("i32", vec![]), Type::ReadRef(Box::new(named("bool", vec![])), "'r".to_string())]);
        let once = strip(&ty).unwrap();
        let twice = strip(&once.clone().into_type()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn same_key_returns_same_instantiation_id() {
        let mut table = InstantiationTable::new();
        let key = InstantiationKey { qident: "mod.identity".to_string(), arguments: vec![Stripped::Named("i32".to_string(), vec![])] };

        let first = table.instantiate(key.clone());
        let second = table.instantiate(key);

        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn different_region_arguments_collapse_to_the_same_instantiation() {
        let mut table = InstantiationTable::new();
        let ty_a = Type::ReadRef(Box::new(named("i32", vec![])), "'a".to_string());
        let ty_b = Type::ReadRef(Box::new(named("i32", vec![])), "'b".to_string());

        let key_a = InstantiationKey { qident: "mod.borrow_of".to_string(), arguments: vec![strip(&ty_a).unwrap()] };
        let key_b = InstantiationKey { qident: "mod.borrow_of".to_string(), arguments: vec![strip(&ty_b).unwrap()] };

        assert_eq!(table.instantiate(key_a), table.instantiate(key_b));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_argument_shapes_allocate_distinct_ids() {
        let mut table = InstantiationTable::new();
        let key_i32 = InstantiationKey { qident: "mod.identity".to_string(), arguments: vec![Stripped::Named("i32".to_string(), vec![])] };
        let key_bool = InstantiationKey { qident: "mod.identity".to_string(), arguments: vec![Stripped::Named("bool".to_string(), vec![])] };

        let first = table.instantiate(key_i32);
        let second = table.instantiate(key_bool);

        assert_ne!(first, second);
        assert_eq!(table.len(), 2);
    }
}
