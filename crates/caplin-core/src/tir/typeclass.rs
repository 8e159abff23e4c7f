//! Typeclass declaration and instance validation.
//!
//! A typeclass (`interface`, generalized to bind a single type parameter)
//! may not declare more than one type parameter, and no two instances
//! (`extend`) of the same typeclass may cover the same argument shape. This
//! module holds the two checks independently of the parser: callers supply
//! the typaram list of a typeclass declaration, or the head type constructor
//! an instance applies to, and get a `TirError` back when the rule is
//! violated.

use std::collections::HashMap;
use std::ops::Range;

use crate::file::SourceFile;
use crate::tir::error::TirError;

/// Rejects a typeclass declaration that binds more than one type parameter.
pub fn validate_typeclass_typarams(typarams: &[String], position: Range<usize>, source: SourceFile) -> Result<(), TirError> {
    if typarams.len() > 1 {
        return Err(TirError::multi_argument_typeclass(position, source));
    }

    Ok(())
}

/// The shape an instance's argument must have: a single named type head
/// (e.g. `Box`, `i32`) applied to a list of distinct type variables.
#[derive(Debug, Clone)]
pub struct InstanceArgumentShape {
    pub head: String,
    pub variables: Vec<String>,
}

/// Rejects an instance whose argument repeats the same type variable twice
/// (e.g. `extend Pair<T, T>`, which cannot be given a single coherent
/// instantiation per parameter).
pub fn validate_instance_shape(shape: &InstanceArgumentShape, position: Range<usize>, source: SourceFile) -> Result<(), TirError> {
    let mut seen = std::collections::HashSet::new();
    for variable in &shape.variables {
        if !seen.insert(variable.as_str()) {
            return Err(TirError::invalid_type(position, "a type variable may only appear once in an instance argument", source));
        }
    }

    Ok(())
}

/// Tracks, per typeclass, which argument heads already have an instance, so
/// that a second instance covering the same head can be rejected as
/// overlapping.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    instances: HashMap<String, Vec<(String, Range<usize>)>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instance of `typeclass_name` for argument head `head`,
    /// failing if that head is already covered by an earlier instance.
    pub fn register(&mut self, typeclass_name: &str, head: String, position: Range<usize>, source: SourceFile) -> Result<(), TirError> {
        let existing = self.instances.entry(typeclass_name.to_string()).or_default();

        if let Some((_, old_position)) = existing.iter().find(|(existing_head, _)| *existing_head == head) {
            return Err(TirError::overlapping_instance(typeclass_name.to_string(), position, old_position.clone(), source));
        }

        existing.push((head, position));
        Ok(())
    }
}
