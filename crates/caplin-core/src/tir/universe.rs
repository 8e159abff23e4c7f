//! The four-universe discipline that drives linearity checking.
//!
//! Every type in Caplin carries a `Universe` tag: `Free` (ordinary data, may be
//! copied or dropped at will), `Linear` (must be consumed exactly once),
//! `Type` (a universe-polymorphic type parameter position), and `Region` (a
//! borrow-scope witness with no runtime representation). The tag is computed
//! once per declaration and then propagated structurally by
//! [`Universe::effective_of_named`] whenever a `Type`-universe declaration is
//! applied to concrete arguments.

use strum_macros::EnumIs;

use crate::tir::{context::TirContext, object_signature::TypeValue, resolver::TypeLocation};

/// A type's universe classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIs)]
pub enum Universe {
    /// Plain data: unrestricted aliasing and dropping.
    Free,
    /// Must be consumed exactly once along every control-flow path.
    Linear,
    /// Universe-polymorphic formal parameter; resolved per instantiation.
    Type,
    /// A lifetime witness for a borrow scope. Never carries runtime state.
    Region,
}

impl Universe {
    /// `Free` only subsumes `Free`, `Linear` only subsumes `Linear`, `Type`
    /// matches anything (generic parameter binding), everything else
    /// requires exact equality.
    pub fn compatible(declared: Universe, used: Universe) -> bool {
        match declared {
            Universe::Type => true,
            other => other == used,
        }
    }

    /// Effective universe of `NamedType(T, args)`: if `T`'s declared universe
    /// is not `Type`, that universe wins outright; if it is `Type`, the
    /// effective universe is `Linear` as soon as any argument is effectively
    /// `Linear`, else `Free`. Regions and references are always `Free` and
    /// never reach this function.
    pub fn effective_of_named(declared: Universe, argument_universes: &[Universe]) -> Universe {
        match declared {
            Universe::Type => {
                if argument_universes.iter().any(|universe| universe.is_linear()) {
                    Universe::Linear
                } else {
                    Universe::Free
                }
            }
            other => other,
        }
    }
}

/// Universe of the type sitting at `location`: a linear class's tag, or
/// `Free` for every other type (primitives, interfaces, functions, ...).
pub fn universe_of(context: &TirContext, location: TypeLocation) -> Universe {
    match context.types.get_from_location(location).map(|signature| &signature.value) {
        Some(TypeValue::Class(class)) => class.universe,
        _ => Universe::Free,
    }
}

#[cfg(test)]
mod tests {
    use super::Universe;

    #[test]
    fn free_only_subsumes_free() {
        assert!(Universe::compatible(Universe::Free, Universe::Free));
        assert!(!Universe::compatible(Universe::Free, Universe::Linear));
    }

    #[test]
    fn linear_only_subsumes_linear() {
        assert!(Universe::compatible(Universe::Linear, Universe::Linear));
        assert!(!Universe::compatible(Universe::Linear, Universe::Free));
    }

    #[test]
    fn type_matches_any_universe() {
        for universe in [Universe::Free, Universe::Linear, Universe::Type, Universe::Region] {
            assert!(Universe::compatible(Universe::Type, universe));
        }
    }

    #[test]
    fn region_requires_exact_match() {
        assert!(Universe::compatible(Universe::Region, Universe::Region));
        assert!(!Universe::compatible(Universe::Region, Universe::Free));
    }

    #[test]
    fn generic_with_only_free_arguments_is_free() {
        let effective = Universe::effective_of_named(Universe::Type, &[Universe::Free, Universe::Free]);
        assert_eq!(effective, Universe::Free);
    }

    #[test]
    fn generic_with_any_linear_argument_is_linear() {
        let effective = Universe::effective_of_named(Universe::Type, &[Universe::Free, Universe::Linear]);
        assert_eq!(effective, Universe::Linear);
    }

    #[test]
    fn non_type_declaration_universe_wins_regardless_of_arguments() {
        let effective = Universe::effective_of_named(Universe::Linear, &[Universe::Free]);
        assert_eq!(effective, Universe::Linear);
    }
}
