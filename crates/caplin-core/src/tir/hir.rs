//! Stage H: lowering to target IR.
//!
//! This is the emission boundary the rest of the pipeline builds toward: a
//! flat list of the monomorphic declarations that must be emitted, one per
//! distinct `(qident, [stripped argument type])` shape recorded in the
//! context's [`crate::tir::monomorphize::InstantiationTable`] during call
//! resolution. No C text is produced here or anywhere in this crate; lowering
//! stops at this thin, emission-ready struct, consistent with the Non-goal on
//! C pretty-printing.

use crate::tir::monomorphize::{InstantiationId, Stripped};

/// One monomorphic declaration ready for a backend to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub id: InstantiationId,
    pub qident: String,
    pub arguments: Vec<Stripped>,
}

/// The lowered program: every monomorphic declaration reached during
/// resolution, in allocation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Lowers every instantiation recorded in `table` into a [`Program`].
pub fn lower(table: &crate::tir::monomorphize::InstantiationTable) -> Program {
    let mut declarations: Vec<Declaration> = table
        .entries()
        .map(|(key, id)| Declaration { id, qident: key.qident.clone(), arguments: key.arguments.clone() })
        .collect();
    declarations.sort_by_key(|declaration| declaration.id.0);
    Program { declarations }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tir::monomorphize::InstantiationKey;

    #[test]
    fn lowering_orders_declarations_by_allocation_order() {
        let mut table = crate::tir::monomorphize::InstantiationTable::new();
        let first = table.instantiate(InstantiationKey { qident: "mod.identity".to_string(), arguments: vec![Stripped::Named("i32".to_string(), vec![])] });
        let second = table.instantiate(InstantiationKey { qident: "mod.identity".to_string(), arguments: vec![Stripped::Named("bool".to_string(), vec![])] });

        let program = lower(&table);

        assert_eq!(program.len(), 2);
        assert_eq!(program.declarations[0].id, first);
        assert_eq!(program.declarations[1].id, second);
        assert_eq!(program.declarations[0].qident, "mod.identity");
    }

    #[test]
    fn lowering_an_empty_table_is_an_empty_program() {
        let table = crate::tir::monomorphize::InstantiationTable::new();
        assert!(lower(&table).is_empty());
    }
}
