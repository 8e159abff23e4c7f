//! Statement resolution and validation for the Caplin TIR system.
//!
//! This module provides the core infrastructure for resolving and validating
//! statements within function bodies during semantic analysis. It implements
//! the `ResolveAst` trait for body statements and provides utilities for
//! primitive type resolution and function signature management.
//!
//! # Statement Types
//!
//! The module handles resolution of various statement types that can appear
//! within function bodies:
//!
//! ## Function Calls
//! - **Direct function calls**: `functionName(args)`
//! - **Method calls**: `object.method(args)`
//! - **Module function calls**: `module.function(args)`
//!
//! ## Variable Declarations and Assignments
//! - **`var`/`const` declarations**: type inferred from the initializer, checked
//!   against an explicit annotation when both are present
//! - **Assignment**: rejected for `const` bindings and for mismatched value types
//!
//! ## Conditionals
//! - **`if`/`else if`/`else` chains**: each condition must resolve to `bool`;
//!   every branch body resolves in its own child scope
//!
//! # Resolution Process
//!
//! Statement resolution follows a two-phase approach:
//!
//! ## Phase 1: Resolve
//! - **Type determination**: Determine the result type of the statement
//! - **Scope validation**: Ensure all referenced identifiers are in scope
//! - **Signature matching**: For function calls, validate against signatures
//! - **Type checking**: Ensure type compatibility and correctness
//!
//! ## Phase 2: Finish
//! - **Finalization**: Complete any deferred resolution tasks
//! - **Cross-references**: Resolve any remaining type dependencies
//! - **Validation**: Final validation of resolved statements
//!
//! # Function Signature Support
//!
//! The module provides data structures for managing function signatures:
//! - **`FunctionArgument`**: Represents function parameters with names and types
//! - **`ClassFunctionSignature`**: Complete signature information for class methods
//!
//! # Primitive Type Resolution
//!
//! The `try_resolve_primitive` function handles resolution of primitive values
//! (strings, numbers, booleans) to their corresponding type representations
//! in the type system.
//!
//! # Integration
//!
//! This module integrates with:
//! - **Type system**: For type lookup and validation
//! - **Scope system**: For identifier resolution
//! - **Function call resolver**: For detailed function call analysis
//! - **Error system**: For comprehensive error reporting

use std::borrow::Cow;
use std::ops::Range;

use caplin_macros::CaplinError;
use caplin_macros_core::SourceCode;
use strum_macros::{EnumDiscriminants, EnumProperty};

use std::collections::HashMap;

use crate::{
    ast::{BodyAst, BodyStatementAst, ExpressionAst, PrimitiveValue, VariableDefinitionType},
    nom_tools::{Span, SpanInfo, ToRange},
    tir::{
        context::TirContext,
        linearity::{self, BindingId, BindingMeta, Stmt},
        object_signature::{PrimitiveType, TypeValue},
        resolver::{function::FunctionResolveError, get_object_location_or_resolve, ResolverError},
        scope::{ScopeLocation, TypeVariableInformation},
        signature::SignaturePath,
        universe,
        TirError,
    },
};

use super::{ResolveAst, TypeLocation};
mod function_call;
pub use function_call::FunctionCallError;

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("cannot assign to '{name}', it was declared const")]
#[diagnostic(code("caplin::error::assign_to_const"))]
pub struct AssignToConst {
    pub name: String,

    #[label("assignment happens here")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error, EnumDiscriminants, EnumProperty)]
pub enum StatementError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    AssignToConst(Box<AssignToConst>),
}

impl From<StatementError> for TirError {
    fn from(value: StatementError) -> Self {
        ResolverError::Statement(Box::new(value)).into()
    }
}

impl StatementError {
    pub fn assign_to_const(name: String, span: SpanInfo) -> TirError {
        StatementError::AssignToConst(AssignToConst {
            name,
            position: span.position,
            code: span.file.into(),
        }.into()).into()
    }
}

/// Represents a function parameter with its name and type information
/// 
/// This structure stores the essential information about a function parameter
/// including its identifier name and resolved type location within the type system.
#[derive(Debug)]
#[allow(dead_code)]
pub struct FunctionArgument<'base> {
    pub name: Span<'base>,
    pub field_type: TypeLocation,
}

/// Complete signature information for class method functions
/// 
/// This structure contains all the metadata necessary to represent a class method
/// including visibility, parameters, return type, and signature path for resolution.
#[derive(Debug)]
#[allow(dead_code)]
pub struct ClassFunctionSignature<'base> {
    pub is_public: bool,
    pub name: Span<'base>,
    pub arguments: Vec<FunctionArgument<'base>>,
    pub return_type: TypeLocation,
    pub signature_path: SignaturePath<'base>,
}

impl<'base> ResolveAst<'base> for BodyStatementAst<'base> {
    fn resolve(&self, context: &mut TirContext<'base>, scope_location: ScopeLocation) -> Result<TypeLocation, TirError> {
        match self {
            BodyStatementAst::FunctionCall(function_call) => Self::resolve_function_call(context, scope_location, function_call),
            BodyStatementAst::VariableDefinition(definition) => Self::resolve_variable_definition(context, scope_location, definition),
            BodyStatementAst::VariableAssign(assign) => Self::resolve_variable_assign(context, scope_location, assign),
            BodyStatementAst::IfCondition(if_condition) => Self::resolve_if_condition(context, scope_location, if_condition),
        }
    }

    fn finish(&self, _: &mut TirContext<'base>, _: ScopeLocation) -> Result<(), TirError> {
        Ok(())
    }

    fn name(&self) -> Cow<'base, str> {
        Cow::Borrowed("")
    }
}

impl<'base> BodyStatementAst<'base> {
    /// Resolves a `var`/`const` declaration, reconciling the explicit type
    /// annotation and the initializer expression when both are present, and
    /// registers the binding in the enclosing scope.
    fn resolve_variable_definition(context: &mut TirContext<'base>, scope_location: ScopeLocation, definition: &crate::ast::VariableDefinitionAst<'base>) -> Result<TypeLocation, TirError> {
        let module_ref = context.get_scope(scope_location).expect("Scope not found, it is a bug").module_ref.clone();

        let declared_type = match &definition.expected_type {
            Some(type_name) => Some(get_object_location_or_resolve(context, type_name, &module_ref, scope_location)?),
            None => None,
        };

        let expression_type = match &definition.expression {
            Some(expression) => Some(Self::resolve_expression(context, scope_location, expression)?),
            None => None,
        };

        let variable_type = match (declared_type, expression_type) {
            (Some(declared_type), Some(expression_type)) => {
                if declared_type != expression_type {
                    context.add_error(TirError::types_do_not_match(definition.name.to_range(), definition.name.state.file.clone()));
                }
                declared_type
            }
            (Some(declared_type), None) => declared_type,
            (None, Some(expression_type)) => expression_type,
            (None, None) => unreachable!("parser guarantees a type annotation or an initializer"),
        };

        let variable = match definition.variable_definition_type {
            VariableDefinitionType::Const => TypeVariableInformation::readonly(definition.name.clone(), variable_type),
            VariableDefinitionType::Var => TypeVariableInformation::basic(definition.name.clone(), variable_type),
        };

        let scope = context.get_mut_scope(scope_location).expect("Scope not found, it is a bug");
        scope.add_variable(variable)?;

        Ok(variable_type)
    }

    /// Resolves an assignment to an already-declared variable, rejecting
    /// reassignment of `const` bindings and mismatched value types.
    fn resolve_variable_assign(context: &mut TirContext<'base>, scope_location: ScopeLocation, assign: &crate::ast::VariableAssignAst<'base>) -> Result<TypeLocation, TirError> {
        let variable = {
            let scope = context.get_scope(scope_location).expect("Scope not found, it is a bug");
            match scope.get_variable(context, &assign.name) {
                Some(variable) => variable,
                None => return Err(FunctionResolveError::variable_not_found((&assign.name).into())),
            }
        };

        if variable.readonly {
            return Err(StatementError::assign_to_const(assign.name.text.to_string(), (&assign.name).into()));
        }

        let expression_type = Self::resolve_expression(context, scope_location, &assign.expression)?;
        if expression_type != variable.location {
            let span = Self::expression_span(&assign.expression);
            context.add_error(TirError::types_do_not_match(span.to_range(), span.state.file.clone()));
        }

        Ok(variable.location)
    }

    /// Resolves an `if`/`else if`/`else` chain: every condition must resolve
    /// to a boolean, and each branch body is resolved in its own child scope.
    fn resolve_if_condition(context: &mut TirContext<'base>, scope_location: ScopeLocation, if_condition: &crate::ast::IfConditionAst<'base>) -> Result<TypeLocation, TirError> {
        Self::resolve_condition_branch(context, scope_location, &if_condition.expression, &if_condition.true_body)?;

        for (condition, body) in if_condition.else_ifs.iter() {
            Self::resolve_condition_branch(context, scope_location, condition, body)?;
        }

        if let Some(false_body) = &if_condition.false_body {
            Self::resolve_body(context, scope_location, false_body)?;
        }

        Ok(TypeLocation::UNDEFINED)
    }

    fn resolve_condition_branch(context: &mut TirContext<'base>, scope_location: ScopeLocation, condition: &ExpressionAst<'base>, body: &BodyAst<'base>) -> Result<(), TirError> {
        let condition_type = Self::resolve_expression(context, scope_location, condition)?;

        if let Some(bool_type) = context.types.find_by_value(&TypeValue::PrimitiveType(PrimitiveType::Bool)) {
            if condition_type != bool_type {
                let span = Self::expression_span(condition);
                context.add_error(TirError::invalid_type(span.to_range(), "if condition must be a boolean expression", span.state.file.clone()));
            }
        }

        Self::resolve_body(context, scope_location, body)
    }

    fn resolve_body(context: &mut TirContext<'base>, scope_location: ScopeLocation, body: &BodyAst<'base>) -> Result<(), TirError> {
        let child_scope = context.create_child_scope("if".into(), scope_location, None);

        for statement in body.statements.iter() {
            statement.resolve(context, child_scope)?;
            statement.finish(context, child_scope)?;
        }

        Ok(())
    }
}

/// Resolves a primitive value to its corresponding type location in the type system
/// 
/// This function takes a primitive value (string, number, boolean) and finds its
/// corresponding type representation in the TIR type system. It's used during
/// expression resolution to determine the types of literal values.
/// 
/// # Arguments
/// * `context` - Mutable TIR context for type system access
/// * `primitive` - The primitive value to resolve
/// * `span` - Source location information for error reporting
/// 
/// # Returns
/// * `Ok(TypeLocation)` - Location of the primitive's type in the type system
/// * `Err(TirError)` - Error if the primitive type is not found
/// 
/// # Errors
/// Returns `TirError::type_not_found` if the primitive type is not registered
/// in the type system, which typically indicates a compiler setup issue.
pub fn try_resolve_primitive<'base>(context: &mut TirContext<'base>, primitive: &PrimitiveValue<'base>, span: &Span<'base>) -> Result<TypeLocation, TirError> {
    let location = context.types.find_by_value(&TypeValue::PrimitiveType(primitive.to_type()));
    match location {
        Some(location) => Ok(location),
        None => Err(TirError::type_not_found(context, span.to_string(), span.to_range(), span.state.file.clone())),
    }
}

/// Checks that every `Universe::Linear` binding declared directly in
/// `scope_location` (function parameters and top-level `var`/`const`
/// declarations) is consumed exactly once along every path through `body`.
///
/// Bindings introduced inside nested `if`/`else` bodies are not tracked: they
/// cannot escape their branch, so they carry no cross-branch obligation. A
/// body with no statements at all is treated as a declaration stub (the
/// surface grammar has no `return`/`drop` statement a leaf consumer could
/// use) and is exempt, matching how `init(this): string {}`-style stubs are
/// written throughout this codebase's own tests.
pub fn check_function_linearity<'base>(context: &TirContext<'base>, scope_location: ScopeLocation, source: crate::file::SourceFile, body: &BodyAst<'base>) -> Result<(), TirError> {
    if body.statements.is_empty() {
        return Ok(());
    }

    let scope = context.get_scope(scope_location).expect("Scope not found, it is a bug");

    let mut bindings = Vec::new();
    let mut binding_ids = HashMap::new();

    for (name, variable) in scope.own_variables() {
        let id = BindingId(bindings.len());
        bindings.push(BindingMeta {
            name: name.to_string(),
            universe: universe::universe_of(context, variable.location),
            declared_position: variable.span.to_range(),
        });
        binding_ids.insert(name.to_string(), id);
    }

    let tree = build_linearity_body(&body.statements, &binding_ids);
    linearity::check(source, &bindings, &tree)
}

fn build_linearity_body<'base>(statements: &[BodyStatementAst<'base>], binding_ids: &HashMap<String, BindingId>) -> Vec<Stmt> {
    statements.iter().flat_map(|statement| build_linearity_statement(statement, binding_ids)).collect()
}

fn build_linearity_statement<'base>(statement: &BodyStatementAst<'base>, binding_ids: &HashMap<String, BindingId>) -> Vec<Stmt> {
    match statement {
        BodyStatementAst::FunctionCall(call) => {
            let position = call.call_span.to_range();
            call.arguments
                .iter()
                .flat_map(|argument| collect_idents(argument, binding_ids))
                .map(|binding| Stmt::Consume { binding, position: position.clone() })
                .collect()
        }
        BodyStatementAst::VariableDefinition(definition) => {
            let position = definition.name.to_range();
            definition
                .expression
                .iter()
                .flat_map(|expression| collect_idents(expression, binding_ids))
                .map(|binding| Stmt::Consume { binding, position: position.clone() })
                .collect()
        }
        BodyStatementAst::VariableAssign(assign) => {
            let position = assign.name.to_range();
            collect_idents(&assign.expression, binding_ids)
                .into_iter()
                .map(|binding| Stmt::Consume { binding, position: position.clone() })
                .collect()
        }
        BodyStatementAst::IfCondition(if_condition) => vec![build_if_chain(
            &if_condition.expression,
            &if_condition.true_body,
            &if_condition.else_ifs,
            if_condition.false_body.as_ref(),
            binding_ids,
        )],
    }
}

/// Desugars an `if`/`else if`/`else` chain into nested binary `Stmt::If`
/// nodes: `if a {} else if b {} else {}` becomes
/// `If(a, then, [If(b, then, else)])`.
fn build_if_chain<'base>(
    condition: &ExpressionAst<'base>,
    then_body: &BodyAst<'base>,
    else_ifs: &[(ExpressionAst<'base>, BodyAst<'base>)],
    false_body: Option<&BodyAst<'base>>,
    binding_ids: &HashMap<String, BindingId>,
) -> Stmt {
    let position = BodyStatementAst::expression_span(condition).to_range();
    let mut condition_consumes = collect_idents(condition, binding_ids).into_iter().map(|binding| Stmt::Consume { binding, position: position.clone() }).collect::<Vec<_>>();

    let then_branch = {
        condition_consumes.append(&mut build_linearity_body(&then_body.statements, binding_ids));
        condition_consumes
    };

    let else_branch = match else_ifs.split_first() {
        Some(((next_condition, next_body), rest)) => vec![build_if_chain(next_condition, next_body, rest, false_body, binding_ids)],
        None => false_body.map(|body| build_linearity_body(&body.statements, binding_ids)).unwrap_or_default(),
    };

    Stmt::If { position, then_branch, else_branch }
}

/// Collects every identifier in `expression` that names a tracked binding.
fn collect_idents(expression: &ExpressionAst<'_>, binding_ids: &HashMap<String, BindingId>) -> Vec<BindingId> {
    match expression {
        ExpressionAst::Ident(span) => binding_ids.get(span.text).copied().into_iter().collect(),
        ExpressionAst::Not(inner) => collect_idents(inner, binding_ids),
        ExpressionAst::Operation { left, right, .. } => {
            let mut idents = collect_idents(left, binding_ids);
            idents.extend(collect_idents(right, binding_ids));
            idents
        }
        ExpressionAst::FunctionCall(call) => call.arguments.iter().flat_map(|argument| collect_idents(argument, binding_ids)).collect(),
        ExpressionAst::Primitive { .. } | ExpressionAst::Ref(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{file::SourceFile, nom_tools::State, process_ast, process_code, tir::TirError};

    #[test]
    fn missing_type_1() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], "func test(): a {} ".to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap_err();
        Ok(())
    }

    #[test]
    fn duplicated_function_argument() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], "class a {} func test(a: a, a: a): a {} ".to_string()));
        let ast = process_code(&state)?;
        let error = crate::tir::build(vec![ast.into()]).unwrap_err();

        if let TirError::AlreadyDefined(error) = error {
            assert_eq!(error.new_position, 27..28);
        } else {
            panic!("Expected TirError::AlreadyDefined but got {error:?}");
        }

        Ok(())
    }

    #[test]
    fn valid_types() -> Result<(), TirError> {
        
        let state_1 = State::new(SourceFile::new(vec!["lib".into()], " class testclass1 {} ".to_string()));
        let state_2 = State::new(SourceFile::new(vec!["main".into()],
            r#"use lib.testclass1 as test;
    func main(a: test): test {}"#.to_string()));
        
        let source_1 = process_code(&state_1)?;
        let source_2 = process_code(&state_2)?;

        let context = process_ast(vec![source_2.into(), source_1.into()])?;
        assert_eq!(context.modules.len(), 2);

        let main_module = context.modules.iter().find(|(name, _)| *name == "main").unwrap();
        let lib_module = context.modules.iter().find(|(name, _)| *name == "lib").unwrap();

        main_module.1.types.get("main").unwrap();

        assert!(main_module.1.ast_imported_modules.get("testclass1").is_none());
        assert!(main_module.1.ast_imported_modules.get("test").is_some());
        assert!(main_module.1.types.get("testclass1").is_none());

        lib_module.1.types.get("testclass1").unwrap();

        Ok(())
    }

    #[test]
    fn missing_type_2() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], "func test(a: a): test {}".to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap_err();
        Ok(())
    }

    #[test]
    fn not_in_class() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], "func test(this): test {}".to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap_err();
        Ok(())
    }

    #[test]
    fn variable_definition_inferred_type() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
func test(): string {
    var name = "hello";
    name = "world";
}
    "#.to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap();
        Ok(())
    }

    #[test]
    fn variable_definition_explicit_type_mismatch() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
func test(): string {
    var name: string = true;
}
    "#.to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap_err();
        Ok(())
    }

    #[test]
    fn assign_to_const_is_rejected() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
func test(): string {
    const name = "hello";
    name = "world";
}
    "#.to_string()));
        let ast = process_code(&state)?;
        let error = crate::tir::build(vec![ast.into()]).unwrap_err();
        assert!(matches!(error, TirError::ResolverError(_)));
        Ok(())
    }

    #[test]
    fn assign_type_mismatch_is_rejected() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
func test(): string {
    var name = "hello";
    name = true;
}
    "#.to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap_err();
        Ok(())
    }

    #[test]
    fn if_condition_with_boolean() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
func test(): string {
    var flag = true;
    if flag {
        var inner = "yes";
    } else {
        var inner = "no";
    }
}
    "#.to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap();
        Ok(())
    }

    #[test]
    fn if_condition_requires_boolean() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
func test(): string {
    if "not a bool" {
        var inner = "yes";
    }
}
    "#.to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap_err();
        Ok(())
    }

    #[test]
    fn linear_argument_consumed_once_passes() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
linear class Handle {}

func consume(a: Handle): string {}

func use_once(a: Handle): string {
    consume(a);
}
    "#.to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap();
        Ok(())
    }

    #[test]
    fn linear_argument_never_consumed_is_rejected() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
linear class Handle {}

func never_used(a: Handle): string {
    var x = "idle";
}
    "#.to_string()));
        let ast = process_code(&state)?;
        let error = crate::tir::build(vec![ast.into()]).unwrap_err();
        assert!(matches!(error, TirError::ValueNotConsumed(_)));
        Ok(())
    }

    #[test]
    fn linear_argument_consumed_twice_is_rejected() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
linear class Handle {}

func consume(a: Handle): string {}

func used_twice(a: Handle): string {
    consume(a);
    consume(a);
}
    "#.to_string()));
        let ast = process_code(&state)?;
        let error = crate::tir::build(vec![ast.into()]).unwrap_err();
        assert!(matches!(error, TirError::ValueConsumedTwice(_)));
        Ok(())
    }

    #[test]
    fn free_class_argument_need_not_be_consumed() -> Result<(), TirError> {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class Handle {}

func never_used(a: Handle): string {}
    "#.to_string()));
        let ast = process_code(&state)?;
        crate::tir::build(vec![ast.into()]).unwrap();
        Ok(())
    }
}
