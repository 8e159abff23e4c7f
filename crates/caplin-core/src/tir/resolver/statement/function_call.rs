//! Resolution of function and method call expressions.
//!
//! A call path is either `this`-rooted (`this.method()`, `this.a.method()`) or
//! direct (`function()`, `module.function()`). Both forms are resolved by
//! walking a chain of [`GetItem`] lookups starting from an initial location,
//! then checking the resolved function's signature against the call site.
//!
//! Every resolved call also records an instantiation: the callee's qualified
//! name paired with its (region-free) argument type shapes is looked up in
//! the context's [`crate::tir::monomorphize::InstantiationTable`], so two call
//! sites with the same callee and argument shapes share one monomorphization.

use std::ops::Range;

use caplin_macros::CaplinError;
use caplin_macros_core::SourceCode;
use strum_macros::{EnumDiscriminants, EnumProperty};

use crate::{
    ast::{ExpressionAst, FunctionCallAst, FunctionCallType},
    nom_tools::{Span, SpanInfo, ToRange},
    tir::{
        context::TirContext,
        monomorphize::{self, InstantiationKey, Type},
        object_signature::{GetItem, TypeValue, TypeValueDiscriminants},
        resolver::{
            function::{find_class_location, FunctionResolveError},
            statement::try_resolve_primitive,
            ResolverError, TypeLocation,
        },
        scope::ScopeLocation,
        TirError,
    },
};

use super::BodyStatementAst;

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{name}' expects {expected} argument(s) but {found} were given")]
#[diagnostic(code("caplin::error::argument_count_mismatch"))]
pub struct ArgumentCountMismatch {
    pub name: String,
    pub expected: usize,
    pub found: usize,

    #[label("called here")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{name}' is not a function")]
#[diagnostic(code("caplin::error::not_callable"))]
pub struct NotCallable {
    pub name: String,

    #[label("this is not callable")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error, EnumDiscriminants, EnumProperty)]
pub enum FunctionCallError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    ArgumentCountMismatch(Box<ArgumentCountMismatch>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    NotCallable(Box<NotCallable>),
}

impl From<FunctionCallError> for TirError {
    fn from(value: FunctionCallError) -> Self {
        ResolverError::FunctionCall(Box::new(value)).into()
    }
}

impl FunctionCallError {
    pub fn argument_count_mismatch(name: String, expected: usize, found: usize, span: SpanInfo) -> TirError {
        FunctionCallError::ArgumentCountMismatch(ArgumentCountMismatch {
            name,
            expected,
            found,
            position: span.position,
            code: span.file.into(),
        }.into()).into()
    }

    pub fn not_callable(name: String, span: SpanInfo) -> TirError {
        FunctionCallError::NotCallable(NotCallable {
            name,
            position: span.position,
            code: span.file.into(),
        }.into()).into()
    }
}

/// A resolved function-like signature: the pieces of `FunctionDefinition` and
/// `InterfaceFunctionDefinition` that a call site needs to check against.
struct CallableSignature<'a, 'base> {
    qident: String,
    arguments: &'a [crate::tir::resolver::function::FunctionArgument<'base>],
    return_type: TypeLocation,
}

fn as_callable<'a, 'base>(value: &'a TypeValue<'base>) -> Option<CallableSignature<'a, 'base>> {
    match value {
        TypeValue::Function(function) => Some(CallableSignature {
            qident: function.signature_path.get_raw_path().to_string(),
            arguments: &function.arguments,
            return_type: function.return_type,
        }),
        TypeValue::InterfaceFunction(function) => Some(CallableSignature {
            qident: function.name.text.to_string(),
            arguments: &function.arguments,
            return_type: function.return_type,
        }),
        _ => None,
    }
}

/// Name used to identify `location`'s type in an instantiation key. Classes
/// and interfaces use their declared name; everything else falls back to its
/// discriminant so distinct primitive types never collide.
fn type_name_of(context: &TirContext<'_>, location: TypeLocation) -> String {
    match context.types.get_from_location(location).map(|signature| &signature.value) {
        Some(TypeValue::Class(class)) => class.name.text.to_string(),
        Some(TypeValue::Interface(interface)) => interface.name.text.to_string(),
        Some(other) => format!("{:?}", TypeValueDiscriminants::from(other)),
        None => "<unknown>".to_string(),
    }
}

impl<'base> BodyStatementAst<'base> {
    /// Resolves a function or method call, validating the callee's arity and
    /// argument types, and returns its return type.
    pub(super) fn resolve_function_call(context: &mut TirContext<'base>, scope_location: ScopeLocation, function_call: &FunctionCallAst<'base>) -> Result<TypeLocation, TirError> {
        let target_location = match &function_call.path {
            FunctionCallType::This(path) => {
                let class_location = match find_class_location(context, scope_location) {
                    Some(location) => location,
                    None => return Err(FunctionResolveError::this_need_to_define_in_class((&function_call.call_span).into())),
                };

                Self::walk_path(context, class_location, path)?
            }
            FunctionCallType::Direct(path) => {
                let (head, rest) = path.split_first().expect("function call path can not be empty");
                let scope = context.get_scope(scope_location).expect("Scope not found, it is a bug");
                let variable = match scope.get_variable(context, head) {
                    Some(variable) => variable,
                    None => return Err(FunctionResolveError::variable_not_found(head.into())),
                };

                Self::walk_path(context, variable.location, rest)?
            }
        };

        let signature = match context.types.get_from_location(target_location) {
            Some(signature) => signature,
            None => return Err(FunctionResolveError::variable_not_found((&function_call.call_span).into())),
        };

        let callable = match as_callable(&signature.value) {
            Some(callable) => callable,
            None => return Err(FunctionCallError::not_callable(function_call.call_span.text.to_string(), (&function_call.call_span).into())),
        };

        if callable.arguments.len() != function_call.arguments.len() {
            return Err(FunctionCallError::argument_count_mismatch(
                function_call.call_span.text.to_string(),
                callable.arguments.len(),
                function_call.arguments.len(),
                (&function_call.arguments_span).into(),
            ));
        }

        let expected_types = callable.arguments.iter().map(|argument| argument.field_type).collect::<Vec<_>>();
        let return_type = callable.return_type;
        let qident = callable.qident;

        let mut argument_stripped_types = Vec::with_capacity(function_call.arguments.len());

        for (argument, expected_type) in function_call.arguments.iter().zip(expected_types.into_iter()) {
            let argument_type = Self::resolve_expression(context, scope_location, argument)?;

            if argument_type != expected_type {
                let span = Self::expression_span(argument);
                context.add_error(TirError::types_do_not_match(span.to_range(), span.state.file.clone()));
            }

            let argument_type_name = type_name_of(context, argument_type);
            if let Some(stripped) = monomorphize::strip(&Type::Named(argument_type_name, Vec::new())) {
                argument_stripped_types.push(stripped);
            }
        }

        context.instantiations.instantiate(InstantiationKey { qident, arguments: argument_stripped_types });

        Ok(return_type)
    }

    /// Walks a chain of member accesses starting from `location`, returning the
    /// location of the last segment. An empty `path` returns `location` unchanged.
    fn walk_path(context: &TirContext<'base>, location: TypeLocation, path: &[Span<'base>]) -> Result<TypeLocation, TirError> {
        let mut current = location;

        for segment in path {
            let signature = match context.types.get_from_location(current) {
                Some(signature) => signature,
                None => return Err(FunctionResolveError::variable_not_found(segment.into())),
            };

            current = match signature.value.get_item_location(context, segment.text) {
                Some(location) => location,
                None => return Err(FunctionResolveError::variable_not_found(segment.into())),
            };
        }

        Ok(current)
    }

    pub(super) fn resolve_expression(context: &mut TirContext<'base>, scope_location: ScopeLocation, expression: &ExpressionAst<'base>) -> Result<TypeLocation, TirError> {
        match expression {
            ExpressionAst::Primitive { span, value } => try_resolve_primitive(context, value, span),
            ExpressionAst::Ident(span) => {
                let scope = context.get_scope(scope_location).expect("Scope not found, it is a bug");
                match scope.get_variable(context, span) {
                    Some(variable) => Ok(variable.location),
                    None => Err(FunctionResolveError::variable_not_found(span.into())),
                }
            }
            ExpressionAst::FunctionCall(call) => Self::resolve_function_call(context, scope_location, call),
            ExpressionAst::Ref(_) | ExpressionAst::Not(_) | ExpressionAst::Operation { .. } => {
                let span = Self::expression_span(expression);
                Err(TirError::invalid_type(span.to_range(), "unsupported expression in function call argument", span.state.file.clone()))
            }
        }
    }

    /// Returns a representative span for an expression, used for error reporting.
    pub(super) fn expression_span<'a>(expression: &'a ExpressionAst<'base>) -> &'a Span<'base> {
        match expression {
            ExpressionAst::Primitive { span, .. } => span,
            ExpressionAst::Ident(span) => span,
            ExpressionAst::Ref(reference) => reference.names.first().expect("reference path can not be empty"),
            ExpressionAst::Not(inner) => Self::expression_span(inner),
            ExpressionAst::FunctionCall(call) => &call.call_span,
            ExpressionAst::Operation { left, .. } => Self::expression_span(left),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{file::SourceFile, nom_tools::State, process_code};

    #[test]
    fn func_call_1() {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class TestClass {
    func init(this): string {
        abc();
    }
}

func abc(): string {
}
"#.to_string()));
        let ast = process_code(&state).unwrap();
        crate::tir::build(vec![ast.into()]).unwrap();
    }

    #[test]
    fn func_call_2() {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class TestClass {
    func init(this): string {
        this.abc();
        abc();
    }

    func abc(): string {
    }
}

func abc(): string {
}
"#.to_string()));
        let ast = process_code(&state).unwrap();
        crate::tir::build(vec![ast.into()]).unwrap();
    }

    #[test]
    fn func_call_3() {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class TestClass {
    func init(this): string {
        this.abc("hello");
    }

    func abc(a: string): string {
    }
}
"#.to_string()));
        let ast = process_code(&state).unwrap();
        crate::tir::build(vec![ast.into()]).unwrap();

        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class TestClass {
    func init(this): string {
        this.abc("hello", "world");
    }
    func abc(a: string, b: string): string {
    }
}
"#.to_string()));
        let ast = process_code(&state).unwrap();
        crate::tir::build(vec![ast.into()]).unwrap();
    }

    #[test]
    #[should_panic]
    fn func_call_4() {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class TestClass {
    func init(this): string {
        this.abc();
    }

    func abc(a: string): string {
    }
}
"#.to_string()));
        let ast = process_code(&state).unwrap();
        crate::tir::build(vec![ast.into()]).unwrap();
    }

    #[test]
    #[should_panic]
    fn func_call_5() {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class TestClass {
    func init(this): string {
        this.abc("hello");
    }

    func abc(): string {
    }
}
"#.to_string()));
        let ast = process_code(&state).unwrap();
        crate::tir::build(vec![ast.into()]).unwrap();
    }

    #[test]
    #[should_panic]
    fn func_call_6() {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class TestClass {
    func init(this): string {
        this.nope();
    }

    func abc(): string {
    }
}
"#.to_string()));
        let ast = process_code(&state).unwrap();
        crate::tir::build(vec![ast.into()]).unwrap();
    }

    #[test]
    fn func_call_7() {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
interface ITest {
    func test(a: string): string;
    a: TestClass;
}

extend TestClass: ITest {
    func test(a: string): string {

    }
    a: TestClass;
}

class TestClass {
    func init(this): string {
        this.test("erhanbaris");
        this.a.test("baris");
        abc();
    }
}

func abc(): TestClass {
}

"#.to_string()));
        let ast = process_code(&state).unwrap();
        crate::tir::build(vec![ast.into()]).unwrap();
    }

    #[test]
    fn repeated_calls_with_same_argument_shape_share_one_instantiation() {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class TestClass {
    func init(this): string {
        abc("a");
        abc("b");
    }
}

func abc(a: string): string {
}
"#.to_string()));
        let ast = process_code(&state).unwrap();
        let context = crate::tir::build(vec![ast.into()]).unwrap();
        assert_eq!(context.instantiations.len(), 1);
    }

    #[test]
    fn calls_with_different_argument_shapes_allocate_distinct_instantiations() {
        let state = State::new(SourceFile::new(vec!["source".into()], r#"
class TestClass {
    func init(this): string {
        abc("a");
        xyz();
    }
}

func abc(a: string): string {
}

func xyz(): string {
}
"#.to_string()));
        let ast = process_code(&state).unwrap();
        let context = crate::tir::build(vec![ast.into()]).unwrap();
        assert_eq!(context.instantiations.len(), 2);
    }
}
