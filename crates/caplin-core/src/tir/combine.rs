//! Module combining: unifying an interface file's declared signatures with a
//! body file's definitions into one combined module, per the interface/body
//! split described in the data model (a module is either interface + body,
//! or body-only).
//!
//! Caplin's grammar does not separate declaration from definition the way a
//! header/source split would: every class, function and interface AST node
//! already carries both its signature and its body. `combine_modules`
//! therefore validates that a standalone interface file's declared shape
//! agrees with a body file's definitions - same module name, same
//! declaration kinds, same function arity/types, same class universe - and,
//! once everything lines up, hands the body file's own `FileAst` (the one
//! carrying real statement bodies) on to the resolver as the combined
//! module. Body-only declarations that have no interface counterpart pass
//! through untouched: their own `is_public` bit already makes them private
//! unless the source marked them `pub`.

use std::{ops::Range, rc::Rc};

use caplin_macros::CaplinError;
use caplin_macros_core::SourceCode;
use strum_macros::{EnumDiscriminants, EnumProperty};

use crate::{
    ast::{ClassDefinitionFieldAst, FileAst, FileStatementAst, FunctionArgumentAst, FunctionDefinitionAst, TypeNameAst},
    nom_tools::{Span, SpanInfo},
    tir::TirError,
};

#[cfg(test)]
use crate::file::SourceFile;

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("interface module '{interface_name}' does not match body module '{body_name}'")]
#[diagnostic(code("caplin::error::module_name_mismatch"), help("rename one of the files so both declare the same module path"))]
pub struct ModuleNameMismatch {
    pub interface_name: String,
    pub body_name: String,

    #[label("interface declared here")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{name}' is declared as {interface_kind} in the interface but {body_kind} in the body")]
#[diagnostic(code("caplin::error::declaration_kind_mismatch"))]
pub struct KindMismatch {
    pub name: String,
    pub interface_kind: &'static str,
    pub body_kind: &'static str,

    #[label("declared here")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{name}' is declared in the interface but has no matching body definition")]
#[diagnostic(code("caplin::error::missing_body"))]
pub struct MissingBody {
    pub name: String,

    #[label("declared here")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{name}' has {interface_count} parameter(s) in the interface but {body_count} in the body")]
#[diagnostic(code("caplin::error::function_parameter_mismatch"))]
pub struct FunctionParameterMismatch {
    pub name: String,
    pub interface_count: usize,
    pub body_count: usize,

    #[label("body definition here")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{name}' parameter or return type does not match between interface and body")]
#[diagnostic(code("caplin::error::interface_body_type_mismatch"))]
pub struct TypeMismatch {
    pub name: String,

    #[label("body definition here")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{name}' is declared `linear` in one of interface/body but not the other")]
#[diagnostic(code("caplin::error::universe_mismatch"))]
pub struct UniverseMismatch {
    pub name: String,

    #[label("body definition here")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error, EnumDiscriminants, EnumProperty)]
pub enum DeclarationError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    ModuleNameMismatch(Box<ModuleNameMismatch>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    KindMismatch(Box<KindMismatch>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    MissingBody(Box<MissingBody>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    FunctionParameterMismatch(Box<FunctionParameterMismatch>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    TypeMismatch(Box<TypeMismatch>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    UniverseMismatch(Box<UniverseMismatch>),
}

impl From<DeclarationError> for TirError {
    fn from(value: DeclarationError) -> Self {
        TirError::DeclarationError(Box::new(value))
    }
}

impl DeclarationError {
    fn module_name_mismatch(interface_name: String, body_name: String, span: SpanInfo) -> TirError {
        DeclarationError::ModuleNameMismatch(ModuleNameMismatch {
            interface_name,
            body_name,
            position: span.position,
            code: span.file.into(),
        }.into()).into()
    }

    fn kind_mismatch(name: String, interface_kind: &'static str, body_kind: &'static str, span: SpanInfo) -> TirError {
        DeclarationError::KindMismatch(KindMismatch {
            name,
            interface_kind,
            body_kind,
            position: span.position,
            code: span.file.into(),
        }.into()).into()
    }

    fn missing_body(name: String, span: SpanInfo) -> TirError {
        DeclarationError::MissingBody(MissingBody {
            name,
            position: span.position,
            code: span.file.into(),
        }.into()).into()
    }

    fn function_parameter_mismatch(name: String, interface_count: usize, body_count: usize, span: SpanInfo) -> TirError {
        DeclarationError::FunctionParameterMismatch(FunctionParameterMismatch {
            name,
            interface_count,
            body_count,
            position: span.position,
            code: span.file.into(),
        }.into()).into()
    }

    fn type_mismatch(name: String, span: SpanInfo) -> TirError {
        DeclarationError::TypeMismatch(TypeMismatch {
            name,
            position: span.position,
            code: span.file.into(),
        }.into()).into()
    }

    fn universe_mismatch(name: String, span: SpanInfo) -> TirError {
        DeclarationError::UniverseMismatch(UniverseMismatch {
            name,
            position: span.position,
            code: span.file.into(),
        }.into()).into()
    }
}

/// A coarse declaration kind used to compare an interface declaration against
/// its body counterpart without caring about the rest of the AST shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Class,
    Function,
    Interface,
    Extend,
}

fn decl_kind(statement: &FileStatementAst<'_>) -> Option<DeclKind> {
    match statement {
        FileStatementAst::Class(_) => Some(DeclKind::Class),
        FileStatementAst::Function(_) => Some(DeclKind::Function),
        FileStatementAst::Interface(_) => Some(DeclKind::Interface),
        FileStatementAst::Extend(_) => Some(DeclKind::Extend),
        FileStatementAst::Use(_) => None,
    }
}

fn decl_kind_name(kind: DeclKind) -> &'static str {
    match kind {
        DeclKind::Class => "a class",
        DeclKind::Function => "a function",
        DeclKind::Interface => "an interface",
        DeclKind::Extend => "an extend block",
    }
}

fn decl_name<'base>(statement: &FileStatementAst<'base>) -> Option<Span<'base>> {
    match statement {
        FileStatementAst::Class(class) => Some(class.name.clone()),
        FileStatementAst::Function(function) => Some(function.name.clone()),
        FileStatementAst::Interface(interface) => Some(interface.name.clone()),
        FileStatementAst::Extend(_) | FileStatementAst::Use(_) => None,
    }
}

fn type_name_text(type_name: &TypeNameAst<'_>) -> String {
    let path = type_name.names.iter().map(|span| span.text).collect::<Vec<_>>().join(".");
    format!("{}{}{}", if type_name.reference { "&" } else { "" }, path, if type_name.nullable { "?" } else { "" })
}

fn arguments_match(interface: &[FunctionArgumentAst<'_>], body: &[FunctionArgumentAst<'_>]) -> bool {
    interface.len() == body.len()
        && interface.iter().zip(body.iter()).all(|pair| match pair {
            (FunctionArgumentAst::This(_), FunctionArgumentAst::This(_)) => true,
            (FunctionArgumentAst::Argument { field_type: interface_type, .. }, FunctionArgumentAst::Argument { field_type: body_type, .. }) => {
                type_name_text(interface_type) == type_name_text(body_type)
            }
            _ => false,
        })
}

fn check_functions_agree(interface: &FunctionDefinitionAst<'_>, body: &FunctionDefinitionAst<'_>) -> Result<(), TirError> {
    let name = body.name.text.to_string();
    let span: SpanInfo = (&body.name).into();

    if interface.arguments.len() != body.arguments.len() {
        return Err(DeclarationError::function_parameter_mismatch(name, interface.arguments.len(), body.arguments.len(), span));
    }

    if !arguments_match(&interface.arguments, &body.arguments) {
        return Err(DeclarationError::type_mismatch(name, span));
    }

    if type_name_text(&interface.return_type) != type_name_text(&body.return_type) {
        return Err(DeclarationError::type_mismatch(name, span));
    }

    Ok(())
}

/// Validates that `interface` and `body` agree per the module combining
/// contract, then returns `body` (which already carries the real statement
/// bodies) as the combined module.
pub fn combine_modules<'base>(interface: Rc<FileAst<'base>>, body: Rc<FileAst<'base>>) -> Result<Rc<FileAst<'base>>, TirError> {
    let interface_name = interface.file.path().join(".");
    let body_name = body.file.path().join(".");

    if interface_name != body_name {
        let span = SpanInfo { position: 0..interface.file.code.len(), file: interface.file.clone() };
        return Err(DeclarationError::module_name_mismatch(interface_name, body_name, span));
    }

    for interface_decl in interface.statements.iter() {
        let Some(interface_kind) = decl_kind(interface_decl) else { continue };
        let Some(name) = decl_name(interface_decl) else { continue };

        let body_decl = body.statements.iter().find(|candidate| decl_name(candidate).is_some_and(|candidate_name| candidate_name.text == name.text));

        let body_decl = match body_decl {
            Some(body_decl) => body_decl,
            None => {
                let span: SpanInfo = (&name).into();
                return Err(DeclarationError::missing_body(name.text.to_string(), span));
            }
        };

        let body_kind = decl_kind(body_decl).expect("body_decl was matched by decl_name, which only returns Some for kinds decl_kind also handles");

        if interface_kind != body_kind {
            let span: SpanInfo = (&name).into();
            return Err(DeclarationError::kind_mismatch(name.text.to_string(), decl_kind_name(interface_kind), decl_kind_name(body_kind), span));
        }

        match (interface_decl, body_decl) {
            (FileStatementAst::Function(interface_function), FileStatementAst::Function(body_function)) => {
                check_functions_agree(interface_function, body_function)?;
            }
            (FileStatementAst::Class(interface_class), FileStatementAst::Class(body_class)) => {
                if interface_class.is_linear.is_some() != body_class.is_linear.is_some() {
                    let span: SpanInfo = (&body_class.name).into();
                    return Err(DeclarationError::universe_mismatch(name.text.to_string(), span));
                }

                for interface_field in interface_class.fields.iter() {
                    let ClassDefinitionFieldAst::Function(interface_function) = interface_field else { continue };
                    let body_function = body_class.fields.iter().find_map(|field| match field {
                        ClassDefinitionFieldAst::Function(candidate) if candidate.name.text == interface_function.name.text => Some(candidate),
                        _ => None,
                    });

                    match body_function {
                        Some(body_function) => check_functions_agree(interface_function, body_function)?,
                        None => {
                            let span: SpanInfo = (&interface_function.name).into();
                            return Err(DeclarationError::missing_body(interface_function.name.text.to_string(), span));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{nom_tools::State, process_code};

    fn parse(source: &str, path: &str) -> Rc<FileAst<'static>> {
        let state: &'static State = Box::leak(Box::new(State::new(SourceFile::new(vec![path.to_string()], source.to_string()))));
        let ast = process_code(state).unwrap();
        Rc::new(ast)
    }

    #[test]
    fn agreeing_interface_and_body_combine() {
        let interface = parse("func greet(a: string): string { }\nclass Widget {}\n", "widget");
        let body = parse("func greet(a: string): string { }\nclass Widget {}\n", "widget");

        assert!(combine_modules(interface, body).is_ok());
    }

    #[test]
    fn mismatched_module_names_are_rejected() {
        let interface = parse("func greet(a: string): string { }\n", "widget");
        let body = parse("func greet(a: string): string { }\n", "gadget");

        let error = combine_modules(interface, body).unwrap_err();
        assert!(matches!(error, TirError::DeclarationError(_)));
        assert!(format!("{error}").contains("does not match"));
    }

    #[test]
    fn missing_body_definition_is_rejected() {
        let interface = parse("func greet(a: string): string { }\n", "widget");
        let body = parse("func other(): string { }\n", "widget");

        let error = combine_modules(interface, body).unwrap_err();
        assert!(format!("{error}").contains("no matching body"));
    }

    #[test]
    fn mismatched_argument_count_is_rejected() {
        let interface = parse("func greet(a: string): string { }\n", "widget");
        let body = parse("func greet(a: string, b: string): string { }\n", "widget");

        let error = combine_modules(interface, body).unwrap_err();
        assert!(format!("{error}").contains("parameter"));
    }

    #[test]
    fn mismatched_universe_is_rejected() {
        let interface = parse("class Handle {}\n", "widget");
        let body = parse("linear class Handle {}\n", "widget");

        let error = combine_modules(interface, body).unwrap_err();
        assert!(format!("{error}").contains("linear"));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let interface = parse("func Widget(): string { }\n", "widget");
        let body = parse("class Widget {}\n", "widget");

        let error = combine_modules(interface, body).unwrap_err();
        assert!(format!("{error}").contains("declared as"));
    }
}
