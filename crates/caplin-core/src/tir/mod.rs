//! Type Intermediate Representation (TIR) for the Caplin language compiler.
//!
//! The TIR module implements the semantic analysis phase of the Caplin compiler,
//! transforming the Abstract Syntax Tree (AST) into a type-checked intermediate
//! representation with full semantic information.
//!
//! # Architecture Overview
//!
//! The TIR system operates in two main phases:
//!
//! ## 1. Resolve Phase
//! - **Signature Building**: Collect all type signatures, function signatures, and module declarations
//! - **Symbol Tables**: Build lookup tables for efficient name resolution
//! - **Forward Declarations**: Handle forward references and circular dependencies
//! - **Module System**: Process `use` statements and build module hierarchy
//!
//! ## 2. Finish Phase  
//! - **Type Checking**: Verify all type relationships and constraints
//! - **Implementation Validation**: Ensure interface implementations are complete
//! - **Cross-References**: Validate references between modules and types
//! - **Error Collection**: Gather and report semantic errors
//!
//! # Key Components
//!
//! - [`TirContext`] - Global compilation state and symbol tables
//! - [`signature`] - Type and function signature management
//! - [`resolver`] - Two-phase semantic analysis implementation
//! - [`object_signature`] - Type system and primitive type definitions
//! - [`scope`] - Hierarchical scope management for variables and types
//! - [`module`] - Module system and import/export handling
//! - [`error`] - Rich error reporting with source locations
//!
//! # Type System
//!
//! The type system supports:
//! - **Primitive types**: Integers, floats, booleans, strings
//! - **Nullable types**: Optional values with `?` syntax
//! - **Reference types**: Memory references with `ref` keyword  
//! - **Classes and interfaces**: Object-oriented programming constructs
//! - **Generic types**: Parameterized types (planned)
//!
//! # Usage
//!
//! The main entry point is the [`build`] function which takes parsed AST files
//! and produces a fully type-checked [`TirContext`]:
//!
//! ```ignore
//! let files: Vec<Rc<FileAst>> = // ... parsed files
//! let tir_context = tir::build(files)?;
//! ```

use std::rc::Rc;

use ast_signature::{build_module, AstSignatureValue};
pub use context::TirContext;
pub use error::TirError;
use module::{Module, ModuleRef};
pub use object_signature::{PrimitiveType, TypeValue};
use resolver::{build_file, AstSignatureLocation, ObjectLocation, ResolveAst, TypeLocation};
use scope::ScopeLocation;
use signature::{Signature, SignatureHolder, SignaturePath};

use crate::{ast::{FileAst, FileStatementAst}, file::SourceFile, tir::{ast_signature::AstSignatureValueDiscriminants, object_signature::TypeValueDiscriminants}};

pub mod accessibility;
mod ast_signature;
pub mod combine;
mod context;
pub mod hir;
//pub mod error;
pub mod error;
pub mod linearity;
mod module;
pub mod monomorphize;
mod object_signature;
mod resolver;
mod signature;
mod scope;
pub mod typeclass;
pub mod universe;


/// Type alias for AST-based signatures used during the resolve phase
/// 
/// These signatures represent function and class declarations as they appear
/// in the AST, before full type resolution has occurred.
pub type AstSignature<'base> = Signature<AstSignatureValue<'base>, ModuleRef<'base>>;

/// Type alias for AST signature holders that manage signature collections
/// 
/// Provides efficient lookup and storage for AST signatures during compilation.
pub type AstSignatureHolder<'base> = SignatureHolder<'base, AstSignatureValue<'base>, AstSignatureValueDiscriminants, AstSignatureLocation, ModuleRef<'base>>;

/// Type alias for fully resolved type signatures
/// 
/// These signatures represent complete type information after semantic analysis,
/// including resolved references and validated type relationships.
pub type TypeSignature<'base> = Signature<TypeValue<'base>, TypeLocation>;

/// Type alias for type signature holders that manage type collections
/// 
/// Provides efficient lookup and storage for resolved type signatures.
pub type TypeSignatureHolder<'base> = SignatureHolder<'base, TypeValue<'base>, TypeValueDiscriminants, TypeLocation, TypeLocation>;

/// Object location constant for the boolean `false` literal
/// 
/// This provides a stable reference to the false value in the type system.
pub static BOOL_FALSE_LOCATION: ObjectLocation = ObjectLocation(0);

/// Object location constant for the boolean `true` literal
/// 
/// This provides a stable reference to the true value in the type system.
pub static BOOL_TRUE_LOCATION: ObjectLocation = ObjectLocation(1);

/// Initializes the built-in primitive types in the TIR context
/// 
/// This function registers all primitive types (i8, u8, i16, u16, i32, u32, i64, u64,
/// float, bool, string, void) in the type signature table so they can be referenced
/// during type resolution. These types are considered part of the language's
/// standard library and are always available.
fn build_primitive_types(context: &mut TirContext<'_>) {
    context.types.add_signature(SignaturePath::borrowed("i8"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::I8), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("u8"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::U8), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("i16"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::I16), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("u16"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::U16), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("i32"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::I32), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("u32"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::U32), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("i64"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::I64), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("u64"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::U64), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("float"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::Float), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("bool"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::Bool), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("string"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::String), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
    context.types.add_signature(SignaturePath::borrowed("void"), TypeSignature::new(TypeValue::PrimitiveType(object_signature::PrimitiveType::Void), SourceFile::new(vec!["<standart>".into()], "<native-code>".to_string()), 0..0, None)).unwrap();
}

impl<'base> ResolveAst<'base> for FileStatementAst<'base> {
    fn resolve(&self, context: &mut TirContext<'base>, scope_location: ScopeLocation) -> Result<TypeLocation, TirError> {
        match self {
            FileStatementAst::Class(class_definition_ast) => class_definition_ast.resolve(context, scope_location),
            FileStatementAst::Function(function_definition_ast) => function_definition_ast.resolve(context, scope_location),
            FileStatementAst::Interface(interface_definition_ast) => interface_definition_ast.resolve(context, scope_location),
            FileStatementAst::Extend(extend_definition_ast) => extend_definition_ast.resolve(context, scope_location),
            FileStatementAst::Use(use_ast) => use_ast.resolve(context, scope_location),
        }
    }

    fn finish(&self, context: &mut TirContext<'base>, scope_location: ScopeLocation) -> Result<(), TirError> {
        match self {
            FileStatementAst::Class(class_definition_ast) => class_definition_ast.finish(context, scope_location),
            FileStatementAst::Function(function_definition_ast) => function_definition_ast.finish(context, scope_location),
            FileStatementAst::Interface(interface_definition_ast) => interface_definition_ast.finish(context, scope_location),
            FileStatementAst::Extend(extend_definition_ast) => extend_definition_ast.finish(context, scope_location),
            FileStatementAst::Use(use_ast) => use_ast.finish(context, scope_location),
        }
    }

    fn name(&self) -> std::borrow::Cow<'base, str> {
        match self {
            FileStatementAst::Class(class_definition_ast) => class_definition_ast.name(),
            FileStatementAst::Function(function_definition_ast) => function_definition_ast.name(),
            FileStatementAst::Interface(interface_definition_ast) => interface_definition_ast.name(),
            FileStatementAst::Extend(extend_definition_ast) => extend_definition_ast.name(),
            FileStatementAst::Use(use_ast) => use_ast.name(),
        }
    }
}

/// Builds the Type Intermediate Representation from parsed AST files
/// 
/// This is the main entry point for semantic analysis. It processes all source files
/// through the two-phase TIR compilation process:
/// 
/// 1. **Resolve Phase**: Builds signatures and symbol tables for all declarations
/// 2. **Finish Phase**: Performs type checking and validates all references
/// 
/// # Arguments
/// * `files` - Vector of parsed AST files to process
/// 
/// # Returns
/// * `Ok(TirContext)` - Complete type-checked compilation context
/// * `Err(TirError)` - Semantic analysis errors with source locations
/// 
/// # Process
/// 1. Initialize primitive types in the context
/// 2. Build module structure from file paths
/// 3. Resolve all signatures (classes, functions, interfaces)
/// 4. Finish phase validation and type checking
/// 5. Return completed context or collected errors
/// 
/// # Examples
/// ```ignore
/// let files = vec![ast_file1, ast_file2];
/// let tir_context = tir::build(files)?;
/// // tir_context now contains complete semantic information
/// ```
pub fn build(files: Vec<Rc<FileAst<'_>>>) -> Result<TirContext<'_>, TirError> {
    //let mut has_error = false;
    let mut context: TirContext<'_> = TirContext::default();

    /*log::debug!("Adding base module");
    let base_module = Module::phantom("<root>".into(), "<root>".into(), Rc::new(SourceFile::new(vec!["<memory>".into()], "")));
    build_module_signature(&mut context, base_module)?;*/
    build_primitive_types(&mut context);

    for ast in files.into_iter() {
        if let Err(error) = build_module(&mut context, ast.clone()) {
            if !context.errors.is_empty() {
                return Err(TirError::multiple_errors(context.errors.clone()));
            } else {
                return Err(error);
            }
            //has_error = true;
        }
    }

    #[allow(clippy::iter_kv_map)]
    let modules = context.modules.iter().map(|(_, module)| module.get_ref()).collect::<Vec<_>>(); 
    for module in modules.into_iter() {
        if let Err(error) = build_file(&mut context, module) {
            if !context.errors.is_empty() {
                return Err(TirError::multiple_errors(context.errors.clone()));
            } else {
                return Err(error);
            }
            //has_error = true;
        }
    }

    if !context.errors.is_empty() {
        return Err(TirError::multiple_errors(context.errors.clone()));
    }

    context.hir = hir::lower(&context.instantiations);

    Ok(context)
}
