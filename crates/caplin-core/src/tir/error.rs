//! Type Intermediate Representation (TIR) Error System
//!
//! This module defines the comprehensive error system used throughout the TIR
//! phase of compilation. It provides rich diagnostic information with source
//! code locations, helpful error messages, and suggested fixes.
//!
//! # Overview
//!
//! The TIR error system is built on top of the `miette` diagnostic framework,
//! providing:
//!
//! - **Rich Diagnostics**: Detailed error messages with source code snippets
//! - **Source Location Tracking**: Precise error locations with spans
//! - **Helpful Suggestions**: Contextual advice for fixing common errors
//! - **Error Collection**: Ability to collect and report multiple errors
//! - **Error Categories**: Organized error types for different compilation phases
//!
//! # Error Categories
//!
//! ## Import and Module Errors
//! - [`ImportNotFound`]: Missing module imports
//! - [`ModuleAlreadyImported`]: Duplicate module imports
//!
//! ## Type System Errors
//! - [`TypeNotFound`]: Undefined type references
//! - [`TypesDoNotMatch`]: Type mismatch in assignments/comparisons
//! - [`InvalidType`]: Malformed type declarations
//!
//! ## Definition Errors
//! - [`AlreadyDefined`]: Duplicate symbol definitions
//! - [`InterfaceFieldNotDefined`]: Missing interface implementations
//! - [`ExtraFieldInExtend`]: Invalid fields in extensions
//!
//! ## Access Control Errors
//! - [`ExtraAccessibilityIdentifier`]: Invalid visibility modifiers
//!
//! ## Structural Errors
//! - [`CircularReference`]: Circular type dependencies
//! - [`ErrorCollection`]: Multiple accumulated errors
//! - [`SyntaxError`]: Parser-level syntax errors
//!
//! # Usage
//!
//! ```ignore
//! use crate::tir::error::TirError;
//! 
//! // Create a type not found error with helpful suggestions
//! let error = TirError::type_not_found(
//!     &context,
//!     "UnknownType".to_string(),
//!     position,
//!     source_file
//! );
//! 
//! // The error system automatically suggests similar types
//! // and provides contextual help messages
//! ```
//!
//! # Design Principles
//!
//! 1. **User-Friendly**: Error messages are written for developers using Caplin
//! 2. **Actionable**: Each error includes suggestions for how to fix it
//! 3. **Precise**: Source locations pinpoint exactly where problems occur
//! 4. **Contextual**: Errors include relevant surrounding information
//! 5. **Extensible**: New error types can be easily added as the language grows

use std::ops::Range;

use strum_macros::{EnumDiscriminants, EnumProperty};

use caplin_macros::CaplinError;
use caplin_macros_core::{traits::LabeledSpan, SourceCode};

use crate::{file::SourceFile, tir::{combine::DeclarationError, resolver::ResolverError, TirContext}};

/// Error for when an imported module cannot be found.
///
/// This error occurs when a `use` statement references a module that doesn't
/// exist in the current compilation context. The error provides suggestions
/// for common fixes and lists similar module names if available.
///
/// # Common Causes
///
/// - Typo in module name
/// - Module not included in compilation
/// - Incorrect module path
/// - Missing module definition
///
/// # Example
///
/// ```caplin
/// use nonexistent.Module;  // Error: 'nonexistent' not found
/// ```
#[derive(Clone, Debug, thiserror::Error, CaplinError)]
#[error("'{module}' not found")]
#[diagnostic(code("caplin::error::import_not_found"), help("try to remove the import or check the module name"))]
pub struct ImportNotFound {
    /// The name of the module that could not be found
    pub module: String,

    /// Source location of the invalid import
    #[label("no external or internal module found with this name")]
    pub position: Range<usize>,
    
    /// Source code context for the error
    #[source_code]
    pub code: SourceCode
}

/// Default help message for type not found errors.
///
/// This message is used when no similar types are found to suggest.
/// It provides general guidance on how to resolve missing type errors.
pub static TYPE_NOT_FOUND_HELP: &str = "try to import the type, or maybe you need to define it in the current file";

/// Error for when a referenced type cannot be found.
///
/// This error occurs when code references a type that hasn't been defined
/// or imported. The error system automatically searches for similar type
/// names and provides helpful suggestions.
///
/// # Common Causes
///
/// - Typo in type name
/// - Missing import statement
/// - Type not defined in current scope
/// - Incorrect module qualification
///
/// # Smart Suggestions
///
/// The error system automatically suggests similar types by checking:
/// - Types ending with the same suffix
/// - Available types in the current context
/// - Imported module contents
///
/// # Example
///
/// ```caplin
/// func process(data: UnknownType) {}  // Error: 'UnknownType' type not found
/// ```
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{type_name}' type not found")]
#[diagnostic(code("caplin::error::type_not_found"))]
pub struct TypeNotFound {
    /// The name of the type that could not be found
    pub type_name: String,

    /// Source location of the type reference
    #[label("type is not imported or defined in the current file")]
    pub position: Range<usize>,
    
    /// Source code context for the error
    #[source_code]
    pub code: SourceCode,

    /// Contextual advice including similar type suggestions
    #[help]
    pub advice: String,
}

/// Error for when a module is imported multiple times.
///
/// This error prevents namespace pollution and ambiguity by ensuring
/// each module is only imported once per scope. It shows both import
/// locations to help identify which one should be removed.
///
/// # Example
///
/// ```caplin
/// use module.Class;
/// use module.Class;  // Error: Module already imported
/// ```
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[diagnostic(code("caplin::error::module_already_imported"), help("try to remove one of the import"))]
#[error("Module already defined")]
pub struct ModuleAlreadyImported {
    /// Location of the original import
    #[label("Already imported here")]
    pub old_position: Range<usize>,

    /// Location of the duplicate import
    #[label("But it is imported again here")]
    pub new_position: Range<usize>,

    /// Source code context showing both imports
    #[source_code]
    pub code: SourceCode,
}

/// Error for when a symbol (class, function, variable) is defined multiple times.
///
/// This error enforces unique naming within scopes, preventing ambiguous
/// symbol resolution. It shows both definition locations to help identify
/// the conflict.
///
/// # Common Cases
///
/// - Duplicate class names
/// - Duplicate function names  
/// - Duplicate variable names in same scope
/// - Conflicting import aliases
///
/// # Example
///
/// ```caplin
/// class Person {}
/// class Person {}  // Error: Already defined
/// ```
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("Already defined")]
#[diagnostic(code("caplin::error::already_imported"), help("change one of the names or remove the definition"))]
pub struct AlreadyDefined {
    /// Location of the original definition
    #[label("Already defined here")]
    pub old_position: Range<usize>,

    /// Location of the duplicate definition
    #[label("But it is defined again here")]
    pub new_position: Range<usize>,
    
    /// Source code context showing both definitions
    #[source_code]
    pub code: SourceCode,
}

/// Error for when `pub` visibility modifier is used inappropriately.
///
/// This error occurs when the `pub` keyword is used in contexts where
/// visibility modifiers are not allowed or meaningful.
///
/// # Invalid Usage
///
/// - `pub` on interface method signatures (interface methods are inherently public)
/// - `pub` on local variables
/// - `pub` in inappropriate contexts
///
/// # Example
///
/// ```caplin
/// interface Drawable {
///     pub func draw();  // Error: pub not allowed in interface
/// }
/// ```
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("Extra accessibility identifier")]
#[diagnostic(code("caplin::error::extra_accessibility_identifier"), help("remove pub"))]
pub struct ExtraAccessibilityIdentifier { 
    /// Location of the invalid `pub` keyword
    #[label("pub identifier is not allowed here")]
    pub position: Range<usize>,
    
    /// Source code context for the error
    #[source_code]
    pub code: SourceCode,
}

/// Location and source context for one side of an accessibility violation.
#[derive(Clone, Debug)]
pub struct AccessibilityLocation {
    pub position: Range<usize>,
    pub code: SourceCode,
}

/// Error for importing a private (non-public) item from another module.
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{item_name}' is not accessible from outside its module")]
#[diagnostic(code("caplin::error::accessibility_violation"), help("mark the item as pub to make it importable"))]
pub struct AccessibilityViolation {
    pub item_name: String,

    /// Location of the offending import
    #[label("imported here, but not marked pub at its definition")]
    pub import_position: Range<usize>,

    /// Source code context for the import site
    #[source_code]
    pub code: SourceCode,

    /// Location and source of the offending import, mirrors `import_position`/`code`
    pub import_info: AccessibilityLocation,

    /// Location and source of the item's definition
    pub item_info: AccessibilityLocation,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("Invalid type")]
#[diagnostic(code("caplin::error::invalid_type"))]
pub struct InvalidType {
    #[label(collection, "")]
    pub position: Vec<LabeledSpan>,
    
    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("Circular reference detected")]
#[diagnostic(code("caplin::error::circular_reference"), help("to fix this, you need to remove the circular reference"))]
pub struct CircularReference {
    #[label("Has a circular reference here")]
    pub position: Range<usize>,
    
    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("ooops, multiple errors detected")]
pub struct ErrorCollection {
    #[errors]
    pub errors: Vec<TirError>
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("{} syntax error(s) detected", .errors.len())]
pub struct SyntaxError {
    #[errors]
    pub errors: Vec<SyntaxErrorItem>
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("Syntax error")]
pub struct SyntaxErrorItem {
    #[label("{message}")]
    pub position: Range<usize>,
    
    #[source_code]
    pub code: SourceCode,

    pub message: &'static str,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("Interface field(s) not defined")]
#[diagnostic(code("caplin::error::interface_field_not_defined"), help("to fix this, you need to define field(s) in the interface"))]
pub struct InterfaceFieldNotDefined { 
    #[label("Interface field(s) not defined here")]
    pub position: Range<usize>,
    
    #[source_code]
    pub code: SourceCode,
 }

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("Types do not match")]
#[diagnostic(code("caplin::error::types_do_not_match"), help("to fix this, you need to change the type(s) to match"))]
pub struct TypesDoNotMatch {
    #[label("This type not matching")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode
}

#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("Extra field in interface")]
#[diagnostic(code("caplin::error::extra_field_in_interface"), help("remove the field(s) not defined in the interface"))]
pub struct ExtraFieldInExtend {
    #[label("This field is not defined in the extend")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

/// A linear binding reaches the end of its scope without being consumed.
///
/// Every binding whose type lives in the `Linear` universe must be passed to
/// a function, destructured, or otherwise consumed exactly once along every
/// path out of its scope. This error fires when a path drops it silently.
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{binding_name}' is linear and was never consumed")]
#[diagnostic(code("caplin::error::value_not_consumed"), help("consume the value exactly once, or prefix the binding with an explicit 'forget' if that is intended"))]
pub struct ValueNotConsumed {
    pub binding_name: String,

    #[label("declared here but never consumed on this path")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

/// A linear binding is consumed more than once on the same control-flow path.
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{binding_name}' was already consumed")]
#[diagnostic(code("caplin::error::value_consumed_twice"), help("a linear value can only be used once; remove the extra use"))]
pub struct ValueConsumedTwice {
    pub binding_name: String,

    #[label("consumed again here")]
    pub position: Range<usize>,

    #[label("already consumed here")]
    pub old_position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

/// Two branches of a conditional disagree about whether a linear binding was consumed.
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("'{binding_name}' is consumed on one branch but not the other")]
#[diagnostic(code("caplin::error::inconsistent_consumption"), help("consume the value on every branch, or on none of them"))]
pub struct InconsistentConsumption {
    pub binding_name: String,

    #[label("the branches leave this binding in different consumption states")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

/// A typeclass instance applies to an argument shape already covered by another instance.
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("overlapping instance for '{typeclass_name}'")]
#[diagnostic(code("caplin::error::overlapping_instance"), help("only one instance may cover a given argument shape"))]
pub struct OverlappingInstance {
    pub typeclass_name: String,

    #[label("this instance overlaps with an earlier one")]
    pub position: Range<usize>,

    #[label("earlier instance defined here")]
    pub old_position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

/// A typeclass (`interface`) declares more than one type parameter.
#[derive(Clone, Debug, CaplinError, thiserror::Error)]
#[error("typeclasses may only bind a single type parameter")]
#[diagnostic(code("caplin::error::multi_argument_typeclass"), help("split this into separate single-parameter typeclasses"))]
pub struct MultiArgumentTypeclass {
    #[label("declares more than one type parameter here")]
    pub position: Range<usize>,

    #[source_code]
    pub code: SourceCode,
}

#[derive(Clone, Debug, CaplinError, thiserror::Error, EnumDiscriminants, EnumProperty)]
pub enum TirError {
    #[error("Temporary error")]
    #[diagnostic(code("Temporary error"))]
    TemporaryError,

    #[error(transparent)]
    #[diagnostic(transparent)]
    ImportNotFound(Box<ImportNotFound>),
    
    #[error(transparent)]
    #[diagnostic(transparent)]
    ModuleAlreadyImported(Box<ModuleAlreadyImported>),
    
    #[error(transparent)]
    #[diagnostic(transparent)]
    TypeNotFound(Box<TypeNotFound>),
    
    #[error(transparent)]
    #[diagnostic(transparent)]
    AlreadyDefined(Box<AlreadyDefined>),
    
    #[error(transparent)]
    #[diagnostic(transparent)]
    ExtraAccessibilityIdentifier(Box<ExtraAccessibilityIdentifier>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    AccessibilityViolation(Box<AccessibilityViolation>),
    
    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidType(Box<InvalidType>),
    
    #[error(transparent)]
    #[diagnostic(transparent)]
    InterfaceFieldNotDefined(Box<InterfaceFieldNotDefined>),
    
    #[error(transparent)]
    #[diagnostic(transparent)]
    TypesDoNotMatch(Box<TypesDoNotMatch>),
    
    #[error(transparent)]
    #[diagnostic(transparent)]
    ExtraFieldInExtend(Box<ExtraFieldInExtend>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ValueNotConsumed(Box<ValueNotConsumed>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ValueConsumedTwice(Box<ValueConsumedTwice>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    InconsistentConsumption(Box<InconsistentConsumption>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    OverlappingInstance(Box<OverlappingInstance>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    MultiArgumentTypeclass(Box<MultiArgumentTypeclass>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    DeclarationError(#[from] Box<DeclarationError>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ResolverError(#[from] Box<ResolverError>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    CircularReference(#[from] Box<CircularReference>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    ErrorCollection(#[from] Box<ErrorCollection>),

    #[error(transparent)]
    #[diagnostic(transparent)]
    SyntaxError(#[from] Box<SyntaxError>),
}

impl TirError {
    pub fn already_defined(new_position: Range<usize>, old_position: Range<usize>, source: SourceFile) -> Self {
        TirError::AlreadyDefined(AlreadyDefined {
            new_position,
            old_position,
            code: source.into(),
        }.into())
    }

    pub fn accessibility_violation(name: String, import_position: Range<usize>, import_source: SourceFile, item_position: Range<usize>, item_source: SourceFile) -> Self {
        let import_code: SourceCode = import_source.into();
        let item_code: SourceCode = item_source.into();

        TirError::AccessibilityViolation(AccessibilityViolation {
            item_name: name,
            import_position: import_position.clone(),
            code: import_code.clone(),
            import_info: AccessibilityLocation { position: import_position, code: import_code },
            item_info: AccessibilityLocation { position: item_position, code: item_code },
        }.into())
    }

    pub fn interface_field_not_defined(position: Range<usize>, source: SourceFile) -> Self {
        TirError::InterfaceFieldNotDefined(InterfaceFieldNotDefined {
            position,
            code: source.into(),
        }.into())
    }

    pub fn types_do_not_match(position: Range<usize>, source: SourceFile) -> Self {
        TirError::TypesDoNotMatch(TypesDoNotMatch {
            position,
            code: source.into(),
        }.into())
    }

    pub fn extra_accessibility_identifier(position: Range<usize>, source: SourceFile) -> Self {
        TirError::ExtraAccessibilityIdentifier(ExtraAccessibilityIdentifier {
            position,
            code: source.into(),
        }.into())
    }

    pub fn extra_field_in_extend(position: Range<usize>, source: SourceFile) -> Self {
        TirError::ExtraFieldInExtend(ExtraFieldInExtend {
            position,
            code: source.into(),
        }.into())
    }

    pub fn circular_reference(position: Range<usize>, source: SourceFile) -> Self {
        TirError::CircularReference(CircularReference {
            position,
            code: source.into(),
        }.into())
    }

    pub fn type_not_found(context: &TirContext, missing_type_name: String, position: Range<usize>, source: SourceFile) -> Self {

        let mut similar_types = Vec::new();

        for (type_name, _) in context.types_scope.iter() {
            if type_name.ends_with(missing_type_name.as_str()) {
                similar_types.push(type_name.to_string());
            }
        }
        
        let advice = if !similar_types.is_empty() {
            let type_list = similar_types.iter().map(|item| format!(" - {item}")).collect::<Vec<_>>().join("\n");
            format!("The following types are similar:\n{type_list}")
        } else {
            TYPE_NOT_FOUND_HELP.to_string()
        };

        TirError::TypeNotFound(TypeNotFound {
            position,
            code: source.into(),
            type_name: missing_type_name,
            advice,
        }.into())
    }

    pub fn invalid_type(position: Range<usize>, message: &str, source: SourceFile) -> Self {
        TirError::InvalidType(InvalidType {
            position: vec![LabeledSpan::new(message.to_string(), position)],
            code: source.into(),
        }.into())
    }

    pub fn value_not_consumed(binding_name: String, position: Range<usize>, source: SourceFile) -> Self {
        TirError::ValueNotConsumed(ValueNotConsumed {
            binding_name,
            position,
            code: source.into(),
        }.into())
    }

    pub fn value_consumed_twice(binding_name: String, position: Range<usize>, old_position: Range<usize>, source: SourceFile) -> Self {
        TirError::ValueConsumedTwice(ValueConsumedTwice {
            binding_name,
            position,
            old_position,
            code: source.into(),
        }.into())
    }

    pub fn inconsistent_consumption(binding_name: String, position: Range<usize>, source: SourceFile) -> Self {
        TirError::InconsistentConsumption(InconsistentConsumption {
            binding_name,
            position,
            code: source.into(),
        }.into())
    }

    pub fn overlapping_instance(typeclass_name: String, position: Range<usize>, old_position: Range<usize>, source: SourceFile) -> Self {
        TirError::OverlappingInstance(OverlappingInstance {
            typeclass_name,
            position,
            old_position,
            code: source.into(),
        }.into())
    }

    pub fn multi_argument_typeclass(position: Range<usize>, source: SourceFile) -> Self {
        TirError::MultiArgumentTypeclass(MultiArgumentTypeclass {
            position,
            code: source.into(),
        }.into())
    }

    pub fn multiple_errors(errors: Vec<TirError>) -> Self {
        TirError::ErrorCollection(ErrorCollection {
            errors
        }.into())
    }

    pub fn syntax_error(errors: Vec<SyntaxErrorItem>) -> Self {
        TirError::SyntaxError(SyntaxError {
            errors
        }.into())
    }
}
