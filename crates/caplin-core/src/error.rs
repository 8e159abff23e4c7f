//! Error handling and reporting for the Caplin language compiler.
//!
//! This module provides comprehensive error handling infrastructure including:
//! - Type aliases for parse and TIR results
//! - Error reporting using `codespan-reporting` for rich diagnostics
//! - Parser error conversion utilities
//! - Integration with the Caplin error trait system

use codespan_reporting::{diagnostic::{Diagnostic, Label}, files::SimpleFiles, term::{self, termcolor::StandardStream}};
use caplin_macros_core::traits::CaplinErrorTrait;
use nom_language::error::VerboseErrorKind;
use simplelog::ColorChoice;
use crate::{
    ast::FileAst,
    nom_tools::{State, ToRange},
    tir::{error::SyntaxErrorItem, TirContext, TirError},
};

/// File extension for Caplin language source files
pub static CAPLIN_LANG_EXT: &str = "cap";

/// Error type for parsing operations using nom combinators
pub type ParseError<'base> = nom_language::error::VerboseError<nom_locate::LocatedSpan<&'base str, State>>;

/// Result type for parsing operations that returns the remaining input and parsed AST
pub type ParseResult<'base> = Result<(nom_locate::LocatedSpan<&'base str, State>, FileAst<'base>), ParseError<'base>>;

/// Result type for TIR (Type Intermediate Representation) operations
pub type TirResult<'base> = Result<TirContext<'base>, TirError>;



/// Trait for generating error reports from TIR errors
pub trait ReportGenerator {
    /// Generate a formatted error report for the given TIR error
    fn generate(error: TirError);
}

/// Error report generator using the `codespan-reporting` library for rich diagnostics
pub struct CodeSpanReportGenerator;

impl CodeSpanReportGenerator {
    /// Internal helper to recursively generate diagnostics for errors and their references
    fn inner_generate(files: &mut SimpleFiles<String, String>, diagnostics: &mut Vec<Diagnostic<usize>>, error: &dyn CaplinErrorTrait) {
        let mut diagnostic: Diagnostic<usize> = Diagnostic::error().with_message(error.to_string());

        if let Some(source_code) = error.source_code()  {
            let file_id = files.add(format!("{}.{}", source_code.name, CAPLIN_LANG_EXT), source_code.source);
            
             if let Some(labels) = error.labels() {
                let labels = labels.into_iter().map(|label| Label::primary(file_id, label.position).with_message(label.label)).collect::<Vec<_>>();
                diagnostic = diagnostic.with_labels(labels);
            }
        }

        if let Some(help) = error.help() {
            diagnostic = diagnostic.with_notes(vec![help.to_string()]);
        }

        diagnostics.push(diagnostic);

        if let Some(references) = error.references() {
            for reference in references.into_iter() {
                Self::inner_generate(files, diagnostics, *reference);
            }   
        }

        if let Some(errors) = error.errors() {
            for inner_error in errors {
                Self::inner_generate(files, diagnostics, inner_error);
            }
        }
    }
}

impl ReportGenerator for CodeSpanReportGenerator {
    fn generate(error: TirError) {
        let mut diagnostics = Vec::new();
        let mut files = SimpleFiles::new();

        Self::inner_generate(&mut files, &mut diagnostics, &error);

        let writer = StandardStream::stderr(ColorChoice::Always);
        let config = codespan_reporting::term::Config::default();

        for diagnostic in diagnostics.into_iter() {
            term::emit(&mut writer.lock(), &config, &files, &diagnostic).unwrap();
        }
    }
}

/// One flattened diagnostic entry in a `--report=json` document.
#[derive(Debug, serde::Serialize)]
pub struct JsonDiagnostic {
    pub message: String,
    pub code: Option<String>,
    pub help: Option<String>,
    pub file: Option<String>,
    pub labels: Vec<JsonLabel>,
}

/// A single labeled source range within a [`JsonDiagnostic`].
#[derive(Debug, serde::Serialize)]
pub struct JsonLabel {
    pub message: String,
    pub start: usize,
    pub end: usize,
}

/// Error report generator that serializes the same diagnostic surface
/// [`CodeSpanReportGenerator`] renders to the terminal as JSON, for
/// `--report=json`.
pub struct JsonReportGenerator;

impl JsonReportGenerator {
    fn inner_generate(diagnostics: &mut Vec<JsonDiagnostic>, error: &dyn CaplinErrorTrait) {
        let source_code = error.source_code();
        let labels = match (&source_code, error.labels()) {
            (Some(_), Some(labels)) => labels.into_iter().map(|label| JsonLabel { message: label.label, start: label.position.start, end: label.position.end }).collect(),
            _ => Vec::new(),
        };

        diagnostics.push(JsonDiagnostic {
            message: error.to_string(),
            code: error.error_code().map(|code| code.to_string()),
            help: error.help().map(|help| help.to_string()),
            file: source_code.map(|source_code| source_code.name.clone()),
            labels,
        });

        if let Some(references) = error.references() {
            for reference in references.into_iter() {
                Self::inner_generate(diagnostics, *reference);
            }
        }

        if let Some(errors) = error.errors() {
            for inner_error in errors {
                Self::inner_generate(diagnostics, inner_error);
            }
        }
    }

    /// Builds the full diagnostic list for `error` without printing it,
    /// for callers that want to embed it in a larger JSON document.
    pub fn diagnostics(error: &TirError) -> Vec<JsonDiagnostic> {
        let mut diagnostics = Vec::new();
        Self::inner_generate(&mut diagnostics, error);
        diagnostics
    }
}

impl ReportGenerator for JsonReportGenerator {
    fn generate(error: TirError) {
        let diagnostics = Self::diagnostics(&error);
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(error) => eprintln!("failed to serialize diagnostics: {error}"),
        }
    }
}

/// Converts parser results into TIR-compatible results, handling parser errors
/// 
/// Takes a parser result and either returns the parsed AST or converts
/// parser errors into TIR syntax errors with proper source location information.
#[allow(clippy::result_unit_err)]
pub fn handle_parser(result: ParseResult<'_>) -> Result<FileAst<'_>, TirError> {
    match result {
        Ok((_, parsed)) => Ok(parsed),
    Err(error) => {
        let mut errors =  Vec::new();
            error.errors.iter().for_each(|(span, error_kind)| {
                if let VerboseErrorKind::Context(error_message) = error_kind {
                    errors.push(SyntaxErrorItem {
                        position: span.to_range(),
                        code: (&span.extra.file).into(),
                        message: error_message
                    });
                }
            });
            Err(TirError::syntax_error(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use nom::Finish;

    use crate::{file::SourceFile, nom_tools::State, parser};

    use super::handle_parser;

    #[test]
    #[should_panic]
    fn error_test() {
        let source_file = SourceFile::new(vec!["<memory>".into()], "interface Myinterface : erhan {".to_string());

        let state = State {
            file: source_file.clone(),
            indexer: Default::default(),
        };

        let response = parser::parse(&state).finish();
        handle_parser(response).unwrap();
    }
}
