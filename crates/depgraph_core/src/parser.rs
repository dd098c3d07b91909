use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_parser::{ParseOptions, Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::{fs, path::Path};

use crate::{
    error::AnalysisError,
    types::{SpecKind, Specifier},
};

/// Reads and parses `file`, returning its raw module specifiers.
///
/// JavaScript files that do not parse as modules are retried as scripts, so
/// CommonJS relying on sloppy-mode syntax still contributes its `require`s.
/// Recoverable diagnostics are ignored; only files that cannot be read or
/// that the parser gives up on are reported as errors.
pub fn imports_for(file: &Path) -> Result<Vec<Specifier>, AnalysisError> {
    trace!("Parsing file for imports: {}", file.display());
    let src = fs::read_to_string(file)
        .map_err(|source| AnalysisError::Io { path: file.to_path_buf(), source })?;

    let allocator = Allocator::default();
    let source_type = source_type_for(file);
    let mut ret = parse(&allocator, &src, source_type);
    if ret.panicked && source_type.is_javascript() {
        debug!("Retrying {} as a script", file.display());
        ret = parse(&allocator, &src, source_type.with_script(true));
    }

    let ParserReturn { program, errors, panicked, .. } = ret;
    if panicked {
        let message = errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "parser aborted".to_string());
        return Err(AnalysisError::Parse { path: file.to_path_buf(), message });
    }
    if !errors.is_empty() {
        debug!("Recovered from {} parse diagnostics in {}", errors.len(), file.display());
    }

    let specs = extract_specifiers(&program);
    debug!("Found {} import specifiers in {}", specs.len(), file.display());
    Ok(specs)
}

fn parse<'a>(
    allocator: &'a Allocator,
    src: &'a str,
    source_type: SourceType,
) -> ParserReturn<'a> {
    // CommonJS entry points may `return` at the top level
    let options = ParseOptions { allow_return_outside_function: true, ..ParseOptions::default() };
    OxcParser::new(allocator, src, source_type).with_options(options).parse()
}

/// Collects specifiers from import declarations, then export-from
/// declarations, then `require('...')` calls anywhere in the program.
pub fn extract_specifiers(program: &Program<'_>) -> Vec<Specifier> {
    let mut imports: Vec<Specifier> = Vec::new();
    let mut re_exports: Vec<Specifier> = Vec::new();

    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                trace!("Found import: '{}'", decl.source.value);
                imports.push(Specifier {
                    request: decl.source.value.to_string(),
                    kind: SpecKind::Import,
                });
            }
            Statement::ExportNamedDeclaration(decl) => {
                // `export { a }` and `export const a = ...` have no source module
                if let Some(source) = &decl.source {
                    trace!("Found re-export: '{}'", source.value);
                    re_exports.push(Specifier {
                        request: source.value.to_string(),
                        kind: SpecKind::ReExport,
                    });
                }
            }
            Statement::ExportAllDeclaration(decl) => {
                trace!("Found re-export: '{}'", decl.source.value);
                re_exports.push(Specifier {
                    request: decl.source.value.to_string(),
                    kind: SpecKind::ReExport,
                });
            }
            _ => {}
        }
    }

    let mut requires = RequireCollector::default();
    requires.visit_program(program);

    imports.extend(re_exports);
    imports.extend(requires.specs);
    imports
}

#[derive(Default)]
struct RequireCollector {
    specs: Vec<Specifier>,
}

impl<'a> Visit<'a> for RequireCollector {
    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        if let Expression::Identifier(callee) = &it.callee
            && callee.name.as_str() == "require"
            && let Some(Expression::StringLiteral(sl)) =
                it.arguments.first().and_then(|arg| arg.as_expression())
        {
            trace!("Found require() call: '{}'", sl.value);
            self.specs.push(Specifier { request: sl.value.to_string(), kind: SpecKind::Require });
        }
        // Nested calls, e.g. `wrap(require('./a'))`
        walk::walk_call_expression(self, it);
    }
}

fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    SourceType::default()
        .with_module(true)
        .with_typescript(matches!(ext, Some("ts") | Some("tsx")))
        // Plain `.js` files routinely carry JSX in React projects
        .with_jsx(matches!(ext, Some("tsx") | Some("jsx") | Some("js")))
}
