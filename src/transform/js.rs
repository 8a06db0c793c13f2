//! JavaScript transpiling and minification using oxc.
//!
//! Sources are parsed as classic scripts: browser bundles share the global
//! scope, so top-level names must survive mangling.

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::diagnostics::OxcDiagnostic;
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use oxc::span::SourceType;
use oxc::transformer::{TransformOptions, Transformer};

/// Check that `target` is a target oxc understands, e.g. `es2015`.
pub fn check_target(target: &str) -> Result<()> {
    TransformOptions::from_target(target).map_err(|e| anyhow!(e))?;
    Ok(())
}

/// Lower `source` to the syntax level of `target`.
pub fn transpile(source: &str, path: &Path, target: &str) -> Result<String> {
    let options = TransformOptions::from_target(target).map_err(|e| anyhow!(e))?;

    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if !ret.errors.is_empty() {
        bail!(join_diagnostics(&ret.errors));
    }
    let mut program = ret.program;

    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();
    let ret = Transformer::new(&allocator, path, &options).build_with_scoping(scoping, &mut program);
    if !ret.errors.is_empty() {
        bail!(join_diagnostics(&ret.errors));
    }

    Ok(Codegen::new().build(&program).code)
}

/// Compress and mangle `source`.
pub fn minify(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if !ret.errors.is_empty() {
        bail!(join_diagnostics(&ret.errors));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

fn join_diagnostics(errors: &[OxcDiagnostic]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpile_lowers_newer_syntax() {
        let out = transpile("var x = a ?? 1;\nvar y = b ** 2;", Path::new("main.js"), "es2015")
            .unwrap();
        assert!(!out.contains("??"));
        assert!(!out.contains("**"));
        assert!(out.contains("Math.pow"));
    }

    #[test]
    fn test_transpile_keeps_modern_syntax_for_modern_target() {
        let out = transpile("const f = (a) => a ?? 1;", Path::new("main.js"), "es2020").unwrap();
        assert!(out.contains("??"));
    }

    #[test]
    fn test_transpile_syntax_error() {
        assert!(transpile("function (", Path::new("main.js"), "es2015").is_err());
    }

    #[test]
    fn test_check_target() {
        assert!(check_target("es2015").is_ok());
        assert!(check_target("not-a-target").is_err());
    }

    #[test]
    fn test_minify_keeps_globals() {
        let out = minify("function greet(name) {\n  var message = 'hi ' + name;\n  return message;\n}\n")
            .unwrap();
        assert!(out.contains("greet"));
        assert!(!out.contains("message"));
    }

    #[test]
    fn test_minify_syntax_error() {
        assert!(minify("let = ;").is_err());
    }
}
