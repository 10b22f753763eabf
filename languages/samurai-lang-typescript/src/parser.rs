//! Import declaration extraction using SWC
//!
//! Only top-level declarations are inspected. Dynamic `import()` calls and
//! `require()` are not module-structure imports and are left alone.

use samurai_foundation::{ImportKind, ImportStatement, SamuraiError, SamuraiResult};
use std::path::Path;
use swc_common::{sync::Lrc, FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::{ModuleDecl, ModuleItem, Str};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};
use tracing::debug;

const BOM: char = '\u{feff}';

/// Which declarations carry module specifiers worth reporting
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Report `export … from '…'` alongside imports
    pub include_reexports: bool,
}

/// Parse `source` and return its import declarations in document order.
///
/// A syntax error anywhere in the file is fatal: a partial tree cannot be
/// trusted to expose every import.
pub fn parse_imports(
    path: &Path,
    source: &str,
    options: ParseOptions,
) -> SamuraiResult<Vec<ImportStatement>> {
    // Spans index the text after the BOM
    let (bom_len, body) = match source.strip_prefix(BOM) {
        Some(rest) => (BOM.len_utf8(), rest),
        None => (0, source),
    };

    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Real(path.to_path_buf()).into(),
        body.to_string(),
    );

    let is_tsx = path.extension().and_then(|ext| ext.to_str()) == Some("tsx");
    let lexer = Lexer::new(
        Syntax::Typescript(TsSyntax {
            tsx: is_tsx,
            decorators: true,
            ..Default::default()
        }),
        Default::default(),
        StringInput::from(&*fm),
        None,
    );
    let mut parser = Parser::new_from(lexer);

    let module = parser.parse_module().map_err(|e| {
        let loc = cm.lookup_char_pos(e.span().lo);
        SamuraiError::parse(
            path,
            format!("{}:{}: {:?}", loc.line, loc.col_display + 1, e.kind()),
        )
    })?;

    // Recovered errors still mean the source is invalid
    if let Some(e) = parser.take_errors().into_iter().next() {
        let loc = cm.lookup_char_pos(e.span().lo);
        return Err(SamuraiError::parse(
            path,
            format!("{}:{}: {:?}", loc.line, loc.col_display + 1, e.kind()),
        ));
    }

    let base = fm.start_pos.0;
    let mut imports = Vec::new();

    for item in &module.body {
        let ModuleItem::ModuleDecl(decl) = item else {
            continue;
        };

        let found: Option<(&Str, ImportKind)> = match decl {
            ModuleDecl::Import(import) => Some((&*import.src, ImportKind::Import)),
            ModuleDecl::ExportAll(export) if options.include_reexports => {
                Some((&*export.src, ImportKind::ReExport))
            }
            ModuleDecl::ExportNamed(export) if options.include_reexports => {
                export.src.as_deref().map(|src| (src, ImportKind::ReExport))
            }
            _ => None,
        };

        if let Some((src, kind)) = found {
            imports.push(literal_statement(path, source, base, bom_len, src.span, kind)?);
        }
    }

    debug!(
        file = %path.display(),
        count = imports.len(),
        "Parsed import declarations"
    );

    Ok(imports)
}

fn literal_statement(
    path: &Path,
    source: &str,
    base: u32,
    bom_len: usize,
    span: Span,
    kind: ImportKind,
) -> SamuraiResult<ImportStatement> {
    let start = (span.lo.0 - base) as usize + bom_len;
    let end = (span.hi.0 - base) as usize + bom_len;

    let literal = source
        .get(start..end)
        .filter(|text| is_quoted(text))
        .ok_or_else(|| {
            SamuraiError::parse(
                path,
                format!("module specifier span {}..{} does not cover a string literal", start, end),
            )
        })?;

    Ok(ImportStatement {
        literal: literal.to_string(),
        start,
        end,
        terminated: source.as_bytes().get(end) == Some(&b';'),
        kind,
    })
}

fn is_quoted(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 2
        && bytes[0] == bytes[bytes.len() - 1]
        && (bytes[0] == b'\'' || bytes[0] == b'"')
}
