use gql_typegen_types::{Language, OffsetRange};
use swc_common::input::StringInput;
use swc_common::{BytePos, Span};
use swc_core::ecma::ast::{EsVersion, Program};
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::{EsSyntax, Parser, Syntax, TsSyntax};

/// Position of the first byte; `BytePos(0)` is reserved for dummy spans.
const START: BytePos = BytePos(1);

/// A parsed TypeScript or JavaScript source together with its text.
pub struct ParsedSource<'a> {
    source: &'a str,
    program: Program,
}

impl<'a> ParsedSource<'a> {
    /// Parse `source` as a module or script.
    ///
    /// Returns `None` when the text does not parse; such files are skipped
    /// without a diagnostic.
    #[tracing::instrument(level = "debug", skip(source), fields(len = source.len()))]
    pub fn parse(source: &'a str, language: Language) -> Option<Self> {
        let end = u32::try_from(source.len())
            .ok()
            .and_then(|len| len.checked_add(START.0))?;
        let input = StringInput::new(source, START, BytePos(end));
        let lexer = Lexer::new(syntax(language), EsVersion::EsNext, input, None);
        let mut parser = Parser::new_from(lexer);

        match parser.parse_program() {
            Ok(program) => Some(Self { source, program }),
            Err(error) => {
                tracing::debug!(error = ?error.kind(), "Skipping unparseable source");
                None
            }
        }
    }

    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Byte offset into the source of a parser position.
    #[must_use]
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(START.0) as usize
    }

    #[must_use]
    pub fn range(&self, span: Span) -> OffsetRange {
        OffsetRange::new(self.offset(span.lo), self.offset(span.hi))
    }

    /// Source text between the delimiters of a string or template literal
    /// spanning `span`, with the offset at which it starts. Escapes are left
    /// as written.
    #[must_use]
    pub fn literal_source(&self, span: Span) -> Option<(&'a str, usize)> {
        let range = self.range(span);
        if range.len() < 2 {
            return None;
        }
        let start = range.start + 1;
        let raw = self.source.get(start..range.end - 1)?;
        Some((raw, start))
    }
}

fn syntax(language: Language) -> Syntax {
    match language {
        Language::TypeScript | Language::Tsx => Syntax::Typescript(TsSyntax {
            tsx: language == Language::Tsx,
            decorators: true,
            ..TsSyntax::default()
        }),
        Language::JavaScript => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..EsSyntax::default()
        }),
    }
}
