//! The parts of a source the patcher treats differently: leading
//! comments, the statement body, heredoc bodies and the data segment.

use peek_ir::Span;
use peek_lexer::LexOutput;
use peek_parse::ParseOutput;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Regions<'a> {
    /// First statement start to last statement end. `None` without
    /// statements. Everything before it is leading comments and blanks.
    pub body: Option<Span>,
    /// Start of the `__END__` line, if any. Everything from here on is
    /// copied verbatim.
    pub data_segment: Option<u32>,
    /// End of the lexed source: the data segment or the source end.
    pub code_end: u32,
    pub heredoc_bodies: &'a [Span],
}

impl<'a> Regions<'a> {
    pub(crate) fn new(lexed: &'a LexOutput, parsed: &ParseOutput) -> Self {
        let body = parsed
            .root
            .is_valid()
            .then(|| parsed.arena.span(parsed.root));
        Regions {
            body,
            data_segment: lexed.data_segment,
            code_end: lexed.code_end(),
            heredoc_bodies: &lexed.heredoc_bodies,
        }
    }

    /// Whether `offset` falls inside a displaced heredoc body.
    pub(crate) fn in_heredoc_body(&self, offset: u32) -> bool {
        self.heredoc_bodies.iter().any(|body| body.contains(offset))
    }
}
