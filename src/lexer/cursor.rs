use crate::token::SpanIndex;

#[derive(Debug, Clone, Copy)]
pub struct SourceChar {
    pub value: char,
    pub offset: SpanIndex,
    pub line: u32,
    pub column: u32,
}

impl SourceChar {
    pub fn next_offset(&self) -> SpanIndex {
        SpanIndex::from(self.offset.to_usize() + self.value.len_utf8())
    }
}
