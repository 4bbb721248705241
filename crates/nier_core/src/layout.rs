use crate::error::{CodecError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    Header,
    Slot(u8),
    Tail,
}

impl SectionId {
    /// Dotted path prefix used when locating errors inside this section.
    pub fn path(&self) -> String {
        match self {
            Self::Header => "header".to_string(),
            Self::Slot(i) => format!("slots.{i}"),
            Self::Tail => "tail".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    pub id: SectionId,
    pub range: ByteRange,
}

/// Where each section of a bundle lives in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLayout {
    pub file_len: usize,
    pub sections: Vec<SectionLayout>,
}

impl FileLayout {
    pub fn section(&self, id: SectionId) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Sections must start at byte 0, follow each other without gaps and end
    /// exactly at `file_len`.
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.sections.first() else {
            return Err(layout_error("layout", 0, 1, 0));
        };
        if first.range.start != 0 {
            return Err(layout_error(&first.id.path(), 0, 0, first.range.start));
        }

        let mut expected = 0usize;
        for section in &self.sections {
            if section.range.start != expected {
                return Err(layout_error(
                    &section.id.path(),
                    expected,
                    expected,
                    section.range.start,
                ));
            }
            if section.range.end < section.range.start {
                return Err(layout_error(
                    &section.id.path(),
                    section.range.start,
                    section.range.start,
                    section.range.end,
                ));
            }
            expected = section.range.end;
        }

        if expected != self.file_len {
            return Err(layout_error("layout", expected, self.file_len, expected));
        }
        Ok(())
    }
}

fn layout_error(field: &str, offset: usize, expected: usize, actual: usize) -> CodecError {
    CodecError::LayoutMismatch {
        field: field.to_string(),
        offset,
        expected,
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(ranges: &[(SectionId, usize, usize)], file_len: usize) -> FileLayout {
        FileLayout {
            file_len,
            sections: ranges
                .iter()
                .map(|&(id, start, end)| SectionLayout {
                    id,
                    range: ByteRange { start, end },
                })
                .collect(),
        }
    }

    #[test]
    fn contiguous_sections_validate() {
        let l = layout(
            &[
                (SectionId::Header, 0, 10),
                (SectionId::Slot(0), 10, 30),
                (SectionId::Tail, 30, 34),
            ],
            34,
        );
        l.validate().expect("valid layout");
        assert_eq!(l.section(SectionId::Slot(0)).map(|s| s.range.len()), Some(20));
    }

    #[test]
    fn gap_is_reported_at_the_section() {
        let l = layout(&[(SectionId::Header, 0, 10), (SectionId::Slot(0), 12, 30)], 30);
        let err = l.validate().expect_err("gap");
        assert_eq!(err.field(), Some("slots.0"));
        assert_eq!(err.offset(), Some(10));
    }

    #[test]
    fn short_coverage_fails() {
        let l = layout(&[(SectionId::Header, 0, 10)], 12);
        assert!(l.validate().is_err());
        assert!(layout(&[], 0).validate().is_err());
    }
}
