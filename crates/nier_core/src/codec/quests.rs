//! Quest progress packed as named bit ranges inside one large block.
//!
//! Each quest occupies `start..=end`: a `started` bit, zero or more stage bits,
//! then a `done` bit. Bits between ranges are anonymous filler and are kept
//! verbatim. One quest was split by the game across two distant ranges; a
//! merge rule presents the pair as a single entry and splits it back on encode.

use crate::bits::{BitReader, BitWriter};
use crate::error::{CodecError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Filler { len: usize },
    Quest { name: &'static str, start: usize, end: usize },
}

/// Two ranges shown as one quest. `second` must be a plain two-bit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestMerge {
    pub name: &'static str,
    pub first: &'static str,
    pub second: &'static str,
}

#[derive(Debug)]
pub struct QuestBitfield {
    bits: usize,
    segments: Vec<Segment>,
    merge: Option<QuestMerge>,
}

impl QuestBitfield {
    /// `ranges` are `(name, start_bit, end_bit)` with inclusive ends. They may
    /// be given in any order but must not overlap.
    pub fn new(bits: usize, ranges: &[(&'static str, usize, usize)]) -> Self {
        assert!(bits % 8 == 0, "quest block must be whole bytes");
        let mut sorted = ranges.to_vec();
        sorted.sort_by_key(|&(_, start, _)| start);

        let mut segments = Vec::with_capacity(sorted.len() * 2 + 1);
        let mut next = 0usize;
        for &(name, start, end) in &sorted {
            assert!(end > start, "quest {name:?} needs at least two bits");
            assert!(start >= next, "quest {name:?} overlaps the previous range");
            if start > next {
                segments.push(Segment::Filler { len: start - next });
            }
            segments.push(Segment::Quest { name, start, end });
            next = end + 1;
        }
        assert!(next <= bits, "quest ranges exceed {bits} bits");
        if bits > next {
            segments.push(Segment::Filler { len: bits - next });
        }

        Self {
            bits,
            segments,
            merge: None,
        }
    }

    pub fn with_merge(mut self, merge: QuestMerge) -> Self {
        let second = self
            .range(merge.second)
            .unwrap_or_else(|| panic!("merge target {:?} is not a quest", merge.second));
        assert_eq!(second.1 - second.0, 1, "merged second range must be two bits");
        assert!(self.range(merge.first).is_some(), "merge source missing");
        self.merge = Some(merge);
        self
    }

    pub fn size(&self) -> usize {
        self.bits / 8
    }

    pub fn merge(&self) -> Option<QuestMerge> {
        self.merge
    }

    /// Inclusive bit range of a raw (pre-merge) quest entry.
    pub fn range(&self, name: &str) -> Option<(usize, usize)> {
        self.segments.iter().find_map(|seg| match *seg {
            Segment::Quest { name: n, start, end } if n == name => Some((start, end)),
            _ => None,
        })
    }

    fn stage_width(&self, name: &str) -> Option<usize> {
        self.range(name).map(|(start, end)| end - start - 1)
    }

    pub fn decode(&'static self, bytes: &[u8]) -> QuestLog {
        debug_assert_eq!(bytes.len(), self.size());
        let mut r = BitReader::new(bytes);
        let mut quests = Vec::new();
        let mut filler = Vec::new();
        for seg in &self.segments {
            match *seg {
                Segment::Filler { len } => filler.push(r.read_bits(len)),
                Segment::Quest { name, start, end } => {
                    let started = r.read_bit();
                    let width = end - start - 1;
                    let stage = (width > 0).then(|| r.read_uint(width));
                    let done = r.read_bit();
                    quests.push((
                        name,
                        QuestProgress {
                            started,
                            stage,
                            partial_done: None,
                            second_started: None,
                            done,
                        },
                    ));
                }
            }
        }

        if let Some(merge) = self.merge {
            merge_pair(&mut quests, merge);
        }

        QuestLog {
            field: self,
            quests,
            filler,
        }
    }

    pub fn encode(&self, log: &QuestLog, out: &mut [u8]) -> Result<()> {
        if !std::ptr::eq(log.field, self) {
            return Err(CodecError::invalid_mutation(
                "",
                "quest log belongs to a different bitfield",
            ));
        }
        let mut quests = log.quests.clone();
        if let Some(merge) = self.merge {
            split_pair(&mut quests, merge)?;
        }

        let mut w = BitWriter::new(out);
        let mut filler_iter = log.filler.iter();
        for seg in &self.segments {
            match *seg {
                Segment::Filler { len } => {
                    let bits = filler_iter
                        .next()
                        .filter(|bits| bits.len() == len)
                        .ok_or_else(|| CodecError::invalid_mutation("", "filler bits reshaped"))?;
                    w.write_bits(bits);
                }
                Segment::Quest { name, start, end } => {
                    let progress = quests
                        .iter()
                        .find(|(n, _)| *n == name)
                        .map(|(_, p)| p)
                        .ok_or_else(|| CodecError::invalid_mutation(name, "quest missing"))?;
                    w.write_bit(progress.started);
                    let width = end - start - 1;
                    if width > 0 {
                        w.write_uint(progress.stage.unwrap_or(0), width);
                    }
                    w.write_bit(progress.done);
                }
            }
        }
        Ok(())
    }
}

fn merge_pair(quests: &mut Vec<(&'static str, QuestProgress)>, merge: QuestMerge) {
    let Some(first_at) = quests.iter().position(|(n, _)| *n == merge.first) else {
        return;
    };
    let Some(second_at) = quests.iter().position(|(n, _)| *n == merge.second) else {
        return;
    };
    let second = quests.remove(second_at).1;
    let first_at = if second_at < first_at { first_at - 1 } else { first_at };
    let first = quests[first_at].1;
    quests[first_at] = (
        merge.name,
        QuestProgress {
            started: first.started,
            stage: first.stage,
            partial_done: Some(first.done),
            second_started: Some(second.started),
            done: second.done,
        },
    );
}

fn split_pair(quests: &mut Vec<(&'static str, QuestProgress)>, merge: QuestMerge) -> Result<()> {
    let at = quests
        .iter()
        .position(|(n, _)| *n == merge.name)
        .ok_or_else(|| CodecError::invalid_mutation(merge.name, "merged quest missing"))?;
    let merged = quests[at].1;
    quests[at] = (
        merge.first,
        QuestProgress {
            started: merged.started,
            stage: merged.stage,
            partial_done: None,
            second_started: None,
            done: merged.partial_done.unwrap_or(false),
        },
    );
    quests.push((
        merge.second,
        QuestProgress {
            started: merged.second_started.unwrap_or(false),
            stage: None,
            partial_done: None,
            second_started: None,
            done: merged.done,
        },
    ));
    Ok(())
}

/// Progress of one quest. `partial_done` and `second_started` are only
/// present on a merged entry; `second_started` is the start bit of the second
/// range and is not meant for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuestProgress {
    pub started: bool,
    pub stage: Option<u64>,
    pub partial_done: Option<bool>,
    pub second_started: Option<bool>,
    pub done: bool,
}

#[derive(Debug, Clone)]
pub struct QuestLog {
    field: &'static QuestBitfield,
    quests: Vec<(&'static str, QuestProgress)>,
    filler: Vec<Vec<bool>>,
}

impl PartialEq for QuestLog {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.field, other.field)
            && self.quests == other.quests
            && self.filler == other.filler
    }
}

impl QuestLog {
    pub fn field(&self) -> &'static QuestBitfield {
        self.field
    }

    pub fn get(&self, name: &str) -> Option<&QuestProgress> {
        self.quests.iter().find(|(n, _)| *n == name).map(|(_, p)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &QuestProgress)> + '_ {
        self.quests.iter().map(|(n, p)| (*n, p))
    }

    /// Anonymous gaps between ranges, in bit order.
    pub fn filler(&self) -> &[Vec<bool>] {
        &self.filler
    }

    /// Replace one quest's progress, rejecting shapes the bit layout cannot hold.
    pub fn set(&mut self, name: &str, progress: QuestProgress) -> Result<()> {
        let slot = self
            .quests
            .iter_mut()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| CodecError::invalid_mutation(name, "no such quest"))?;

        let field = self.field;
        let merge = field.merge.filter(|m| m.name == name);
        let width = match merge {
            Some(m) => field.stage_width(m.first),
            None => field.stage_width(name),
        }
        .unwrap_or(0);

        match (width, progress.stage) {
            (0, Some(_)) => {
                return Err(CodecError::invalid_mutation(name, "quest has no stage bits"));
            }
            (w, None) if w > 0 => {
                return Err(CodecError::invalid_mutation(name, "stage is required"));
            }
            (w, Some(stage)) if w < 64 && stage >> w != 0 => {
                return Err(CodecError::invalid_mutation(
                    name,
                    format!("stage {stage} does not fit in {w} bits"),
                ));
            }
            _ => {}
        }
        let merged_shape = progress.partial_done.is_some() && progress.second_started.is_some();
        let plain_shape = progress.partial_done.is_none() && progress.second_started.is_none();
        if (merge.is_some() && !merged_shape) || (merge.is_none() && !plain_shape) {
            return Err(CodecError::invalid_mutation(
                name,
                "partial_done/second_started only apply to the merged quest",
            ));
        }

        slot.1 = progress;
        Ok(())
    }
}
