//! NieR Replicant `GAMEDATA` bundles: one header followed by fixed-size save
//! slots. Only the first three slots are offered by the game; the rest hold
//! saves moved aside by ending D.

pub mod garden;
pub mod header;
pub mod inventory;
pub mod layouts;
pub mod slot;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CodecError, ErrorKind, Result};
use crate::layout::{ByteRange, FileLayout, SectionId, SectionLayout};
use crate::value::RawCopy;

pub use garden::{GardenPlot, PlantTime, PlotFilter};
pub use header::Header;
pub use inventory::ItemCount;
pub use layouts::{HEADER_SIZE, SLOT_SIZE};
pub use slot::SaveSlot;

pub const BUNDLE_SIZE: usize = 295_424;
pub const VISIBLE_SLOTS: usize = 3;

/// Which slot arrangement a bundle was written with. Both fill the same
/// number of bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleVersion {
    /// Seven slots, no padding.
    #[default]
    Canonical,
    /// Three slots followed by zero padding the size of four more.
    Legacy,
}

impl BundleVersion {
    pub fn slot_count(self) -> usize {
        match self {
            Self::Canonical => 7,
            Self::Legacy => 3,
        }
    }

    pub fn tail_len(self) -> usize {
        BUNDLE_SIZE - HEADER_SIZE - self.slot_count() * SLOT_SIZE
    }

    pub fn file_len(self) -> usize {
        BUNDLE_SIZE
    }

    pub fn file_layout(self) -> FileLayout {
        let mut sections = vec![SectionLayout {
            id: SectionId::Header,
            range: ByteRange::new(0, HEADER_SIZE),
        }];
        let mut offset = HEADER_SIZE;
        for i in 0..self.slot_count() {
            sections.push(SectionLayout {
                id: SectionId::Slot(i as u8),
                range: ByteRange::new(offset, SLOT_SIZE),
            });
            offset += SLOT_SIZE;
        }
        if self.tail_len() > 0 {
            sections.push(SectionLayout {
                id: SectionId::Tail,
                range: ByteRange::new(offset, self.tail_len()),
            });
        }
        FileLayout {
            file_len: self.file_len(),
            sections,
        }
    }
}

/// A parsed bundle. The header and each slot keep their original bytes, so
/// sections nobody touched are written back exactly as they were read.
#[derive(Debug, Clone)]
pub struct SaveBundle {
    version: BundleVersion,
    layout: FileLayout,
    header: RawCopy<Header>,
    slots: Vec<RawCopy<SaveSlot>>,
    tail: Vec<u8>,
    original: Vec<u8>,
}

impl SaveBundle {
    pub fn parse(bytes: &[u8], version: BundleVersion) -> Result<Self> {
        let layout = version.file_layout();
        layout.validate()?;
        if bytes.len() != layout.file_len {
            return Err(CodecError::LayoutMismatch {
                field: "bundle".to_string(),
                offset: 0,
                expected: layout.file_len,
                actual: bytes.len(),
            });
        }

        let mut header = None;
        let mut slots = Vec::with_capacity(version.slot_count());
        let mut tail = Vec::new();
        for section in &layout.sections {
            let raw = &bytes[section.range.as_range()];
            let locate = |err: CodecError| {
                let err = err.at(&section.id.path(), section.range.start);
                if err.kind() == ErrorKind::ChecksumMismatch {
                    warn!(section = ?section.id, error = %err, "checksum mismatch");
                }
                err
            };
            match section.id {
                SectionId::Header => {
                    let decoded = Header::decode(raw).map_err(locate)?;
                    header = Some(RawCopy::new(raw.to_vec(), decoded));
                }
                SectionId::Slot(i) => {
                    let slot = SaveSlot::decode(raw).map_err(locate)?;
                    if !slot.is_ok() && raw.iter().any(|&b| b != 0) {
                        warn!(slot = i, "slot integrity marker is not set");
                    }
                    slots.push(RawCopy::new(raw.to_vec(), slot));
                }
                SectionId::Tail => tail = raw.to_vec(),
            }
        }
        let Some(header) = header else {
            return Err(CodecError::LayoutMismatch {
                field: "header".to_string(),
                offset: 0,
                expected: HEADER_SIZE,
                actual: 0,
            });
        };

        debug!(?version, slots = slots.len(), tail = tail.len(), "parsed save bundle");
        Ok(Self {
            version,
            layout,
            header,
            slots,
            tail,
            original: bytes.to_vec(),
        })
    }

    /// A bundle of all-zero sections.
    pub fn empty(version: BundleVersion) -> Result<Self> {
        Self::parse(&vec![0u8; version.file_len()], version)
    }

    pub fn version(&self) -> BundleVersion {
        self.version
    }

    pub fn layout(&self) -> &FileLayout {
        &self.layout
    }

    pub fn header(&self) -> &Header {
        self.header.value()
    }

    pub fn header_mut(&mut self) -> &mut Header {
        self.header.value_mut()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Result<&SaveSlot> {
        let count = self.slots.len();
        self.slots
            .get(index)
            .map(RawCopy::value)
            .ok_or(CodecError::SlotOutOfRange { index, count })
    }

    pub fn slot_mut(&mut self, index: usize) -> Result<&mut SaveSlot> {
        let count = self.slots.len();
        self.slots
            .get_mut(index)
            .map(RawCopy::value_mut)
            .ok_or(CodecError::SlotOutOfRange { index, count })
    }

    pub fn slots(&self) -> impl Iterator<Item = &SaveSlot> {
        self.slots.iter().map(RawCopy::value)
    }

    /// The slots the game offers on its load screen.
    pub fn visible_slots(&self) -> impl Iterator<Item = &SaveSlot> {
        self.slots().take(VISIBLE_SLOTS)
    }

    /// Replace a slot wholesale, e.g. with one exported from another bundle.
    pub fn set_slot(&mut self, index: usize, slot: SaveSlot) -> Result<()> {
        let count = self.slots.len();
        let target = self
            .slots
            .get_mut(index)
            .ok_or(CodecError::SlotOutOfRange { index, count })?;
        target.set(slot);
        debug!(slot = index, "slot replaced");
        Ok(())
    }

    pub fn clear_slot(&mut self, index: usize) -> Result<()> {
        self.set_slot(index, SaveSlot::empty()?)
    }

    /// Current bytes of one slot, suitable for loading on its own.
    pub fn export_slot(&self, index: usize) -> Result<Vec<u8>> {
        let count = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(CodecError::SlotOutOfRange { index, count })?;
        slot.emit(SaveSlot::to_bytes)
    }

    /// Current bytes of one section.
    pub fn section_bytes(&self, id: SectionId) -> Result<Vec<u8>> {
        match id {
            SectionId::Header => self.header.emit(Header::to_bytes),
            SectionId::Slot(i) => self.export_slot(usize::from(i)),
            SectionId::Tail => Ok(self.tail.clone()),
        }
    }

    /// Bytes of one section as they were read.
    pub fn original_section(&self, id: SectionId) -> Option<&[u8]> {
        let section = self.layout.section(id)?;
        self.original.get(section.range.as_range())
    }

    pub fn is_modified(&self) -> bool {
        self.header.is_modified() || self.slots.iter().any(RawCopy::is_modified)
    }

    /// True when every slot carries the integrity marker.
    pub fn is_ok(&self) -> bool {
        self.slots().all(SaveSlot::is_ok)
    }

    pub fn to_bytes_unmodified(&self) -> Vec<u8> {
        self.original.clone()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.layout.file_len);
        for section in &self.layout.sections {
            let bytes = self
                .section_bytes(section.id)
                .map_err(|e| e.at(&section.id.path(), section.range.start))?;
            if bytes.len() != section.range.len() {
                return Err(CodecError::LayoutMismatch {
                    field: section.id.path(),
                    offset: section.range.start,
                    expected: section.range.len(),
                    actual: bytes.len(),
                });
            }
            out.extend_from_slice(&bytes);
        }
        debug!(len = out.len(), modified = self.is_modified(), "encoded save bundle");
        Ok(out)
    }
}

impl fmt::Display for SaveBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GAMEDATA ({:?}, {} slots)", self.version, self.slots.len())?;
        for (i, slot) in self.slots().enumerate() {
            writeln!(f, "    #{} {slot}", i + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn versions_cover_the_same_file() {
        for version in [BundleVersion::Canonical, BundleVersion::Legacy] {
            let layout = version.file_layout();
            layout.validate().expect("contiguous");
            assert_eq!(layout.file_len, BUNDLE_SIZE);
        }
        assert_eq!(BundleVersion::Canonical.tail_len(), 0);
        assert_eq!(BundleVersion::Legacy.tail_len(), 149_888);
        assert!(BundleVersion::Canonical.file_layout().section(SectionId::Tail).is_none());
    }

    #[test]
    fn untouched_bundle_round_trips() {
        let bundle = SaveBundle::empty(BundleVersion::Canonical).expect("empty bundle");
        assert_eq!(bundle.slot_count(), 7);
        assert_eq!(bundle.visible_slots().count(), 3);
        assert!(!bundle.is_modified());
        assert_eq!(bundle.to_bytes().expect("encode"), bundle.to_bytes_unmodified());
    }

    #[test]
    fn editing_one_slot_leaves_the_others_alone() {
        let mut bundle = SaveBundle::empty(BundleVersion::Legacy).expect("empty bundle");
        bundle
            .slot_mut(1)
            .expect("slot 1")
            .set("money", Value::Int(500))
            .expect("money");
        let out = bundle.to_bytes().expect("encode");
        let original = bundle.to_bytes_unmodified();

        let slot1 = bundle.layout().section(SectionId::Slot(1)).expect("slot 1").range;
        assert_ne!(out[slot1.as_range()], original[slot1.as_range()]);
        assert_eq!(out[..slot1.start], original[..slot1.start]);
        assert_eq!(out[slot1.end..], original[slot1.end..]);
        assert!(bundle.is_modified());
    }

    #[test]
    fn slot_indices_are_checked() {
        let mut bundle = SaveBundle::empty(BundleVersion::Legacy).expect("empty bundle");
        let err = bundle.slot(3).expect_err("only three slots");
        assert_eq!(err, CodecError::SlotOutOfRange { index: 3, count: 3 });
        assert!(bundle.clear_slot(7).is_err());
        assert!(bundle.export_slot(2).is_ok());
    }

    #[test]
    fn moved_slot_keeps_its_bytes() {
        let mut bundle = SaveBundle::empty(BundleVersion::Canonical).expect("empty bundle");
        bundle
            .slot_mut(0)
            .expect("slot 0")
            .set("name", Value::Str("Nier".into()))
            .expect("name");
        let moved = bundle.slot(0).expect("slot 0").clone();
        bundle.set_slot(6, moved).expect("move");
        bundle.clear_slot(0).expect("clear");

        assert_eq!(bundle.slot(6).expect("slot 6").name(), "Nier");
        assert_eq!(bundle.slot(0).expect("slot 0").name(), "");
        let exported = bundle.export_slot(6).expect("export");
        assert_eq!(SaveSlot::decode(&exported).expect("decode").name(), "Nier");
    }

    #[test]
    fn slot_errors_are_located_in_the_file() {
        let mut bytes = vec![0u8; BUNDLE_SIZE];
        bytes[HEADER_SIZE + SLOT_SIZE + 36] = 1;
        let err = SaveBundle::parse(&bytes, BundleVersion::Canonical).expect_err("bad checksum");
        assert_eq!(err.kind(), ErrorKind::ChecksumMismatch);
        assert_eq!(err.field(), Some("slots.1.checksum"));
        assert_eq!(err.offset(), Some(HEADER_SIZE + SLOT_SIZE + 37_456));

        let short = SaveBundle::parse(&bytes[..100], BundleVersion::Canonical).expect_err("short");
        assert_eq!(short.kind(), ErrorKind::MalformedInput);
    }
}
