use crate::bits::{BitReader, BitWriter};
use crate::error::{CodecError, Result};

/// Display labels for a flag array whose bits mean something other than
/// true/false, e.g. `new` / `viewed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagLabels {
    pub set: &'static str,
    pub clear: &'static str,
}

/// Fixed-width block of independently named bits. Unnamed positions are kept
/// as anonymous placeholders so the block always round-trips.
#[derive(Debug)]
pub struct FlagArray {
    names: Vec<Option<&'static str>>,
    labels: Option<FlagLabels>,
}

impl FlagArray {
    /// One bit per name in order; `""` marks an anonymous bit. The byte width
    /// defaults to the smallest that holds every name.
    pub fn from_names(names: &[&'static str], width: Option<usize>) -> Self {
        let width = width.unwrap_or(names.len().div_ceil(8));
        assert!(
            names.len() <= width * 8,
            "{} flags do not fit in {width} bytes",
            names.len()
        );
        let mut bits: Vec<Option<&'static str>> = names
            .iter()
            .map(|&n| (!n.is_empty()).then_some(n))
            .collect();
        bits.resize(width * 8, None);
        Self {
            names: bits,
            labels: None,
        }
    }

    /// Named groups, each followed by `gaps[i]` anonymous bits.
    pub fn from_groups(groups: &[&[&'static str]], gaps: &[usize]) -> Self {
        assert_eq!(groups.len(), gaps.len(), "every group needs a trailing gap");
        let mut names = Vec::new();
        for (group, &gap) in groups.iter().zip(gaps) {
            names.extend(group.iter().map(|&n| Some(n)));
            names.extend(std::iter::repeat_n(None, gap));
        }
        assert!(
            names.len() % 8 == 0,
            "flag groups cover {} bits, not a whole number of bytes",
            names.len()
        );
        Self {
            names,
            labels: None,
        }
    }

    pub fn with_labels(mut self, set: &'static str, clear: &'static str) -> Self {
        self.labels = Some(FlagLabels { set, clear });
        self
    }

    pub fn size(&self) -> usize {
        self.names.len() / 8
    }

    pub fn bit_count(&self) -> usize {
        self.names.len()
    }

    pub fn labels(&self) -> Option<FlagLabels> {
        self.labels
    }

    pub fn name_at(&self, bit: usize) -> Option<&'static str> {
        self.names.get(bit).copied().flatten()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| *n == Some(name))
    }

    pub fn decode(&'static self, bytes: &[u8]) -> FlagSet {
        debug_assert_eq!(bytes.len(), self.size());
        let mut r = BitReader::new(bytes);
        FlagSet {
            array: self,
            bits: r.read_bits(self.bit_count()),
        }
    }

    pub fn encode(&self, set: &FlagSet, out: &mut [u8]) -> Result<()> {
        if !std::ptr::eq(set.array, self) || set.bits.len() != self.bit_count() {
            return Err(CodecError::invalid_mutation(
                "",
                "flag set belongs to a different flag array",
            ));
        }
        BitWriter::new(out).write_bits(&set.bits);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FlagSet {
    array: &'static FlagArray,
    bits: Vec<bool>,
}

impl PartialEq for FlagSet {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.array, other.array) && self.bits == other.bits
    }
}

impl FlagSet {
    pub fn array(&self) -> &'static FlagArray {
        self.array
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.array.index_of(name).map(|i| self.bits[i])
    }

    pub fn set(&mut self, name: &str, value: bool) -> Result<()> {
        let index = self
            .array
            .index_of(name)
            .ok_or_else(|| CodecError::invalid_mutation(name, "no such flag"))?;
        self.bits[index] = value;
        Ok(())
    }

    /// Named flags in bit order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &bit)| self.array.name_at(i).map(|name| (name, bit)))
    }

    /// Anonymous placeholders as `(bit index, value)`.
    pub fn anonymous(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(i, _)| self.array.name_at(*i).is_none())
            .map(|(i, &bit)| (i, bit))
    }

    pub fn enabled(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.named().filter(|&(_, on)| on).map(|(name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;

    static ENDINGS: LazyLock<FlagArray> =
        LazyLock::new(|| FlagArray::from_names(&["A", "B", "C", "D", "E"], Some(4)));

    static GROUPED: LazyLock<FlagArray> = LazyLock::new(|| {
        FlagArray::from_groups(&[&[], &["Lugworm", "Earthworm", "Lure"]], &[5, 0])
            .with_labels("new", "viewed")
    });

    #[test]
    fn flag_index_maps_to_low_bit_first() {
        let set = ENDINGS.decode(&[0b0000_0101, 0, 0, 0]);
        assert_eq!(set.get("A"), Some(true));
        assert_eq!(set.get("B"), Some(false));
        assert_eq!(set.get("C"), Some(true));
        assert_eq!(set.enabled().collect::<Vec<_>>(), vec!["A", "C"]);
    }

    #[test]
    fn anonymous_bits_survive_encode() {
        let bytes = [0b1010_0000u8, 0, 0, 0x80];
        let set = ENDINGS.decode(&bytes);
        assert_eq!(set.anonymous().filter(|(_, b)| *b).count(), 3);
        let mut out = [0u8; 4];
        ENDINGS.encode(&set, &mut out).expect("encode");
        assert_eq!(out, bytes);
    }

    #[test]
    fn groups_start_after_leading_gap() {
        assert_eq!(GROUPED.size(), 1);
        let set = GROUPED.decode(&[0b0100_0000]);
        assert_eq!(set.get("Earthworm"), Some(true));
        assert_eq!(set.get("Lugworm"), Some(false));
        assert_eq!(GROUPED.labels().map(|l| l.set), Some("new"));
    }

    #[test]
    fn setting_unknown_flag_fails() {
        let mut set = ENDINGS.decode(&[0; 4]);
        assert!(set.set("F", true).is_err());
        set.set("E", true).expect("E exists");
        let mut out = [0u8; 4];
        ENDINGS.encode(&set, &mut out).expect("encode");
        assert_eq!(out, [0b0001_0000, 0, 0, 0]);
    }
}
