use crate::error::{CodecError, Result};
use crate::nier::layouts::{HEADER, HEADER_SIZE};
use crate::record::Record;
use crate::value::Value;

/// The bundle header. Holds state shared by every slot, such as which
/// endings have been reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    record: Record,
}

impl Header {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            record: Record::decode(&HEADER, bytes)?,
        })
    }

    pub fn empty() -> Result<Self> {
        Self::decode(&[0u8; HEADER_SIZE])
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.record.encode()
    }

    /// Endings unlocked so far, `A` through `E`.
    pub fn endings(&self) -> Vec<&'static str> {
        self.record
            .get("endings")
            .and_then(Value::as_flags)
            .map(|endings| endings.enabled().collect())
            .unwrap_or_default()
    }

    pub fn set_ending(&mut self, ending: &str, reached: bool) -> Result<()> {
        self.record.update("endings", |value| {
            value
                .as_flags_mut()
                .ok_or_else(|| CodecError::invalid_mutation("endings", "not a flag set"))?
                .set(ending, reached)
        })
    }

    /// The name erased by ending D. The game will not accept it for a new
    /// playthrough.
    pub fn d_name(&self) -> &str {
        self.record
            .get("d_name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endings_round_trip_through_the_flag_byte() {
        let mut header = Header::empty().expect("empty header");
        assert!(header.endings().is_empty());
        header.set_ending("B", true).expect("B");
        header.set_ending("E", true).expect("E");
        assert_eq!(header.endings(), vec!["B", "E"]);

        let bytes = header.to_bytes().expect("encode");
        assert_eq!(bytes[4], 0b0001_0010);
        let reread = Header::decode(&bytes).expect("decode");
        assert_eq!(reread.endings(), vec!["B", "E"]);
        assert!(header.set_ending("F", true).is_err());
    }

    #[test]
    fn d_name_is_a_padded_string() {
        let mut header = Header::empty().expect("empty header");
        header
            .record_mut()
            .set("d_name", Value::Str("Kainé".into()))
            .expect("name");
        assert_eq!(header.d_name(), "Kainé");
        let bytes = header.to_bytes().expect("encode");
        assert_eq!(&bytes[8..14], "Kainé".as_bytes());
        assert_eq!(bytes[14], 0);
    }
}
