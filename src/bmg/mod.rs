//! The BMG message bank: an ordered set of localized messages in one
//! section based container.
//!
//! A bank file opens with a 0x20 byte header carrying the `MESG` `bmg1`
//! magic pair, the total file size, the section count (always 3), and the
//! text encoding (always 2, UTF-16BE). Three sections follow, each 32 byte
//! aligned and prefixed with a 4 byte magic and a 4 byte length:
//!
//! - `INF1`: one fixed size record per message holding the message's offset
//!   into the string pool and its 16 opaque attribute bytes
//! - `DAT1`: the string pool — each message's encoded text (see
//!   [`encode_text`]), deduplicated so byte-identical texts are stored once
//! - `MID1`: one u32 per message equal to its position; the position is the
//!   message's identity, so this section carries no extra information
//!
//! A message's position in the bank is load bearing: the delivery client
//! addresses messages by index.

mod text;

#[cfg(feature = "json")]
mod json;

pub use self::text::{decode_text, encode_text};

use crate::{buffer, Error, ErrorKind};
use std::collections::HashMap;

const MESG_MAGIC: u32 = 0x4D455347;
const BMG1_MAGIC: u32 = 0x626D6731;
const INF1_MAGIC: u32 = 0x494E4631;
const DAT1_MAGIC: u32 = 0x44415431;
const MID1_MAGIC: u32 = 0x4D494431;

const HEADER_SIZE: usize = 0x20;
const NUM_SECTIONS: u32 = 3;
const ENCODING_UTF16_BE: u8 = 2;

/// INF1 record: u32 string pool offset + 16 attribute bytes
const RECORD_SIZE: usize = 20;
const ID_SIZE: usize = 4;

/// A single localized message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message text, possibly containing `{hex}` escape markup
    pub text: String,

    /// Opaque presentation attributes, stored untouched
    pub attributes: [u8; 16],
}

impl Message {
    pub fn new<T: Into<String>>(text: T, attributes: [u8; 16]) -> Self {
        Message {
            text: text.into(),
            attributes,
        }
    }
}

/// An ordered collection of messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bmg {
    messages: Vec<Message>,
}

impl Bmg {
    pub fn new() -> Self {
        Bmg::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }

    /// Appends a message to the end of the bank
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Serializes the bank.
    ///
    /// Output is deterministic: the same messages in the same order produce
    /// byte-identical files.
    pub fn save(&self) -> Result<Vec<u8>, Error> {
        let count = self.messages.len();
        if count > usize::from(u16::MAX) {
            return Err(Error::new(ErrorKind::MalformedContainer { offset: 0 }));
        }

        let len_inf1 = buffer::align32(0x10 + RECORD_SIZE * count);
        let mut out = vec![0u8; HEADER_SIZE + len_inf1 + 8];

        buffer::put_u32(&mut out, 0x00, MESG_MAGIC)?;
        buffer::put_u32(&mut out, 0x04, BMG1_MAGIC)?;
        buffer::put_u32(&mut out, 0x0C, NUM_SECTIONS)?;
        buffer::put_u8(&mut out, 0x10, ENCODING_UTF16_BE)?;

        buffer::put_u32(&mut out, HEADER_SIZE, INF1_MAGIC)?;
        buffer::put_u32(&mut out, HEADER_SIZE + 0x4, len_inf1 as u32)?;
        buffer::put_u16(&mut out, HEADER_SIZE + 0x8, count as u16)?;
        buffer::put_u16(&mut out, HEADER_SIZE + 0xA, RECORD_SIZE as u16)?;

        let mut pool: Vec<u8> = Vec::new();
        let mut seen: HashMap<Vec<u8>, u32> = HashMap::new();

        for (i, message) in self.messages.iter().enumerate() {
            let encoded = encode_text(&message.text)?;
            let offset = match seen.get(&encoded) {
                Some(&offset) => offset,
                None => {
                    let offset = pool.len() as u32;
                    pool.extend_from_slice(&encoded);
                    seen.insert(encoded, offset);
                    offset
                }
            };

            let record = HEADER_SIZE + 0x10 + RECORD_SIZE * i;
            buffer::put_u32(&mut out, record, offset)?;
            buffer::put_bytes(&mut out, record + 0x4, &message.attributes)?;
        }

        let dat1 = HEADER_SIZE + len_inf1;
        let len_dat1 = buffer::align32(8 + pool.len());
        buffer::put_u32(&mut out, dat1, DAT1_MAGIC)?;
        buffer::put_u32(&mut out, dat1 + 0x4, len_dat1 as u32)?;
        out.extend_from_slice(&pool);
        out.resize(buffer::align32(out.len()), 0);

        let mid1 = dat1 + len_dat1;
        let len_mid1 = buffer::align32(0x10 + ID_SIZE * count);
        out.resize(out.len() + len_mid1, 0);
        buffer::put_u32(&mut out, mid1, MID1_MAGIC)?;
        buffer::put_u32(&mut out, mid1 + 0x4, len_mid1 as u32)?;
        buffer::put_u16(&mut out, mid1 + 0x8, count as u16)?;
        buffer::put_u8(&mut out, mid1 + 0xA, 16)?;
        for i in 0..count {
            buffer::put_u32(&mut out, mid1 + 0x10 + ID_SIZE * i, i as u32)?;
        }

        let total = out.len() as u32;
        buffer::put_u32(&mut out, 0x08, total)?;
        Ok(out)
    }

    /// Parses a bank from its serialized form
    pub fn from_slice(data: &[u8]) -> Result<Bmg, Error> {
        if buffer::get_u32(data, 0x00)? != MESG_MAGIC || buffer::get_u32(data, 0x04)? != BMG1_MAGIC
        {
            return Err(Error::new(ErrorKind::MalformedContainer { offset: 0 }));
        }

        let inf1 = HEADER_SIZE;
        if buffer::get_u32(data, inf1)? != INF1_MAGIC {
            return Err(Error::new(ErrorKind::MalformedContainer { offset: inf1 }));
        }
        let section_size = buffer::get_u32(data, inf1 + 0x4)? as usize;
        let count = usize::from(buffer::get_u16(data, inf1 + 0x8)?);
        let record_size = usize::from(buffer::get_u16(data, inf1 + 0xA)?);

        if record_size < RECORD_SIZE
            || count
                .checked_mul(record_size)
                .and_then(|n| n.checked_add(0x10))
                .map_or(true, |needed| needed > section_size)
        {
            return Err(Error::new(ErrorKind::MalformedContainer { offset: inf1 }));
        }

        // the string pool payload sits just past the DAT1 section header
        let pool = inf1 + section_size + 8;

        let mut bank = Bmg::new();
        for i in 0..count {
            let record = inf1 + 0x10 + record_size * i;
            let offset = buffer::get_u32(data, record)? as usize;
            let mut attributes = [0u8; 16];
            attributes.copy_from_slice(buffer::get_bytes(data, record + 0x4, 16)?);
            let text = decode_text(data, pool + offset)?;
            bank.push(Message { text, attributes });
        }

        Ok(bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(last: u8) -> [u8; 16] {
        let mut a = [0u8; 16];
        a[15] = last;
        a
    }

    #[test]
    fn test_empty_bank() {
        let bank = Bmg::new();
        let data = bank.save().unwrap();
        assert_eq!(buffer::get_u32(&data, 0x08).unwrap() as usize, data.len());
        assert_eq!(Bmg::from_slice(&data).unwrap().messages().len(), 0);
    }

    #[test]
    fn test_header_fields() {
        let mut bank = Bmg::new();
        bank.push(Message::new("a", attr(1)));
        let data = bank.save().unwrap();

        assert_eq!(buffer::get_u32(&data, 0x00).unwrap(), MESG_MAGIC);
        assert_eq!(buffer::get_u32(&data, 0x04).unwrap(), BMG1_MAGIC);
        assert_eq!(buffer::get_u32(&data, 0x0C).unwrap(), NUM_SECTIONS);
        assert_eq!(buffer::get_u8(&data, 0x10).unwrap(), ENCODING_UTF16_BE);
        assert_eq!(buffer::get_u16(&data, 0x2A).unwrap() as usize, RECORD_SIZE);
        assert_eq!(data.len() % 32, 0);
    }

    #[test]
    fn test_dedup_reuses_offset() {
        let mut bank = Bmg::new();
        bank.push(Message::new("Same", attr(1)));
        bank.push(Message::new("Other", attr(2)));
        bank.push(Message::new("Same", attr(3)));
        let data = bank.save().unwrap();

        let first = buffer::get_u32(&data, HEADER_SIZE + 0x10).unwrap();
        let third = buffer::get_u32(&data, HEADER_SIZE + 0x10 + 2 * RECORD_SIZE).unwrap();
        assert_eq!(first, third);

        let back = Bmg::from_slice(&data).unwrap();
        assert_eq!(back, bank);
    }

    #[test]
    fn test_rejects_wrong_magic() {
        let mut data = Bmg::new().save().unwrap();
        buffer::put_u32(&mut data, 0x04, 0xDEADBEEF).unwrap();
        assert!(Bmg::from_slice(&data).is_err());
    }

    #[test]
    fn test_rejects_truncated() {
        let mut bank = Bmg::new();
        bank.push(Message::new("Hello", attr(0)));
        let data = bank.save().unwrap();
        assert!(Bmg::from_slice(&data[..0x30]).is_err());
    }
}
