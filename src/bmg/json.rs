//! The human editable form of a message bank: an ordered list of
//! `{ "Attr": hex, "Text": text }` records. Round trips exactly with the
//! binary form — attributes are carried as 32 uppercase hex digits and the
//! text keeps its `{hex}` escape markup.

use crate::{Bmg, Error, ErrorKind, Message};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Document {
    #[serde(rename = "Messages")]
    messages: Vec<Entry>,
}

#[derive(Serialize, Deserialize)]
struct Entry {
    #[serde(rename = "Attr")]
    attr: String,

    #[serde(rename = "Text")]
    text: String,
}

impl Bmg {
    /// Builds a bank from an interchange document
    pub fn from_json_slice(data: &[u8]) -> Result<Bmg, Error> {
        let doc: Document = serde_json::from_slice(data)?;

        let mut bank = Bmg::new();
        for (index, entry) in doc.messages.into_iter().enumerate() {
            let raw = hex::decode(&entry.attr)
                .map_err(|_| Error::new(ErrorKind::InvalidAttributes { index }))?;
            if raw.len() != 16 {
                return Err(Error::new(ErrorKind::InvalidAttributes { index }));
            }
            let mut attributes = [0u8; 16];
            attributes.copy_from_slice(&raw);
            bank.push(Message {
                text: entry.text,
                attributes,
            });
        }

        Ok(bank)
    }

    /// Renders the bank as a pretty printed interchange document
    pub fn to_json_vec(&self) -> Result<Vec<u8>, Error> {
        let doc = Document {
            messages: self
                .messages()
                .iter()
                .map(|m| Entry {
                    attr: hex::encode_upper(m.attributes),
                    text: m.text.clone(),
                })
                .collect(),
        };
        serde_json::to_vec_pretty(&doc).map_err(Error::from)
    }
}
