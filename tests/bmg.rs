use std::convert::TryInto;

use pelly::bmg::{decode_text, encode_text};
use pelly::{Bmg, Message};
use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

const DEFAULT_ATTR: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
const HEADER_ATTR: [u8; 16] = [0, 0, 0, 2, 0x14, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

#[test]
fn empty_then_hello_layout() {
    let mut bank = Bmg::new();
    bank.push(Message::new("", DEFAULT_ATTR));
    bank.push(Message::new("Hello", HEADER_ATTR));
    let data = bank.save().unwrap();

    // the empty text is one NUL code unit, so the second message's string
    // pool entry starts right after it at offset 2
    let second_record = 0x20 + 0x10 + 20;
    assert_eq!(
        u32::from_be_bytes(data[second_record..second_record + 4].try_into().unwrap()),
        2
    );

    // INF1 is align32(0x10 + 2 * 20) = 0x40 long; the DAT1 payload starts
    // past its 8 byte section header
    let pool = 0x20 + 0x40 + 8;
    assert_eq!(decode_text(&data, pool + 2).unwrap(), "Hello");

    let back = Bmg::from_slice(&data).unwrap();
    assert_eq!(back.messages()[0].text, "");
    assert_eq!(back.messages()[1].text, "Hello");
    assert_eq!(back.messages()[1].attributes, HEADER_ATTR);
}

#[test]
fn duplicate_text_is_stored_once() {
    let mut bank = Bmg::new();
    bank.push(Message::new("Hello", DEFAULT_ATTR));
    bank.push(Message::new("bye", DEFAULT_ATTR));
    bank.push(Message::new("Hello", HEADER_ATTR));
    let data = bank.save().unwrap();

    let needle = encode_text("Hello").unwrap();
    let hits = data
        .windows(needle.len())
        .filter(|window| *window == needle.as_slice())
        .count();
    assert_eq!(hits, 1);

    let back = Bmg::from_slice(&data).unwrap();
    assert_eq!(back, bank);
}

#[test]
fn letter_bank_round_trips() {
    // the seven slots of a letter bank: blank, header, body, footer,
    // sender, paper id, blank
    let mut bank = Bmg::new();
    for text in [
        "",
        "Dear \n,",
        "Thank you for playing.\nAttached is a present:\n{001A06010002}\nEnjoy!",
        "The Town Hall",
        "Pelly",
        "407",
        "",
    ] {
        bank.push(Message::new(text, DEFAULT_ATTR));
    }

    let data = bank.save().unwrap();
    assert_eq!(Bmg::from_slice(&data).unwrap(), bank);

    // deterministic output
    assert_eq!(bank.save().unwrap(), data);
}

#[quickcheck]
fn plain_text_round_trips(text: String) -> TestResult {
    let reserved = ['{', '}', '\0', '\u{1A}'];
    if text.chars().any(|c| reserved.contains(&c)) {
        return TestResult::discard();
    }

    let encoded = encode_text(&text).unwrap();
    TestResult::from_bool(decode_text(&encoded, 0).unwrap() == text)
}

#[quickcheck]
fn bank_round_trips(entries: Vec<(String, u128)>) -> TestResult {
    let reserved = ['{', '}', '\0', '\u{1A}'];
    if entries
        .iter()
        .any(|(text, _)| text.chars().any(|c| reserved.contains(&c)))
    {
        return TestResult::discard();
    }

    let mut bank = Bmg::new();
    for (text, attr) in entries {
        bank.push(Message::new(text, attr.to_be_bytes()));
    }

    let back = Bmg::from_slice(&bank.save().unwrap()).unwrap();
    TestResult::from_bool(back == bank)
}

#[cfg(feature = "json")]
#[test]
fn interchange_round_trips() {
    let mut bank = Bmg::new();
    bank.push(Message::new("Dear \n,", HEADER_ATTR));
    bank.push(Message::new("{001A06010002}404", DEFAULT_ATTR));

    let doc = bank.to_json_vec().unwrap();
    assert_eq!(Bmg::from_json_slice(&doc).unwrap(), bank);

    // binary and interchange forms describe the same bank
    let binary = bank.save().unwrap();
    let reimported = Bmg::from_json_slice(&doc).unwrap();
    assert_eq!(reimported.save().unwrap(), binary);
}

#[cfg(feature = "json")]
#[test]
fn interchange_document_shape() {
    let mut bank = Bmg::new();
    bank.push(Message::new("hi", DEFAULT_ATTR));
    let doc = String::from_utf8(bank.to_json_vec().unwrap()).unwrap();
    assert!(doc.contains("\"Messages\""));
    assert!(doc.contains("\"Attr\": \"00000000000000000000000000000001\""));
    assert!(doc.contains("\"Text\": \"hi\""));
}
