//! The WC24 envelope: an RSA signed, AES-OFB encrypted wrapper applied to
//! a finished archive before distribution.
//!
//! ```text
//! 0x000  magic 0x57433234
//! 0x004  version (1)
//! 0x00C  flag byte (1)
//! 0x030  initialization vector (16 bytes)
//! 0x040  RSA-2048 PKCS#1 v1.5 SHA-1 signature over the plaintext
//! 0x140  AES-128-OFB ciphertext
//! ```
//!
//! The signature covers the plaintext payload, not the envelope header.
//! [`decrypt`] deliberately performs no signature verification — the
//! delivery client is the verifying party, and this mirrors the observed
//! behavior of the distribution pipeline. Callers must not treat a
//! successful decrypt as proof of integrity. OFB is a pure keystream mode,
//! so decryption with a wrong key or IV also "succeeds" and simply yields
//! garbage.

use crate::{buffer, Error, ErrorKind};
use aes::Aes128;
use ofb::cipher::{KeyIvInit, StreamCipher};
use ofb::Ofb;
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};

type Aes128Ofb = Ofb<Aes128>;

const WC24_MAGIC: u32 = 0x57433234;
const IV_OFFSET: usize = 0x30;
const IV_SIZE: usize = 16;
const SIGNATURE_OFFSET: usize = 0x40;
const SIGNATURE_SIZE: usize = 256;
const DATA_OFFSET: usize = 0x140;

/// Key material for envelope operations.
///
/// Either half may be absent; an operation that needs a missing key fails
/// with [`ErrorKind::KeysUnavailable`]. Encrypting needs both halves,
/// decrypting only the AES key.
#[derive(Clone, Default)]
pub struct Wc24Keys {
    rsa: Option<RsaPrivateKey>,
    aes: Option<[u8; IV_SIZE]>,
}

impl Wc24Keys {
    pub fn new() -> Self {
        Wc24Keys::default()
    }

    pub fn with_rsa(mut self, key: RsaPrivateKey) -> Self {
        self.rsa = Some(key);
        self
    }

    /// Installs the signing key from its PKCS#1 PEM form
    pub fn with_rsa_pem(self, pem: &str) -> Result<Self, Error> {
        let key = RsaPrivateKey::from_pkcs1_pem(pem)?;
        Ok(self.with_rsa(key))
    }

    pub fn with_aes(mut self, key: [u8; 16]) -> Self {
        self.aes = Some(key);
        self
    }

    /// True when both the signing and the encryption key are installed
    pub fn is_complete(&self) -> bool {
        self.rsa.is_some() && self.aes.is_some()
    }
}

impl std::fmt::Debug for Wc24Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // key material stays out of debug output
        f.debug_struct("Wc24Keys")
            .field("rsa", &self.rsa.is_some())
            .field("aes", &self.aes.is_some())
            .finish()
    }
}

/// Signs `data` and wraps it in an encrypted envelope.
///
/// A fresh IV is drawn from the OS entropy source on every call, so output
/// is intentionally not deterministic.
pub fn encrypt(data: &[u8], keys: &Wc24Keys) -> Result<Vec<u8>, Error> {
    let (rsa, aes) = match (&keys.rsa, keys.aes) {
        (Some(rsa), Some(aes)) => (rsa, aes),
        _ => return Err(Error::new(ErrorKind::KeysUnavailable)),
    };

    // a key of the wrong modulus size cannot fill the signature slot and
    // counts as not configured
    if rsa.size() != SIGNATURE_SIZE {
        return Err(Error::new(ErrorKind::KeysUnavailable));
    }

    let digest = Sha1::digest(data);
    let signature = rsa.sign(Pkcs1v15Sign::new::<Sha1>(), &digest)?;

    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);

    let mut payload = data.to_vec();
    Aes128Ofb::new(&aes.into(), &iv.into()).apply_keystream(&mut payload);

    let mut out = vec![0u8; DATA_OFFSET + payload.len()];
    buffer::put_u32(&mut out, 0x00, WC24_MAGIC)?;
    buffer::put_u32(&mut out, 0x04, 1)?;
    buffer::put_u8(&mut out, 0x0C, 1)?;
    buffer::put_bytes(&mut out, IV_OFFSET, &iv)?;
    buffer::put_bytes(&mut out, SIGNATURE_OFFSET, &signature)?;
    buffer::put_bytes(&mut out, DATA_OFFSET, &payload)?;
    Ok(out)
}

/// Decrypts an envelope's payload.
///
/// The stored signature is ignored; see the module documentation.
pub fn decrypt(data: &[u8], keys: &Wc24Keys) -> Result<Vec<u8>, Error> {
    let aes = match keys.aes {
        Some(aes) => aes,
        None => return Err(Error::new(ErrorKind::KeysUnavailable)),
    };

    let magic = buffer::get_u32(data, 0x00)?;
    if magic != WC24_MAGIC {
        return Err(Error::new(ErrorKind::BadMagic { found: magic }));
    }

    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(buffer::get_bytes(data, IV_OFFSET, IV_SIZE)?);

    let mut payload = match data.get(DATA_OFFSET..) {
        Some(ciphertext) => ciphertext.to_vec(),
        None => return Err(Error::new(ErrorKind::OutOfBounds { offset: DATA_OFFSET })),
    };
    Aes128Ofb::new(&aes.into(), &iv.into()).apply_keystream(&mut payload);
    Ok(payload)
}
