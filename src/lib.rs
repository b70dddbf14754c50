/*!

A low level codec library for WiiConnect24 distributables: the U8 archive,
the BMG message bank, and the WC24 signed + encrypted envelope that wraps a
finished archive for the console's online delivery client.

## Features

- ✔ Bit-exact: containers round trip byte for byte
- ✔ Deterministic: the same inputs always serialize to the same bytes
- ✔ Opaque where it counts: escape blocks and message attributes pass
  through untouched instead of being interpreted
- ✔ Explicit keys: no ambient key state; envelope operations take a
  [`Wc24Keys`] value

## Quick Start

Build a message bank and read it back:

```rust
use pelly::{Bmg, Message};

# fn main() -> Result<(), pelly::Error> {
let mut bank = Bmg::new();
bank.push(Message::new("Dear \n,", [0u8; 16]));
bank.push(Message::new("Thank you for playing!", [0u8; 16]));

let data = bank.save()?;
let back = Bmg::from_slice(&data)?;
assert_eq!(back.messages()[1].text, "Thank you for playing!");
# Ok(())
# }
```

Pack files into an archive and extract them again:

```rust
use pelly::U8Archive;

# fn main() -> Result<(), pelly::Error> {
let mut archive = U8Archive::new();
archive.add_file("info.bin", vec![0u8; 20])?;
archive.add_file("letters/ltrue.bmg", vec![1, 2, 3])?;

let data = archive.save()?;
let back = U8Archive::from_slice(&data)?;
assert_eq!(back.file("info.bin"), Some(&[0u8; 20][..]));
assert!(back.paths().any(|p| p == "letters"));
# Ok(())
# }
```

Wrap an archive for distribution (keys required):

```rust,no_run
use pelly::{wc24, Wc24Keys};

# use std::convert::TryInto;
# fn main() -> Result<(), Box<dyn std::error::Error>> {
let pem = std::fs::read_to_string("rvforestdl.pem")?;
let aes: [u8; 16] = std::fs::read("rvforestdl.aes.bin")?[..16].try_into()?;
let keys = Wc24Keys::new().with_rsa_pem(&pem)?.with_aes(aes);

let archive = std::fs::read("build/present_E.arc")?;
let sealed = wc24::encrypt(&archive, &keys)?;
std::fs::write("build/present_E.arc.wc24", sealed)?;
# Ok(())
# }
```

## Escape markup

Message text is UTF-16BE with inline escape blocks for control sequences
(color changes, variable insertion). Decoding renders each block as `{hex}`
markup; encoding copies the markup back verbatim, so text edited in its
decoded form re-encodes to the exact original bytes as long as the markup
is untouched.

## Interchange

With the `json` feature (on by default), a bank converts to and from an
ordered list of `{ "Attr": hex, "Text": text }` records — the only human
facing serialization, exact round trip with the binary form.

*/

pub mod archive;
pub mod bmg;
pub mod buffer;
mod errors;
pub mod wc24;

pub use self::archive::U8Archive;
pub use self::bmg::{Bmg, Message};
pub use self::errors::{Error, ErrorKind};
pub use self::wc24::Wc24Keys;
