#![doc = r#"
Messages carried by track events: channel voice messages and system exclusive payloads.

Meta messages only exist inside files and live in [`file::meta`](crate::file::meta).
"#]

mod channel;
pub use channel::*;

mod sysex;
pub use sysex::*;
