//! Raw declarations for the BlueTiger motion platform driver (`BTApi`).
//!
//! The vendor ships a closed-source Windows library (`BTApi_x64.dll`) that
//! exports a flat C interface. This crate mirrors that interface exactly:
//! the constants, the `#[repr(C)]` records and one function-pointer type per
//! exported entry point. Names follow the vendor header so the declarations
//! can be read side by side with the vendor documentation.
//!
//! Nothing here is safe to call directly. The [`BtApiTable`] resolves every
//! entry point from a loaded library; the `bluetiger` crate wraps it in a safe
//! API.
//!
//! # Layout
//!
//! | Type | Size | Notes |
//! |------|------|-------|
//! | [`tBTMAC`] | 6 | byte array |
//! | [`tBTIP`] | 4 | byte array |
//! | [`tBTVector3`] | 12 | three `f32` |
//! | [`tBTEffect`] | 32 | `u16` duration padded to 4 |
//! | [`tBTDeviceInfo`] | 138 | 137 bytes of fields, 1 byte of padding before `apiVersion` |

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]

pub mod consts;
pub mod functions;
pub mod table;
pub mod types;

pub use consts::*;
pub use functions::*;
pub use table::{BtApiTable, SYMBOL_NAMES, SymbolError};
pub use types::*;
