//! Resolved entry-point table.

use libloading::{Library, Symbol};
use thiserror::Error;

use crate::functions::*;

/// An exported symbol could not be resolved from the driver library.
#[derive(Debug, Error)]
#[error("Missing driver symbol {symbol}: {source}")]
pub struct SymbolError {
    /// Name of the unresolved export.
    pub symbol: &'static str,
    #[source]
    pub source: libloading::Error,
}

macro_rules! bt_api_table {
    ($($name:ident: $pfn:ty,)*) => {
        /// One function pointer per driver export.
        ///
        /// Fields are named after the exports. A table resolved from a
        /// [`Library`] is only valid while that library stays loaded.
        #[derive(Debug, Clone, Copy)]
        pub struct BtApiTable {
            $(pub $name: $pfn,)*
        }

        /// Export names in declaration order.
        pub const SYMBOL_NAMES: &[&str] = &[$(stringify!($name),)*];

        impl BtApiTable {
            /// Resolve every export from `library`.
            ///
            /// # Safety
            ///
            /// `library` must be the vendor driver, so that each export has
            /// the signature declared in [`crate::functions`]. The returned
            /// table must not be used after `library` is dropped.
            ///
            /// # Errors
            ///
            /// Returns the first export that cannot be found.
            pub unsafe fn load(library: &Library) -> Result<Self, SymbolError> {
                Ok(Self {
                    $($name: {
                        // SAFETY: the caller guarantees the export has this signature.
                        let symbol: Symbol<'_, $pfn> = unsafe {
                            library.get(concat!(stringify!($name), "\0").as_bytes())
                        }
                        .map_err(|source| SymbolError {
                            symbol: stringify!($name),
                            source,
                        })?;
                        *symbol
                    },)*
                })
            }
        }
    };
}

bt_api_table! {
    BTInit: PFN_BTInit,
    BTPitchRollData: PFN_BTPitchRollData,
    BTRotationVectorData: PFN_BTRotationVectorData,
    BTAccelerationData: PFN_BTAccelerationData,
    BTDefineEffect: PFN_BTDefineEffect,
    BTPlayEffect: PFN_BTPlayEffect,
    BTStartEffect: PFN_BTStartEffect,
    BTStopEffect: PFN_BTStopEffect,
    BTAbsoluteMovementData: PFN_BTAbsoluteMovementData,
    BTRelativeMovementData: PFN_BTRelativeMovementData,
    BTPause: PFN_BTPause,
    BTResume: PFN_BTResume,
    BTShutdown: PFN_BTShutdown,
    BTStatus: PFN_BTStatus,
    BTAPIVersion: PFN_BTAPIVersion,
    BTGetAddress: PFN_BTGetAddress,
    BTSetAddress: PFN_BTSetAddress,
    BTGetMotionLimitRange: PFN_BTGetMotionLimitRange,
    BTSetMotionLimitRange: PFN_BTSetMotionLimitRange,
    BTGetAccelerationPitch: PFN_BTGetAccelerationPitch,
    BTSetAccelerationPitch: PFN_BTSetAccelerationPitch,
    BTGetAccelerationRoll: PFN_BTGetAccelerationRoll,
    BTSetAccelerationRoll: PFN_BTSetAccelerationRoll,
    BTGetPositionPitch: PFN_BTGetPositionPitch,
    BTSetPositionPitch: PFN_BTSetPositionPitch,
    BTGetPositionRoll: PFN_BTGetPositionRoll,
    BTSetPositionRoll: PFN_BTSetPositionRoll,
    BTGetEffectScaling: PFN_BTGetEffectScaling,
    BTSetEffectScaling: PFN_BTSetEffectScaling,
    BTStartDiagnostic: PFN_BTStartDiagnostic,
    BTDiagnosticStatus: PFN_BTDiagnosticStatus,
    BTDeviceInformation: PFN_BTDeviceInformation,
    BTSetAccelerationHeave: PFN_BTSetAccelerationHeave,
    BTSetPositionHeave: PFN_BTSetPositionHeave,
    BTSetTipRounding: PFN_BTSetTipRounding,
}
