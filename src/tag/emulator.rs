use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Emulator codes carried by the [`TagId::Emulator`](super::TagId::Emulator)
/// tag and the legacy emulator field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EmulatorId {
    /// Unknown or unspecified dumping tool.
    Unknown = 0x00,
    /// ZSNES.
    Zsnes = 0x01,
    /// Snes9x.
    Snes9x = 0x02,
    /// ZST2SPC.
    Zst2Spc = 0x03,
    /// SNEShout.
    SnesHout = 0x05,
    /// ZSNES/W.
    ZsnesW = 0x07,
    /// SNESGT.
    SnesGt = 0x08,
}

impl EmulatorId {
    /// Canonical display name, empty for [`EmulatorId::Unknown`].
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Zsnes => "ZSNES",
            Self::Snes9x => "Snes9x",
            Self::Zst2Spc => "ZST2SPC",
            Self::SnesHout => "SNEShout",
            Self::ZsnesW => "ZSNESW",
            Self::SnesGt => "SNESGT",
            Self::Unknown => "",
        }
    }

    /// Case-insensitive lookup by name; unmatched names map to
    /// [`EmulatorId::Unknown`].
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("ZSNES") {
            Self::Zsnes
        } else if name.eq_ignore_ascii_case("Snes9x") {
            Self::Snes9x
        } else if name.eq_ignore_ascii_case("ZST2SPC") {
            Self::Zst2Spc
        } else if name.eq_ignore_ascii_case("SNEShout") {
            Self::SnesHout
        } else if name.eq_ignore_ascii_case("ZSNES/W") {
            Self::ZsnesW
        } else if name.eq_ignore_ascii_case("SNESGT") {
            Self::SnesGt
        } else {
            Self::Unknown
        }
    }
}
